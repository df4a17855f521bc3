use std::path::{Path, PathBuf};

/// External programs dutis shells out to, with the hint shown when one is missing.
pub const REQUIRED_TOOLS: [(&str, &str); 3] = [
    ("mdls", "ships with macOS Spotlight"),
    ("swift", "install the Xcode command line tools: xcode-select --install"),
    ("duti", "install with Homebrew: brew install duti"),
];

pub fn find_on_path(program: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    find_in(std::env::split_paths(&path), program)
}

pub fn find_in<I, P>(dirs: I, program: &str) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    dirs.into_iter()
        .map(|dir| dir.as_ref().join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
