use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dutis",
    version,
    about = "Pick and persist default applications for file suffixes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, short, help = "Suffix to configure (skips the suffix prompt)")]
    pub suffix: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Directory to scan for applications (default: /Applications)"
    )]
    pub apps_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Cache directory (default: ~/.cache/dutis)")]
    pub cache_dir: Option<PathBuf>,

    #[arg(
        long,
        short,
        global = true,
        help = "Concurrent metadata queries (default: 2x CPU count)"
    )]
    pub jobs: Option<usize>,

    #[arg(long, short, global = true, help = "Enable debug logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Set the default application for a suffix without prompting")]
    Set {
        #[arg(help = "File suffix (e.g., .pdf)")]
        suffix: String,
        #[arg(help = "Application name or unique prefix (e.g., Preview.app)")]
        application: String,
    },
    #[command(about = "Show applications the system can open a suffix with")]
    Recommend {
        #[arg(help = "File suffix (e.g., .pdf)")]
        suffix: String,
    },
    #[command(about = "List installed applications and their bundle identifiers")]
    Apps {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },
    #[command(about = "List saved associations")]
    List {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },
    #[command(about = "Remove a saved association")]
    Remove {
        #[arg(help = "File suffix (e.g., .pdf)")]
        suffix: String,
    },
    #[command(about = "Re-apply every saved association")]
    Apply,
    #[command(about = "Rebuild the application index and drop cached recommendations")]
    Refresh,
    #[command(about = "Check that mdls, swift and duti are available")]
    Check,
}
