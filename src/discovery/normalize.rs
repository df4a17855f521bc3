const URL_SCHEME: &str = "file://";

const SYSTEM_PREFIXES: [&str; 4] = [
    "/Applications/",
    "/System/Applications/",
    "/System/Volumes/Preboot/Cryptexes/App/System/Applications/",
    "/Setapp/",
];

const CONTAINER_FOLDERS: [&str; 2] = ["Utilities", "TeX"];

const BUNDLE_SUFFIX: &str = ".app";

/// Condenses a raw handler path or file URL into a short label such as
/// `Preview.app` or `Utilities/Terminal.app`.
pub fn normalize(raw: &str) -> String {
    let path = raw.strip_prefix(URL_SCHEME).unwrap_or(raw);

    let decoded = urlencoding::decode(path)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| path.to_string());
    let path = decoded.strip_suffix('/').unwrap_or(&decoded);

    if !path.contains('/') {
        return path.to_string();
    }

    if let Some(rest) = SYSTEM_PREFIXES
        .iter()
        .find_map(|prefix| path.strip_prefix(prefix))
    {
        return rest.to_string();
    }

    let segments: Vec<&str> = path.split('/').collect();
    for (i, segment) in segments.iter().enumerate().rev() {
        if !segment.ends_with(BUNDLE_SUFFIX) {
            continue;
        }
        if i > 0 && CONTAINER_FOLDERS.contains(&segments[i - 1]) {
            return format!("{}/{}", segments[i - 1], segment);
        }
        return segment.to_string();
    }

    path.to_string()
}

/// Normalizes every path, dropping empty labels and repeats while keeping
/// first-seen order.
pub fn normalize_all<I, S>(raw_paths: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    let mut labels = Vec::new();

    for raw in raw_paths {
        let raw = raw.as_ref();
        if raw.is_empty() {
            continue;
        }
        let label = normalize(raw);
        if label.is_empty() {
            continue;
        }
        if seen.insert(label.clone()) {
            labels.push(label);
        }
    }

    labels
}
