use crate::media::ledger::Ledger;
use crate::media::paths::{MediaLayout, absolute_key};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Already handled this run; index into the ledger.
    Known(usize),
    Found(PathBuf),
    Missing,
}

pub fn normalize_reference_path(raw: &str) -> String {
    raw.trim()
        .replace('\\', "/")
        .trim_matches(|c| c == '<' || c == '>')
        .to_string()
}

pub fn base_name(normalized: &str) -> &str {
    normalized
        .rsplit('/')
        .next()
        .unwrap_or(normalized)
}

/// Search path in priority order: as written, bare name in the root, bare name in the target dir.
pub fn candidate_paths(layout: &MediaLayout, normalized: &str) -> Vec<PathBuf> {
    let mut out = Vec::with_capacity(3);
    if normalized.is_empty() {
        return out;
    }
    out.push(layout.root.join(normalized));
    let name = base_name(normalized);
    if !name.is_empty() && name != "." && name != ".." {
        out.push(layout.root.join(name));
        out.push(layout.target_dir.join(name));
    }
    out
}

fn is_regular_file(path: &Path) -> bool {
    path.is_file()
}

pub fn resolve(layout: &MediaLayout, normalized: &str, ledger: &Ledger) -> Resolution {
    for candidate in candidate_paths(layout, normalized) {
        let key = absolute_key(&candidate);
        if let Some(index) = ledger.find(&key) {
            return Resolution::Known(index);
        }
        if is_regular_file(&candidate) {
            return Resolution::Found(key);
        }
    }
    Resolution::Missing
}
