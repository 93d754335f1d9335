use crate::error::MewError;
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct MediaLayout {
    pub root: PathBuf,
    pub target_dir: PathBuf,
    pub target_name: String,
}

impl MediaLayout {
    /// Reference text for a canonical file, always relative to the root.
    pub fn relative_path(&self, filename: &str) -> String {
        format!("{}/{}", self.target_name, filename)
    }
}

pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let root = match explicit {
        Some(path) => path.to_path_buf(),
        None => env::current_dir().context("failed to read current directory")?,
    };
    if !root.is_dir() {
        return Err(MewError::MissingRoot(root.display().to_string()).into());
    }
    fs::canonicalize(&root).with_context(|| format!("failed to resolve {}", root.display()))
}

/// Layout without touching the filesystem beyond resolving the root.
pub fn layout_for(root: &Path, target_name: &str) -> MediaLayout {
    MediaLayout {
        root: root.to_path_buf(),
        target_dir: root.join(target_name),
        target_name: target_name.to_string(),
    }
}

pub fn ensure_layout(root: &Path, target_name: &str) -> Result<MediaLayout> {
    let target_dir = root.join(target_name);
    fs::create_dir_all(&target_dir).map_err(|err| {
        MewError::TargetDirUnavailable(format!("{}: {err}", target_dir.display()))
    })?;
    let target_dir = fs::canonicalize(&target_dir)
        .with_context(|| format!("failed to resolve {}", target_dir.display()))?;
    Ok(MediaLayout {
        root: root.to_path_buf(),
        target_dir,
        target_name: target_name.to_string(),
    })
}

/// Absolute identity of a path that may no longer exist (a file already moved away).
pub fn absolute_key(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => match fs::canonicalize(parent) {
            Ok(parent) => parent.join(name),
            Err(_) => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}
