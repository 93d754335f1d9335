use crate::error::MewError;
use crate::media::ledger::{Ledger, LedgerEntry};
use crate::media::paths::{MediaLayout, absolute_key};
use crate::media::sanitize::sanitize_stem;
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalName {
    pub filename: String,
    pub destination: PathBuf,
    pub duplicate: bool,
}

fn file_name_for(stem: &str, ext: Option<&str>, counter: usize) -> String {
    let stem = if counter == 0 {
        stem.to_string()
    } else {
        format!("{stem}_{counter}")
    };
    match ext {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

/// Picks the first free `stem.ext`, `stem_1.ext`, ... in the target dir; a slot
/// already holding `source` counts as free.
pub fn choose_name(
    layout: &MediaLayout,
    ledger: &Ledger,
    stem: &str,
    ext: Option<&str>,
    source: &Path,
) -> CanonicalName {
    let mut counter = 0usize;
    loop {
        let filename = file_name_for(stem, ext, counter);
        let destination = layout.target_dir.join(&filename);
        let occupied = destination.exists() || ledger.claims(&destination);
        if !occupied || absolute_key(&destination) == source {
            return CanonicalName {
                filename,
                destination,
                duplicate: counter > 0,
            };
        }
        counter += 1;
    }
}

pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    if from == to {
        return Ok(());
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    match fs::rename(from, to) {
        Ok(_) => Ok(()),
        Err(rename_err) => {
            if matches!(
                rename_err.kind(),
                ErrorKind::CrossesDevices | ErrorKind::PermissionDenied
            ) {
                fs::copy(from, to).with_context(|| {
                    format!("failed to copy {} to {}", from.display(), to.display())
                })?;
                fs::remove_file(from)
                    .with_context(|| format!("failed to remove {}", from.display()))?;
                Ok(())
            } else {
                Err(MewError::MoveFailed {
                    from: from.display().to_string(),
                    to: to.display().to_string(),
                    reason: rename_err.to_string(),
                }
                .into())
            }
        }
    }
}

/// Names and moves one source file, returning the entry to record. Nothing is
/// recorded here; the caller owns the ledger write.
pub fn relocate(
    layout: &MediaLayout,
    ledger: &Ledger,
    source: &Path,
    label: &str,
    fallback_stem: &str,
) -> Result<LedgerEntry> {
    let stem = sanitize_stem(label, fallback_stem);
    let ext = source
        .extension()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty());
    let name = choose_name(layout, ledger, &stem, ext, source);

    let moved = source != name.destination.as_path();
    if moved {
        move_file(source, &name.destination)?;
    }

    let original_name = source
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(LedgerEntry {
        source: source.to_path_buf(),
        original_name,
        destination: name.destination,
        filename: name.filename,
        label: label.to_string(),
        moved,
        duplicate: name.duplicate,
    })
}
