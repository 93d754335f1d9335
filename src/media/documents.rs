use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
    pub changed: bool,
    pub failed: bool,
}

impl Document {
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

fn has_document_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want == ext))
}

/// Regular files directly inside `root` with one of `extensions`, sorted by path.
pub fn discover(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(root).with_context(|| format!("failed to read {}", root.display()))?;
    let mut out = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && has_document_extension(&path, extensions) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

pub fn read(path: &Path) -> Result<Document> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(Document {
        path: path.to_path_buf(),
        text,
        changed: false,
        failed: false,
    })
}

pub fn write_atomic(path: &Path, text: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(text.as_bytes())
        .with_context(|| format!("failed to write temp file for {}", path.display()))?;
    if let Ok(meta) = fs::metadata(path) {
        let _ = fs::set_permissions(tmp.path(), meta.permissions());
    }
    tmp.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discover_filters_by_extension_and_sorts() {
        let tmp = tempdir().expect("tempdir");
        fs::write(tmp.path().join("b.md"), "b").expect("write");
        fs::write(tmp.path().join("a.md"), "a").expect("write");
        fs::write(tmp.path().join("c.txt"), "c").expect("write");
        fs::write(tmp.path().join("d.MD"), "d").expect("write");
        fs::create_dir_all(tmp.path().join("dir.md")).expect("mkdir");

        let found = discover(tmp.path(), &["md".to_string()]).expect("discover");
        let names: Vec<_> = found
            .iter()
            .filter_map(|p| p.file_name().and_then(|s| s.to_str()))
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
    }

    #[test]
    fn write_atomic_replaces_content() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("note.md");
        fs::write(&path, "old").expect("write");
        write_atomic(&path, "new").expect("write_atomic");
        assert_eq!(fs::read_to_string(&path).expect("read"), "new");

        let doc = read(&path).expect("read doc");
        assert_eq!(doc.display_name(), "note.md");
        assert!(!doc.changed);
    }
}
