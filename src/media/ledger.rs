use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub source: PathBuf,
    pub original_name: String,
    pub destination: PathBuf,
    pub filename: String,
    pub label: String,
    pub moved: bool,
    pub duplicate: bool,
}

/// Run-scoped record of every source file handled, in creation order.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    by_source: BTreeMap<PathBuf, usize>,
    by_destination: BTreeMap<PathBuf, usize>,
    by_original_name: BTreeMap<String, Vec<usize>>,
}

impl Ledger {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&LedgerEntry> {
        self.entries.get(index)
    }

    pub fn find(&self, path: &Path) -> Option<usize> {
        self.by_source
            .get(path)
            .or_else(|| self.by_destination.get(path))
            .copied()
    }

    pub fn claims(&self, destination: &Path) -> bool {
        self.by_destination.contains_key(destination)
    }

    pub fn with_original_name(&self, name: &str) -> Vec<&LedgerEntry> {
        self.by_original_name
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|index| self.entries.get(*index))
            .collect()
    }

    /// Records a new entry; an existing entry for the same source wins.
    pub fn insert(&mut self, entry: LedgerEntry) -> usize {
        if let Some(existing) = self.by_source.get(&entry.source) {
            return *existing;
        }
        let index = self.entries.len();
        self.by_source.insert(entry.source.clone(), index);
        self.by_destination.insert(entry.destination.clone(), index);
        self.by_original_name
            .entry(entry.original_name.clone())
            .or_default()
            .push(index);
        self.entries.push(entry);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(source: &str, filename: &str) -> LedgerEntry {
        let source = PathBuf::from(source);
        LedgerEntry {
            original_name: source
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string(),
            source,
            destination: PathBuf::from("/w/media").join(filename),
            filename: filename.to_string(),
            label: "Label".to_string(),
            moved: true,
            duplicate: false,
        }
    }

    #[test]
    fn insert_is_once_per_source() {
        let mut ledger = Ledger::default();
        let first = ledger.insert(entry("/w/a.png", "A.png"));
        let second = ledger.insert(entry("/w/a.png", "Other.png"));
        assert_eq!(first, second);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].filename, "A.png");
    }

    #[test]
    fn find_matches_source_or_destination() {
        let mut ledger = Ledger::default();
        let index = ledger.insert(entry("/w/a.png", "A.png"));
        assert_eq!(ledger.find(Path::new("/w/a.png")), Some(index));
        assert_eq!(ledger.find(Path::new("/w/media/A.png")), Some(index));
        assert_eq!(ledger.find(Path::new("/w/b.png")), None);
        assert!(ledger.claims(Path::new("/w/media/A.png")));
    }

    #[test]
    fn original_name_lookup_keeps_creation_order() {
        let mut ledger = Ledger::default();
        ledger.insert(entry("/w/x/pic.png", "First.png"));
        ledger.insert(entry("/w/y/pic.png", "Second.png"));
        let names: Vec<_> = ledger
            .with_original_name("pic.png")
            .into_iter()
            .map(|e| e.filename.as_str())
            .collect();
        assert_eq!(names, vec!["First.png", "Second.png"]);
        assert!(ledger.with_original_name("nope.png").is_empty());
    }
}
