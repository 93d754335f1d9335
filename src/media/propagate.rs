use crate::media::ledger::{Ledger, LedgerEntry};
use crate::media::paths::{MediaLayout, absolute_key};
use crate::media::resolver::{base_name, candidate_paths, normalize_reference_path};
use crate::media::rewrite::render;
use crate::media::scanner::{scan, substitute};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationOutcome {
    pub text: String,
    pub rewrites: usize,
}

/// Entry a surviving reference should point at. A search-path candidate that
/// is a ledger source or destination binds first; otherwise the first entry
/// with the same original base name.
fn pick_entry<'l>(
    layout: &MediaLayout,
    ledger: &'l Ledger,
    normalized: &str,
) -> Option<&'l LedgerEntry> {
    let bound = candidate_paths(layout, normalized)
        .iter()
        .find_map(|candidate| ledger.find(&absolute_key(candidate)));
    if let Some(index) = bound {
        return ledger.get(index);
    }
    let name = base_name(normalized);
    if name.is_empty() {
        return None;
    }
    ledger.with_original_name(name).first().copied()
}

pub fn propagate_text(layout: &MediaLayout, ledger: &Ledger, text: &str) -> PropagationOutcome {
    if ledger.is_empty() {
        return PropagationOutcome {
            text: text.to_string(),
            rewrites: 0,
        };
    }

    let occurrences = scan(text);
    let mut rewrites = 0usize;
    let out = substitute(text, &occurrences, |occ| {
        if occ.is_remote() {
            return None;
        }
        let normalized = normalize_reference_path(occ.raw_path);
        let entry = pick_entry(layout, ledger, &normalized)?;
        let rendered = render(occ, &layout.relative_path(&entry.filename), &entry.label);
        if rendered == occ.text {
            return None;
        }
        rewrites += 1;
        Some(rendered)
    });

    PropagationOutcome {
        text: out,
        rewrites,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::paths::layout_for;
    use std::path::{Path, PathBuf};

    fn entry(root: &Path, source: &str, filename: &str, label: &str) -> LedgerEntry {
        let source = root.join(source);
        LedgerEntry {
            original_name: source
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string(),
            source,
            destination: root.join("media").join(filename),
            filename: filename.to_string(),
            label: label.to_string(),
            moved: true,
            duplicate: false,
        }
    }

    fn fixture() -> (MediaLayout, Ledger) {
        let root = PathBuf::from("/nonexistent-mew-root");
        let layout = layout_for(&root, "media");
        let mut ledger = Ledger::default();
        ledger.insert(entry(&root, "foo.png", "Foo.png", "Foo"));
        ledger.insert(entry(&root, "clip.mp4", "Intro.mp4", "Intro"));
        (layout, ledger)
    }

    #[test]
    fn rewrites_references_by_original_name_in_any_form() {
        let (layout, ledger) = fixture();
        let text = "![x](foo.png)\n![y](<old dir/foo.png>)\n![z](C:\\pics\\foo.png)\n![w](/abs/foo.png)";
        let out = propagate_text(&layout, &ledger, text);
        assert_eq!(
            out.text,
            "![Foo](media/Foo.png)\n![Foo](media/Foo.png)\n![Foo](media/Foo.png)\n![Foo](media/Foo.png)"
        );
        assert_eq!(out.rewrites, 4);
    }

    #[test]
    fn media_tags_get_canonical_src_and_title() {
        let (layout, ledger) = fixture();
        let text = r#"<video controls src="old/clip.mp4">"#;
        let out = propagate_text(&layout, &ledger, text);
        assert_eq!(
            out.text,
            r#"<video controls src="media/Intro.mp4" title="Intro">"#
        );
    }

    #[test]
    fn remote_and_unrelated_references_are_untouched() {
        let (layout, ledger) = fixture();
        let text = "![r](https://example.com/foo.png) ![u](bar.png) ![p](foo.png.bak)";
        let out = propagate_text(&layout, &ledger, text);
        assert_eq!(out.text, text);
        assert_eq!(out.rewrites, 0);
    }

    #[test]
    fn second_run_changes_nothing() {
        let (layout, ledger) = fixture();
        let once = propagate_text(&layout, &ledger, "![a](foo.png) <audio src='clip.mp4'>");
        let twice = propagate_text(&layout, &ledger, &once.text);
        assert_eq!(once.text, twice.text);
        assert_eq!(twice.rewrites, 0);
    }

    #[test]
    fn shared_base_name_prefers_entry_on_search_path() {
        let root = PathBuf::from("/nonexistent-mew-root");
        let layout = layout_for(&root, "media");
        let mut ledger = Ledger::default();
        ledger.insert(entry(&root, "a/pic.png", "First.png", "First"));
        ledger.insert(entry(&root, "b/pic.png", "Second.png", "Second"));

        let out = propagate_text(&layout, &ledger, "![?](b/pic.png) ![?](c/pic.png)");
        assert_eq!(out.text, "![Second](media/Second.png) ![First](media/First.png)");
    }
}
