use crate::error::WarnCode;
use crate::logging;
use crate::media::documents::{self, Document};
use crate::media::ledger::Ledger;
use crate::media::paths::MediaLayout;
use crate::media::propagate::propagate_text;
use crate::media::relocate::relocate;
use crate::media::resolver::{Resolution, normalize_reference_path, resolve};
use crate::media::rewrite::render;
use crate::media::scanner::{Occurrence, scan, substitute};
use crate::media::warn::{self, WarnEvent};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub references: usize,
    pub moved: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub remote: usize,
    pub propagated: usize,
    pub documents: usize,
    pub documents_updated: usize,
    pub documents_failed: usize,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub stats: RunStats,
    pub ledger: Ledger,
}

/// Holds the ledger for one run. First passes must all finish before `propagate`.
#[derive(Debug)]
pub struct Normalizer<'a> {
    layout: &'a MediaLayout,
    ledger: Ledger,
    stats: RunStats,
}

impl<'a> Normalizer<'a> {
    pub fn new(layout: &'a MediaLayout) -> Self {
        Self {
            layout,
            ledger: Ledger::default(),
            stats: RunStats::default(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    fn handle(&mut self, document: &str, occ: &Occurrence<'_>) -> Option<String> {
        self.stats.references += 1;
        if occ.is_remote() {
            self.stats.remote += 1;
            return None;
        }

        let normalized = normalize_reference_path(occ.raw_path);
        let index = match resolve(self.layout, &normalized, &self.ledger) {
            Resolution::Known(index) => index,
            Resolution::Found(source) => {
                match relocate(self.layout, &self.ledger, &source, &occ.label, occ.fallback_stem())
                {
                    Ok(entry) => {
                        if entry.moved {
                            self.stats.moved += 1;
                            let from = source.display().to_string();
                            let to = self.layout.relative_path(&entry.filename);
                            logging::info(
                                "moved",
                                &[
                                    ("document", document),
                                    ("from", from.as_str()),
                                    ("to", to.as_str()),
                                ],
                            );
                        }
                        if entry.duplicate {
                            self.stats.duplicates += 1;
                        }
                        self.ledger.insert(entry)
                    }
                    Err(err) => {
                        self.stats.skipped += 1;
                        warn::emit(WarnEvent {
                            code: WarnCode::W002MoveFailed,
                            stage: "first-pass",
                            action: "relocate",
                            document,
                            reference: occ.raw_path,
                            reason: "move-failed",
                            err: &format!("{err:#}"),
                        });
                        return None;
                    }
                }
            }
            Resolution::Missing => {
                self.stats.skipped += 1;
                warn::emit(WarnEvent {
                    code: WarnCode::W001SourceMissing,
                    stage: "first-pass",
                    action: "resolve",
                    document,
                    reference: &normalized,
                    reason: "not-found",
                    err: "",
                });
                return None;
            }
        };

        let entry = self.ledger.get(index)?;
        Some(render(
            occ,
            &self.layout.relative_path(&entry.filename),
            &entry.label,
        ))
    }

    pub fn first_pass(&mut self, document: &str, text: &str) -> String {
        let occurrences = scan(text);
        substitute(text, &occurrences, |occ| self.handle(document, occ))
    }

    pub fn propagate(&mut self, text: &str) -> String {
        let outcome = propagate_text(self.layout, &self.ledger, text);
        self.stats.propagated += outcome.rewrites;
        outcome.text
    }

    pub fn finish(self) -> RunOutcome {
        RunOutcome {
            stats: self.stats,
            ledger: self.ledger,
        }
    }
}

fn store(doc: &mut Document, text: String, stage: &str, stats: &mut RunStats) {
    if text == doc.text {
        return;
    }
    let name = doc.display_name();
    match documents::write_atomic(&doc.path, &text) {
        Ok(()) => {
            if !doc.changed {
                stats.documents_updated += 1;
            }
            doc.changed = true;
            doc.text = text;
        }
        Err(err) => {
            if !doc.failed {
                stats.documents_failed += 1;
            }
            doc.failed = true;
            warn::emit(WarnEvent {
                code: WarnCode::W004DocumentUnwritable,
                stage,
                action: "write-document",
                document: &name,
                reference: "",
                reason: "write-failed",
                err: &format!("{err:#}"),
            });
        }
    }
}

/// Runs both passes over `paths`. Documents are written after each pass that changes them.
pub fn normalize_documents(layout: &MediaLayout, paths: &[PathBuf]) -> RunOutcome {
    let mut normalizer = Normalizer::new(layout);
    let mut docs = Vec::with_capacity(paths.len());
    let mut failed = 0usize;

    for path in paths {
        match documents::read(path) {
            Ok(doc) => docs.push(doc),
            Err(err) => {
                failed += 1;
                warn::emit(WarnEvent {
                    code: WarnCode::W003DocumentUnreadable,
                    stage: "load",
                    action: "read-document",
                    document: &path.display().to_string(),
                    reference: "",
                    reason: "read-failed",
                    err: &format!("{err:#}"),
                });
            }
        }
    }

    let mut io_stats = RunStats {
        documents: docs.len(),
        documents_failed: failed,
        ..RunStats::default()
    };

    for doc in &mut docs {
        let name = doc.display_name();
        logging::info("first-pass", &[("document", name.as_str())]);
        let text = normalizer.first_pass(&name, &doc.text);
        store(doc, text, "first-pass", &mut io_stats);
    }

    let entries = normalizer.ledger().len().to_string();
    let moved = normalizer.stats().moved.to_string();
    logging::info(
        "propagate",
        &[("entries", entries.as_str()), ("moved", moved.as_str())],
    );
    for doc in &mut docs {
        let text = normalizer.propagate(&doc.text);
        store(doc, text, "propagate", &mut io_stats);
    }

    let mut outcome = normalizer.finish();
    outcome.stats.documents = io_stats.documents;
    outcome.stats.documents_updated = io_stats.documents_updated;
    outcome.stats.documents_failed = io_stats.documents_failed;
    outcome
}
