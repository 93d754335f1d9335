use anyhow::Result;

use crate::commands::{CommandReport, CommonOptions, describe_workspace, open_workspace};
use crate::media::documents;
use crate::media::paths::ensure_layout;
use crate::media::pipeline::normalize_documents;

#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    pub common: CommonOptions,
    pub show_ledger: bool,
}

pub fn run(opts: &NormalizeOptions) -> Result<CommandReport> {
    let ws = open_workspace(&opts.common)?;
    let mut report = CommandReport::new("normalize");
    describe_workspace(&ws, &mut report);

    let layout = ensure_layout(&ws.root, &ws.loaded.config.media_dir)?;
    let paths = documents::discover(&ws.root, &ws.loaded.config.document_extensions)?;
    if paths.is_empty() {
        report.detail("no documents found");
        return Ok(report);
    }

    let outcome = normalize_documents(&layout, &paths);
    let stats = outcome.stats;

    report.detail(format!("documents.scanned={}", stats.documents));
    report.detail(format!("documents.updated={}", stats.documents_updated));
    report.detail(format!("references.total={}", stats.references));
    report.detail(format!("references.remote={}", stats.remote));
    report.detail(format!("references.skipped={}", stats.skipped));
    report.detail(format!("files.moved={}", stats.moved));
    report.detail(format!("files.duplicates_renamed={}", stats.duplicates));
    report.detail(format!("propagation.rewrites={}", stats.propagated));

    if opts.show_ledger {
        for entry in outcome.ledger.entries() {
            report.detail(format!(
                "ledger.entry source={} file={} label={} moved={} duplicate={}",
                entry.source.display(),
                layout.relative_path(&entry.filename),
                entry.label,
                entry.moved,
                entry.duplicate
            ));
        }
    }

    if stats.documents_failed > 0 {
        report.detail(format!("documents.failed={}", stats.documents_failed));
    }

    Ok(report)
}
