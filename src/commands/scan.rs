use anyhow::Result;

use crate::commands::{CommandReport, CommonOptions, describe_workspace, open_workspace};
use crate::media::documents;
use crate::media::ledger::Ledger;
use crate::media::paths::{MediaLayout, layout_for};
use crate::media::resolver::{Resolution, normalize_reference_path, resolve};
use crate::media::sanitize::sanitize_stem;
use crate::media::scanner::{Occurrence, OccurrenceKind, scan};

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub common: CommonOptions,
}

#[derive(Debug, Clone, Copy, Default)]
struct ScanTotals {
    references: usize,
    local: usize,
    remote: usize,
    missing: usize,
}

fn describe(
    layout: &MediaLayout,
    empty: &Ledger,
    document: &str,
    occ: &Occurrence<'_>,
    totals: &mut ScanTotals,
) -> String {
    totals.references += 1;
    let label_from = match &occ.kind {
        OccurrenceKind::MediaTag { title: None, .. } => "filename",
        OccurrenceKind::MediaTag { title: Some(_), .. } => "title",
        OccurrenceKind::Image => "alt",
    };
    let head = format!(
        "ref document={} kind={} label={:?} label_from={} path={:?}",
        document,
        occ.kind_name(),
        occ.label,
        label_from,
        occ.raw_path
    );
    if occ.is_remote() {
        totals.remote += 1;
        return format!("{head} status=remote");
    }

    let normalized = normalize_reference_path(occ.raw_path);
    match resolve(layout, &normalized, empty) {
        Resolution::Found(source) => {
            totals.local += 1;
            let stem = sanitize_stem(&occ.label, occ.fallback_stem());
            let source_display = source
                .strip_prefix(&layout.root)
                .unwrap_or(&source)
                .display()
                .to_string();
            format!("{head} status=found source={source_display} stem={stem}")
        }
        Resolution::Known(_) | Resolution::Missing => {
            totals.missing += 1;
            format!("{head} status=missing")
        }
    }
}

pub fn run(opts: &ScanOptions) -> Result<CommandReport> {
    let ws = open_workspace(&opts.common)?;
    let mut report = CommandReport::new("scan");
    describe_workspace(&ws, &mut report);

    let layout = layout_for(&ws.root, &ws.loaded.config.media_dir);
    let paths = documents::discover(&ws.root, &ws.loaded.config.document_extensions)?;
    let empty = Ledger::default();
    let mut totals = ScanTotals::default();

    for path in &paths {
        let doc = match documents::read(path) {
            Ok(doc) => doc,
            Err(err) => {
                report.detail(format!("unreadable document={} err={err:#}", path.display()));
                continue;
            }
        };
        let name = doc.display_name();
        for occ in scan(&doc.text) {
            let line = describe(&layout, &empty, &name, &occ, &mut totals);
            report.detail(line);
        }
    }

    report.detail(format!("documents.scanned={}", paths.len()));
    report.detail(format!("references.total={}", totals.references));
    report.detail(format!("references.local={}", totals.local));
    report.detail(format!("references.remote={}", totals.remote));
    report.detail(format!("references.missing={}", totals.missing));
    Ok(report)
}
