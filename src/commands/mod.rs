pub mod config_show;
pub mod normalize;
pub mod scan;

use crate::media::config::{ConfigOverrides, LoadedConfig, load_config};
use crate::media::paths::resolve_root;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommonOptions {
    pub root: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub loaded: LoadedConfig,
}

pub fn open_workspace(opts: &CommonOptions) -> Result<Workspace> {
    let root = resolve_root(opts.root.as_deref())?;
    let loaded = load_config(&root, &opts.overrides)?;
    Ok(Workspace { root, loaded })
}

pub fn describe_workspace(ws: &Workspace, report: &mut CommandReport) {
    report.detail(format!("root={}", ws.root.display()));
    report.detail(format!("media_dir={}", ws.loaded.config.media_dir));
    report.detail(format!(
        "document_extensions={}",
        ws.loaded.config.document_extensions.join(",")
    ));
    if let Some(source) = &ws.loaded.source {
        report.detail(format!("config_file={}", source.display()));
    }
}
