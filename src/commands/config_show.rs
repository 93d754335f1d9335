use anyhow::Result;

use crate::commands::{CommandReport, CommonOptions, describe_workspace, open_workspace};
use crate::error::WarnCode;
use crate::media::config::unknown_env_keys;

#[derive(Debug, Clone, Default)]
pub struct ConfigShowOptions {
    pub common: CommonOptions,
}

pub fn run(opts: &ConfigShowOptions) -> Result<CommandReport> {
    let ws = open_workspace(&opts.common)?;
    let mut report = CommandReport::new("config");
    describe_workspace(&ws, &mut report);

    let target = ws.root.join(&ws.loaded.config.media_dir);
    report.detail(format!("media_dir.exists={}", target.is_dir()));

    for key in unknown_env_keys() {
        report.issue(format!(
            "{} unknown environment variable {key}",
            WarnCode::W005UnknownEnv.as_str()
        ));
    }

    Ok(report)
}
