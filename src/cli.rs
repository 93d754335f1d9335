use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{self, CommandReport, CommonOptions};
use crate::logging;
use crate::media::config::ConfigOverrides;

#[derive(Debug, Parser)]
#[command(
    name = "mew",
    version,
    about = "Gather media referenced from Markdown into one folder and rewrite every reference"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Working directory holding the documents (defaults to the current directory).
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Name of the folder media is gathered into.
    #[arg(long, global = true)]
    media_dir: Option<String>,
    /// Document extension to process; repeat for several.
    #[arg(long = "ext", global = true)]
    extensions: Vec<String>,
    /// Print the report as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Move referenced media into the media folder and rewrite references (default).
    Normalize {
        /// Include one line per ledger entry in the report.
        #[arg(long)]
        ledger: bool,
    },
    /// List references and how they resolve without changing anything.
    Scan,
    /// Show the effective configuration.
    Config,
}

fn common_options(global: &GlobalArgs) -> CommonOptions {
    CommonOptions {
        root: global.root.clone(),
        overrides: ConfigOverrides {
            media_dir: global.media_dir.clone(),
            document_extensions: global.extensions.clone(),
        },
    }
}

fn render_text(report: &CommandReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}: {}\n",
        report.command,
        if report.ok { "ok" } else { "issues found" }
    ));
    for detail in &report.details {
        out.push_str(&format!("  {detail}\n"));
    }
    for issue in &report.issues {
        out.push_str(&format!("  issue: {issue}\n"));
    }
    out
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render_text(report));
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.global.verbose);
    let common = common_options(&cli.global);

    let report = match cli.command.unwrap_or(Command::Normalize { ledger: false }) {
        Command::Normalize { ledger } => {
            commands::normalize::run(&commands::normalize::NormalizeOptions {
                common,
                show_ledger: ledger,
            })?
        }
        Command::Scan => commands::scan::run(&commands::scan::ScanOptions { common })?,
        Command::Config => {
            commands::config_show::run(&commands::config_show::ConfigShowOptions { common })?
        }
    };

    print_report(&report, cli.global.json)?;
    if !report.ok {
        bail!("{} reported {} issue(s)", report.command, report.issues.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_normalize() {
        let cli = Cli::try_parse_from(["mew", "--media-dir", "img"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.global.media_dir.as_deref(), Some("img"));
    }

    #[test]
    fn repeated_ext_flags_accumulate() {
        let cli = Cli::try_parse_from(["mew", "scan", "--ext", "md", "--ext", "txt"]).expect("parse");
        assert!(matches!(cli.command, Some(Command::Scan)));
        assert_eq!(cli.global.extensions, vec!["md", "txt"]);
    }

    #[test]
    fn text_report_lists_details_and_issues() {
        let mut report = CommandReport::new("normalize");
        report.detail("files.moved=2");
        report.issue("bad");
        assert_eq!(
            render_text(&report),
            "normalize: issues found\n  files.moved=2\n  issue: bad\n"
        );
    }
}
