use crate::error::MewError;
use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

include!(concat!(env!("OUT_DIR"), "/mew_env_allowlist.rs"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MewConfig {
    pub media_dir: String,
    pub document_extensions: Vec<String>,
}

impl Default for MewConfig {
    fn default() -> Self {
        Self {
            media_dir: "media".to_string(),
            document_extensions: vec!["md".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PartialDocuments {
    extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PartialMedia {
    dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PartialMewConfig {
    media: Option<PartialMedia>,
    documents: Option<PartialDocuments>,
}

/// Values given on the command line; they win over file and env.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub media_dir: Option<String>,
    pub document_extensions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: MewConfig,
    pub source: Option<PathBuf>,
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_or_csv(var: &str, fallback: &[String]) -> Vec<String> {
    match env::var(var) {
        Ok(v) => {
            let out = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>();
            if out.is_empty() {
                fallback.to_vec()
            } else {
                out
            }
        }
        Err(_) => fallback.to_vec(),
    }
}

fn normalize_extensions(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for ext in raw {
        let ext = ext.trim().trim_start_matches('.');
        if !ext.is_empty() && !out.iter().any(|seen| seen == ext) {
            out.push(ext.to_string());
        }
    }
    out
}

fn validate(cfg: &MewConfig) -> Result<()> {
    let dir = cfg.media_dir.trim();
    if dir.is_empty() {
        return Err(MewError::InvalidConfig("media dir cannot be empty".to_string()).into());
    }
    let mut components = Path::new(dir).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_normal || dir.contains('\\') {
        return Err(MewError::InvalidConfig(format!(
            "media dir must be a single folder name, got `{dir}`"
        ))
        .into());
    }
    if cfg.document_extensions.is_empty() {
        return Err(
            MewError::InvalidConfig("document extensions cannot be empty".to_string()).into(),
        );
    }
    Ok(())
}

fn resolve_config_path(root: &Path) -> Option<PathBuf> {
    if let Ok(custom) = env::var("MEW_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let local = root.join("mew.toml");
    if local.exists() {
        return Some(local);
    }

    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("mew").join("config.toml"))
}

fn merge_file_config(base: &mut MewConfig, path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)
        .map_err(|err| MewError::InvalidConfig(format!("{}: {err}", path.display())))?;
    let parsed: PartialMewConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse mew config {}: {err}", path.display()))?;
    if let Some(dir) = parsed.media.and_then(|m| m.dir) {
        base.media_dir = dir;
    }
    if let Some(extensions) = parsed.documents.and_then(|d| d.extensions) {
        base.document_extensions = extensions;
    }
    Ok(())
}

fn apply_overrides(cfg: &mut MewConfig, overrides: &ConfigOverrides) {
    if let Some(dir) = overrides
        .media_dir
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        cfg.media_dir = dir.to_string();
    }
    if !overrides.document_extensions.is_empty() {
        cfg.document_extensions = overrides.document_extensions.clone();
    }
}

pub fn load_config(root: &Path, overrides: &ConfigOverrides) -> Result<LoadedConfig> {
    let mut cfg = MewConfig::default();
    let mut source = None;
    if let Some(path) = resolve_config_path(root).filter(|p| p.exists()) {
        merge_file_config(&mut cfg, &path)?;
        source = Some(path);
    }

    cfg.media_dir = env_or_string("MEW_MEDIA_DIR", &cfg.media_dir);
    cfg.document_extensions = env_or_csv("MEW_DOC_EXTENSIONS", &cfg.document_extensions);
    apply_overrides(&mut cfg, overrides);

    cfg.media_dir = cfg.media_dir.trim().to_string();
    cfg.document_extensions = normalize_extensions(&cfg.document_extensions);

    validate(&cfg)?;
    Ok(LoadedConfig {
        config: cfg,
        source,
    })
}

fn unknown_keys<I>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = keys
        .into_iter()
        .filter(|key| key.starts_with("MEW_"))
        .filter(|key| !GENERATED_MEW_ENV_ALLOWLIST.contains(&key.as_str()))
        .collect();
    out.sort();
    out
}

/// `MEW_*` variables set in the environment that nothing in this binary reads.
pub fn unknown_env_keys() -> Vec<String> {
    unknown_keys(env::vars_os().filter_map(|(key, _)| key.into_string().ok()))
}
