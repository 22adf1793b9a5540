//! Configuration discovery for the CLI.

use anyhow::{Context, Result};
use curate_core::CurateConfig;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when `--config` is absent.
const LOCAL_CONFIG: &str = "curate.toml";

/// Candidate config locations, most specific first.
fn candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("curate").join("config.toml"));
    }
    paths
}

/// Load, apply `CURATE_*` overrides and validate.
///
/// An explicit path must exist. Otherwise the first candidate found is used,
/// falling back to defaults.
pub fn load(explicit: Option<&Path>) -> Result<CurateConfig> {
    let mut config = match explicit {
        Some(path) => CurateConfig::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => match candidates(None).into_iter().find(|p| p.exists()) {
            Some(path) => CurateConfig::load_from_file(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => CurateConfig::default(),
        },
    };
    config
        .merge_with_env()
        .context("invalid CURATE_* environment override")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}
