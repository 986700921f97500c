use std::path::{Path, PathBuf};

use anyhow::Context;
use deepmerge_codec::Format;
use deepmerge_core::PolicyOverrides;
use serde::Deserialize;
use tracing::debug;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "deepmerge.toml";

/// Settings read from the config file.
///
/// ```toml
/// output_format = "json"
///
/// [policy]
/// union_lists = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Output format when `--output-format` is not given.
    pub output_format: Option<Format>,
    /// Policy overrides applied before `--options` and flags.
    pub policy: PolicyOverrides,
}

impl CliConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load the explicit config file, or the default one if it exists.
    ///
    /// A missing explicit file is an error; a missing default file is not.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.is_file() {
                    return Ok(Self::default());
                }
                path
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config =
            Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }
}
