use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "rollcall.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(anyhow!("unknown log format '{other}' (expected 'json' or 'pretty')")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RollcallConfig {
    /// Directory result artifacts are written to.
    pub output_dir: PathBuf,
    pub log_format: LogFormat,
    /// File extensions accepted as inputs, compared case-insensitively.
    pub accepted_extensions: Vec<String>,
}

impl Default for RollcallConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("uploads"),
            log_format: LogFormat::Json,
            accepted_extensions: vec!["csv".to_string()],
        }
    }
}

impl RollcallConfig {
    /// Defaults, then the TOML file (explicit path, or `rollcall.toml` when
    /// present), then `ROLLCALL_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|name| env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = lookup("ROLLCALL_OUTPUT_DIR").filter(|value| !value.is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(format) = lookup("ROLLCALL_LOG_FORMAT") {
            self.log_format = format
                .parse()
                .context("ROLLCALL_LOG_FORMAT is not a valid log format")?;
        }
        Ok(())
    }

    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.accepted_extensions
                    .iter()
                    .any(|accepted| accepted.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }
}
