//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the state file location.
pub const STATE_ENV_VAR: &str = "GRADEGOAL_STATE";

/// Top-level gradegoal configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradegoalConfig {
    /// JSON file holding every course and the current selection.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    /// Directory that exports are written to.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

fn default_state_file() -> PathBuf {
    match home_dir() {
        Some(home) => home
            .join(".local")
            .join("share")
            .join("gradegoal")
            .join("state.json"),
        None => PathBuf::from("./gradegoal-state.json"),
    }
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for GradegoalConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            export_dir: default_export_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `gradegoal.toml` in the current directory
/// 2. `~/.config/gradegoal/config.toml`
///
/// `GRADEGOAL_STATE` overrides the state file location.
pub fn load_config() -> Result<GradegoalConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GradegoalConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("gradegoal.toml");
            if local.exists() {
                Some(local)
            } else {
                config_dir()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            parse_config(&path)?
        }
        None => GradegoalConfig::default(),
    };

    if let Ok(state) = std::env::var(STATE_ENV_VAR) {
        if !state.is_empty() {
            config.state_file = PathBuf::from(state);
        }
    }

    config.state_file = resolve_path(&config.state_file);
    config.export_dir = resolve_path(&config.export_dir);

    Ok(config)
}

fn parse_config(path: &Path) -> Result<GradegoalConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<GradegoalConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

fn config_dir() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".config").join("gradegoal"))
}
