use crate::pattern::{DEFAULT_FILENAME_PATTERN, DEFAULT_FOLDER_PATTERN};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted naming-pattern settings. The engine itself never reads these;
/// a caller loads them and passes plain strings into `OrganizeConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub filename_pattern: String,
    pub folder_pattern: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            filename_pattern: DEFAULT_FILENAME_PATTERN.to_string(),
            folder_pattern: DEFAULT_FOLDER_PATTERN.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("com", "titanexperts", "photo-organizer")
        .context("could not determine the OS config directory")?;
    let config_dir = proj.config_dir().to_path_buf();
    Ok(AppPaths {
        config_path: config_dir.join("config.toml"),
        config_dir,
    })
}

pub fn load_config() -> Result<AppConfig> {
    let paths = app_paths()?;
    if !paths.config_path.exists() {
        return Ok(AppConfig::default());
    }

    let raw = fs::read_to_string(&paths.config_path)
        .with_context(|| format!("could not read config file: {}", paths.config_path.display()))?;

    let config = toml::from_str::<AppConfig>(&raw).context("could not parse config file")?;
    Ok(config)
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    let paths = app_paths()?;
    fs::create_dir_all(&paths.config_dir).with_context(|| {
        format!(
            "could not create config directory: {}",
            paths.config_dir.display()
        )
    })?;
    let body = toml::to_string_pretty(config).context("could not serialize config")?;
    fs::write(&paths.config_path, body)
        .with_context(|| format!("could not write config file: {}", paths.config_path.display()))?;
    Ok(())
}
