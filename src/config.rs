use crate::script::DEFAULT_SCRIPT_NAME;
use crate::types::*;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::PathBuf;

pub const APP_NAME: &str = "setup-rust";
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const ENV_CONFIG: &str = "SETUP_RUST_CONFIG";
pub const ENV_TOOLCHAIN: &str = "SETUP_RUST_TOOLCHAIN";
pub const ENV_COMPONENTS: &str = "SETUP_RUST_COMPONENTS";
pub const ENV_PROFILE: &str = "SETUP_RUST_PROFILE";
pub const ENV_DEST: &str = "SETUP_RUST_DEST";
pub const ENV_MODE: &str = "SETUP_RUST_MODE";

pub fn get_config_file_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(ENV_CONFIG) {
        return Ok(PathBuf::from(path));
    }
    let path = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?
        .join(APP_NAME)
        .join(CONFIG_FILE_NAME);
    tracing::debug!("Config file path: {}", path.display());
    Ok(path)
}

/// Settings from the config file (if any) with environment overrides applied.
pub fn load_settings() -> Result<ScriptSettings> {
    let config_path = get_config_file_path()?;

    let mut settings = if config_path.exists() {
        let content = fs::read_to_string(&config_path).with_context(|| {
            format!("Could not read config file at {}", config_path.display())
        })?;
        serde_json::from_str(&content).with_context(|| {
            format!(
                "Could not parse config file {} as JSON",
                config_path.display()
            )
        })?
    } else {
        tracing::debug!("No config file at {}, using defaults", config_path.display());
        ScriptSettings::default()
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

pub fn apply_env_overrides<F>(settings: &mut ScriptSettings, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(toolchain) = lookup(ENV_TOOLCHAIN) {
        settings.toolchain = toolchain;
    }

    if let Some(components) = lookup(ENV_COMPONENTS) {
        settings.components = split_list(&components);
    }

    if let Some(profile) = lookup(ENV_PROFILE) {
        settings.profile = profile
            .parse::<Profile>()
            .map_err(|e| anyhow!("{}: {}", ENV_PROFILE, e))?;
    }

    if let Some(dest) = lookup(ENV_DEST) {
        settings.destination = Some(dest);
    }

    if let Some(mode) = lookup(ENV_MODE) {
        settings.mode = mode;
    }

    Ok(())
}

/// Split a comma separated list, dropping blanks. An empty string yields no items.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Final output path: the configured destination, or the default script name
/// in the working directory. An existing directory gets the default name appended.
pub fn resolve_destination(settings: &ScriptSettings) -> PathBuf {
    let path = settings
        .destination
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT_NAME));

    if path.is_dir() {
        path.join(DEFAULT_SCRIPT_NAME)
    } else {
        path
    }
}
