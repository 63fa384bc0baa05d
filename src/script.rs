use crate::package_manager::{render_detection, render_install_arms};
use crate::toolchain::{validate_component, ToolchainError, ToolchainSpec};
use crate::types::ScriptSettings;
use std::path::PathBuf;
use thiserror::Error;

pub const TEMPLATE: &str = include_str!("templates/setup_rust.sh.tmpl");
pub const DEFAULT_SCRIPT_NAME: &str = "setup_rust.sh";
pub const DEFAULT_MODE: u32 = 0o755;

const OWNER_EXECUTE: u32 = 0o100;
const MAX_MODE: u32 = 0o7777;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),
    #[error("Invalid permission mode '{0}': expected an octal value such as 755")]
    InvalidMode(String),
    #[error("Permission mode {0:o} does not let the owner execute the script")]
    NotExecutable(u32),
    #[error("Template placeholder '{{{{{0}}}}}' was not resolved")]
    UnresolvedPlaceholder(String),
}

/// The rendered installer and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerScript {
    pub content: String,
    pub destination_path: PathBuf,
    pub permission_mode: u32,
}

impl InstallerScript {
    pub fn from_settings(
        settings: &ScriptSettings,
        destination_path: PathBuf,
    ) -> Result<Self, ScriptError> {
        Ok(Self {
            content: render(settings)?,
            destination_path,
            permission_mode: parse_mode(&settings.mode)?,
        })
    }
}

/// Fill the embedded template from `settings`.
pub fn render(settings: &ScriptSettings) -> Result<String, ScriptError> {
    let toolchain = ToolchainSpec::parse(&settings.toolchain)?;
    tracing::debug!(
        "Rendering for toolchain {} ({}, target: {})",
        toolchain,
        if toolchain.is_pinned() { "pinned" } else { "floating" },
        toolchain.host.as_deref().unwrap_or("host default")
    );

    let mut components: Vec<String> = Vec::new();
    for component in &settings.components {
        let component = validate_component(component)?;
        if !components.contains(&component) {
            components.push(component);
        }
    }

    let (component_list, component_args) = if components.is_empty() {
        ("none".to_string(), String::new())
    } else {
        (
            components.join(", "),
            format!(" --component {}", components.join(" ")),
        )
    };

    let substitutions = [
        ("package_manager_detection", render_detection()),
        ("package_install_commands", render_install_arms()),
        ("profile", settings.profile.to_string()),
        ("toolchain", toolchain.name.clone()),
        ("component_list", component_list),
        ("component_args", component_args),
    ];

    let mut content = TEMPLATE.to_string();
    for (key, value) in &substitutions {
        content = content.replace(&format!("{{{{{}}}}}", key), value);
    }

    if let Some(start) = content.find("{{") {
        let rest = &content[start + 2..];
        let name = rest.split("}}").next().unwrap_or(rest);
        return Err(ScriptError::UnresolvedPlaceholder(name.to_string()));
    }

    Ok(content)
}

/// Parse an octal mode such as `755`, `0755` or `0o755`.
pub fn parse_mode(mode: &str) -> Result<u32, ScriptError> {
    let trimmed = mode.trim();
    let digits = trimmed.strip_prefix("0o").unwrap_or(trimmed);
    let value = u32::from_str_radix(digits, 8)
        .map_err(|_| ScriptError::InvalidMode(mode.to_string()))?;

    if value > MAX_MODE {
        return Err(ScriptError::InvalidMode(mode.to_string()));
    }
    if value & OWNER_EXECUTE == 0 {
        return Err(ScriptError::NotExecutable(value));
    }
    Ok(value)
}
