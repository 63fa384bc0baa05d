use crate::script::DEFAULT_MODE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// rustup installer profile passed as `--profile` to sh.rustup.rs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Minimal,
    Default,
    Complete,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Minimal => "minimal",
            Profile::Default => "default",
            Profile::Complete => "complete",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimal" => Ok(Profile::Minimal),
            "default" => Ok(Profile::Default),
            "complete" => Ok(Profile::Complete),
            other => Err(format!(
                "Unknown profile '{}'. Valid profiles: minimal, default, complete",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScriptSettings {
    #[serde(default = "default_toolchain")]
    pub toolchain: String,
    #[serde(default = "default_components")]
    pub components: Vec<String>,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default = "default_mode")]
    pub mode: String,
}

fn default_toolchain() -> String {
    "stable".to_string()
}
fn default_components() -> Vec<String> {
    vec!["rustfmt".to_string(), "clippy".to_string()]
}
fn default_mode() -> String {
    format!("{:o}", DEFAULT_MODE)
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            toolchain: default_toolchain(),
            components: default_components(),
            profile: Profile::default(),
            destination: None,
            mode: default_mode(),
        }
    }
}
