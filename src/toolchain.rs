use std::fmt;
use thiserror::Error;

const TOOLCHAIN_PATTERN: &str = r"^(?P<channel>stable|beta|nightly|\d+\.\d+\.\d+-beta(?:\.\d+)?|\d+\.\d+(?:\.\d+)?)(?:-(?P<date>\d{4}-\d{2}-\d{2}))?(?:-(?P<host>[A-Za-z0-9_]+(?:-[A-Za-z0-9_.]+)*))?$";
const COMPONENT_PATTERN: &str = r"^[a-z][a-z0-9_-]*$";

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("Toolchain name cannot be empty")]
    Empty,
    #[error("Invalid name '{0}'. It looks like a CLI flag.")]
    LooksLikeFlag(String),
    #[error("Invalid character {ch:?} in '{name}'. Only letters, digits, '.', '_' and '-' are allowed")]
    InvalidCharacter { name: String, ch: char },
    #[error("'{0}' is not a rustup toolchain (expected e.g. stable, nightly-2024-05-01, 1.79.0)")]
    UnknownToolchain(String),
    #[error("'{name}' has an invalid version: {source}")]
    InvalidVersion {
        name: String,
        #[source]
        source: semver::Error,
    },
    #[error("'{name}' has an invalid date '{date}': {source}")]
    InvalidDate {
        name: String,
        date: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("'{0}' is not a valid component name")]
    InvalidComponent(String),
    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

/// A rustup toolchain name, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainSpec {
    pub name: String,
    pub channel: String,
    pub date: Option<String>,
    pub host: Option<String>,
}

impl ToolchainSpec {
    /// Parse a toolchain name in any of the forms rustup accepts:
    /// - "stable", "beta", "nightly"
    /// - "nightly-2024-05-01" (dated channel)
    /// - "1.79", "1.79.0" or "1.80.0-beta.1" (version)
    /// - any of the above followed by a full or short host ("-msvc", "-x86_64-pc-windows-gnu")
    pub fn parse(name: &str) -> Result<Self, ToolchainError> {
        let name = name.trim();
        check_shell_safe(name)?;

        let re = regex::Regex::new(TOOLCHAIN_PATTERN)?;
        let caps = re
            .captures(name)
            .ok_or_else(|| ToolchainError::UnknownToolchain(name.to_string()))?;

        let channel = caps["channel"].to_string();
        if channel.starts_with(|c: char| c.is_ascii_digit()) {
            // rustup allows "1.79" as shorthand for the latest 1.79.x
            let full = if channel.split('.').count() == 2 {
                format!("{}.0", channel)
            } else {
                channel.clone()
            };
            semver::Version::parse(&full).map_err(|source| ToolchainError::InvalidVersion {
                name: name.to_string(),
                source,
            })?;
        }

        let date = caps.name("date").map(|m| m.as_str().to_string());
        if let Some(date) = &date {
            chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|source| {
                ToolchainError::InvalidDate {
                    name: name.to_string(),
                    date: date.clone(),
                    source,
                }
            })?;
        }

        Ok(ToolchainSpec {
            name: name.to_string(),
            channel,
            date,
            host: caps.name("host").map(|m| m.as_str().to_string()),
        })
    }

    pub fn is_pinned(&self) -> bool {
        self.date.is_some() || self.channel.starts_with(|c: char| c.is_ascii_digit())
    }
}

impl fmt::Display for ToolchainSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Validate a rustup component name such as `rust-src` or `llvm-tools-preview`.
pub fn validate_component(name: &str) -> Result<String, ToolchainError> {
    let name = name.trim();
    check_shell_safe(name)?;
    let re = regex::Regex::new(COMPONENT_PATTERN)?;
    if !re.is_match(name) {
        return Err(ToolchainError::InvalidComponent(name.to_string()));
    }
    Ok(name.to_string())
}

// Everything that ends up in the script is restricted to this charset,
// so no value can carry quoting or expansion into the shell.
fn check_shell_safe(name: &str) -> Result<(), ToolchainError> {
    if name.is_empty() {
        return Err(ToolchainError::Empty);
    }
    if name.starts_with('-') {
        return Err(ToolchainError::LooksLikeFlag(name.to_string()));
    }
    if let Some(ch) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(ToolchainError::InvalidCharacter {
            name: name.to_string(),
            ch,
        });
    }
    Ok(())
}
