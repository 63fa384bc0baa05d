use crate::types::{Profile, ScriptSettings};
use clap::Parser;

fn get_version() -> &'static str {
    const BASE_VERSION: &str = env!("CARGO_PKG_VERSION");

    // Tagged HEAD: release build, report the tag alone
    if let Some(tag) = option_env!("SETUP_RUST_GIT_TAG") {
        return tag;
    }

    let commit = option_env!("SETUP_RUST_GIT_COMMIT").unwrap_or("unknown");
    let branch = option_env!("SETUP_RUST_GIT_BRANCH").unwrap_or("unknown");

    // Leaked once at startup for clap's &'static str
    let version = format!("v{}-{} ({})", BASE_VERSION, commit, branch);
    Box::leak(version.into_boxed_str())
}

#[derive(Parser)]
#[command(name = "setup-rust")]
#[command(about = "Write a portable shell installer for rustup and a pinned Rust toolchain")]
#[command(
    version = get_version(),
    after_help = "Examples:\n  setup-rust\n  setup-rust /tmp/out/setup.sh\n  setup-rust -t nightly-2024-05-01 -c rust-src -c miri\n  setup-rust --no-components --profile default --stdout"
)]
pub struct Cli {
    /// Where to write the script (default: ./setup_rust.sh)
    pub destination: Option<String>,

    /// Toolchain to install and set as default (e.g. 'stable', '1.79.0')
    #[arg(short, long)]
    pub toolchain: Option<String>,

    /// Component to add to the toolchain (repeatable)
    #[arg(short, long = "component", value_name = "NAME")]
    pub components: Vec<String>,

    /// Install the toolchain without extra components
    #[arg(long, conflicts_with = "components")]
    pub no_components: bool,

    /// rustup installer profile
    #[arg(short, long, value_enum)]
    pub profile: Option<Profile>,

    /// Octal permission mode for the written file (must include owner execute)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Print the script to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Increase verbosity (use multiple times for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Reduce output to errors only
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Command-line values take precedence over the config file and environment.
    pub fn apply_overrides(&self, settings: &mut ScriptSettings) {
        if let Some(destination) = &self.destination {
            settings.destination = Some(destination.clone());
        }
        if let Some(toolchain) = &self.toolchain {
            settings.toolchain = toolchain.clone();
        }
        if self.no_components {
            settings.components.clear();
        } else if !self.components.is_empty() {
            settings.components = self.components.clone();
        }
        if let Some(profile) = self.profile {
            settings.profile = profile;
        }
        if let Some(mode) = &self.mode {
            settings.mode = mode.clone();
        }
    }
}
