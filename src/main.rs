mod cli;
mod config;
mod emit;
mod package_manager;
mod script;
mod toolchain;
mod types;


use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::{load_settings, resolve_destination};
use emit::emit;
use script::{render, InstallerScript};
use std::io::Write;

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli)?;

    let mut settings = load_settings()?;
    cli.apply_overrides(&mut settings);
    tracing::debug!("Resolved settings: {:?}", settings);

    if cli.stdout {
        let content = render(&settings).context("Could not render installer script")?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    let destination = resolve_destination(&settings);
    let script = InstallerScript::from_settings(&settings, destination)
        .context("Could not render installer script")?;
    let written = emit(&script)
        .with_context(|| format!("Failed to write {}", script.destination_path.display()))?;

    println!("{}", written.display());
    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.quiet {
        "error"
    } else if cli.verbose == 0 {
        "warn"
    } else if cli.verbose == 1 {
        "info"
    } else {
        "debug"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stderr keeps `--stdout` output clean
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}
