//! Discview - A terminal viewer for repository discussions.
//!
//! # Usage
//!
//! ```bash
//! discview discussions.json
//! discview --bind quit=ctrl+q --bind next_section=n discussions.json
//! discview --log-file discview.log discussions.json
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use discview::app::App;
use discview::config::{
    clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags, ConfigFlags,
};
use discview::discussion::load_discussions;
use discview::keymap::KeyMap;

/// A terminal viewer for repository discussions
#[derive(Parser, Debug)]
#[command(name = "discview", version, about, long_about = None)]
struct Cli {
    /// JSON file holding an array of discussions
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Rebind a key, e.g. `quit=ctrl+q` (repeatable)
    #[arg(long, value_name = "ACTION=KEY")]
    bind: Vec<String>,

    /// Write debug logs to a file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("discview=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        // The terminal belongs to the UI, so stay quiet unless something is wrong.
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;
    for token in &effective.ignored {
        tracing::warn!(token = %token, "ignoring unknown config flag");
    }
    tracing::debug!(
        ?effective,
        cli_binds = cli.bind.len(),
        cli_log_file = ?cli.log_file,
        "effective flags"
    );

    let mut keymap = KeyMap::default();
    keymap
        .apply_overrides(&effective.binds)
        .context("Invalid key binding")?;

    let items = load_discussions(&cli.file)?;
    tracing::info!(count = items.len(), file = %cli.file.display(), "loaded discussions");

    App::new(items)
        .with_keymap(keymap)
        .run()
        .context("Application error")
}
