//! mdpad - A terminal markdown pad.
//!
//! # Usage
//!
//! ```bash
//! mdpad notes.md
//! mdpad --download --download-dir ~/Downloads
//! mdpad --static-commands --save
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mdpad::app::App;
use mdpad::commands::CommandStyle;
use mdpad::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use mdpad::persistence::{Downloads, FilePersistence, PersistenceMode};
use mdpad::settings::SettingsStore;

/// A terminal markdown pad with toolbar commands and live preview
#[derive(Parser, Debug)]
#[command(name = "mdpad", version, about, long_about = None)]
struct Cli {
    /// Markdown file to open (created on first save if missing)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Always save by writing a new file to the download directory
    #[arg(long)]
    download: bool,

    /// Insert fixed placeholder blocks instead of asking through dialogs
    #[arg(long)]
    static_commands: bool,

    /// Directory for download saves
    #[arg(long, value_name = "PATH")]
    download_dir: Option<PathBuf>,

    /// Settings file (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Write logs to this file instead of stderr
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
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .from_env_lossy();

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
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
    tracing::debug!(?effective, "effective flags");

    let mut files = FilePersistence::native();
    if effective.download {
        files = files.with_mode(PersistenceMode::Download);
    }
    if let Some(dir) = &effective.download_dir {
        files = files.with_downloads(Downloads::new(dir));
    }

    let settings = effective
        .settings
        .clone()
        .or_else(SettingsStore::default_path)
        .map_or_else(SettingsStore::in_memory, SettingsStore::load);

    let style = if effective.static_commands {
        CommandStyle::Static
    } else {
        CommandStyle::Dialog
    };

    // Run the application
    let mut app = App::new()
        .with_launch_file(cli.file)
        .with_files(files)
        .with_settings(settings)
        .with_command_style(style);

    app.run().context("Application error")
}
