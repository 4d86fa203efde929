//! Interactive front end for cnote.
//!
//! Without command words the binary starts a REPL over the configured note
//! folder; `cnote <action> <params>` runs a single command and exits.

pub mod command;
pub mod display;
pub mod editor;
pub mod prompt;
pub mod session;
pub mod settings;

// Re-export core library
pub use cnote_core::*;

use anyhow::{Context, Result};
use clap::Parser;
use editor::ExternalEditor;
use session::Session;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cnote", version, about = "Markdown notes with inline tags and timestamps")]
pub struct Cli {
    /// Path to the settings file (JSON).
    #[arg(long, short)]
    pub config: Option<PathBuf>,
    /// Note folder to use instead of the configured one.
    #[arg(long)]
    pub notes: Option<PathBuf>,
    /// Run one command, e.g. `cnote search milk +t home`, then exit.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let settings_path = cli.config.unwrap_or_else(settings::settings_file_path);
    let mut app_settings = settings::load_settings(&settings_path);
    log::debug!("settings loaded from {}", settings_path.display());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    let note_dir = match cli.notes.or_else(|| app_settings.note_dir()) {
        Some(dir) => dir,
        None => {
            let dir = prompt::ask_note_path(&mut input, &mut out)?;
            app_settings.note_path = Some(dir.display().to_string());
            settings::save_settings(&settings_path, &app_settings)?;
            dir
        }
    };

    let collection = NoteCollection::open(&note_dir)
        .with_context(|| format!("Failed to open note folder {}", note_dir.display()))?;
    log::info!("{} notes in {}", collection.len(), note_dir.display());

    let mut session = Session::new(
        collection,
        app_settings,
        settings_path,
        ExternalEditor,
        input,
        out,
    );

    if cli.command.is_empty() {
        session.run_repl(Some("Welcome to cnote! Type help to list the commands."))
    } else {
        session.run_line(&cli.command.join(" "))?;
        Ok(())
    }
}
