/*!
# vocalog

Command-line front end for the vocalog journal. Entries are stored in a local
SQLite database; AI summaries, transcription and digests use an
OpenAI-compatible service when an API key is configured.

## Usage

```
vocalog [--log-format text|json] [--log-level LEVEL] [-v] <COMMAND>

Commands:
  new         Write a new entry
  edit        Edit an existing entry
  list        List entries, newest first
  show        Show one entry in full
  delete      Delete one entry
  clear       Delete every entry
  stats       Show journal statistics
  export      Export entries
  decrypt     Decrypt an encrypted export
  transcribe  Transcribe an entry's voice recording
  summarize   Generate an AI summary for an entry
  digest      Compile a digest of the last seven days
  config      Manage settings
```

## Configuration

- `VOCALOG_DIR`: data directory (defaults to `~/.vocalog`)
- `VOCALOG_API_KEY`: AI service key (overrides `vocalog config set-api-key`)
- `VOCALOG_API_BASE`, `VOCALOG_CHAT_MODEL`, `VOCALOG_TRANSCRIPTION_MODEL`
- `VOCALOG_EXPORT_PASSPHRASE`: export passphrase for non-interactive use
*/

use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use vocalog::cli::{CliArgs, Commands, ConfigCommand, ExportArgs};
use vocalog::config::{Config, Settings};
use vocalog::constants::{
    APP_NAME, DATE_FORMAT_ISO, ENV_VAR_EXPORT_PASSPHRASE, LOG_FORMAT_JSON, REDACTED_PLACEHOLDER,
};
use vocalog::crypto::check_passphrase_confirmation;
use vocalog::db::Database;
use vocalog::errors::{AppError, AppResult, ValidationError};
use vocalog::journal::{AudioClip, EntryDraft, EntryEdit, JournalEntry};
use vocalog::ops;
use zeroize::Zeroizing;

fn main() {
    let args = CliArgs::parse();
    init_logging(&args);

    if let Err(e) = run(args, Utc::now()) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Installs the tracing subscriber on stderr.
///
/// `RUST_LOG` wins over `--log-level`; `-v` forces debug output.
fn init_logging(args: &CliArgs) {
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level))
    };

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);
    if args.log_format == LOG_FORMAT_JSON {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}

/// Runs one command.
///
/// The current time is captured once by the caller and passed through.
fn run(args: CliArgs, now: DateTime<Utc>) -> AppResult<()> {
    info!("Starting {}", APP_NAME);

    let config = Config::load()?;
    config.validate()?;
    config.ensure_data_dir()?;

    let db = Database::open(&config.db_path())?;
    db.initialize_schema()?;

    match args.command {
        Commands::New {
            content,
            tags,
            audio,
            date,
        } => {
            let audio = audio.as_deref().map(AudioClip::from_file).transpose()?;
            let entry = ops::create_entry(
                &db,
                EntryDraft {
                    content: content.unwrap_or_default(),
                    tags,
                    audio,
                    transcript: None,
                    timestamp: date,
                },
                now,
            )?;
            println!("{}", entry.id);
        }
        Commands::Edit {
            id,
            content,
            tags,
            clear_tags,
            audio,
            remove_audio,
            date,
        } => {
            let audio = if remove_audio {
                Some(None)
            } else {
                audio
                    .as_deref()
                    .map(AudioClip::from_file)
                    .transpose()?
                    .map(Some)
            };
            let tags = if clear_tags {
                Some(Vec::new())
            } else if tags.is_empty() {
                None
            } else {
                Some(tags)
            };
            let entry = ops::edit_entry(
                &db,
                &id,
                EntryEdit {
                    content,
                    tags,
                    audio,
                    timestamp: date,
                },
                now,
            )?;
            println!("Updated {}", entry.id);
        }
        Commands::List { limit } => {
            let entries = ops::timeline(&db)?;
            if entries.is_empty() {
                println!("No entries yet.");
            }
            for entry in entries.iter().take(limit.unwrap_or(usize::MAX)) {
                println!("{}", list_line(entry));
            }
        }
        Commands::Show { id } => {
            let entry = ops::show_entry(&db, &id)?;
            print!("{}", describe_entry(&entry));
        }
        Commands::Delete { id } => {
            if ops::delete_entry(&db, &id)? {
                println!("Deleted {}", id);
            } else {
                println!("No entry {}", id);
            }
        }
        Commands::Clear { yes } => {
            if !yes {
                return Err(AppError::Journal(
                    "Refusing to delete every entry without --yes".to_string(),
                ));
            }
            let removed = ops::clear_journal(&db)?;
            println!("Removed {} entries", removed);
        }
        Commands::Stats => {
            let stats = ops::journal_stats(&db)?;
            println!("Entries: {}", stats.total_entries);
            println!("Size: {} bytes", stats.total_size);
            if let (Some(oldest), Some(newest)) = (stats.oldest_entry, stats.newest_entry) {
                println!("Oldest: {}", oldest.format(DATE_FORMAT_ISO));
                println!("Newest: {}", newest.format(DATE_FORMAT_ISO));
            }
        }
        Commands::Export(export) => run_export(&db, &export, now)?,
        Commands::Decrypt { path, output } => {
            let passphrase = read_passphrase(false)?;
            let decrypted = ops::decrypt_export_file(&path, &passphrase)?;
            match output {
                Some(output) => {
                    ops::write_decrypted(&decrypted, &output)?;
                    println!("Wrote {} export to {}", decrypted.format, output.display());
                }
                None => print!("{}", decrypted.content),
            }
        }
        Commands::Transcribe { id } => {
            let client = config.ai_client()?;
            let entry = ops::transcribe_entry(&db, &client, &id)?;
            println!("{}", entry.transcript.unwrap_or_default());
        }
        Commands::Summarize { id } => {
            let client = config.ai_client()?;
            let entry = ops::summarize_entry(&db, &client, &id)?;
            print!("{}", describe_entry(&entry));
        }
        Commands::Digest => {
            let client = config.ai_client()?;
            println!("{}", ops::weekly_digest(&db, &client, now)?);
        }
        Commands::Config(command) => run_config(&config, &command)?,
    }

    Ok(())
}

fn run_export(db: &Database, export: &ExportArgs, now: DateTime<Utc>) -> AppResult<()> {
    let mut options = export.to_options()?;

    if export.preview {
        println!("{}", ops::preview_journal(db, &options)?);
        return Ok(());
    }
    if options.encrypt {
        ops::count_selected(db, &options)?;
        options.passphrase = Some(read_passphrase(true)?);
    }

    let output = ops::export_journal(db, &options, now.date_naive())?;
    if export.stdout {
        print!("{}", output.content);
        return Ok(());
    }

    let path = export
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&output.filename));
    ops::write_export(&output, &path)?;
    println!("Exported to {}", path.display());
    Ok(())
}

fn run_config(config: &Config, command: &ConfigCommand) -> AppResult<()> {
    let settings_path = config.settings_path();
    match command {
        ConfigCommand::Show => {
            println!("Data directory: {}", config.data_dir.display());
            println!("API base: {}", config.api_base);
            println!("Chat model: {}", config.chat_model);
            println!("Transcription model: {}", config.transcription_model);
            println!(
                "API key: {}",
                if config.ai_enabled() {
                    REDACTED_PLACEHOLDER
                } else {
                    "not set (AI features disabled)"
                }
            );
        }
        ConfigCommand::SetApiKey { key } => {
            let mut settings = Settings::load(&settings_path)?;
            settings.set_api_key(key);
            if settings.api_key.is_none() {
                return Err(AppError::Config("API key is empty".to_string()));
            }
            settings.save(&settings_path)?;
            println!("API key saved");
        }
        ConfigCommand::ClearApiKey => {
            let mut settings = Settings::load(&settings_path)?;
            settings.api_key = None;
            settings.save(&settings_path)?;
            println!("API key removed");
        }
    }
    Ok(())
}

/// Reads an export passphrase from the environment or the terminal.
///
/// When `confirm` is set an interactive passphrase must be typed twice.
fn read_passphrase(confirm: bool) -> AppResult<Zeroizing<String>> {
    if let Ok(passphrase) = std::env::var(ENV_VAR_EXPORT_PASSPHRASE) {
        debug!("Using export passphrase from {}", ENV_VAR_EXPORT_PASSPHRASE);
        return non_empty(Zeroizing::new(passphrase));
    }

    let passphrase = Zeroizing::new(rpassword::prompt_password("Export passphrase: ")?);
    if !confirm {
        return non_empty(passphrase);
    }
    let confirmation = Zeroizing::new(rpassword::prompt_password("Confirm passphrase: ")?);
    check_passphrase_confirmation(passphrase, &confirmation).map_err(|e| {
        warn!("Passphrase confirmation failed");
        e
    })
}

fn non_empty(passphrase: Zeroizing<String>) -> AppResult<Zeroizing<String>> {
    if passphrase.is_empty() {
        return Err(ValidationError::MissingPassphrase.into());
    }
    Ok(passphrase)
}

fn list_line(entry: &JournalEntry) -> String {
    let preview: String = entry
        .content
        .lines()
        .next()
        .unwrap_or("")
        .chars()
        .take(60)
        .collect();
    let mut line = format!(
        "{}  {}  {}",
        entry.id,
        entry.display_date().format(DATE_FORMAT_ISO),
        if preview.is_empty() && entry.has_audio() {
            "(voice note)"
        } else {
            preview.as_str()
        }
    );
    if !entry.tags.is_empty() {
        line.push_str(&format!("  [{}]", entry.tags.join(", ")));
    }
    line
}

fn describe_entry(entry: &JournalEntry) -> String {
    let mut out = format!(
        "Id: {}\nDate: {}\n",
        entry.id,
        entry.timestamp.to_rfc3339()
    );
    if !entry.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n", entry.tags.join(", ")));
    }
    if let Some(audio) = &entry.audio {
        out.push_str(&format!("Audio: {} ({} bytes)\n", audio.mime_type, audio.data.len()));
    }
    out.push_str(&format!("\n{}\n", entry.content));
    if let Some(transcript) = &entry.transcript {
        out.push_str(&format!("\nTranscript:\n{}\n", transcript));
    }
    if let Some(summary) = &entry.summary {
        out.push_str(&format!("\nMood: {}\n", summary.mood));
        for (label, items) in [
            ("Highlights", &summary.highlights),
            ("Decisions", &summary.decisions),
            ("Actions", &summary.actions),
            ("Risks", &summary.risks),
        ] {
            if !items.is_empty() {
                out.push_str(&format!("{}:\n", label));
                for item in items {
                    out.push_str(&format!("- {}\n", item));
                }
            }
        }
    }
    out
}
