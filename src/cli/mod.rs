use crate::constants::{APP_DESCRIPTION, DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use crate::errors::AppResult;
use crate::export::{DateRange, ExportFormat, ExportOptions};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// A voice and text journal with tagged timelines and exports
#[derive(Parser, Debug)]
#[command(name = "vocalog", about = APP_DESCRIPTION)]
#[command(author, version, long_about = None)]
pub struct CliArgs {
    /// Log output format
    #[arg(long, global = true, default_value = LOG_FORMAT_TEXT, value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON])]
    pub log_format: String,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a new entry
    New {
        /// Entry text
        content: Option<String>,

        /// Tag for the entry (repeatable)
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,

        /// Attach a voice recording
        #[arg(short = 'a', long)]
        audio: Option<PathBuf>,

        /// Display date or time (YYYY-MM-DD, YYYYMMDD or RFC 3339)
        #[arg(short = 'd', long, value_parser = parse_timestamp)]
        date: Option<DateTime<Utc>>,
    },

    /// Edit an existing entry
    Edit {
        /// Entry id
        id: String,

        /// Replacement text
        #[arg(short = 'c', long)]
        content: Option<String>,

        /// Replacement tags (repeatable)
        #[arg(short = 't', long = "tag", conflicts_with = "clear_tags")]
        tags: Vec<String>,

        /// Remove all tags
        #[arg(long)]
        clear_tags: bool,

        /// Replace the voice recording
        #[arg(short = 'a', long, conflicts_with = "remove_audio")]
        audio: Option<PathBuf>,

        /// Remove the voice recording
        #[arg(long)]
        remove_audio: bool,

        /// New display date or time
        #[arg(short = 'd', long, value_parser = parse_timestamp)]
        date: Option<DateTime<Utc>>,
    },

    /// List entries, newest first
    List {
        /// Show at most this many entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show one entry in full
    Show {
        /// Entry id
        id: String,
    },

    /// Delete one entry
    Delete {
        /// Entry id
        id: String,
    },

    /// Delete every entry
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show journal statistics
    Stats,

    /// Export entries
    Export(ExportArgs),

    /// Decrypt an encrypted export
    Decrypt {
        /// Encrypted export file
        path: PathBuf,

        /// Write the plaintext here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Transcribe an entry's voice recording
    Transcribe {
        /// Entry id
        id: String,
    },

    /// Generate an AI summary for an entry
    Summarize {
        /// Entry id
        id: String,
    },

    /// Compile a digest of the last seven days
    Digest,

    /// Manage settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Store the AI service API key
    SetApiKey {
        /// API key
        key: String,
    },

    /// Remove the stored AI service API key
    ClearApiKey,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output format: json, markdown or text
    #[arg(short = 'f', long, default_value = "json", value_parser = parse_format)]
    pub format: ExportFormat,

    /// Leave tags out of the export
    #[arg(long)]
    pub no_tags: bool,

    /// Include audio recordings (base64 in JSON)
    #[arg(long)]
    pub include_audio: bool,

    /// Export only this entry (repeatable)
    #[arg(long = "id")]
    pub ids: Vec<String>,

    /// First date to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Last date to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,

    /// Encrypt the export with a passphrase
    #[arg(short = 'e', long)]
    pub encrypt: bool,

    /// Output file (defaults to the suggested name in the current directory)
    #[arg(short = 'o', long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print the export instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Print a short preview and exit
    #[arg(long, conflicts_with_all = ["output", "stdout", "encrypt"])]
    pub preview: bool,
}

impl ExportArgs {
    /// Builds export options without a passphrase; the caller supplies one
    /// when `encrypt` is set.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidDate` when `--from` is after `--to`.
    pub fn to_options(&self) -> AppResult<ExportOptions> {
        let date_range = match (self.from, self.to) {
            (None, None) => None,
            (start, end) => Some(DateRange::new(
                start.unwrap_or(NaiveDate::MIN),
                end.unwrap_or(NaiveDate::MAX),
            )?),
        };

        Ok(ExportOptions {
            format: self.format,
            include_tags: !self.no_tags,
            include_audio: self.include_audio,
            entry_ids: if self.ids.is_empty() {
                None
            } else {
                Some(self.ids.clone())
            },
            encrypt: self.encrypt,
            passphrase: None,
            date_range,
        })
    }
}

/// Parses a date in YYYY-MM-DD or YYYYMMDD form.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::from_str(value)
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y%m%d"))
        .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD", value))
}

/// Parses an RFC 3339 timestamp, or a bare date taken as midnight UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    let date = parse_date(value)?;
    date.and_hms_opt(0, 0, 0)
        .map(|midnight| Utc.from_utc_datetime(&midnight))
        .ok_or_else(|| format!("Invalid date '{}'", value))
}

fn parse_format(value: &str) -> Result<ExportFormat, String> {
    value.parse::<ExportFormat>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn export_args(args: &[&str]) -> ExportArgs {
        let mut argv = vec!["vocalog", "export"];
        argv.extend_from_slice(args);
        match CliArgs::parse_from(argv).command {
            Commands::Export(export) => export,
            other => panic!("Expected export command, got {:?}", other),
        }
    }

    #[test]
    fn test_global_defaults() {
        let args = CliArgs::parse_from(["vocalog", "list"]);
        assert_eq!(args.log_format, "text");
        assert_eq!(args.log_level, "info");
        assert!(!args.verbose);
        assert!(matches!(args.command, Commands::List { limit: None }));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from(["vocalog", "stats", "--log-format", "json", "-v"]);
        assert_eq!(args.log_format, "json");
        assert!(args.verbose);
    }

    #[test]
    fn test_invalid_log_format_rejected() {
        assert!(CliArgs::try_parse_from(["vocalog", "--log-format", "xml", "stats"]).is_err());
    }

    #[test]
    fn test_new_with_tags_and_date() {
        let args = CliArgs::parse_from([
            "vocalog", "new", "Walked the dog.", "-t", "life", "--tag", "dog", "-d", "2024-02-03",
        ]);
        match args.command {
            Commands::New {
                content,
                tags,
                audio,
                date,
            } => {
                assert_eq!(content.as_deref(), Some("Walked the dog."));
                assert_eq!(tags, vec!["life", "dog"]);
                assert!(audio.is_none());
                assert_eq!(date, Some(Utc.with_ymd_and_hms(2024, 2, 3, 0, 0, 0).unwrap()));
            }
            other => panic!("Expected new command, got {:?}", other),
        }
    }

    #[test]
    fn test_edit_conflicting_audio_flags() {
        let result = CliArgs::try_parse_from([
            "vocalog", "edit", "abc", "--audio", "a.webm", "--remove-audio",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_subcommands() {
        let args = CliArgs::parse_from(["vocalog", "config", "set-api-key", "sk-test"]);
        assert!(matches!(
            args.command,
            Commands::Config(ConfigCommand::SetApiKey { ref key }) if key == "sk-test"
        ));
        let args = CliArgs::parse_from(["vocalog", "config", "clear-api-key"]);
        assert!(matches!(args.command, Commands::Config(ConfigCommand::ClearApiKey)));
    }

    #[test]
    fn test_export_defaults_to_options() {
        let options = export_args(&[]).to_options().unwrap();
        assert_eq!(options.format, ExportFormat::Json);
        assert!(options.include_tags);
        assert!(!options.include_audio);
        assert!(options.entry_ids.is_none());
        assert!(options.date_range.is_none());
        assert!(!options.encrypt);
    }

    #[test]
    fn test_export_flags_to_options() {
        let options = export_args(&[
            "--format", "md", "--no-tags", "--include-audio", "--id", "a", "--id", "b", "--from",
            "2024-01-01", "--to", "20240131", "--encrypt",
        ])
        .to_options()
        .unwrap();

        assert_eq!(options.format, ExportFormat::Markdown);
        assert!(!options.include_tags);
        assert!(options.include_audio);
        assert_eq!(options.entry_ids, Some(vec!["a".to_string(), "b".to_string()]));
        assert!(options.encrypt);
        let range = options.date_range.unwrap();
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
    }

    #[test]
    fn test_export_open_ended_range() {
        let options = export_args(&["--from", "2024-01-10"]).to_options().unwrap();
        let range = options.date_range.unwrap();
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 1, 9).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2099, 1, 1).unwrap()));
    }

    #[test]
    fn test_export_reversed_range_rejected() {
        let result = export_args(&["--from", "2024-02-01", "--to", "2024-01-01"]).to_options();
        assert!(result.is_err());
    }

    #[test]
    fn test_export_unknown_format_rejected() {
        assert!(CliArgs::try_parse_from(["vocalog", "export", "--format", "pdf"]).is_err());
    }

    #[test]
    fn test_preview_conflicts_with_output() {
        assert!(
            CliArgs::try_parse_from(["vocalog", "export", "--preview", "--stdout"]).is_err()
        );
    }

    #[test]
    fn test_parse_date_formats() {
        let date = parse_date("2023-01-15").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2023, 1, 15));
        assert_eq!(parse_date("20230115").unwrap(), date);
        assert!(parse_date("not-a-date").unwrap_err().contains("Invalid date format"));
    }

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let ts = parse_timestamp("2024-05-06T07:08:09+02:00").unwrap();
        assert_eq!(ts.hour(), 5);
        assert_eq!(ts.day(), 6);
    }

    #[test]
    fn test_include_audio_help_mentions_base64() {
        use clap::CommandFactory;

        let command = CliArgs::command();
        let export = command.find_subcommand("export").unwrap();
        let flag = export
            .get_arguments()
            .find(|arg| arg.get_id() == "include_audio")
            .unwrap();
        let help = flag.get_help().unwrap().to_string();
        assert!(help.contains("Include audio recordings"));
        assert!(help.contains("base64"));
    }
}
