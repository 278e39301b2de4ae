use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::api::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
use crate::config::DEFAULT_DATE_FORMAT;
use crate::names::NameTableVersion;
use crate::writer::{CsvMode, SinkTarget, DEFAULT_TABLE};

#[derive(Parser, Debug)]
#[command(name = "wb-stats")]
#[command(version, about = "Poll War Brokers player statistics into CSV or SQLite rows")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enumerate squads, fetch every known player and append one row each
    Sync {
        #[command(flatten)]
        api: ApiArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Custom data directory (UID cache, default CSV)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Full-screen progress view
        #[arg(long)]
        tui: bool,
    },

    /// Refresh the UID cache from the live squad list and print it
    Roster {
        #[command(flatten)]
        api: ApiArgs,

        /// Custom data directory (UID cache, default CSV)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Print a short report for one player
    Player {
        /// Player UID
        uid: String,

        #[command(flatten)]
        api: ApiArgs,
    },

    /// Normalize saved player records without touching the network
    Normalize {
        /// JSON file holding a player record or an array of records
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the default column list for a name table version
    Headers {
        /// Name table version (v1, v2, v3)
        #[arg(short, long, default_value_t = NameTableVersion::default())]
        names: NameTableVersion,

        /// JSON object of code-to-name overrides
        #[arg(long)]
        names_file: Option<PathBuf>,
    },

    /// Show every stored row of one player from a CSV sink
    History {
        /// Player UID
        uid: String,

        /// CSV file written by `sync` (defaults to the data directory)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Custom data directory (UID cache, default CSV)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Also write the full rows as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Report first pull, last pull and number of pulls in a CSV sink
    Summary {
        /// CSV file written by `sync`
        csv: PathBuf,

        /// Format of the Date column
        #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
        date_format: String,

        /// Also write the summary as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// Base URL of the stats API
    #[arg(long, env = "WB_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Request timeout in seconds
    #[arg(long, env = "WB_API_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// CSV file to write (defaults to the data directory)
    #[arg(long, conflicts_with = "sqlite")]
    pub csv: Option<PathBuf>,

    /// SQLite database to write instead of CSV
    #[arg(long)]
    pub sqlite: Option<PathBuf>,

    /// Table name in the SQLite database
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,

    /// CSV write mode (append, snapshot)
    #[arg(short, long, default_value = "append", conflicts_with = "sqlite")]
    pub mode: CsvMode,

    /// Format of the Date column
    #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
    pub date_format: String,

    /// Name table version (v1, v2, v3)
    #[arg(short, long, default_value_t = NameTableVersion::default())]
    pub names: NameTableVersion,

    /// JSON object of code-to-name overrides
    #[arg(long)]
    pub names_file: Option<PathBuf>,
}

impl OutputArgs {
    /// Resolve the sink, falling back to `default_csv` when neither output was given
    pub fn sink_target(&self, default_csv: impl FnOnce() -> PathBuf) -> SinkTarget {
        match &self.sqlite {
            Some(path) => SinkTarget::Sqlite {
                path: path.clone(),
                table: self.table.clone(),
            },
            None => SinkTarget::Csv {
                path: self.csv.clone().unwrap_or_else(default_csv),
                mode: self.mode,
            },
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_defaults() {
        let cli = Cli::try_parse_from(["wb-stats", "sync"]).unwrap();
        let Commands::Sync { output, tui, .. } = cli.command else {
            panic!("expected sync");
        };
        assert!(!tui);
        assert_eq!(output.names, NameTableVersion::V3);
        assert_eq!(output.mode, CsvMode::Append);
        assert_eq!(
            output.sink_target(|| PathBuf::from("default.csv")),
            SinkTarget::Csv {
                path: PathBuf::from("default.csv"),
                mode: CsvMode::Append
            }
        );
    }

    #[test]
    fn test_sqlite_output() {
        let cli = Cli::try_parse_from([
            "wb-stats", "normalize", "saved.json", "--sqlite", "stats.db", "--table", "players",
        ])
        .unwrap();
        let Commands::Normalize { output, .. } = cli.command else {
            panic!("expected normalize");
        };
        assert_eq!(
            output.sink_target(|| PathBuf::from("unused.csv")),
            SinkTarget::Sqlite {
                path: PathBuf::from("stats.db"),
                table: "players".into()
            }
        );
    }

    #[test]
    fn test_csv_and_sqlite_conflict() {
        let parsed = Cli::try_parse_from([
            "wb-stats", "normalize", "saved.json", "--csv", "a.csv", "--sqlite", "b.db",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_csv_mode_rejected_with_sqlite() {
        let parsed = Cli::try_parse_from([
            "wb-stats", "normalize", "saved.json", "--sqlite", "b.db", "--mode", "snapshot",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_history_args() {
        let cli = Cli::try_parse_from(["wb-stats", "history", "5d2ead3c", "--csv", "stats.csv"]).unwrap();
        let Commands::History { uid, csv, .. } = cli.command else {
            panic!("expected history");
        };
        assert_eq!(uid, "5d2ead3c");
        assert_eq!(csv, Some(PathBuf::from("stats.csv")));
    }

    #[test]
    fn test_names_version_parses() {
        let cli = Cli::try_parse_from(["wb-stats", "headers", "--names", "v1"]).unwrap();
        assert!(matches!(cli.command, Commands::Headers { names: NameTableVersion::V1, .. }));
    }
}
