use std::path::PathBuf;

use clap::Parser;

use crate::data::ColumnRoles;

/// Environment variable naming the dataset file.
pub const DATA_PATH_ENV: &str = "STREAM_DASH_DATA";
pub const ARTIST_COLUMN_ENV: &str = "STREAM_DASH_ARTIST_COLUMN";
pub const TRACK_COLUMN_ENV: &str = "STREAM_DASH_TRACK_COLUMN";

/// Dataset file used when neither the command line nor the environment names one.
pub const DEFAULT_DATA_PATH: &str = "spotify_data.csv";

/// Command-line arguments. Each one falls back to its environment variable,
/// then to the built-in default.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "stream-dash")]
#[command(about = "Music-streaming data dashboard")]
#[command(version)]
pub struct Cli {
    /// Dataset file (.csv, .tsv, .json, .parquet or .pq)
    #[arg(env = DATA_PATH_ENV, default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Column holding the artist name
    #[arg(long, env = ARTIST_COLUMN_ENV, default_value = "Artist")]
    pub artist_column: String,

    /// Column holding the track title
    #[arg(long, env = TRACK_COLUMN_ENV, default_value = "Track")]
    pub track_column: String,
}

/// Startup settings, resolved once before the dataset is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub roles: ColumnRoles,
}

impl Settings {
    /// Parse the process arguments and environment. Exits on `--help`,
    /// `--version` or a usage error.
    pub fn from_args() -> Self {
        Cli::parse().into()
    }
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        let roles = ColumnRoles {
            artist: cli.artist_column,
            track: cli.track_column,
            ..ColumnRoles::default()
        };
        Settings {
            data_path: cli.data,
            roles,
        }
    }
}
