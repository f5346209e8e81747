use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "diary", version, about = "Drive diary form behaviours from the command line")]
pub struct Cli {
    /// TOML configuration file. `DIARY_*` variables override it,
    /// e.g. `DIARY_PAGE__LOCALE=de-DE`.
    #[arg(long, short, global = true, env = "DIARY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Replay a JSON-lines event script against an in-memory form and
    /// print the resulting state.
    ///
    /// Each line is a UI event such as `{"type": "input", "field":
    /// "success_1", "value": "Shipped it"}`. A `{"type": "settle"}` line
    /// lets pending debounced work fire.
    Replay {
        /// Event script.
        script: PathBuf,

        /// Entry date used for the auto title (default: today).
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Print the auto-generated title for an entry date.
    Title {
        /// ISO date or RFC 3339 timestamp (default: today).
        date: Option<String>,

        /// Locale tag, e.g. `de-DE` (default: the configured locale).
        #[arg(long)]
        locale: Option<String>,
    },

    /// Detect and resolve the effective timezone.
    Timezone {
        /// Manual timezone preference.
        #[arg(long)]
        preference: Option<String>,

        /// Ignore the detected zone.
        #[arg(long)]
        no_auto_detect: bool,

        /// Use this zone instead of the system zone.
        #[arg(long)]
        detected: Option<String>,

        /// Report the effective zone to the configured server.
        #[arg(long)]
        sync: bool,
    },
}
