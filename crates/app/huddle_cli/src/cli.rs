use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use huddle_api_client::config::DEFAULT_BASE_URL;
use huddle_core::models::ParticipantDecision;

/// Browse and join nearby Huddle events from the terminal.
#[derive(Parser, Debug)]
#[command(name = "huddle", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// API root including the version prefix.
    #[arg(long, global = true, env = "HUDDLE_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Where the session is persisted (defaults to the user config dir).
    #[arg(long, global = true, env = "HUDDLE_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, env = "HUDDLE_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the CLI version.
    Version,

    /// Show whether a session is stored and when its access token expires.
    Status,

    /// Log in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "HUDDLE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "HUDDLE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        phone: Option<String>,
    },

    /// Revoke and clear the stored session.
    Logout,

    /// Rotate the stored tokens now.
    Refresh,

    /// List event categories.
    Categories,

    /// Events created or joined by the current user.
    MyEvents,

    /// Event operations.
    #[command(subcommand)]
    Events(EventCommands),
}

#[derive(Subcommand, Debug)]
pub enum EventCommands {
    /// Search events around a point.
    List {
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
        /// Radius in meters.
        #[arg(long)]
        radius: Option<f64>,
        /// Category slug.
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one event.
    Show { id: String },

    /// List participants of an event.
    Participants { id: String },

    /// Create an event.
    Create(CreateEventArgs),

    /// Join an event.
    Join { id: String },

    /// Leave an event.
    Leave { id: String },

    /// Accept or reject a participant.
    Decide {
        id: String,
        user_id: String,
        #[arg(long, value_enum)]
        status: DecisionArg,
    },

    /// Delete an event you created.
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct CreateEventArgs {
    #[arg(long)]
    pub category_id: i64,
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
    /// RFC 3339 start time, e.g. 2026-05-01T18:00:00Z.
    #[arg(long)]
    pub start_time: DateTime<Utc>,
    #[arg(long)]
    pub max_participants: i32,
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub requires_approval: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DecisionArg {
    Accepted,
    Rejected,
}

impl From<DecisionArg> for ParticipantDecision {
    fn from(d: DecisionArg) -> Self {
        match d {
            DecisionArg::Accepted => ParticipantDecision::Accepted,
            DecisionArg::Rejected => ParticipantDecision::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "huddle", "events", "list", "--lat", "-33.86", "--lon", "151.2",
        ])
        .expect("parse");
        match cli.command {
            Commands::Events(EventCommands::List { lat, lon, .. }) => {
                assert_eq!(lat, Some(-33.86));
                assert_eq!(lon, Some(151.2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_decision() {
        let cli = Cli::try_parse_from([
            "huddle", "events", "decide", "e1", "u2", "--status", "rejected",
        ])
        .expect("parse");
        match cli.command {
            Commands::Events(EventCommands::Decide { status, .. }) => {
                assert_eq!(ParticipantDecision::from(status), ParticipantDecision::Rejected);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_start_time() {
        let cli = Cli::try_parse_from([
            "huddle",
            "events",
            "create",
            "--category-id",
            "1",
            "--title",
            "Run club",
            "--lat",
            "1",
            "--lon",
            "2",
            "--start-time",
            "2026-05-01T18:00:00Z",
            "--max-participants",
            "10",
        ])
        .expect("parse");
        match cli.command {
            Commands::Events(EventCommands::Create(args)) => {
                assert_eq!(args.start_time.to_rfc3339(), "2026-05-01T18:00:00+00:00");
                assert!(!args.requires_approval);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
