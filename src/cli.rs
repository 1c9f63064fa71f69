use clap::{Args, Parser, Subcommand};

use crate::api::{EntityId, RequestStatus, VALID_REQUEST_STATUSES};

#[derive(Parser)]
#[command(name = "arcaload")]
#[command(about = "Command-line client for the Arcaload game catalog")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Catalog server URL (overrides config and ARCALOAD_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging (ARCALOAD_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog by title
    #[command(visible_alias = "s")]
    Search {
        /// Search text
        text: String,
    },

    /// Add a game to the catalog
    Add {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        genre: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Cover image URL
        #[arg(long, default_value = "")]
        cover: String,

        /// Download link
        #[arg(long, default_value = "")]
        link: String,
    },

    /// Edit a game (not available yet)
    Edit {
        #[arg(value_parser = parse_id)]
        id: EntityId,
    },

    /// Delete a game
    #[command(visible_alias = "rm")]
    Delete {
        #[arg(value_parser = parse_id)]
        id: EntityId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Set the status of a game request
    Status {
        #[arg(value_parser = parse_id)]
        id: EntityId,

        /// pending, added or rejected
        #[arg(value_parser = parse_status)]
        status: RequestStatus,
    },

    /// Ask for a game to be added to the catalog
    Request {
        /// Title of the missing game
        title: String,

        /// Where to send a notification once the game is added
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Print a game's download link
    Download {
        #[arg(value_parser = parse_id)]
        id: EntityId,
    },

    /// Fetch games, requests and stats
    Refresh,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file location
    Path,
}

fn parse_id(s: &str) -> Result<EntityId, String> {
    s.parse()
        .map_err(|_| format!("Invalid id '{s}'. Must be a non-negative integer"))
}

fn parse_status(s: &str) -> Result<RequestStatus, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid status. Must be one of: {}",
            VALID_REQUEST_STATUSES.join(", ")
        )
    })
}
