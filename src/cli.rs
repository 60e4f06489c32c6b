use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "textless")]
#[command(author, version, about = "TMDb image provider with an optional textless-poster filter")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the image provider HTTP server
    Start {
        /// Host to bind to (overrides `server.host`)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides `server.port`)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Fetch remote images for one item and print them
    Images {
        /// Item type (movie, trailer or series)
        #[arg(required = true)]
        item_type: String,

        /// TMDb id of the item
        #[arg(long)]
        tmdb_id: Option<String>,

        /// IMDb id, used to look up movies without a TMDb id
        #[arg(long)]
        imdb_id: Option<String>,

        /// Preferred metadata language
        #[arg(short, long)]
        language: Option<String>,

        /// Only list images of this type (primary, backdrop, logo, thumb)
        #[arg(long)]
        image_type: Option<String>,

        /// Override the configured textless-exclusion flag
        #[arg(long)]
        exclude_textless: Option<bool>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,

    /// Generate a random API key for programmatic access
    GenerateApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_leaves_bind_address_to_config() {
        let cli = Cli::try_parse_from(["textless", "start"]).unwrap();
        assert!(matches!(cli.command, Commands::Start { host: None, port: None }));

        let cli = Cli::try_parse_from(["textless", "start", "--port", "9100"]).unwrap();
        assert!(matches!(cli.command, Commands::Start { host: None, port: Some(9100) }));
    }
}
