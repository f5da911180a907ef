//! CrowdWiz CLI: the main entry point.
//!
//! Commands:
//! - `onboard`: Initialize the config directory
//! - `interview`: Run the challenge interview in the terminal
//! - `gateway`: Start the HTTP server and web front-end
//! - `history`: Show persisted interview turns
//! - `status`: Show the effective configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "crowdwiz",
    about = "CrowdWiz — crowdsourcing challenge interview wizard",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Walk through the challenge interview in the terminal
    Interview {
        /// Generate a challenge narrative once every stage is answered
        #[arg(short, long)]
        narrative: bool,
    },

    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show recent interview turns from the conversation log
    History {
        /// Number of turns to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Delete every stored turn instead
        #[arg(long)]
        clear: bool,
    },

    /// Show the effective configuration
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Interview { narrative } => commands::interview::run(narrative).await?,
        Commands::Gateway { port } => commands::gateway::run(port).await?,
        Commands::History { limit, clear } => commands::history::run(limit, clear).await?,
        Commands::Status => commands::status::run().await?,
    }

    Ok(())
}
