use clap::Parser;

mod bot;
mod config;
mod core;
mod error;
mod utils;

use config::Config;
use error::Result;

#[derive(Parser)]
#[command(name = "songgen")]
#[command(about = "Telegram bot that turns text prompts into AI-generated music tracks")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    utils::logging::init_logging(cli.verbose)
        .map_err(error::SonggenError::Internal)?;

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // Run the bot until Ctrl-C
    bot::run(config).await
}
