use anyhow::Context;
use clap::{Parser, Subcommand};

use minibin::cache::PasteCache;
use minibin::config::Config;
use minibin::db::Database;
use minibin::{commands, App};

#[derive(Parser)]
#[command(about = "A small pastebin with attribution and a cache layer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web server.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // try to load .env, ignoring any errors
    _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = Config::load().context("failed to load config")?;

    let database = Database::connect(&config.database.url)
        .await
        .context("failed to connect to database")?;
    let cache = PasteCache::new(&config.cache);

    let app = App {
        config,
        database,
        cache,
    };

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => commands::serve::run(app).await,
    }
}
