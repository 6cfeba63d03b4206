use anyhow::Result;
use clap::{Parser, Subcommand};

use aisle_cli::{AdvisorApp, Config};

/// Aisle - AI-guided product recommendations from your terminal
#[derive(Parser)]
#[command(name = "aisle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Use the built-in mock catalog instead of the live catalog API
    #[arg(long, global = true)]
    mock: bool,

    /// Enable verbose debug output and the session transcript dump
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// One-shot search without the clarifying-question flow
    Search {
        /// What to search for
        query: Vec<String>,

        /// Budget ceiling in dollars
        #[arg(short, long)]
        budget: Option<f64>,

        /// How many recommendations to show
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// List currently trending catalog products
    Trending,

    /// Show the resolved configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default()?;

    match cli.command {
        None => {
            let mut app = AdvisorApp::new(&config, cli.mock, cli.debug);
            app.run_interactive().await
        }
        Some(Commands::Search { query, budget, limit }) => {
            let query = query.join(" ");
            if query.trim().is_empty() {
                anyhow::bail!("search needs a query, e.g. `aisle search gaming laptop`");
            }
            let mut app = AdvisorApp::new(&config, cli.mock, cli.debug);
            app.run_search(&query, budget, limit).await
        }
        Some(Commands::Trending) => {
            let mut app = AdvisorApp::new(&config, cli.mock, cli.debug);
            app.run_trending().await
        }
        Some(Commands::Config { init }) => show_config(&config, init),
    }
}

fn show_config(config: &Config, init: bool) -> Result<()> {
    if init {
        let path = Config::config_path();
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            config.save()?;
            println!("Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    println!("ai:");
    println!("  provider: {}", config.ai.provider);
    println!("  model: {}", config.ai.model);
    println!("  api_url: {}", config.ai.api_url);
    println!("  api_key: {}", mask(&config.ai.api_key));
    println!("catalog:");
    println!("  api_url: {}", config.catalog.api_url);
    println!("  consumer_id: {}", config.catalog.consumer_id);
    println!("  key_version: {}", config.catalog.key_version);
    println!("  auth_signature: {}", mask(&config.catalog.auth_signature));
    Ok(())
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        "(not set)".to_string()
    } else {
        format!("{}…", secret.chars().take(4).collect::<String>())
    }
}
