use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newsdesk_core::{AppConfig, Newsdesk};

mod commands;

#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(author, version, about = "Merge several RSS/Atom feeds into one newest-first list")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config.toml (defaults to ~/.config/newsdesk/config.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Print views as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured feed sources with their indices
    Sources,
    /// Show the merged article list
    List {
        /// Comma-separated source indices to leave out, e.g. 0,2
        #[arg(short, long)]
        disabled: Option<String>,
        /// Only entries tagged with this category
        #[arg(long)]
        category: Option<String>,
        /// Only entries whose title or summary contains this text
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show one article's sanitized body
    Show {
        /// Article id in <source>-<entry> form
        #[arg(required_unless_present = "url", conflicts_with = "url")]
        id: Option<String>,
        /// Original article URL (single-feed configurations)
        #[arg(short, long)]
        url: Option<String>,
    },
    /// Resolve an address such as "/?disabled=1" or "/article?id=0-3"
    Open {
        address: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let desk = Newsdesk::from_config(&config)?;
    tracing::debug!(
        "Loaded {} feed sources ({:?} addressing)",
        desk.registry().len(),
        desk.addressing()
    );

    match cli.command {
        Some(Commands::Sources) => commands::sources::run(&desk, cli.json),
        Some(Commands::List {
            disabled,
            category,
            query,
        }) => {
            commands::list::run(
                &desk,
                disabled.as_deref(),
                category.as_deref(),
                query.as_deref(),
                cli.json,
            )
            .await
        }
        None => commands::list::run(&desk, None, None, None, cli.json).await,
        Some(Commands::Show { id, url }) => {
            commands::show::run(&desk, id.as_deref(), url.as_deref(), cli.json).await
        }
        Some(Commands::Open { address }) => {
            commands::open::run(&desk, &address, cli.json).await
        }
    }
}
