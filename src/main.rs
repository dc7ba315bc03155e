//! Commit Viewer - commit history of one GitHub repository
//!
//! # Usage
//! ```bash
//! GITHUB_TOKEN=... commit-viewer                     # Start the API server
//! GITHUB_TOKEN=... commit-viewer serve --port 8080   # Custom port
//! GITHUB_TOKEN=... commit-viewer log --query "fix bug" --pages 2
//! commit-viewer log --server http://127.0.0.1:3001   # Use a running server
//! commit-viewer theme toggle                         # Flip light/dark
//! ```

mod config;
mod error;
mod github;
mod models;
mod routes;
mod service;
mod theme;
mod view;

use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{AppConfig, ConfigArgs};
use github::GitHubClient;
use service::{CommitService, SharedService};
use theme::{FileThemeStore, Theme, ThemePreference};
use view::{ClientView, CommitsApi, HttpCommitsApi, LocalCommitsApi};

/// Commit Viewer - browse a GitHub repository's commit history
#[derive(Parser)]
#[command(name = "commit-viewer")]
#[command(about = "Commit history viewer for a single GitHub repository", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server (default)
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to run the server on
        #[arg(short, long, default_value = "3001")]
        port: u16,
    },
    /// Print the commit list in the terminal
    Log {
        /// Talk to a running server instead of GitHub directly
        #[arg(long)]
        server: Option<String>,

        /// Search commit messages
        #[arg(short, long)]
        query: Option<String>,

        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,

        /// Force a fresh first page
        #[arg(long)]
        refresh: bool,
    },
    /// Show or change the color theme preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    Show,
    Toggle,
    Set {
        #[arg(value_parser = Theme::from_str)]
        theme: Theme,
    },
}

fn build_service(config: &AppConfig) -> anyhow::Result<SharedService> {
    let client = GitHubClient::new(&config.api_url, config.repo.clone(), config.cache_ttl)?;
    Ok(Arc::new(CommitService::new(
        Arc::new(client),
        config.token.clone(),
        config.per_page,
    )))
}

async fn run_server(config: &AppConfig, host: &str, port: u16) -> anyhow::Result<()> {
    if config.token.is_none() {
        eprintln!("  Warning: GITHUB_TOKEN is not set; every request will fail with 401");
    }

    let service = build_service(config)?;

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(service))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{host}:{port}");
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to {addr}: {e}");
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    println!();
    println!("  ┌─────────────────────────────────────────────┐");
    println!("  │                Commit Viewer                │");
    println!("  └─────────────────────────────────────────────┘");
    println!();
    println!("  Repository: {}", config.repo);
    println!("  Server:     http://{addr}");
    println!();
    println!("  Endpoints:");
    println!("    GET  /api/commits?page&per_page");
    println!("    GET  /api/commits/search?q&page&per_page");
    println!("    POST /api/refresh");
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn run_log<A: CommitsApi>(view: ClientView<A>, query: Option<&str>, pages: u32, refresh: bool) {
    view.mount().await;
    if refresh {
        view.refresh().await;
    }
    if let Some(query) = query {
        view.submit_search(query).await;
    }
    for _ in 1..pages {
        if !view.load_more().await {
            break;
        }
    }

    let state = view.snapshot().await;
    println!("{}", crate::view::render::render(&state, chrono::Utc::now()));
}

fn run_theme(config: &AppConfig, action: Option<ThemeAction>) -> anyhow::Result<()> {
    let mut preference = ThemePreference::load(FileThemeStore::new(&config.theme_file), Theme::Light);
    match action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => {}
        ThemeAction::Toggle => {
            preference.toggle();
        }
        ThemeAction::Set { theme } => preference.set(theme),
    }
    println!("{}", preference.current());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (quieter for production)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        None => run_server(&config, "127.0.0.1", 3001).await,
        Some(Commands::Serve { host, port }) => run_server(&config, &host, port).await,
        Some(Commands::Log {
            server,
            query,
            pages,
            refresh,
        }) => {
            match server {
                Some(url) => {
                    let view = ClientView::new(HttpCommitsApi::new(&url)?, config.per_page);
                    run_log(view, query.as_deref(), pages, refresh).await;
                }
                None => {
                    let api = LocalCommitsApi::new(build_service(&config)?);
                    run_log(ClientView::new(api, config.per_page), query.as_deref(), pages, refresh).await;
                }
            }
            Ok(())
        }
        Some(Commands::Theme { action }) => run_theme(&config, action),
    }
}
