//! Character catalog viewer - terminal entry point.
//!
//! Reads one command per line from stdin and renders the engine's view to stdout.
//! Logs go to stderr.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use character_catalog::config::Config;
use character_catalog::console::{Command, Console, HELP, Reply};
use character_catalog::models::EngineEvent;
use character_catalog::services::{CatalogEngine, HttpCharacterSource};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("Check the CATALOG_* environment variables");
            std::process::exit(1);
        }
    };

    let source = match HttpCharacterSource::new(&config) {
        Ok(source) => source,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Character Catalog");
    info!("  API: {}", config.character_endpoint());
    info!(
        "  Debounce: {}ms, page size: {}, record cap: {}",
        config.debounce.as_millis(),
        config.page_size.get(),
        config
            .max_records
            .map_or_else(|| "none".to_string(), |cap| cap.to_string())
    );
    info!("========================================");

    let engine = CatalogEngine::new(Arc::new(source), config.engine_settings());
    let mut events = engine.subscribe();
    let mut console = Console::new(engine.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", HELP);
    engine.refresh();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read stdin: {}", e);
                        break;
                    }
                };
                let command = match Command::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                match console.handle(command) {
                    Ok(Reply::Render) => println!("{}", console.render()),
                    Ok(Reply::Print(text)) => println!("{}", text),
                    Ok(Reply::Pending) => {}
                    Ok(Reply::Quit) => break,
                    Err(e) => println!("{}", e),
                }
            }
            event = events.recv() => match event {
                Ok(EngineEvent::FetchStarted { .. }) => println!("{}", console.render()),
                Ok(event) if event.is_settled() => println!("{}", console.render()),
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => warn!("Missed {} engine events", missed),
                Err(RecvError::Closed) => break,
            },
        }
    }

    info!("Shutting down");
}
