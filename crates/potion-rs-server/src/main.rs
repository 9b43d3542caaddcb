mod config;
mod handler;
mod listener;
mod world;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use config::ServerConfig;
use handler::ConnectionHandler;
use listener::Listener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "server.toml".to_string());
    let config = Arc::new(match ServerConfig::load(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            std::process::exit(1);
        }
    });

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "potion-rs server v{} starting on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.server.address,
        config.server.port
    );
    info!("Max connections: {}", config.server.max_connections);
    info!(
        "Default gamemode: {}, creative players: {}",
        config.server.default_gamemode,
        config.permissions.creative.len()
    );

    let addr: SocketAddr = match format!("{}:{}", config.server.address, config.server.port).parse()
    {
        Ok(a) => a,
        Err(e) => {
            error!("Invalid bind address: {e}");
            std::process::exit(1);
        }
    };

    let listener = match Listener::bind(addr, config.server.max_connections).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    let mut handler = match ConnectionHandler::new(config.clone()) {
        Ok(h) => h,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    // Handle Ctrl+C
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let (events_tx, mut events) = tokio::sync::mpsc::channel(256);
    let listener_task = tokio::spawn(listener.run(events_tx, shutdown_rx.clone()));

    // Single owner of player state: events and game ticks are serialized here.
    let mut shutdown_rx_handler = shutdown_rx;
    let mut tick_interval = tokio::time::interval(Duration::from_millis(50));
    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(e) => handler.handle_event(e),
                    None => break,
                }
            }
            _ = tick_interval.tick() => {
                handler.game_tick();
            }
            changed = shutdown_rx_handler.changed() => {
                if changed.is_err() || *shutdown_rx_handler.borrow() {
                    break;
                }
            }
        }
    }

    let _ = listener_task.await;
    if !handler.players().is_empty() {
        info!("Dropping {} online players", handler.players().len());
    }
    info!("Server shut down after {} ticks.", handler.current_tick());
}
