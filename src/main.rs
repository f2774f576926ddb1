use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use wren::config::exe_relative;
use wren::{shutdown_signal, Logger, Server, ServerConfig};

const DEFAULT_CONFIG: &str = "config.conf";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("wren: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    // Config path: first CLI argument, or config.conf next to the
    // executable.
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| exe_relative(Path::new(DEFAULT_CONFIG)));

    let config = ServerConfig::load(&config_path)?;
    let log_path = exe_relative(&config.log_path);
    let logger = Logger::open(&log_path, config.debug)?;

    if config.debug {
        println!("IP address: {}.", config.bind_address);
        println!("Port: {}.", config.port);
        println!("Default html document: {}.", config.default_document);
        println!("Root directory: {}.", config.root_dir.display());
    }

    let server = Server::bind(config, logger).await?;
    println!("wren serving on http://{}", server.local_addr()?);

    let handle = server.shutdown_handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        println!("Shutdown signal received, stopping server...");
        handle.shutdown();
    });

    server.run().await?;
    println!("Server shutdown complete");
    Ok(())
}
