//! Fetch Legends Server
//!
//! Runs the game backend as a standalone HTTP server: the world, the
//! campaign and the challenge validator, all in memory.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fetch_legends::challenge::ChallengeSet;
use fetch_legends::config::ServerConfig;
use fetch_legends::server::run_server;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "legends-server")]
#[command(about = "Fetch Legends HTTP Server - learn HTTP verbs by playing")]
struct Args {
    /// Server port
    #[arg(short, long, env = "LEGENDS_PORT")]
    port: Option<u16>,

    /// Server host
    #[arg(long, env = "LEGENDS_HOST")]
    host: Option<String>,

    /// Config file (TOML). Flags override its values.
    #[arg(short, long, env = "LEGENDS_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of challenge pack TOML files (builtin campaign when unset)
    #[arg(long, env = "LEGENDS_CHALLENGE_DIR")]
    challenge_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fetch_legends=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::from_path(path)?,
        None => ServerConfig::default(),
    };
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(dir) = args.challenge_dir {
        config.challenge_dir = Some(dir);
    }

    let challenges = match &config.challenge_dir {
        Some(dir) => ChallengeSet::load_dir(dir)?,
        None => ChallengeSet::builtin(),
    };

    info!("Starting Fetch Legends Server");
    info!("  Challenges: {}", challenges.len());
    info!("  Listening on: {}:{}", config.host, config.port);

    // Start server (blocks until shutdown)
    run_server(&config, challenges).await?;

    Ok(())
}
