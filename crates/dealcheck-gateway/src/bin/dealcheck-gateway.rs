//! Deal Checker Gateway Binary
//!
//! # Usage
//! ```bash
//! dealcheck-gateway [--port 8000] [--host 127.0.0.1] [--config gateway.json] [--seed 42] [--verbose]
//! ```

use anyhow::Context;
use clap::Parser;
use dealcheck_gateway::{Gateway, GatewayConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Deal Checker Gateway - financial agreement risk validation API
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed the random source for reproducible scores
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(args.verbose)
        .init();

    let mut config = match &args.config {
        Some(path) => {
            let path = path.to_string_lossy();
            GatewayConfig::from_file(&path)
                .with_context(|| format!("failed to load config from {path}"))?
        }
        None => GatewayConfig::default(),
    };
    if let Some(host) = args.host {
        config = config.with_host(host);
    }
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    print_banner(&config);

    let gateway = Gateway::new(config);
    gateway.start().await?;

    Ok(())
}

fn print_banner(config: &GatewayConfig) {
    println!();
    println!("Deal Checker Gateway v{}", dealcheck_gateway::VERSION);
    println!("  http://{}:{}", config.host, config.port);
    println!();
    println!("  POST   /upload             upload a deal document");
    println!("  POST   /validate?deal_id=  score extracted terms");
    println!("  POST   /simulate           what-if with modified fields");
    println!("  GET    /summary/:deal_id   plain-English summary");
    println!("  GET    /deals              dashboard listing");
    println!("  GET    /deal/:deal_id      full deal record");
    println!("  DELETE /deal/:deal_id      remove a deal");
    println!("  GET    /health             health check");
    match config.seed {
        Some(seed) => println!("\n  random source seeded with {seed}"),
        None => println!("\n  random source: thread rng"),
    }
    println!();
    println!("Press Ctrl+C to stop the gateway");
    println!();
}
