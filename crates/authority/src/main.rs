use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use m5sign_authority::{P256Signer, run};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    #[clap(long, default_value = "127.0.0.1")]
    host: String,
    #[clap(long, default_value = "8080")]
    port: u16,
    /// Seed the emulated slot key is derived from.
    #[clap(long, env = "M5SIGN_SEED")]
    seed: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let signer = P256Signer::from_seed(&args.seed).context("creating P-256 signer")?;
    run(args.host, args.port, Arc::new(signer)).await
}
