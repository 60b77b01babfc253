use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use m5sign::{HttpConfig, HttpTransport, SerialConfig, SerialTransport, SigningClient};
use m5sign_client::{Artifacts, forget_public_key, run_transport};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    /// Serial port the device is attached to.
    #[clap(long, env = "M5SIGN_SERIAL_PORT")]
    serial_port: Option<String>,
    /// Base URL of the device's web endpoint.
    #[clap(long, env = "M5SIGN_BASE_URL")]
    base_url: Option<String>,
    #[clap(long, default_value = "message.txt")]
    message: PathBuf,
    #[clap(long, default_value = ".")]
    out_dir: PathBuf,
    #[clap(long, default_value = "M5Sign.pub")]
    pubkey_file: PathBuf,
    /// How long to wait for the device to answer.
    #[clap(long, default_value = "10")]
    deadline_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if args.serial_port.is_none() && args.base_url.is_none() {
        bail!("nothing to do: pass --serial-port and/or --base-url");
    }

    let deadline = Duration::from_secs(args.deadline_secs);
    let artifacts = Artifacts::new(&args.message, &args.out_dir, &args.pubkey_file);

    if let Some(port) = args.serial_port {
        let config = SerialConfig {
            response_deadline: deadline,
            ..SerialConfig::new(port)
        };
        let transport = SerialTransport::open(&config).context("opening serial transport")?;
        run_transport(&mut SigningClient::new(transport), &artifacts).await?;
        println!("Serial OK");
        forget_public_key(&artifacts).await?;
    }

    if let Some(base_url) = args.base_url {
        let config = HttpConfig {
            request_timeout: deadline,
            ..HttpConfig::new(base_url)
        };
        let transport = HttpTransport::new(&config).context("creating HTTP transport")?;
        run_transport(&mut SigningClient::new(transport), &artifacts).await?;
        println!("HTTP OK");
    }
    Ok(())
}
