//! Sign-then-verify driver: persists the authority's answers and checks them
//! back from disk, the way a user of the device would.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use m5sign::{SigningClient, Transport, encode_der};
use tokio::fs;
use tracing::info;

pub const RAW_SIGNATURE_FILE: &str = "signature.bin";
pub const DER_SIGNATURE_FILE: &str = "signature.der";

/// Where the driver reads the message from and writes its results to.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub message: PathBuf,
    pub raw_signature: PathBuf,
    pub der_signature: PathBuf,
    pub public_key: PathBuf,
}

impl Artifacts {
    pub fn new(message: impl Into<PathBuf>, out_dir: &Path, public_key: impl Into<PathBuf>) -> Self {
        Self {
            message: message.into(),
            raw_signature: out_dir.join(RAW_SIGNATURE_FILE),
            der_signature: out_dir.join(DER_SIGNATURE_FILE),
            public_key: public_key.into(),
        }
    }
}

/// Signs the message and writes both the raw and the DER signature.
pub async fn sign_and_persist<T: Transport>(
    client: &mut SigningClient<T>,
    message: &[u8],
    artifacts: &Artifacts,
) -> Result<()> {
    let signature = client.sign(message).await.context("requesting signature")?;
    fs::write(&artifacts.raw_signature, signature)
        .await
        .with_context(|| format!("writing {}", artifacts.raw_signature.display()))?;

    let der = encode_der(&signature).context("encoding signature as DER")?;
    fs::write(&artifacts.der_signature, der)
        .await
        .with_context(|| format!("writing {}", artifacts.der_signature.display()))?;
    Ok(())
}

/// Verifies both persisted signatures, fetching the public key first if it is not on disk.
pub async fn verify_persisted<T: Transport>(
    client: &mut SigningClient<T>,
    message: &[u8],
    artifacts: &Artifacts,
) -> Result<()> {
    let cached = fs::try_exists(&artifacts.public_key)
        .await
        .with_context(|| format!("checking {}", artifacts.public_key.display()))?;
    if !cached {
        let key = client.public_key().await.context("fetching public key")?;
        fs::write(&artifacts.public_key, key)
            .await
            .with_context(|| format!("writing {}", artifacts.public_key.display()))?;
        info!(path = %artifacts.public_key.display(), "saved public key");
    }
    let public_key = fs::read_to_string(&artifacts.public_key)
        .await
        .with_context(|| format!("reading {}", artifacts.public_key.display()))?;

    for path in [&artifacts.raw_signature, &artifacts.der_signature] {
        let signature = fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        client
            .verify(&public_key, message, &signature)
            .with_context(|| format!("verifying {}", path.display()))?;
    }
    Ok(())
}

/// Reads the message, signs it and checks both persisted signatures.
pub async fn run_transport<T: Transport>(
    client: &mut SigningClient<T>,
    artifacts: &Artifacts,
) -> Result<()> {
    let message = fs::read(&artifacts.message)
        .await
        .with_context(|| format!("reading {}", artifacts.message.display()))?;

    sign_and_persist(client, &message, artifacts).await?;
    verify_persisted(client, &message, artifacts).await
}

/// Removes the cached public key so the next transport fetches its own.
pub async fn forget_public_key(artifacts: &Artifacts) -> Result<()> {
    match fs::remove_file(&artifacts.public_key).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("removing {}", artifacts.public_key.display())),
    }
}
