use anyhow::{Context, Result};
use p256::ecdsa::{Signature, SigningKey, signature::hazmat::PrehashSigner};
use p256::pkcs8::{EncodePublicKey, LineEnding};
use sha2::{Digest, Sha256};

use super::signer::DeviceSigner;

/// ECDSA signer on the NIST P-256 curve, standing in for the secure element.
///
/// Created from a seed string: the SHA-256 hash of the seed
/// becomes the 32-byte private scalar.
pub struct P256Signer {
    signing_key: SigningKey,
}

impl P256Signer {
    pub fn from_seed(seed: &str) -> Result<Self> {
        let hash = Sha256::digest(seed.as_bytes());
        let signing_key = SigningKey::from_bytes(&hash)
            .map_err(|e| anyhow::anyhow!("invalid seed: {e}"))?;
        Ok(Self { signing_key })
    }
}

impl DeviceSigner for P256Signer {
    fn sign_digest(&self, digest: &[u8; 32]) -> Result<[u8; 64]> {
        let signature: Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| anyhow::anyhow!("p256 sign_prehash failed: {e}"))?;
        let mut raw = [0u8; 64];
        raw.copy_from_slice(&signature.to_bytes());
        Ok(raw)
    }

    fn public_key_pem(&self) -> Result<String> {
        self.signing_key
            .verifying_key()
            .to_public_key_pem(LineEnding::LF)
            .context("encoding P-256 public key as PEM")
    }
}
