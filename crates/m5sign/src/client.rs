use p256::ecdsa::signature::hazmat::PrehashVerifier;
use p256::ecdsa::{Signature, VerifyingKey};
use p256::pkcs8::DecodePublicKey;
use tracing::info;

use crate::codec::{RawSignature, decode_der};
use crate::digest::digest;
use crate::error::{Error, Result};
use crate::transport::Transport;

/// A signature as handed to the verifier, in whichever encoding it arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureEnvelope<'a> {
    Raw(&'a RawSignature),
    Der(&'a [u8]),
}

impl<'a> SignatureEnvelope<'a> {
    /// Exactly 64 bytes is raw; anything else is taken as DER.
    pub fn classify(bytes: &'a [u8]) -> Self {
        match <&RawSignature>::try_from(bytes) {
            Ok(raw) => Self::Raw(raw),
            Err(_) => Self::Der(bytes),
        }
    }

    pub fn to_raw(self) -> Result<RawSignature> {
        match self {
            Self::Raw(raw) => Ok(*raw),
            Self::Der(der) => decode_der(der),
        }
    }
}

/// Parses a PEM `PUBLIC KEY` block into a P-256 verifying key.
pub fn import_public_key(pem: &str) -> Result<VerifyingKey> {
    VerifyingKey::from_public_key_pem(pem.trim())
        .map_err(|e| Error::InvalidPublicKey(e.to_string()))
}

/// Verifies an ECDSA P-256 / SHA-256 signature in raw or DER form.
///
/// A cryptographically wrong signature fails with [`Error::SignatureInvalid`];
/// a non-64-byte input that is not DER fails with [`Error::MalformedDer`].
pub fn verify(public_key_pem: &str, message: &[u8], signature: &[u8]) -> Result<()> {
    let key = import_public_key(public_key_pem)?;
    let digest = digest(message);
    let raw = SignatureEnvelope::classify(signature).to_raw()?;
    let signature = Signature::from_slice(&raw).map_err(|_| Error::SignatureInvalid)?;
    key.verify_prehash(digest.as_bytes(), &signature)
        .map_err(|_| Error::SignatureInvalid)
}

/// Like [`verify`], but an invalid signature yields `Ok(false)`.
///
/// Every other failure is still returned as an error.
pub fn is_valid(public_key_pem: &str, message: &[u8], signature: &[u8]) -> Result<bool> {
    match verify(public_key_pem, message, signature) {
        Ok(()) => Ok(true),
        Err(Error::SignatureInvalid) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Obtains signatures from a signing authority and checks them.
pub struct SigningClient<T> {
    transport: T,
    public_key: Option<String>,
}

impl<T: Transport> SigningClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            public_key: None,
        }
    }

    pub async fn sign(&mut self, message: &[u8]) -> Result<RawSignature> {
        let signature = self.transport.request_signature(message).await?;
        info!(message_len = message.len(), "received signature");
        Ok(signature)
    }

    /// The authority's public key, fetched on first use and cached afterwards.
    pub async fn public_key(&mut self) -> Result<&str> {
        let key = match self.public_key.take() {
            Some(key) => key,
            None => {
                let key = self.transport.get_public_key().await?;
                info!("fetched public key from signing authority");
                key
            }
        };
        Ok(self.public_key.insert(key).as_str())
    }
}

impl<T> SigningClient<T> {
    pub fn invalidate_public_key(&mut self) {
        self.public_key = None;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn verify(&self, public_key_pem: &str, message: &[u8], signature: &[u8]) -> Result<()> {
        verify(public_key_pem, message, signature)
    }

    pub fn is_valid(&self, public_key_pem: &str, message: &[u8], signature: &[u8]) -> Result<bool> {
        is_valid(public_key_pem, message, signature)
    }
}
