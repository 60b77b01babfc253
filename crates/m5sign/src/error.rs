use std::time::Duration;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures surfaced by the codec, the transports and verification.
///
/// Every kind is distinguishable; nothing collapses into a catch-all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid signature length: expected 64 bytes, got {0}")]
    InvalidSignatureLength(usize),
    #[error("malformed DER signature: {0}")]
    MalformedDer(&'static str),
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("signature does not verify against the public key")]
    SignatureInvalid,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("signing authority did not answer within {0:?}")]
    TransportTimeout(Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<std::io::Error> for TransportError {
    fn from(error: std::io::Error) -> Self {
        Self::Connection(error.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Transport(error.into())
    }
}
