//! Client side of a remote ECDSA P-256 signing authority.
//!
//! The authority (a secure element behind a serial line or a small web
//! server) signs SHA-256 digests and answers with a raw 64-byte `R || S`
//! signature. This crate requests those signatures, converts them to and
//! from DER, and verifies either encoding against the authority's key.

pub mod client;
pub mod codec;
pub mod config;
pub mod digest;
pub mod error;
pub mod transport;

pub use client::{SignatureEnvelope, SigningClient, import_public_key, is_valid, verify};
pub use codec::{RAW_SIGNATURE_LEN, RawSignature, decode_der, encode_der};
pub use config::{HttpConfig, SerialConfig};
pub use digest::{Digest, digest, digest_hex};
pub use error::{Error, Result, TransportError};
pub use transport::{ByteStream, HttpTransport, SerialTransport, Transport};
