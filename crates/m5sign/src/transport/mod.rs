mod http;
mod serial;

use std::future::Future;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::codec::{RawSignature, raw_from_slice};
use crate::error::{Result, TransportError};

pub use http::HttpTransport;
pub use serial::{ByteStream, PUBKEY_COMMAND, SerialDevice, SerialTransport};

/// A way of reaching the signing authority.
///
/// Requests take `&mut self`: one request is in flight per transport at a time.
pub trait Transport {
    /// The authority's public key as PEM text, whitespace-trimmed.
    fn get_public_key(&mut self) -> impl Future<Output = Result<String>> + Send;

    /// Asks the authority to sign the SHA-256 digest of `message`.
    fn request_signature(
        &mut self,
        message: &[u8],
    ) -> impl Future<Output = Result<RawSignature>> + Send;
}

/// Both transports answer with base64 text that must decode to exactly 64 bytes.
fn decode_signature_payload(payload: &[u8]) -> Result<RawSignature> {
    let bytes = BASE64
        .decode(payload.trim_ascii())
        .map_err(|e| TransportError::Protocol(format!("signature is not base64: {e}")))?;
    raw_from_slice(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn payload_decodes_to_raw_signature() {
        let encoded = BASE64.encode([7u8; 64]);
        let payload = format!("{encoded}\r\n");
        assert_eq!(decode_signature_payload(payload.as_bytes()).unwrap(), [7u8; 64]);
    }

    #[test]
    fn short_payload_is_a_length_error() {
        let encoded = BASE64.encode([7u8; 32]);
        assert!(matches!(
            decode_signature_payload(encoded.as_bytes()),
            Err(Error::InvalidSignatureLength(32))
        ));
    }

    #[test]
    fn garbage_payload_is_a_protocol_error() {
        assert!(matches!(
            decode_signature_payload(b"not base64!"),
            Err(Error::Transport(TransportError::Protocol(_)))
        ));
    }
}
