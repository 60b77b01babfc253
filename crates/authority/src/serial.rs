use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use tracing::{debug, warn};

use crate::error::AuthorityError;
use crate::signing::{DeviceSigner, parse_hex_digest};

pub const PUBKEY_COMMAND: &str = "PUBKEY";
const TERMINATOR: u8 = b'\r';

/// The device's serial command loop, minus the UART.
///
/// Bytes are buffered until a carriage return; each complete line is
/// answered with the public key, a base64 signature, or nothing, and every
/// answer is followed by a carriage return.
pub struct SerialResponder {
    signer: Arc<dyn DeviceSigner>,
    line: Vec<u8>,
}

impl SerialResponder {
    pub fn new(signer: Arc<dyn DeviceSigner>) -> Self {
        Self {
            signer,
            line: Vec::new(),
        }
    }

    /// Consumes incoming bytes and returns whatever the device writes back.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<u8> {
        let mut output = Vec::new();
        for &byte in bytes {
            if byte == TERMINATOR {
                let line = std::mem::take(&mut self.line);
                output.extend(self.respond(&String::from_utf8_lossy(&line)));
            } else {
                self.line.push(byte);
            }
        }
        output
    }

    pub fn respond(&self, command: &str) -> Vec<u8> {
        let mut reply = match self.answer(command) {
            Ok(reply) => reply.into_bytes(),
            Err(e) => {
                warn!(error = %e, "serial request rejected");
                Vec::new()
            }
        };
        reply.push(TERMINATOR);
        reply
    }

    fn answer(&self, command: &str) -> Result<String, AuthorityError> {
        if command == PUBKEY_COMMAND {
            debug!("serial public key request");
            return Ok(self.signer.public_key_pem()?);
        }
        let digest = parse_hex_digest(command)?;
        let signature = self.signer.sign_digest(&digest)?;
        debug!(digest = command, "serial signature issued");
        Ok(BASE64.encode(signature))
    }
}
