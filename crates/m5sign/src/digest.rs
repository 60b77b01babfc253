use sha2::{Digest as _, Sha256};

pub const DIGEST_LEN: usize = 32;

/// SHA-256 of a message: the value the authority actually signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex, always 64 characters. This is the wire form sent to the authority.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

pub fn digest(message: &[u8]) -> Digest {
    Digest(Sha256::digest(message).into())
}

pub fn digest_hex(message: &[u8]) -> String {
    digest(message).to_hex()
}
