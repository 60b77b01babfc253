use crate::error::AuthorityError;

/// Parses the hex digest a host sends. Only exactly 64 hex characters are accepted.
pub fn parse_hex_digest(hex_digest: &str) -> Result<[u8; 32], AuthorityError> {
    if hex_digest.len() != 64 {
        return Err(AuthorityError::BadRequest(format!(
            "digest must be 64 hex characters, got {}",
            hex_digest.len()
        )));
    }
    let mut digest = [0u8; 32];
    hex::decode_to_slice(hex_digest, &mut digest)
        .map_err(|e| AuthorityError::BadRequest(format!("digest is not hex: {e}")))?;
    Ok(digest)
}
