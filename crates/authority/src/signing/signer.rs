/// The secure element's signing slot.
///
/// Implementations are sync; signing a digest is CPU-bound.
pub trait DeviceSigner: Send + Sync {
    /// Signs a 32-byte digest. Returns the raw `R || S` signature.
    fn sign_digest(&self, digest: &[u8; 32]) -> anyhow::Result<[u8; 64]>;

    /// The slot's public key as a PEM `PUBLIC KEY` block.
    fn public_key_pem(&self) -> anyhow::Result<String>;
}
