mod signer;
mod p256;
mod request;

pub use signer::DeviceSigner;
pub use self::p256::P256Signer;
pub use request::parse_hex_digest;
