//! Software stand-in for the M5Stack secure-element signing authority.
//!
//! Speaks the same serial and HTTP protocols as the device firmware so the
//! client can be exercised without hardware.

pub mod error;
pub mod serial;
pub mod server;
pub mod signing;

pub use error::AuthorityError;
pub use serial::SerialResponder;
pub use server::{AppState, router, run, serve};
pub use signing::{DeviceSigner, P256Signer};
