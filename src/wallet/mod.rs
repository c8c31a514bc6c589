//! Signing key management
//!
//! The private key lives inside [`SecureWallet`] and is only reachable through
//! alloy's signing wallet.

mod signer;

pub use signer::SecureWallet;
