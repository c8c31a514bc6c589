//! Auto Swap Agent
//!
//! An unattended agent that periodically swaps between a fixed set of token
//! pairs through a Uniswap-V3-style router:
//! - Picks a random directed pair from a static catalog
//! - Sizes the trade as a random share of the balance above a reserve
//! - Approves the router on first use of a token
//! - Submits `exactInputSingle` and waits for the receipt
//! - Sleeps a random 30-90 seconds and repeats, surviving any per-trade error
//!
//! # Security Model
//!
//! - The private key is read once from the environment into a `SecretString`
//!   and handed to the signer; it is never logged or serialized
//! - RPC URLs are only logged in redacted form
//! - Swaps carry no slippage protection by default (`MinOutputPolicy::Unprotected`)

pub mod allowance;
pub mod chain;
pub mod config;
pub mod executor;
pub mod pacing;
pub mod pairs;
pub mod runner;
pub mod sizing;
pub mod tokens;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use chain::{AlloyChainClient, ChainClient};
pub use config::{AgentSettings, Config};
pub use error::{Error, Result};
pub use pairs::{PairCatalog, TradingPair};
pub use runner::{AgentRunner, IterationOutcome, LoopStats};
