//! RPC endpoint configuration
//!
//! The agent talks to a single JSON-RPC endpoint supplied through `RPC_URL`.
//! Hosted providers usually embed the API key in the URL path or query, so the
//! endpoint is only ever logged in redacted form.
//!
//! ```bash
//! export RPC_URL="https://eth-mainnet.g.alchemy.com/v2/YOUR_KEY"
//! ```

use crate::{Error, Result};
use std::fmt;
use url::Url;

/// Environment variable holding the endpoint URL
pub const RPC_URL_ENV: &str = "RPC_URL";

/// A validated HTTP(S) JSON-RPC endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct RpcEndpoint {
    url: Url,
}

impl RpcEndpoint {
    /// Parse and validate an endpoint URL
    pub fn parse(raw: &str) -> Result<Self> {
        let url: Url = raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {}: {}", RPC_URL_ENV, e)))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::Config(format!(
                    "Unsupported {} scheme '{}' (expected http or https)",
                    RPC_URL_ENV, other
                )));
            }
        }

        if url.host_str().is_none() {
            return Err(Error::Config(format!("{} has no host", RPC_URL_ENV)));
        }

        Ok(Self { url })
    }

    /// The full URL, including any embedded credentials
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Scheme and host only, safe to log
    pub fn redacted(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        let hidden = self.url.path() != "/" || self.url.query().is_some();
        match (self.url.port(), hidden) {
            (Some(port), true) => format!("{}://{}:{}/***", self.url.scheme(), host, port),
            (Some(port), false) => format!("{}://{}:{}", self.url.scheme(), host, port),
            (None, true) => format!("{}://{}/***", self.url.scheme(), host),
            (None, false) => format!("{}://{}", self.url.scheme(), host),
        }
    }
}

impl fmt::Display for RpcEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

// Debug must not leak the API key either
impl fmt::Debug for RpcEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcEndpoint")
            .field("url", &self.redacted())
            .finish()
    }
}
