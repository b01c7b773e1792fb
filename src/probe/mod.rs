//! Network reachability checks
//!
//! The reconnect loop only needs a yes/no answer, so failures of any kind
//! are folded into `false`.

mod reachability;

pub use reachability::HttpProbe;

use async_trait::async_trait;

/// Answers whether the network is currently usable
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// `true` only if the probe endpoint answered with status 200
    async fn is_reachable(&self) -> bool;
}
