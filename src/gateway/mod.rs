//! Portal login over HTTP
//!
//! This module handles:
//! - Building the fixed login URL from the configured credentials
//! - Issuing the login request and classifying the gateway's answer
//! - The `LoginAction` seam the schedule loops drive

mod client;
mod request;
mod traits;

pub use client::{AttemptError, GatewayClient};
pub use request::LoginRequest;
pub use traits::LoginAction;
