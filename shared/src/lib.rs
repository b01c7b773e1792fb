//! Campus Portal Shared Logic
//!
//! This crate holds the I/O-free parts of the campus portal auto-login:
//! decoding the gateway's response envelope, classifying results into
//! outcomes, and the deadline arithmetic behind the daily login.

pub mod codec;
pub mod error_table;
pub mod outcome;
pub mod schedule;

pub use codec::{CodecError, DecodedResult};
pub use error_table::{ErrorCodeEntry, ErrorTable, ErrorTableError};
pub use outcome::{Outcome, ResolveError, ReturnCode};

/// Fixed parameters of the portal and the login schedule
pub mod defaults {
    /// Portal host and port
    pub const GATEWAY_HOST: &str = "10.2.5.251:801";

    /// Endpoint that is reachable whenever the session is online
    pub const PROBE_URL: &str = "https://baidu.com";

    /// Local hour of the daily login
    pub const DAILY_LOGIN_HOUR: u32 = 7;

    /// Period of the connectivity check
    pub const RECONNECT_INTERVAL_SECS: u64 = 5 * 60;

    /// HTTP request timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Decode a raw gateway body and resolve it in one step
pub fn classify(body: &[u8], table: &ErrorTable) -> Result<Outcome, ClassifyError> {
    let decoded = codec::decode(body)?;
    Ok(outcome::resolve(&decoded, table)?)
}

/// Error from either stage of [`classify`]
#[derive(thiserror::Error, Debug)]
pub enum ClassifyError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
