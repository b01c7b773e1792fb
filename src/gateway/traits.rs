//! Login action abstraction so the schedule loops can run against any backend

use super::AttemptError;
use async_trait::async_trait;
use campus_autologin_shared::Outcome;

/// Something that can perform one complete login attempt
#[async_trait]
pub trait LoginAction: Send + Sync {
    /// Attempt a login and classify the result
    async fn attempt(&self) -> Result<Outcome, AttemptError>;
}
