//! Login scheduling
//!
//! Two independent loops drive the same login action:
//! - a daily login at a fixed local hour
//! - a reconnect loop that logs in whenever a connectivity check fails
//!
//! They share only a cancellation token used for shutdown.

mod coordinator;
mod report;

pub use coordinator::{
    CoordinatorHandle, ScheduleConfig, ScheduleCoordinator, ScheduleEvent, Trigger,
};
pub use report::report;
