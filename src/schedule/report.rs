//! Logging of schedule events

use super::ScheduleEvent;
use tracing::{debug, error, info, warn};

/// Write a schedule event to the log
pub fn report(event: &ScheduleEvent) {
    match event {
        ScheduleEvent::LoginScheduled { at } => {
            debug!(next_login = %at, "Daily login scheduled");
        }
        ScheduleEvent::ConnectivityChecked { reachable } => {
            debug!(reachable, "Connectivity checked");
        }
        ScheduleEvent::AttemptFinished { trigger, result } => match result {
            Ok(outcome) if outcome.success => {
                info!(%trigger, "{}", outcome);
            }
            Ok(outcome) => {
                warn!(%trigger, "{}", outcome);
            }
            Err(e) => {
                error!(%trigger, stage = e.stage(), url = %e.url(), "Login attempt failed: {}", e);
            }
        },
        ScheduleEvent::LoopStopped { trigger } => {
            debug!(%trigger, "Schedule loop exited");
        }
    }
}
