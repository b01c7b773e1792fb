//! Schedule coordinator running the daily login and reconnect loops

use crate::gateway::{AttemptError, LoginAction};
use crate::probe::ConnectivityProbe;
use campus_autologin_shared::{defaults, schedule, Outcome};
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Which loop triggered an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    DailyLogin,
    Reconnect,
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trigger::DailyLogin => write!(f, "daily-login"),
            Trigger::Reconnect => write!(f, "reconnect"),
        }
    }
}

/// Events emitted by the schedule loops
#[derive(Debug)]
pub enum ScheduleEvent {
    /// Daily loop computed its next login time
    LoginScheduled { at: DateTime<Local> },
    /// Reconnect loop finished a connectivity check
    ConnectivityChecked { reachable: bool },
    /// A login attempt completed
    AttemptFinished {
        trigger: Trigger,
        result: Result<Outcome, AttemptError>,
    },
    /// A loop exited
    LoopStopped { trigger: Trigger },
}

/// Timing of the two loops
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Local wall-clock hour of the daily login
    pub daily_login_hour: u32,
    /// Fixed period between connectivity checks
    pub reconnect_interval: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            daily_login_hour: defaults::DAILY_LOGIN_HOUR,
            reconnect_interval: Duration::from_secs(defaults::RECONNECT_INTERVAL_SECS),
        }
    }
}

/// Owns the daily login and reconnect loops
///
/// Both loops drive the same [`LoginAction`] and share nothing but the
/// cancellation token. Attempts from the two loops may interleave.
pub struct ScheduleCoordinator<L, P> {
    login: Arc<L>,
    probe: Arc<P>,
    config: ScheduleConfig,
    shutdown: CancellationToken,
}

impl<L, P> ScheduleCoordinator<L, P>
where
    L: LoginAction + 'static,
    P: ConnectivityProbe + 'static,
{
    /// Create a coordinator; nothing runs until [`start`](Self::start)
    pub fn new(login: Arc<L>, probe: Arc<P>, config: ScheduleConfig) -> Self {
        Self {
            login,
            probe,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Spawn both loops and return their handle plus the event stream
    pub fn start(&self) -> (CoordinatorHandle, mpsc::UnboundedReceiver<ScheduleEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let daily = tokio::spawn(daily_login_loop(
            self.login.clone(),
            self.config.daily_login_hour,
            event_tx.clone(),
            self.shutdown.clone(),
        ));

        let reconnect = tokio::spawn(reconnect_loop(
            self.login.clone(),
            self.probe.clone(),
            self.config.reconnect_interval,
            event_tx,
            self.shutdown.clone(),
        ));

        let handle = CoordinatorHandle {
            daily,
            reconnect,
            shutdown: self.shutdown.clone(),
        };
        (handle, event_rx)
    }
}

/// Handle to the running loops
pub struct CoordinatorHandle {
    daily: JoinHandle<()>,
    reconnect: JoinHandle<()>,
    shutdown: CancellationToken,
}

impl CoordinatorHandle {
    /// Signal both loops to stop
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Wait for both loops to exit
    pub async fn join(self) {
        for (name, task) in [("daily-login", self.daily), ("reconnect", self.reconnect)] {
            if let Err(e) = task.await {
                error!(task = name, "Schedule task ended abnormally: {}", e);
            }
        }
    }
}

/// Sleep until the next daily deadline, attempt a login, repeat
async fn daily_login_loop<L: LoginAction>(
    login: Arc<L>,
    hour: u32,
    event_tx: mpsc::UnboundedSender<ScheduleEvent>,
    shutdown: CancellationToken,
) {
    let trigger = Trigger::DailyLogin;
    let mut previous: Option<DateTime<Local>> = None;

    loop {
        let now = Local::now();
        let Some(deadline) = schedule::next_deadline_after(&now, previous.as_ref(), hour) else {
            error!(hour, "Cannot compute next login time, daily login stopped");
            break;
        };
        previous = Some(deadline);

        info!(next_login = %deadline, "Will try to login at {}...", deadline);
        let _ = event_tx.send(ScheduleEvent::LoginScheduled { at: deadline });

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = sleep(schedule::duration_until(&now, &deadline)) => {}
        }

        let result = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = login.attempt() => result,
        };
        let _ = event_tx.send(ScheduleEvent::AttemptFinished { trigger, result });
    }

    info!(%trigger, "Schedule loop stopped");
    let _ = event_tx.send(ScheduleEvent::LoopStopped { trigger });
}

/// Check connectivity every `period`, attempting a login whenever it fails
async fn reconnect_loop<L: LoginAction, P: ConnectivityProbe>(
    login: Arc<L>,
    probe: Arc<P>,
    period: Duration,
    event_tx: mpsc::UnboundedSender<ScheduleEvent>,
    shutdown: CancellationToken,
) {
    let trigger = Trigger::Reconnect;

    loop {
        let reachable = tokio::select! {
            _ = shutdown.cancelled() => break,
            reachable = probe.is_reachable() => reachable,
        };
        let _ = event_tx.send(ScheduleEvent::ConnectivityChecked { reachable });

        if reachable {
            info!(
                period_secs = period.as_secs(),
                "Network status check PASS, next check in {}...",
                describe(period)
            );
        } else {
            warn!(
                period_secs = period.as_secs(),
                "Network status check FAIL, program will try to reconnect every {}...",
                describe(period)
            );
            let result = tokio::select! {
                _ = shutdown.cancelled() => break,
                result = login.attempt() => result,
            };
            let _ = event_tx.send(ScheduleEvent::AttemptFinished { trigger, result });
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = sleep(period) => {}
        }
    }

    info!(%trigger, "Schedule loop stopped");
    let _ = event_tx.send(ScheduleEvent::LoopStopped { trigger });
}

fn describe(period: Duration) -> String {
    let secs = period.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        format!("{} minutes", secs / 60)
    } else {
        format!("{:?}", period)
    }
}
