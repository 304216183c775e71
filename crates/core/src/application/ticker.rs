// Schedule Ticker - periodic open/closed re-evaluation

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::application::desk::QueueDesk;
use crate::application::shutdown::ShutdownToken;

/// How often the schedule is checked (60s)
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Runs `check_schedule` once immediately, then on every tick
pub struct ScheduleTicker {
    desk: Arc<Mutex<QueueDesk>>,
    period: Duration,
}

impl ScheduleTicker {
    /// A zero period falls back to `DEFAULT_TICK_INTERVAL`
    pub fn new(desk: Arc<Mutex<QueueDesk>>, period: Duration) -> Self {
        let period = if period.is_zero() {
            warn!("Zero tick interval, using the default");
            DEFAULT_TICK_INTERVAL
        } else {
            period
        };
        Self { desk, period }
    }

    /// Tick loop (background task)
    ///
    /// Should be spawned in tokio::spawn; returns once `shutdown` fires
    /// or its sender is dropped.
    pub async fn run(self, mut shutdown: ShutdownToken) {
        info!(period_secs = self.period.as_secs(), "Schedule ticker started");

        let mut tick = interval(self.period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let mut desk = self.desk.lock().await;
                    let transition = desk.check_schedule();
                    debug!(is_open = desk.is_open(), transition = ?transition, "Schedule tick");
                }
                _ = shutdown.wait() => {
                    info!("Schedule ticker stopped");
                    break;
                }
            }
        }
    }
}
