//! Wall-clock tick generator.
//!
//! Publishes `TICK_MINUTELY` / `TICK_HOURLY` / `TICK_DAILY` aligned to
//! real calendar boundaries rather than fixed intervals from process
//! start, so a restart never desynchronizes the simulated calendar.
//! Each iteration recomputes the next boundary from the current wall
//! clock; sleeping late past the tolerance skips the stale boundary
//! instead of firing it, so error never accumulates.

use crate::EventBus;
use chrono::{DateTime, Duration, Timelike, Utc};
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Topic published at every minute boundary.
pub const TICK_MINUTELY: &str = "TICK_MINUTELY";
/// Topic published at every hour boundary.
pub const TICK_HOURLY: &str = "TICK_HOURLY";
/// Topic published at every midnight boundary.
pub const TICK_DAILY: &str = "TICK_DAILY";
/// Source id carried by all tick events.
pub const CLOCK_SOURCE: &str = "kernel.clock";

/// How late a wakeup may be before the boundary is skipped.
const DRIFT_TOLERANCE_SECS: i64 = 5;

/// Drives the tick topics on a bus.
pub struct TickGenerator {
    bus: Arc<EventBus>,
}

impl TickGenerator {
    #[must_use]
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }

    /// Spawns the generator task. Must be called inside a tokio
    /// runtime. The returned handle stops the task.
    pub fn spawn(self) -> TickHandle {
        info!("Tick generator started");
        TickHandle {
            handle: tokio::spawn(self.run()),
        }
    }

    async fn run(self) {
        loop {
            let now = Utc::now();
            let boundary = next_minute_boundary(now);
            let wait = (boundary - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            let woke = Utc::now();
            if (woke - boundary).num_seconds() > DRIFT_TOLERANCE_SECS {
                warn!(
                    boundary = %boundary,
                    woke = %woke,
                    "Woke too late for tick boundary, resynchronizing"
                );
                continue;
            }
            self.fire(boundary);
        }
    }

    /// Publishes the tick events a boundary implies.
    fn fire(&self, boundary: DateTime<Utc>) {
        debug!(boundary = %boundary, "Tick");
        self.bus.publish(
            TICK_MINUTELY,
            CLOCK_SOURCE,
            json!({
                "timestamp": boundary.to_rfc3339(),
                "hour": boundary.hour(),
                "minute": boundary.minute(),
            }),
        );
        if boundary.minute() == 0 {
            self.bus.publish(
                TICK_HOURLY,
                CLOCK_SOURCE,
                json!({
                    "timestamp": boundary.to_rfc3339(),
                    "hour": boundary.hour(),
                }),
            );
        }
        if boundary.hour() == 0 && boundary.minute() == 0 {
            self.bus.publish(
                TICK_DAILY,
                CLOCK_SOURCE,
                json!({ "timestamp": boundary.to_rfc3339() }),
            );
        }
    }
}

/// Handle to a running tick generator.
pub struct TickHandle {
    handle: JoinHandle<()>,
}

impl TickHandle {
    /// Stops the generator. No further ticks are published.
    pub fn stop(self) {
        self.handle.abort();
    }
}

/// The first minute boundary strictly after `now`.
fn next_minute_boundary(now: DateTime<Utc>) -> DateTime<Utc> {
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .map(|t| t + Duration::minutes(1))
        .unwrap_or_else(|| now + Duration::minutes(1))
}
