//! Header clock: a background task publishing the local time of day.

use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use log::{debug, info};
use tokio::sync::{oneshot, watch};
use tokio::time::{interval, MissedTickBehavior};

pub const CLOCK_PERIOD: Duration = Duration::from_secs(60);

/// 12 hour clock with two-digit hour, e.g. `09:05 PM`.
pub fn format_clock<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%I:%M %p").to_string()
}

/// Handle to the clock task. The task stops when the handle is dropped.
pub struct HeaderClock {
    time_rx: watch::Receiver<String>,
    _drop_tx: oneshot::Sender<()>,
}

impl HeaderClock {
    /// Spawns the clock task. Must be called inside a tokio runtime.
    ///
    /// The current time is published right away and then once per `period`.
    pub fn start(period: Duration) -> Self {
        let (time_tx, time_rx) = watch::channel(format_clock(&Local::now()));
        let (drop_tx, mut drop_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let now = format_clock(&Local::now());
                        debug!("Clock tick: {}", now);
                        if time_tx.send(now).is_err() {
                            break;
                        }
                    }
                    _ = &mut drop_rx => {
                        info!("Header clock is stopping");
                        break;
                    }
                }
            }
        });

        Self { time_rx, _drop_tx: drop_tx }
    }

    pub fn current(&self) -> String {
        self.time_rx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_format_clock() {
        let morning = NaiveDate::from_ymd_opt(2025, 8, 20)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap()
            .and_utc();
        assert_eq!(format_clock(&morning), "09:05 AM");

        let evening = Utc.with_ymd_and_hms(2025, 8, 20, 21, 30, 0).unwrap();
        assert_eq!(format_clock(&evening), "09:30 PM");

        let noon = Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).unwrap();
        assert_eq!(format_clock(&noon), "12:00 PM");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_ticks_every_period() {
        let clock = HeaderClock::start(CLOCK_PERIOD);
        let mut rx = clock.time_rx.clone();
        assert_eq!(clock.current().len(), "09:05 AM".len());

        // first tick fires immediately
        rx.changed().await.unwrap();
        let start = tokio::time::Instant::now();

        rx.changed().await.unwrap();
        assert!(start.elapsed() >= CLOCK_PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_stops_on_drop() {
        let clock = HeaderClock::start(CLOCK_PERIOD);
        let mut rx = clock.time_rx.clone();
        rx.changed().await.unwrap();

        drop(clock);

        // the task drops its sender once it sees the stop signal
        assert!(rx.changed().await.is_err());
    }
}
