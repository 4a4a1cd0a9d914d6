//! Freshness clock for the feed.
//!
//! The feed's "updated X ago" labels are computed against a shared "now"
//! that only changes on a fixed cadence (60 seconds by default). This module
//! owns that instant:
//!
//! - [`Clock`] supplies the current instant ([`SystemClock`] in production,
//!   [`FixedClock`] in tests)
//! - [`FreshnessClock::start`] spawns the background tick task and returns a
//!   [`ClockHandle`]
//! - Every tick refreshes the shared instant and is broadcast as a [`Tick`]
//!
//! # Teardown
//!
//! The tick task lives exactly as long as its [`ClockHandle`].
//! [`ClockHandle::shutdown`] stops it and waits for it to exit; dropping the
//! handle aborts it. Either way no further ticks are delivered.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vitalfeed_daemon::clock::{FreshnessClock, SystemClock};
//!
//! # async fn example() {
//! let handle = FreshnessClock::start(Arc::new(SystemClock), Duration::from_secs(60));
//! let mut ticks = handle.subscribe();
//!
//! if let Ok(tick) = ticks.recv().await {
//!     println!("tick {} at {}", tick.sequence, tick.now);
//! }
//!
//! handle.shutdown().await;
//! # }
//! ```

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

// ============================================================================
// Clock Sources
// ============================================================================

/// Supplies the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The host's wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: std::sync::RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::RwLock::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

// ============================================================================
// Tick Task
// ============================================================================

/// Emitted each time the shared instant is refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// The refreshed instant
    pub now: DateTime<Utc>,
    /// 1 for the first tick after start, incrementing by one
    pub sequence: u64,
}

/// Starts freshness clocks.
pub struct FreshnessClock;

impl FreshnessClock {
    /// Read the clock once and start refreshing it every `period`.
    ///
    /// The first tick fires one full period after start; the instant read here
    /// serves the initial render. Must be called from within a tokio runtime.
    pub fn start(clock: Arc<dyn Clock>, period: Duration) -> ClockHandle {
        let current = Arc::new(RwLock::new(clock.now()));
        let (tick_tx, _) = broadcast::channel(16);
        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

        info!("Starting freshness clock with period {:?}", period);

        let task = tokio::spawn(Self::run(
            clock,
            period,
            Arc::clone(&current),
            tick_tx.clone(),
            shutdown_rx,
        ));

        ClockHandle {
            current,
            tick_tx,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    async fn run(
        clock: Arc<dyn Clock>,
        period: Duration,
        current: Arc<RwLock<DateTime<Utc>>>,
        tick_tx: broadcast::Sender<Tick>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut sequence = 0u64;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = clock.now();
                    *current.write().await = now;
                    sequence += 1;
                    debug!("Freshness tick {} at {}", sequence, now);

                    // No subscribers is fine; the shared instant is still updated.
                    let _ = tick_tx.send(Tick { now, sequence });
                }
                _ = shutdown_rx.recv() => {
                    info!("Freshness clock received shutdown signal");
                    break;
                }
            }
        }

        info!("Freshness clock stopped after {} tick(s)", sequence);
    }
}

/// Owns a running freshness clock. See the module docs for teardown.
pub struct ClockHandle {
    current: Arc<RwLock<DateTime<Utc>>>,
    tick_tx: broadcast::Sender<Tick>,
    shutdown_tx: Option<broadcast::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ClockHandle {
    /// The instant of the most recent tick (or of start, before the first tick).
    pub async fn now(&self) -> DateTime<Utc> {
        *self.current.read().await
    }

    /// Subscribe to future ticks.
    pub fn subscribe(&self) -> broadcast::Receiver<Tick> {
        self.tick_tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the tick task and wait for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ClockHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tokio::sync::broadcast::error::RecvError;

    fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 5, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new(start_time());
        assert_eq!(clock.now(), start_time());

        clock.advance(chrono::Duration::minutes(5));
        assert_eq!(clock.now(), start_time() + chrono::Duration::minutes(5));

        clock.set(start_time());
        assert_eq!(clock.now(), start_time());
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_instant_is_read_at_start() {
        let clock = Arc::new(FixedClock::new(start_time()));
        let handle = FreshnessClock::start(clock, Duration::from_secs(60));

        assert_eq!(handle.now().await, start_time());
        assert!(handle.is_running());
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_refresh_the_shared_instant() {
        let clock = Arc::new(FixedClock::new(start_time()));
        let handle = FreshnessClock::start(clock.clone(), Duration::from_secs(60));
        let mut ticks = handle.subscribe();

        clock.advance(chrono::Duration::seconds(60));
        let tick = ticks.recv().await.unwrap();
        assert_eq!(tick.sequence, 1);
        assert_eq!(tick.now, start_time() + chrono::Duration::seconds(60));
        assert_eq!(handle.now().await, tick.now);

        clock.advance(chrono::Duration::seconds(60));
        let tick = ticks.recv().await.unwrap();
        assert_eq!(tick.sequence, 2);
        assert_eq!(tick.now, start_time() + chrono::Duration::seconds(120));

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_tick_before_first_period() {
        let clock = Arc::new(FixedClock::new(start_time()));
        let handle = FreshnessClock::start(clock, Duration::from_secs(60));
        let mut ticks = handle.subscribe();

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert!(ticks.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(ticks.try_recv().unwrap().sequence, 1);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_closes_subscriptions() {
        let clock = Arc::new(FixedClock::new(start_time()));
        let handle = FreshnessClock::start(clock, Duration::from_secs(60));
        let mut ticks = handle.subscribe();

        handle.shutdown().await;
        assert!(matches!(ticks.recv().await, Err(RecvError::Closed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticking() {
        let clock = Arc::new(FixedClock::new(start_time()));
        let handle = FreshnessClock::start(clock, Duration::from_secs(60));
        let mut ticks = handle.subscribe();

        drop(handle);
        assert!(matches!(ticks.recv().await, Err(RecvError::Closed)));
    }
}
