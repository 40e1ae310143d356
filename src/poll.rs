//! Timer-driven polling of a history source.
//!
//! [`PollLoop`] runs a background timer on the tokio runtime. Every tick it
//! spawns a fetch of the most recent [`HISTORY_LIMIT`] records and sends the
//! outcome back to the UI thread, which drains them with
//! [`PollLoop::poll`]. Fetches are not serialised: a slow fetch does not
//! delay the next tick. Each tick carries a generation number so the
//! consumer can discard a response that arrives after a newer one.
//!
//! ```text
//!   Idle ──timer / refresh──▶ Ticking ──every fetch finished──▶ Idle
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::source::{FetchError, HistoryRecord, HistorySource};

/// Time between ticks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Number of most recent records requested per tick.
pub const HISTORY_LIMIT: usize = 50;

/// Whether any fetch is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Ticking,
}

/// Result of a single tick.
#[derive(Debug)]
pub struct TickOutcome {
    /// Tick number, starting at 1 and increasing with every tick fired.
    pub generation: u64,
    pub result: Result<Vec<HistoryRecord>, FetchError>,
    /// Time the fetch took.
    pub elapsed: Duration,
}

/// Handle to the background poll timer.
///
/// Dropping the handle stops the timer. Fetches already in flight finish
/// but their outcomes are discarded.
#[derive(Debug)]
pub struct PollLoop {
    receiver: mpsc::UnboundedReceiver<TickOutcome>,
    refresh: mpsc::UnboundedSender<()>,
    in_flight: Arc<AtomicUsize>,
    timer: JoinHandle<()>,
}

impl PollLoop {
    /// Start polling with the fixed interval and window size.
    ///
    /// Must be called from within a tokio runtime context. The first tick
    /// fires immediately.
    pub fn start(source: Arc<dyn HistorySource>) -> Self {
        Self::with_interval(source, POLL_INTERVAL)
    }

    /// Start polling with a custom interval.
    pub fn with_interval(source: Arc<dyn HistorySource>, interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();
        let in_flight = Arc::new(AtomicUsize::new(0));

        let timer = tokio::spawn(run_timer(
            source,
            tx,
            refresh_rx,
            in_flight.clone(),
            interval,
        ));

        Self {
            receiver: rx,
            refresh: refresh_tx,
            in_flight,
            timer,
        }
    }

    /// Take the next finished tick without blocking.
    pub fn poll(&mut self) -> Option<TickOutcome> {
        self.receiver.try_recv().ok()
    }

    /// Fire a tick now and restart the interval.
    pub fn refresh(&self) {
        let _ = self.refresh.send(());
    }

    /// Current state of the loop.
    pub fn state(&self) -> PollState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            PollState::Ticking
        } else {
            PollState::Idle
        }
    }

    /// Number of fetches still running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Counts one running fetch; the count drops when the fetch task ends,
/// whether it finished, panicked or was cancelled.
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Drop for PollLoop {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

async fn run_timer(
    source: Arc<dyn HistorySource>,
    tx: mpsc::UnboundedSender<TickOutcome>,
    mut refresh: mpsc::UnboundedReceiver<()>,
    in_flight: Arc<AtomicUsize>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut generation = 0u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            Some(()) = refresh.recv() => ticker.reset(),
        }

        if tx.is_closed() {
            break;
        }

        generation += 1;
        let guard = InFlightGuard::enter(&in_flight);
        debug!(generation, source = source.description(), "tick");

        let source = source.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let started = Instant::now();
            let result = source.fetch_history(HISTORY_LIMIT).await;
            // Released before sending so a drained outcome never reads as in flight
            drop(guard);
            let _ = tx.send(TickOutcome {
                generation,
                result,
                elapsed: started.elapsed(),
            });
        });
    }
}
