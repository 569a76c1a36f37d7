//! The per-question countdown timer.
//!
//! One [`QuestionTimer`] runs per displayed question. The event loop cancels
//! it and starts a fresh one on every index change, on submission start, when
//! the session reaches a terminal phase and on teardown; a tick from a
//! cancelled timer can be recognized by its epoch and dropped.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Interval between countdown ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A tick from the countdown, tagged with the epoch of the timer that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub epoch: u64,
}

/// Handle to the running countdown task for one question.
///
/// Dropping the handle aborts the task, so a timer can never outlive its
/// owner.
pub struct QuestionTimer {
    epoch: u64,
    handle: JoinHandle<()>,
}

impl QuestionTimer {
    /// Spawn a timer that sends one [`TimerTick`] per second.
    pub fn start(epoch: u64, tx: mpsc::UnboundedSender<TimerTick>) -> Self {
        Self::with_interval(epoch, TICK_INTERVAL, tx)
    }

    /// Same as [`start`](Self::start) with a custom tick interval.
    pub fn with_interval(epoch: u64, period: Duration, tx: mpsc::UnboundedSender<TimerTick>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first tick of a tokio interval completes immediately; a full
            // period must elapse before the countdown first drops
            interval.tick().await;

            loop {
                interval.tick().await;
                if tx.send(TimerTick { epoch }).is_err() {
                    break;
                }
            }
        });

        Self { epoch, handle }
    }

    /// Epoch tag carried by this timer's ticks.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Stop the timer. No further ticks are delivered.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_carry_the_timer_epoch() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _timer = QuestionTimer::with_interval(7, Duration::from_millis(10), tx);

        for _ in 0..3 {
            let tick = rx.recv().await.expect("tick");
            assert_eq!(tick.epoch, 7);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_tick_delivery() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = QuestionTimer::with_interval(1, Duration::from_millis(10), tx);

        rx.recv().await.expect("tick");
        timer.cancel();

        // drain anything already queued; the sender side is gone afterwards
        while rx.try_recv().is_ok() {}
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_the_task() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        {
            let _timer = QuestionTimer::with_interval(1, Duration::from_millis(10), tx);
            rx.recv().await.expect("tick");
        }

        while rx.try_recv().is_ok() {}
        assert!(rx.recv().await.is_none());
    }
}
