use std::time::Duration;

use log::debug;
use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::error::TickerErr;

/// Base interval the speed knob divides into, in milliseconds.
pub const BASE_INTERVAL_MS: u64 = 5000;

/// Converts the `1..=100` speed knob into a tick period.
///
/// The period is `5000 / speed` milliseconds. A zero speed would make that
/// division non-finite, so it falls back to exactly 5000 ms instead.
pub fn interval_from_speed(speed: u32) -> Duration {
    let ms = BASE_INTERVAL_MS as f64 / f64::from(speed);
    if !ms.is_finite() {
        return Duration::from_millis(BASE_INTERVAL_MS);
    }

    Duration::from_secs_f64(ms / 1000.0)
}

/// Fixed-delay repeating driver.
///
/// Runs the supplied closure on a spawned task with `period` between
/// invocation starts. Invocations are serialized: the closure runs to
/// completion inside the loop body before the next tick is polled, and an
/// in-flight invocation always finishes even when the ticker is cancelled.
pub struct Ticker<E> {
    cancel: CancellationToken,
    handle: JoinHandle<Result<(), E>>,
}

impl<E: Send + 'static> Ticker<E> {
    /// Spawns the driver. The first invocation fires one full period after
    /// this call.
    ///
    /// # Args
    /// * `period` - Delay between invocation starts.
    /// * `tick` - The step closure to drive.
    ///
    /// A callback error stops the loop on the spot and is handed back by
    /// [`Ticker::stop`]; it is never swallowed or retried.
    pub fn spawn<F>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Result<(), E> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut timer = time::interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    // Cancellation wins the race for the next tick.
                    biased;

                    _ = token.cancelled() => {
                        debug!("ticker cancelled");
                        return Ok(());
                    }
                    _ = timer.tick() => tick()?,
                }
            }
        });

        Self { cancel, handle }
    }

    /// Requests cancellation. Effective before the next tick fires; an
    /// in-flight invocation still completes.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// True once the driver task has exited, for any reason.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancels the driver and waits for it to wind down.
    ///
    /// # Errors
    /// Returns `TickerErr::Callback` when the loop stopped on a callback
    /// failure, `TickerErr::Join` when the driver task itself died.
    pub async fn stop(self) -> Result<(), TickerErr<E>> {
        self.cancel.cancel();
        match self.handle.await {
            Ok(outcome) => outcome.map_err(TickerErr::Callback),
            Err(join) => Err(TickerErr::Join(join)),
        }
    }
}
