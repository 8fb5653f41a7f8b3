use std::{error::Error, fmt};

use tokio::task::JoinError;

/// Driver failures surfaced when joining a ticker.
#[derive(Debug)]
pub enum TickerErr<E> {
    /// The tick callback reported a failure; the loop stopped on it.
    Callback(E),

    /// The driver task itself died, i.e. the callback panicked.
    Join(JoinError),
}

impl<E: fmt::Display> fmt::Display for TickerErr<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickerErr::Callback(e) => write!(f, "tick callback failed: {e}"),
            TickerErr::Join(e) => write!(f, "ticker task died: {e}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> Error for TickerErr<E> {}
