mod driver;
mod error;

pub use driver::{BASE_INTERVAL_MS, Ticker, interval_from_speed};
pub use error::TickerErr;
