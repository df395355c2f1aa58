//! Finance services: pure metrics over expense snapshots plus the mutation rules
//! applied by the tracker. No terminal I/O; persistence goes through `storage`.

pub mod errors;
pub mod services;
pub mod time;
pub mod tracker;

pub use errors::{FinanceError, Result};
pub use time::{Clock, FixedClock, SystemClock};
pub use tracker::FinanceTracker;
