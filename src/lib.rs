#![doc(test(attr(deny(warnings))))]

//! Expense Core computes the numbers behind a personal spending tracker: balance,
//! periodic summaries, spending insights, and a safe-to-spend ceiling, over records
//! kept in a flat key/value store.

pub mod ai;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
