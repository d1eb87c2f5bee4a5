//! Aggregation engine.
//!
//! Pure functions that compute the aggregate series and headline
//! metrics the views are built from.

pub mod aggregator;

pub use aggregator::*;
