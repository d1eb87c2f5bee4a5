//! Report generation.
//!
//! Renders the aggregate bundles produced by the view selector as
//! Markdown or JSON.

pub mod generator;

pub use generator::*;
