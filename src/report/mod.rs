//! Reporting over the chosen subset.

mod stats;

pub use stats::SelectionStats;
