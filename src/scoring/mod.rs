//! Score aggregation over round history.

pub mod aggregator;

pub use aggregator::{ScoreAggregator, ScoreSheet, SheetRow, Standing};
