//! Incremental statistics over listing collections.

pub mod aggregate;
pub mod collection;
pub mod descriptor;

pub use aggregate::{apply_create, apply_delete, apply_update, initialize, Aggregate, ChartPoint};
pub use descriptor::{Dimension, Mean, Measure, Qualifier, StatusSet, Tally};
