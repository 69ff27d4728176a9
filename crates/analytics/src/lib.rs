//! Aggregate analytics for the product-research engine.
//!
//! This crate handles:
//! - Summary computation (totals and averages over a working set)
//! - Fixed-width price segmentation with percentage-of-total figures
//! - Row deletion with summary recomputation
//!
//! Every operation is a pure function of its input records.

pub mod segment;
pub mod summary;
pub mod working_set;

pub use segment::{segment, segment_with_config};
pub use summary::summarize;
pub use working_set::{remove_and_resummarize, WorkingSet};
