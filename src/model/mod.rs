//! Data produced by the formula parser.
//!
//! - [`counts`] – [`AtomCounts`](counts::AtomCounts), the element symbol to
//!   quantity map returned for a whole formula or any span inside it.
//!
//! Counts are built bottom-up: every group yields its own map, which the
//! enclosing level scales by the group multiplier and folds into its own.

pub mod counts;
