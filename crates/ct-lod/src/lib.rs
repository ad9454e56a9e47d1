//! Level-of-detail decimation for rendering large series.
//!
//! Min/max bucketing: the visible window is cut into equal time buckets and
//! each bucket keeps only its lowest and highest point. Every local extremum
//! in the window survives, at a cost of at most two points per bucket.
//! Short windows and series already under budget pass through untouched so
//! individual samples stay clickable while editing.

pub mod aggregate;

pub use aggregate::{LodConfig, LodPoint, TimeRange, aggregate, aggregate_with};
