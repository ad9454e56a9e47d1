//! ct-core: shared foundation for coldtrace.
//!
//! Contains:
//! - ids (device and segment identifiers)
//! - series (samples, channels, device series maps)
//! - time (minute/millisecond conversion, ISO 8601)
//! - numeric (tolerances + float helpers)
//! - store (persistence contract used by the editor and services)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod series;
pub mod store;
pub mod time;

// Re-exports: nice ergonomics for downstream crates
pub use error::{StoreError, StoreResult};
pub use ids::{DeviceId, SegmentId};
pub use numeric::*;
pub use series::{Channel, DeviceSeriesMap, SeriesSample, TimeSeriesPoint, sort_series};
pub use store::SeriesStore;
pub use time::*;
