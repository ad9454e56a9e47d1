//! ct-store: series cache backends.

pub mod json;
pub mod memory;
pub mod record;

pub use json::JsonSeriesStore;
pub use memory::MemorySeriesStore;
pub use record::{SeriesRecord, records_to_series, series_to_records};
