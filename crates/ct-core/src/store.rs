//! Persistence contract.
//!
//! The engine treats storage as an opaque per-device key-value cache. Backends
//! live outside the engine crates (see `ct-store`).

use crate::error::StoreResult;
use crate::ids::DeviceId;
use crate::series::SeriesSample;
use std::sync::Arc;

/// Per-device series cache.
///
/// Implementations must tolerate concurrent calls for *different* devices;
/// multi-device commits persist in parallel.
pub trait SeriesStore: Send + Sync {
    /// Load a device's series, `None` if nothing is stored for it.
    fn load_series(&self, device_id: &DeviceId) -> StoreResult<Option<Vec<SeriesSample>>>;

    /// Replace a device's stored series. `series` is sorted ascending.
    fn save_series(&self, device_id: &DeviceId, series: &[SeriesSample]) -> StoreResult<()>;

    /// Devices that currently have a stored series.
    fn list_devices(&self) -> StoreResult<Vec<DeviceId>>;
}

impl<T: SeriesStore + ?Sized> SeriesStore for Arc<T> {
    fn load_series(&self, device_id: &DeviceId) -> StoreResult<Option<Vec<SeriesSample>>> {
        (**self).load_series(device_id)
    }

    fn save_series(&self, device_id: &DeviceId, series: &[SeriesSample]) -> StoreResult<()> {
        (**self).save_series(device_id, series)
    }

    fn list_devices(&self) -> StoreResult<Vec<DeviceId>> {
        (**self).list_devices()
    }
}
