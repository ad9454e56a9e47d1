//! In-process store for tests and previews.

use ct_core::{DeviceId, SeriesSample, SeriesStore, StoreError, StoreResult};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

/// Mutex-guarded map of device series. Saves for devices marked with
/// [`MemorySeriesStore::fail_saves_for`] are rejected, to exercise
/// failure reporting.
#[derive(Debug, Default)]
pub struct MemorySeriesStore {
    series: Mutex<BTreeMap<DeviceId, Vec<SeriesSample>>>,
    failing: Mutex<BTreeSet<DeviceId>>,
}

fn lock<T>(m: &Mutex<T>) -> StoreResult<MutexGuard<'_, T>> {
    m.lock().map_err(|_| StoreError::Unavailable {
        message: "memory store lock poisoned".to_string(),
    })
}

impl MemorySeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_saves_for(&self, device_id: &DeviceId) -> StoreResult<()> {
        lock(&self.failing)?.insert(device_id.clone());
        Ok(())
    }

    pub fn clear_failures(&self) -> StoreResult<()> {
        lock(&self.failing)?.clear();
        Ok(())
    }

    pub fn len(&self) -> usize {
        lock(&self.series).map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SeriesStore for MemorySeriesStore {
    fn load_series(&self, device_id: &DeviceId) -> StoreResult<Option<Vec<SeriesSample>>> {
        Ok(lock(&self.series)?.get(device_id).cloned())
    }

    fn save_series(&self, device_id: &DeviceId, series: &[SeriesSample]) -> StoreResult<()> {
        if lock(&self.failing)?.contains(device_id) {
            return Err(StoreError::Unavailable {
                message: format!("saves disabled for {device_id}"),
            });
        }
        lock(&self.series)?.insert(device_id.clone(), series.to_vec());
        Ok(())
    }

    fn list_devices(&self) -> StoreResult<Vec<DeviceId>> {
        Ok(lock(&self.series)?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_list() {
        let store = MemorySeriesStore::new();
        let id = DeviceId::new("a");
        assert!(store.load_series(&id).unwrap().is_none());
        store
            .save_series(&id, &[SeriesSample::new(0, 1.0, 2.0)])
            .unwrap();
        assert_eq!(store.load_series(&id).unwrap().unwrap().len(), 1);
        assert_eq!(store.list_devices().unwrap(), vec![id]);
    }

    #[test]
    fn injected_failure() {
        let store = MemorySeriesStore::new();
        let id = DeviceId::new("a");
        store.fail_saves_for(&id).unwrap();
        assert!(store.save_series(&id, &[]).is_err());
        store.clear_failures().unwrap();
        assert!(store.save_series(&id, &[]).is_ok());
    }
}
