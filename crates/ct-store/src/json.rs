//! One JSON file per device.

use crate::record::{SeriesRecord, records_to_series, series_to_records};
use ct_core::{DeviceId, SeriesSample, SeriesStore, StoreError, StoreResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each device as `<root>/<device id>.json`, an array of
/// [`SeriesRecord`]s.
#[derive(Debug, Clone)]
pub struct JsonSeriesStore {
    root_dir: PathBuf,
}

impl JsonSeriesStore {
    pub fn new(root_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let root_dir = root_dir.into();
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn device_path(&self, device_id: &DeviceId) -> StoreResult<PathBuf> {
        let id = device_id.as_str();
        if id.is_empty()
            || id.starts_with('.')
            || id.contains(['/', '\\'])
            || id.contains(std::path::MAIN_SEPARATOR)
        {
            return Err(StoreError::InvalidArg {
                what: "device id must be a plain file name",
            });
        }
        Ok(self.root_dir.join(format!("{id}.json")))
    }

    pub fn has_device(&self, device_id: &DeviceId) -> bool {
        self.device_path(device_id)
            .map(|p| p.exists())
            .unwrap_or(false)
    }

    pub fn delete_device(&self, device_id: &DeviceId) -> StoreResult<()> {
        let path = self.device_path(device_id)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn encoding(err: serde_json::Error) -> StoreError {
    StoreError::Encoding {
        message: err.to_string(),
    }
}

impl SeriesStore for JsonSeriesStore {
    fn load_series(&self, device_id: &DeviceId) -> StoreResult<Option<Vec<SeriesSample>>> {
        let path = self.device_path(device_id)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let records: Vec<SeriesRecord> = serde_json::from_str(&content).map_err(encoding)?;
        records_to_series(&records).map(Some)
    }

    fn save_series(&self, device_id: &DeviceId, series: &[SeriesSample]) -> StoreResult<()> {
        let path = self.device_path(device_id)?;
        let records = series_to_records(device_id, series)?;
        let json = serde_json::to_string_pretty(&records).map_err(encoding)?;
        fs::write(&path, json)?;
        tracing::debug!(device = %device_id, samples = series.len(), path = %path.display(), "saved series");
        Ok(())
    }

    fn list_devices(&self) -> StoreResult<Vec<DeviceId>> {
        let mut devices = Vec::new();
        if !self.root_dir.exists() {
            return Ok(devices);
        }
        for entry in fs::read_dir(&self.root_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                if let Some(stem) = path.file_stem() {
                    devices.push(DeviceId::new(stem.to_string_lossy()));
                }
            }
        }
        devices.sort();
        Ok(devices)
    }
}
