//! Commit reports.

use ct_core::{DeviceId, SeriesSample, SeriesStore, StoreError, StoreResult};
use rayon::prelude::*;

use crate::surface::UpdateSink;

/// Result of writing one device's series.
///
/// The in-memory series has already been replaced when this is produced;
/// `persisted` only says whether the store accepted it.
#[derive(Debug)]
pub struct DeviceCommit {
    pub device_id: DeviceId,
    pub samples_written: usize,
    pub persisted: StoreResult<()>,
}

impl DeviceCommit {
    pub fn is_persisted(&self) -> bool {
        self.persisted.is_ok()
    }
}

/// Per-device results of one committed gesture.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub commits: Vec<DeviceCommit>,
}

impl BatchOutcome {
    pub fn single(commit: DeviceCommit) -> Self {
        Self {
            commits: vec![commit],
        }
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Every device was persisted.
    pub fn is_clean(&self) -> bool {
        self.commits.iter().all(DeviceCommit::is_persisted)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&DeviceId, &StoreError)> {
        self.commits.iter().filter_map(|c| match &c.persisted {
            Ok(()) => None,
            Err(e) => Some((&c.device_id, e)),
        })
    }
}

/// Persist updated series concurrently, then notify the sink in device
/// order. A failed save is logged and reported, never rolled back.
pub(crate) fn persist_batch(
    updates: &[(DeviceId, Vec<SeriesSample>, usize)],
    store: &dyn SeriesStore,
    sink: &mut dyn UpdateSink,
) -> BatchOutcome {
    let commits: Vec<DeviceCommit> = updates
        .par_iter()
        .map(|(device_id, series, written)| {
            let persisted = store.save_series(device_id, series);
            if let Err(e) = &persisted {
                tracing::warn!(device = %device_id, error = %e, "save failed, please retry");
            }
            DeviceCommit {
                device_id: device_id.clone(),
                samples_written: *written,
                persisted,
            }
        })
        .collect();

    for (device_id, series, _) in updates {
        sink.apply_update(device_id, series);
    }
    tracing::debug!(devices = commits.len(), "committed edit");
    BatchOutcome { commits }
}
