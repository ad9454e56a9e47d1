//! Synthesis into a store and windowed reads back out of it.

use ct_core::{
    Channel, DeviceId, DeviceSeriesMap, SeriesSample, SeriesStore, TimeSeriesPoint, TimestampMs,
};
use ct_curves::{ChannelSampleSet, SynthConfig, synthesize_with};
use ct_lod::{LodConfig, TimeRange, aggregate_with};

use crate::error::{AppError, AppResult};
use crate::profile::{TrendProfile, validate_profile};

/// Sample both tracks of `profile` from `start_ms` and merge them into
/// device rows.
pub fn generate_series(
    profile: &TrendProfile,
    start_ms: TimestampMs,
    config: &SynthConfig,
) -> Vec<SeriesSample> {
    let channels = ChannelSampleSet {
        temperature: synthesize_with(config, profile.temperature.segments(), start_ms),
        humidity: synthesize_with(config, profile.humidity.segments(), start_ms),
    };
    channels.to_device_series(config.merge_epsilon_ms)
}

/// Validate, synthesize, and store a profile as `device_id`'s series.
/// Returns the number of rows written.
pub fn generate_into_store(
    store: &dyn SeriesStore,
    device_id: &DeviceId,
    profile: &TrendProfile,
    start_ms: TimestampMs,
    config: &SynthConfig,
) -> AppResult<usize> {
    validate_profile(profile)?;
    let series = generate_series(profile, start_ms, config);
    store.save_series(device_id, &series)?;
    tracing::info!(
        device = %device_id,
        profile = %profile.name,
        rows = series.len(),
        "generated series"
    );
    Ok(series.len())
}

/// Load several devices into a cache map. Devices with nothing stored are
/// skipped.
pub fn load_devices(store: &dyn SeriesStore, ids: &[DeviceId]) -> AppResult<DeviceSeriesMap> {
    let mut map = DeviceSeriesMap::new();
    for id in ids {
        match store.load_series(id)? {
            Some(series) => {
                map.insert(id.clone(), series);
            }
            None => tracing::warn!(device = %id, "no stored series"),
        }
    }
    Ok(map)
}

/// Points of one channel to draw for `range`, decimated to `max_points`.
pub fn render_window(
    store: &dyn SeriesStore,
    device_id: &DeviceId,
    channel: Channel,
    range: TimeRange,
    max_points: usize,
    lod: &LodConfig,
) -> AppResult<Vec<TimeSeriesPoint>> {
    let series = store
        .load_series(device_id)?
        .ok_or_else(|| AppError::DeviceNotFound(device_id.to_string()))?;
    let visible = aggregate_with(lod, &series, range, max_points, channel);
    Ok(visible.iter().map(|s| s.point(channel)).collect())
}

/// Basic statistics of one channel of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub count: usize,
    pub start_ms: TimestampMs,
    pub end_ms: TimestampMs,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// `None` for an empty series.
pub fn series_summary(series: &[SeriesSample], channel: Channel) -> Option<SeriesSummary> {
    let (first, last) = (series.first()?, series.last()?);
    let values: Vec<f64> = series.iter().map(|s| s.value(channel)).collect();
    Some(SeriesSummary {
        count: series.len(),
        start_ms: first.timestamp_ms,
        end_ms: last.timestamp_ms,
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        mean: ct_core::mean(&values)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_empty_is_none() {
        assert!(series_summary(&[], Channel::Temperature).is_none());
    }

    #[test]
    fn summary_stats() {
        let s = vec![
            SeriesSample::new(0, 1.0, 10.0),
            SeriesSample::new(60_000, 3.0, 20.0),
            SeriesSample::new(120_000, 2.0, 30.0),
        ];
        let t = series_summary(&s, Channel::Temperature).unwrap();
        assert_eq!((t.count, t.start_ms, t.end_ms), (3, 0, 120_000));
        assert_eq!((t.min, t.max, t.mean), (1.0, 3.0, 2.0));
        let h = series_summary(&s, Channel::Humidity).unwrap();
        assert_eq!(h.mean, 20.0);
    }
}
