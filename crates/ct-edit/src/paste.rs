//! Paste a copied block into a device series, bent to the local trend.

use ct_core::{
    Channel, DeviceId, DeviceSeriesMap, MS_PER_MINUTE, SeriesSample, SeriesStore, TimestampMs,
    sort_series,
};

use crate::config::EditConfig;
use crate::outcome::{BatchOutcome, persist_batch};
use crate::series::merge_samples;
use crate::surface::UpdateSink;

/// Least-squares line around an insertion point. `x` is minutes relative to
/// the insertion time, so `intercept` is the trend value there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope_per_minute: f64,
    pub intercept: f64,
}

impl LinearTrend {
    pub fn value_at(&self, minutes: f64) -> f64 {
        self.intercept + self.slope_per_minute * minutes
    }
}

/// Fit a line through up to `window` samples before `target_ts` and up to
/// `window` at or after it. `None` for an empty series. A single sample or
/// samples sharing one timestamp give a flat line.
pub fn local_trend(
    series: &[SeriesSample],
    channel: Channel,
    target_ts: TimestampMs,
    window: usize,
) -> Option<LinearTrend> {
    let split = series.partition_point(|s| s.timestamp_ms < target_ts);
    let lo = split.saturating_sub(window);
    let hi = (split + window).min(series.len());
    let neighbours = &series[lo..hi];
    if neighbours.is_empty() {
        return None;
    }

    let n = neighbours.len() as f64;
    let xs: Vec<f64> = neighbours
        .iter()
        .map(|s| (s.timestamp_ms - target_ts) as f64 / MS_PER_MINUTE as f64)
        .collect();
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = neighbours.iter().map(|s| s.value(channel)).sum::<f64>() / n;

    let (sxx, sxy) = xs
        .iter()
        .zip(neighbours)
        .fold((0.0, 0.0), |(sxx, sxy), (x, s)| {
            let dx = x - mean_x;
            (sxx + dx * dx, sxy + dx * (s.value(channel) - mean_y))
        });
    let slope = if sxx > f64::EPSILON { sxy / sxx } else { 0.0 };

    Some(LinearTrend {
        slope_per_minute: slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Shift `copied` to start at `target_ts` and adjust each channel toward
/// its trend.
///
/// Blocks spanning no more than `short_paste_ms` get a constant offset that
/// lands the first value on the trend. Longer blocks also follow the trend
/// slope. A channel with no trend is pasted unchanged.
pub fn adjust_block(
    copied: &[SeriesSample],
    target_ts: TimestampMs,
    temperature: Option<LinearTrend>,
    humidity: Option<LinearTrend>,
    short_paste_ms: i64,
) -> Vec<SeriesSample> {
    let mut block = copied.to_vec();
    sort_series(&mut block);
    let (Some(first), Some(last)) = (block.first().copied(), block.last().copied()) else {
        return Vec::new();
    };
    let follow_slope = last.timestamp_ms - first.timestamp_ms > short_paste_ms;

    let adjust = |trend: Option<LinearTrend>, first_value: f64, value: f64, minutes: f64| {
        let Some(trend) = trend else {
            return value;
        };
        let offset = trend.intercept - first_value;
        if follow_slope {
            value + offset + trend.slope_per_minute * minutes
        } else {
            value + offset
        }
    };

    block
        .iter()
        .map(|s| {
            let rel_ms = s.timestamp_ms - first.timestamp_ms;
            let minutes = rel_ms as f64 / MS_PER_MINUTE as f64;
            SeriesSample::new(
                target_ts + rel_ms,
                adjust(temperature, first.temperature, s.temperature, minutes),
                adjust(humidity, first.humidity, s.humidity, minutes),
            )
        })
        .collect()
}

/// Adjusted copy of `copied` for insertion into `series` at `target_ts`.
pub fn paste_block(
    series: &[SeriesSample],
    copied: &[SeriesSample],
    target_ts: TimestampMs,
    config: &EditConfig,
) -> Vec<SeriesSample> {
    let trend = |channel| local_trend(series, channel, target_ts, config.trend_window);
    adjust_block(
        copied,
        target_ts,
        trend(Channel::Temperature),
        trend(Channel::Humidity),
        config.short_paste_ms,
    )
}

/// Paste into a device's series, merge, and persist.
pub fn commit_paste(
    series: &mut DeviceSeriesMap,
    store: &dyn SeriesStore,
    sink: &mut dyn UpdateSink,
    device_id: &DeviceId,
    copied: &[SeriesSample],
    target_ts: TimestampMs,
    config: &EditConfig,
) -> Option<BatchOutcome> {
    let mut updated = series.get(device_id).cloned().unwrap_or_default();
    let block = paste_block(&updated, copied, target_ts, config);
    if block.is_empty() {
        return None;
    }
    merge_samples(&mut updated, &block, config.paste_epsilon_ms);
    series.insert(device_id.clone(), updated.clone());
    tracing::debug!(device = %device_id, points = block.len(), "pasted block");

    Some(persist_batch(
        &[(device_id.clone(), updated, block.len())],
        store,
        sink,
    ))
}
