//! Freehand "magic pen" edits over one or many device series.
//!
//! The pen path is only captured while the pointer moves. On release it is
//! resampled to a fixed cadence and written into every target device, each
//! shifted by its own offset from the group baseline so a group of curves
//! moves together without collapsing onto one line.

use ct_core::{
    Channel, DeviceId, DeviceSeriesMap, SeriesSample, SeriesStore, TimeSeriesPoint, TimestampMs,
    lerp, mean,
};

use crate::config::EditConfig;
use crate::outcome::{BatchOutcome, persist_batch};
use crate::series::{sample_interval_ms, upsert_values, value_at_lookup};
use crate::surface::{ChartSurface, PathPoint, Pointer, UpdateSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrajectoryMode {
    /// The pen started on exactly one series; the path replaces its values.
    Single,
    /// Several series follow the path, keeping their spread.
    Multi,
}

/// A device the path will be applied to.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryTarget {
    pub device_id: DeviceId,
    /// Added to every resampled path value for this device.
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySession {
    mode: TrajectoryMode,
    channel: Channel,
    anchor_timestamp_ms: TimestampMs,
    baseline: f64,
    targets: Vec<TrajectoryTarget>,
    path: Vec<PathPoint>,
}

impl TrajectorySession {
    /// Start a pen stroke at `at`.
    ///
    /// If the pointer is near exactly one rendered series, only that device
    /// is edited. Otherwise every device in `selection` is edited together,
    /// offsets measured against the mean of their values at the anchor
    /// time. A device without a value there gets offset 0. `None` when the
    /// chart has no extent or there is nothing to edit.
    pub fn begin(
        surface: &dyn ChartSurface,
        series: &DeviceSeriesMap,
        selection: &[DeviceId],
        config: &EditConfig,
        channel: Channel,
        at: Pointer,
    ) -> Option<Self> {
        if surface.value_extent().is_none() {
            tracing::debug!("pen ignored: no value extent");
            return None;
        }
        let anchor_ts = surface.pixel_to_time(at.x);
        let anchor_value = surface.pixel_to_value(at.y);
        let near = surface.series_near(at, config.hit_radius_px);

        let (mode, baseline, targets) = if let [only] = near.as_slice() {
            let target = TrajectoryTarget {
                device_id: only.clone(),
                offset: 0.0,
            };
            (TrajectoryMode::Single, anchor_value, vec![target])
        } else {
            if selection.is_empty() {
                tracing::debug!("pen ignored: no target series");
                return None;
            }
            let values: Vec<Option<f64>> = selection
                .iter()
                .map(|id| {
                    let s = series.get(id).map(Vec::as_slice).unwrap_or(&[]);
                    let interval = sample_interval_ms(s, config.default_interval_ms);
                    value_at_lookup(s, channel, anchor_ts, interval, config.lookup_horizon_intervals)
                })
                .collect();
            let known: Vec<f64> = values.iter().flatten().copied().collect();
            let baseline = mean(&known).unwrap_or(anchor_value);
            let targets = selection
                .iter()
                .zip(&values)
                .map(|(id, v)| TrajectoryTarget {
                    device_id: id.clone(),
                    offset: v.map_or(0.0, |v| v - baseline),
                })
                .collect();
            (TrajectoryMode::Multi, baseline, targets)
        };

        tracing::debug!(?mode, targets = targets.len(), baseline, "pen started");
        Some(Self {
            mode,
            channel,
            anchor_timestamp_ms: anchor_ts,
            baseline,
            targets,
            path: vec![PathPoint {
                x_px: at.x,
                y_px: at.y,
                timestamp_ms: anchor_ts,
                value: anchor_value,
            }],
        })
    }

    pub fn mode(&self) -> TrajectoryMode {
        self.mode
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn anchor_timestamp_ms(&self) -> TimestampMs {
        self.anchor_timestamp_ms
    }

    pub fn targets(&self) -> &[TrajectoryTarget] {
        &self.targets
    }

    pub fn path(&self) -> &[PathPoint] {
        &self.path
    }

    /// Capture a pen position and redraw the overlay. No series is touched.
    pub fn extend(&mut self, surface: &mut dyn ChartSurface, at: Pointer) {
        self.path.push(PathPoint {
            x_px: at.x,
            y_px: at.y,
            timestamp_ms: surface.pixel_to_time(at.x),
            value: surface.pixel_to_value(at.y),
        });
        surface.draw_trajectory(&self.path);
    }

    /// Apply the stroke to every target device.
    pub fn commit(
        self,
        series: &mut DeviceSeriesMap,
        store: &dyn SeriesStore,
        sink: &mut dyn UpdateSink,
        config: &EditConfig,
    ) -> Option<BatchOutcome> {
        let trajectory = resample_path(&self.path, config.trajectory_cadence_ms);
        if trajectory.is_empty() {
            return None;
        }

        let updates: Vec<(DeviceId, Vec<SeriesSample>, usize)> = self
            .targets
            .iter()
            .map(|target| {
                let mut updated = series.get(&target.device_id).cloned().unwrap_or_default();
                let interval = sample_interval_ms(&updated, config.default_interval_ms);
                let carry_ms = (config.carry_horizon_intervals * interval as f64) as i64;
                let values: Vec<(TimestampMs, f64)> = trajectory
                    .iter()
                    .map(|p| (p.timestamp_ms, p.value + target.offset))
                    .collect();
                upsert_values(&mut updated, self.channel, &values, interval / 2, carry_ms);
                (target.device_id.clone(), updated, trajectory.len())
            })
            .collect();

        for (device_id, updated, _) in &updates {
            series.insert(device_id.clone(), updated.clone());
        }
        tracing::info!(
            mode = ?self.mode,
            devices = updates.len(),
            points = trajectory.len(),
            "applied pen stroke"
        );
        Some(persist_batch(&updates, store, sink))
    }
}

/// Path value at `ts`, linear between the bracketing path points and held
/// at the first/last value outside the path. `path` must be time-sorted.
pub fn interpolate_path(path: &[PathPoint], ts: TimestampMs) -> Option<f64> {
    let (first, last) = (path.first()?, path.last()?);
    if ts <= first.timestamp_ms {
        return Some(first.value);
    }
    if ts >= last.timestamp_ms {
        return Some(last.value);
    }
    let hi = path.partition_point(|p| p.timestamp_ms < ts);
    let (a, b) = (&path[hi - 1], &path[hi]);
    let span = (b.timestamp_ms - a.timestamp_ms) as f64;
    if span <= 0.0 {
        return Some(b.value);
    }
    Some(lerp(a.value, b.value, (ts - a.timestamp_ms) as f64 / span))
}

/// Resample a captured path onto `cadence_ms` steps from its first to its
/// last timestamp, inclusive. Pen strokes may run right to left; the path
/// is ordered by time first.
pub fn resample_path(path: &[PathPoint], cadence_ms: i64) -> Vec<TimeSeriesPoint> {
    let mut sorted = path.to_vec();
    sorted.sort_by_key(|p| p.timestamp_ms);
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    let (start, end) = (first.timestamp_ms, last.timestamp_ms);
    let step = cadence_ms.max(1);

    let mut out = Vec::new();
    let mut ts = start;
    while ts <= end {
        if let Some(v) = interpolate_path(&sorted, ts) {
            out.push(TimeSeriesPoint::new(ts, v));
        }
        ts += step;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pp(ts: i64, value: f64) -> PathPoint {
        PathPoint {
            x_px: 0.0,
            y_px: 0.0,
            timestamp_ms: ts,
            value,
        }
    }

    #[test]
    fn interpolation_clamps_at_ends() {
        let path = vec![pp(0, 1.0), pp(120_000, 3.0)];
        assert_eq!(interpolate_path(&path, -10), Some(1.0));
        assert_eq!(interpolate_path(&path, 60_000), Some(2.0));
        assert_eq!(interpolate_path(&path, 500_000), Some(3.0));
        assert_eq!(interpolate_path(&[], 0), None);
    }

    #[test]
    fn resample_is_inclusive_per_minute() {
        let path = vec![pp(0, 0.0), pp(90_000, 9.0), pp(180_000, 0.0)];
        let out = resample_path(&path, 60_000);
        let stamps: Vec<_> = out.iter().map(|p| p.timestamp_ms).collect();
        assert_eq!(stamps, vec![0, 60_000, 120_000, 180_000]);
        assert!((out[1].value - 6.0).abs() < 1e-9);
        assert!((out[2].value - 6.0).abs() < 1e-9);
        assert_eq!(out[3].value, 0.0);
    }

    #[test]
    fn backwards_stroke_is_time_ordered() {
        let path = vec![pp(120_000, 2.0), pp(0, 0.0)];
        let out = resample_path(&path, 60_000);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].value, 0.0);
        assert_eq!(out[2].value, 2.0);
    }

    #[test]
    fn single_tap_yields_one_point() {
        let out = resample_path(&[pp(42, 7.0)], 60_000);
        assert_eq!(out, vec![TimeSeriesPoint::new(42, 7.0)]);
    }
}
