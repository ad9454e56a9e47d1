use ct_core::{Channel, MS_PER_MINUTE, SeriesSample, TimeSeriesPoint, TimestampMs};
use serde::{Deserialize, Serialize};

/// Anything with a timestamp and a per-channel value.
pub trait LodPoint {
    fn timestamp_ms(&self) -> TimestampMs;
    fn channel_value(&self, channel: Channel) -> f64;
}

impl LodPoint for SeriesSample {
    fn timestamp_ms(&self) -> TimestampMs {
        self.timestamp_ms
    }

    fn channel_value(&self, channel: Channel) -> f64 {
        self.value(channel)
    }
}

/// Single-channel points answer with their one value for either channel.
impl LodPoint for TimeSeriesPoint {
    fn timestamp_ms(&self) -> TimestampMs {
        self.timestamp_ms
    }

    fn channel_value(&self, _channel: Channel) -> f64 {
        self.value
    }
}

/// Closed time interval `[start_ms, end_ms]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_ms: TimestampMs,
    pub end_ms: TimestampMs,
}

impl TimeRange {
    pub fn new(start_ms: TimestampMs, end_ms: TimestampMs) -> Self {
        Self { start_ms, end_ms }
    }

    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    pub fn is_degenerate(&self) -> bool {
        self.end_ms <= self.start_ms
    }

    pub fn contains(&self, ts: TimestampMs) -> bool {
        ts >= self.start_ms && ts <= self.end_ms
    }
}

/// Decimation thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LodConfig {
    /// Windows this short or shorter are never decimated.
    pub detail_threshold_ms: i64,
    /// Lower bound on bucket width.
    pub min_bucket_ms: i64,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            detail_threshold_ms: 30 * MS_PER_MINUTE,
            min_bucket_ms: 30_000,
        }
    }
}

/// Decimate with the default thresholds.
pub fn aggregate<P: LodPoint + Clone>(
    points: &[P],
    visible: TimeRange,
    max_points: usize,
    channel: Channel,
) -> Vec<P> {
    aggregate_with(&LodConfig::default(), points, visible, max_points, channel)
}

/// Reduce `points` (sorted ascending) to what should be drawn for `visible`.
///
/// - ≤ 2 points or a degenerate range: returned as-is
/// - the range is clamped to the series span and points filtered to it,
///   falling back to the whole series if nothing is inside
/// - windows at or under the detail threshold, or filtered sets already
///   within `max_points`, are returned without decimation
/// - otherwise each bucket of width `max(duration / (max_points / 2), min)`
///   contributes its min and max point in their own time order
pub fn aggregate_with<P: LodPoint + Clone>(
    config: &LodConfig,
    points: &[P],
    visible: TimeRange,
    max_points: usize,
    channel: Channel,
) -> Vec<P> {
    if points.len() <= 2 || visible.is_degenerate() {
        return points.to_vec();
    }

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return points.to_vec();
    };
    let mut range = TimeRange::new(
        visible.start_ms.max(first.timestamp_ms()),
        visible.end_ms.min(last.timestamp_ms()),
    );

    let mut filtered: Vec<P> = if range.end_ms < range.start_ms {
        Vec::new()
    } else {
        let lo = points.partition_point(|p| p.timestamp_ms() < range.start_ms);
        let hi = points.partition_point(|p| p.timestamp_ms() <= range.end_ms);
        points[lo..hi].to_vec()
    };
    if filtered.is_empty() {
        filtered = points.to_vec();
        range = TimeRange::new(first.timestamp_ms(), last.timestamp_ms());
    }

    let duration = range.duration_ms();
    if duration <= config.detail_threshold_ms || filtered.len() <= max_points {
        return filtered;
    }

    let pairs = (max_points / 2).max(1) as i64;
    let bucket_ms = (duration / pairs).max(config.min_bucket_ms).max(1);
    let decimated = min_max_buckets(&filtered, range.start_ms, bucket_ms, channel);
    tracing::debug!(
        input = filtered.len(),
        output = decimated.len(),
        bucket_ms,
        "decimated series"
    );
    decimated
}

/// Walk a sorted slice bucket by bucket, keeping each bucket's extremes.
fn min_max_buckets<P: LodPoint + Clone>(
    points: &[P],
    range_start: TimestampMs,
    bucket_ms: i64,
    channel: Channel,
) -> Vec<P> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < points.len() {
        let bucket = (points[i].timestamp_ms() - range_start).div_euclid(bucket_ms);
        let (mut min_i, mut max_i) = (i, i);
        let mut j = i + 1;
        while j < points.len()
            && (points[j].timestamp_ms() - range_start).div_euclid(bucket_ms) == bucket
        {
            let v = points[j].channel_value(channel);
            if v < points[min_i].channel_value(channel) {
                min_i = j;
            }
            if v > points[max_i].channel_value(channel) {
                max_i = j;
            }
            j += 1;
        }

        // indices follow time order in a sorted input
        let (a, b) = (min_i.min(max_i), min_i.max(max_i));
        out.push(points[a].clone());
        if b != a {
            out.push(points[b].clone());
        }
        i = j;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize, step_ms: i64, f: impl Fn(usize) -> f64) -> Vec<TimeSeriesPoint> {
        (0..n)
            .map(|i| TimeSeriesPoint::new(i as i64 * step_ms, f(i)))
            .collect()
    }

    #[test]
    fn tiny_series_pass_through() {
        let pts = series(2, 1_000, |i| i as f64);
        let out = aggregate(&pts, TimeRange::new(0, 10), 1, Channel::Temperature);
        assert_eq!(out, pts);
    }

    #[test]
    fn degenerate_range_returns_input() {
        let pts = series(100, 60_000, |i| i as f64);
        let out = aggregate(&pts, TimeRange::new(5, 5), 10, Channel::Temperature);
        assert_eq!(out.len(), 100);
    }

    #[test]
    fn short_window_is_not_decimated() {
        // one sample per second across 20 minutes
        let pts = series(1_200, 1_000, |i| (i as f64).sin());
        let out = aggregate(&pts, TimeRange::new(0, 20 * 60_000), 50, Channel::Temperature);
        assert_eq!(out.len(), 1_200);
    }

    #[test]
    fn filtered_to_window() {
        let pts = series(100, 60_000, |i| i as f64);
        let out = aggregate(
            &pts,
            TimeRange::new(10 * 60_000, 19 * 60_000),
            1_000,
            Channel::Temperature,
        );
        assert_eq!(out.len(), 10);
        assert_eq!(out[0].value, 10.0);
    }

    #[test]
    fn window_outside_series_falls_back_to_everything() {
        let pts = series(100, 60_000, |i| i as f64);
        let out = aggregate(
            &pts,
            TimeRange::new(500 * 60_000, 600 * 60_000),
            1_000,
            Channel::Temperature,
        );
        assert_eq!(out.len(), 100);
    }

    #[test]
    fn decimation_bounds_output_and_keeps_spike() {
        let mut pts = series(10_000, 60_000, |i| (i as f64 / 50.0).sin());
        pts[4_321].value = 99.0;
        pts[8_765].value = -99.0;
        let range = TimeRange::new(0, pts.last().unwrap().timestamp_ms);
        let out = aggregate(&pts, range, 200, Channel::Temperature);
        assert!(out.len() <= 202, "got {}", out.len());
        assert!(out.iter().any(|p| p.value == 99.0));
        assert!(out.iter().any(|p| p.value == -99.0));
        assert!(out.windows(2).all(|w| w[0].timestamp_ms < w[1].timestamp_ms));
    }

    #[test]
    fn bucket_width_respects_minimum() {
        // 2 hours at 1 s spacing, a large budget would ask for < 30 s buckets
        let pts = series(7_200, 1_000, |i| (i % 7) as f64);
        let range = TimeRange::new(0, 7_199_000);
        let out = aggregate(&pts, range, 4_000, Channel::Temperature);
        // 7199 s / 30 s buckets -> 240 buckets, two points each
        assert!(out.len() <= 2 * 240);
        assert!(out.len() > 100);
    }

    #[test]
    fn picks_requested_channel() {
        let pts: Vec<SeriesSample> = (0..5_000)
            .map(|i| SeriesSample::new(i * 60_000, 5.0, if i == 1_234 { 90.0 } else { 50.0 }))
            .collect();
        let range = TimeRange::new(0, 4_999 * 60_000);
        let out = aggregate(&pts, range, 100, Channel::Humidity);
        assert!(out.iter().any(|p| p.humidity == 90.0));
    }
}
