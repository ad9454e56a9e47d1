//! Segment list to sampled series.

use crate::family::{SamplePoint, evaluate_sample};
use crate::segment::{MIN_SEGMENT_MINUTES, Segment};
use ct_core::{SeriesSample, TimeSeriesPoint, TimestampMs, lerp, minutes_to_ms};
use serde::{Deserialize, Serialize};

/// Sampling cadence for synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SynthConfig {
    /// One sample per this many minutes of segment duration.
    pub cadence_minutes: f64,
    /// Lower bound on sample intervals per segment.
    pub min_intervals: usize,
    /// Segments shorter than this are sampled as if they were this long.
    pub min_segment_minutes: f64,
    /// Timestamps closer than this are one row when channels are merged.
    pub merge_epsilon_ms: i64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            cadence_minutes: 5.0,
            min_intervals: 2,
            min_segment_minutes: MIN_SEGMENT_MINUTES,
            merge_epsilon_ms: 30_000,
        }
    }
}

/// Synthesized points for both channels of one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelSampleSet {
    pub temperature: Vec<TimeSeriesPoint>,
    pub humidity: Vec<TimeSeriesPoint>,
}

impl ChannelSampleSet {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty() && self.humidity.is_empty()
    }

    /// Merge into device rows (see [`merge_channels`]).
    pub fn to_device_series(&self, epsilon_ms: i64) -> Vec<SeriesSample> {
        merge_channels(&self.temperature, &self.humidity, epsilon_ms)
    }
}

/// Sample `segments` with the default cadence.
pub fn synthesize(segments: &[Segment], channel_start_ms: TimestampMs) -> Vec<TimeSeriesPoint> {
    synthesize_with(&SynthConfig::default(), segments, channel_start_ms)
}

/// Sample every segment and merge the results in time order.
///
/// A segment of duration `D` gets `n = max(min_intervals, ceil(D / cadence))`
/// intervals, sampled at progress `i / n` for `i` in `0..=n`, so both segment
/// endpoints are emitted. Where one segment ends exactly as the next begins
/// both boundary samples are kept. An empty list gives an empty result.
pub fn synthesize_with(
    config: &SynthConfig,
    segments: &[Segment],
    channel_start_ms: TimestampMs,
) -> Vec<TimeSeriesPoint> {
    let cadence = if config.cadence_minutes.is_finite() && config.cadence_minutes > 0.0 {
        config.cadence_minutes
    } else {
        SynthConfig::default().cadence_minutes
    };
    let mut points = Vec::new();

    for seg in segments {
        let duration = if seg.duration_minutes.is_finite() {
            seg.duration_minutes.max(config.min_segment_minutes)
        } else {
            config.min_segment_minutes
        };
        let intervals = ((duration / cadence).ceil() as usize).max(config.min_intervals.max(1));
        points.reserve(intervals + 1);

        for i in 0..=intervals {
            let progress = i as f64 / intervals as f64;
            let sample = SamplePoint {
                progress,
                index: i as u64,
                duration_minutes: duration,
            };
            let value = evaluate_sample(seg.curve_family, &sample, &seg.params);
            let ts = channel_start_ms
                + minutes_to_ms(seg.start_offset_minutes + progress * duration);
            points.push(TimeSeriesPoint::new(ts, value));
        }
    }

    // stable, so equal timestamps keep segment order
    points.sort_by_key(|p| p.timestamp_ms);
    tracing::debug!(
        segments = segments.len(),
        points = points.len(),
        "synthesized channel"
    );
    points
}

/// Linear interpolation over a sorted point list, clamped at both ends.
fn value_at(points: &[TimeSeriesPoint], ts: TimestampMs) -> Option<f64> {
    let first = points.first()?;
    let last = points.last()?;
    if ts <= first.timestamp_ms {
        return Some(first.value);
    }
    if ts >= last.timestamp_ms {
        return Some(last.value);
    }
    let idx = points.partition_point(|p| p.timestamp_ms <= ts);
    let a = points[idx - 1];
    let b = points[idx];
    if a.timestamp_ms == ts || b.timestamp_ms == a.timestamp_ms {
        return Some(a.value);
    }
    let t = (ts - a.timestamp_ms) as f64 / (b.timestamp_ms - a.timestamp_ms) as f64;
    Some(lerp(a.value, b.value, t))
}

/// Combine two channels into device rows.
///
/// Rows sit at the union of both channels' timestamps, with timestamps
/// within `epsilon_ms` of the previous row collapsed into it. Each channel is
/// linearly interpolated at every row; a channel with no points reads 0.
pub fn merge_channels(
    temperature: &[TimeSeriesPoint],
    humidity: &[TimeSeriesPoint],
    epsilon_ms: i64,
) -> Vec<SeriesSample> {
    let mut stamps: Vec<TimestampMs> = temperature
        .iter()
        .chain(humidity.iter())
        .map(|p| p.timestamp_ms)
        .collect();
    stamps.sort_unstable();

    let mut rows: Vec<SeriesSample> = Vec::with_capacity(stamps.len());
    for ts in stamps {
        if let Some(prev) = rows.last() {
            if ts - prev.timestamp_ms <= epsilon_ms.max(0) {
                continue;
            }
        }
        rows.push(SeriesSample::new(
            ts,
            value_at(temperature, ts).unwrap_or(0.0),
            value_at(humidity, ts).unwrap_or(0.0),
        ));
    }
    rows
}
