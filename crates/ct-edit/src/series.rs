//! Lookups and merges on a single sorted device series.

use ct_core::{Channel, SeriesSample, TimestampMs, lerp, sort_series};

/// Median spacing between consecutive samples, `fallback_ms` when the
/// series has fewer than two distinct timestamps.
pub fn sample_interval_ms(series: &[SeriesSample], fallback_ms: i64) -> i64 {
    let mut diffs: Vec<i64> = series
        .windows(2)
        .map(|w| w[1].timestamp_ms - w[0].timestamp_ms)
        .filter(|d| *d > 0)
        .collect();
    if diffs.is_empty() {
        return fallback_ms;
    }
    diffs.sort_unstable();
    diffs[diffs.len() / 2]
}

/// Index of the sample closest in time to `ts`. Ties go to the earlier one.
pub fn nearest_index(series: &[SeriesSample], ts: TimestampMs) -> Option<usize> {
    if series.is_empty() {
        return None;
    }
    let i = series.partition_point(|s| s.timestamp_ms < ts);
    if i == 0 {
        return Some(0);
    }
    if i == series.len() {
        return Some(i - 1);
    }
    let before = ts - series[i - 1].timestamp_ms;
    let after = series[i].timestamp_ms - ts;
    Some(if before <= after { i - 1 } else { i })
}

/// Sample matching `ts` for a drag commit: the first one within `exact_ms`,
/// otherwise the closest within `fallback_ms`.
pub fn find_anchor(
    series: &[SeriesSample],
    ts: TimestampMs,
    exact_ms: i64,
    fallback_ms: i64,
) -> Option<usize> {
    if let Some(i) = series
        .iter()
        .position(|s| (s.timestamp_ms - ts).abs() <= exact_ms)
    {
        return Some(i);
    }
    nearest_index(series, ts).filter(|&i| (series[i].timestamp_ms - ts).abs() <= fallback_ms)
}

/// Channel value at `ts`.
///
/// A sample within half an interval is taken as-is. Otherwise the value is
/// interpolated between the bracketing samples, provided the nearer one is
/// within `horizon_intervals`. Outside the series span, or too far from
/// any sample, there is no value.
pub fn value_at_lookup(
    series: &[SeriesSample],
    channel: Channel,
    ts: TimestampMs,
    interval_ms: i64,
    horizon_intervals: f64,
) -> Option<f64> {
    let nearest = nearest_index(series, ts)?;
    let distance = (series[nearest].timestamp_ms - ts).abs() as f64;
    let interval = interval_ms.max(1) as f64;
    if distance <= interval / 2.0 {
        return Some(series[nearest].value(channel));
    }
    if distance > horizon_intervals * interval {
        return None;
    }

    let hi = series.partition_point(|s| s.timestamp_ms < ts);
    if hi == 0 || hi == series.len() {
        return None;
    }
    let (a, b) = (&series[hi - 1], &series[hi]);
    let span = (b.timestamp_ms - a.timestamp_ms) as f64;
    if span <= 0.0 {
        return Some(a.value(channel));
    }
    let t = (ts - a.timestamp_ms) as f64 / span;
    Some(lerp(a.value(channel), b.value(channel), t))
}

/// Write channel values at `points` (time-sorted) into a sorted series.
///
/// Each existing sample takes the value of the one point nearest to it, if
/// that point lies within `match_within_ms`; a sample is never written twice.
/// Every other point becomes a new sample whose other channel is carried over
/// from the nearest pre-existing sample within `carry_within_ms`, or 0.
/// Returns how many samples were inserted.
pub fn upsert_values(
    series: &mut Vec<SeriesSample>,
    channel: Channel,
    points: &[(TimestampMs, f64)],
    match_within_ms: i64,
    carry_within_ms: i64,
) -> usize {
    // owner[i]: (point index, distance) of the closest point claiming sample i
    let mut owner: Vec<Option<(usize, i64)>> = vec![None; series.len()];
    let mut nearest: Vec<Option<(usize, i64)>> = Vec::with_capacity(points.len());
    for (k, &(ts, _)) in points.iter().enumerate() {
        let hit = nearest_index(series, ts).map(|i| (i, (series[i].timestamp_ms - ts).abs()));
        if let Some((i, d)) = hit {
            let closer = match owner[i] {
                Some((_, best)) => d < best,
                None => true,
            };
            if d <= match_within_ms && closer {
                owner[i] = Some((k, d));
            }
        }
        nearest.push(hit);
    }

    let mut claimed = vec![None; points.len()];
    for (i, o) in owner.iter().enumerate() {
        if let Some((k, _)) = o {
            claimed[*k] = Some(i);
        }
    }

    let other = channel.other();
    let mut inserted = Vec::new();
    for (k, &(ts, value)) in points.iter().enumerate() {
        if let Some(i) = claimed[k] {
            series[i].set_value(channel, value);
            continue;
        }
        let carried = nearest[k]
            .filter(|&(_, d)| d <= carry_within_ms)
            .map(|(i, _)| series[i].value(other))
            .unwrap_or(0.0);
        let mut sample = SeriesSample::new(ts, 0.0, 0.0);
        sample.set_value(channel, value);
        sample.set_value(other, carried);
        inserted.push(sample);
    }

    let added = inserted.len();
    series.extend(inserted);
    sort_series(series);
    added
}

/// Merge whole samples into `series`. Incoming samples within `epsilon_ms`
/// of an existing one replace it; the rest are added. Returns how many
/// were added.
pub fn merge_samples(
    series: &mut Vec<SeriesSample>,
    incoming: &[SeriesSample],
    epsilon_ms: i64,
) -> usize {
    let mut added = 0;
    for sample in incoming {
        match nearest_index(series, sample.timestamp_ms) {
            Some(i) if (series[i].timestamp_ms - sample.timestamp_ms).abs() <= epsilon_ms => {
                series[i].temperature = sample.temperature;
                series[i].humidity = sample.humidity;
            }
            _ => {
                let at = series.partition_point(|s| s.timestamp_ms <= sample.timestamp_ms);
                series.insert(at, *sample);
                added += 1;
            }
        }
    }
    sort_series(series);
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(values: &[(i64, f64)]) -> Vec<SeriesSample> {
        values
            .iter()
            .map(|&(m, t)| SeriesSample::new(m * 60_000, t, 50.0))
            .collect()
    }

    #[test]
    fn interval_is_median_spacing() {
        let s = minutes(&[(0, 1.0), (1, 1.0), (2, 1.0), (10, 1.0), (11, 1.0)]);
        assert_eq!(sample_interval_ms(&s, 5), 60_000);
        assert_eq!(sample_interval_ms(&s[..1], 5), 5);
        assert_eq!(sample_interval_ms(&[], 7), 7);
    }

    #[test]
    fn nearest_prefers_earlier_on_tie() {
        let s = minutes(&[(0, 1.0), (2, 2.0)]);
        assert_eq!(nearest_index(&s, 60_000), Some(0));
        assert_eq!(nearest_index(&s, 61_000), Some(1));
        assert_eq!(nearest_index(&s, -5), Some(0));
        assert_eq!(nearest_index(&s, 999_999), Some(1));
        assert_eq!(nearest_index(&[], 0), None);
    }

    #[test]
    fn anchor_exact_then_fallback() {
        let s = minutes(&[(0, 1.0), (1, 2.0)]);
        assert_eq!(find_anchor(&s, 60_400, 1_000, 5_000), Some(1));
        assert_eq!(find_anchor(&s, 63_000, 1_000, 5_000), Some(1));
        assert_eq!(find_anchor(&s, 70_000, 1_000, 5_000), None);
    }

    #[test]
    fn lookup_exact_interpolated_and_missing() {
        let s = minutes(&[(0, 0.0), (1, 1.0), (2, 2.0), (3, 3.0), (10, 10.0)]);
        let interval = sample_interval_ms(&s, 60_000);
        assert_eq!(interval, 60_000);

        let exact = value_at_lookup(&s, Channel::Temperature, 60_020_i64, interval, 5.0);
        assert_eq!(exact, Some(1.0));

        // 6 minutes sits between 3 and 10, three intervals from the nearer one
        let mid = value_at_lookup(&s, Channel::Temperature, 6 * 60_000, interval, 5.0)
            .expect("interpolated");
        assert!((mid - 6.0).abs() < 1e-9);

        let far = minutes(&[(0, 0.0), (1, 1.0), (2, 2.0), (30, 3.0)]);
        assert_eq!(
            value_at_lookup(&far, Channel::Temperature, 16 * 60_000, 60_000, 5.0),
            None
        );
        assert_eq!(
            value_at_lookup(&s, Channel::Temperature, 13 * 60_000, interval, 5.0),
            None
        );
    }

    #[test]
    fn upsert_overwrites_or_inserts_with_carry() {
        let mut s = minutes(&[(0, 1.0), (10, 2.0)]);
        let added = upsert_values(
            &mut s,
            Channel::Temperature,
            &[(20_000, 9.0), (11 * 60_000, 4.0)],
            30_000,
            120_000,
        );
        assert_eq!(added, 1);
        assert_eq!(s.len(), 3);
        assert_eq!(s[0].temperature, 9.0);
        assert_eq!(s[2].temperature, 4.0);
        assert_eq!(s[2].humidity, 50.0);

        let added = upsert_values(&mut s, Channel::Humidity, &[(5 * 60_000, 70.0)], 30_000, 120_000);
        assert_eq!(added, 1);
        assert_eq!(s[1].humidity, 70.0);
        assert_eq!(s[1].temperature, 0.0);
        assert!(s.windows(2).all(|w| w[0].timestamp_ms <= w[1].timestamp_ms));
    }

    #[test]
    fn each_sample_takes_its_nearest_point() {
        let mut s = minutes(&[(0, 0.0), (5, 0.0), (10, 0.0)]);
        let points: Vec<(TimestampMs, f64)> = (0..=10).map(|m| (m * 60_000, m as f64)).collect();
        let added = upsert_values(&mut s, Channel::Temperature, &points, 150_000, 600_000);

        assert_eq!(added, 8);
        assert_eq!(s.len(), 11);
        for (m, sample) in s.iter().enumerate() {
            assert_eq!(sample.timestamp_ms, m as i64 * 60_000);
            assert_eq!(sample.temperature, m as f64);
        }
    }

    #[test]
    fn merge_dedupes_within_epsilon() {
        let mut s = minutes(&[(0, 1.0), (10, 2.0)]);
        let incoming = vec![
            SeriesSample::new(10 * 60_000 + 20_000, 7.0, 60.0),
            SeriesSample::new(5 * 60_000, 3.0, 40.0),
        ];
        let added = merge_samples(&mut s, &incoming, 30_000);
        assert_eq!(added, 1);
        assert_eq!(s.len(), 3);
        assert_eq!(s[1].temperature, 3.0);
        assert_eq!(s[2].temperature, 7.0);
        assert_eq!(s[2].timestamp_ms, 10 * 60_000);
    }
}
