use ct_core::{Channel, MS_PER_MINUTE, TimeSeriesPoint};
use ct_lod::{LodConfig, TimeRange, aggregate, aggregate_with};
use proptest::prelude::*;

fn in_range(points: &[TimeSeriesPoint], range: TimeRange) -> Vec<TimeSeriesPoint> {
    points
        .iter()
        .copied()
        .filter(|p| range.contains(p.timestamp_ms))
        .collect()
}

fn extremes(points: &[TimeSeriesPoint]) -> (f64, f64) {
    points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.value), hi.max(p.value))
    })
}

/// Strictly increasing timestamps with steps of 1 s to 10 min.
fn series_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<TimeSeriesPoint>> {
    prop::collection::vec((1_000i64..600_000, -50.0f64..50.0), min_len..max_len).prop_map(
        |steps| {
            let mut ts = 0;
            steps
                .into_iter()
                .map(|(dt, v)| {
                    ts += dt;
                    TimeSeriesPoint::new(ts, v)
                })
                .collect()
        },
    )
}

#[test]
fn full_two_days_at_budget_is_unchanged() {
    let step = (48 * 60 * MS_PER_MINUTE) / 1_499;
    let points: Vec<_> = (0..1_500)
        .map(|i| TimeSeriesPoint::new(i * step, (i as f64 * 0.1).cos() * 4.0))
        .collect();
    let range = TimeRange::new(0, 48 * 60 * MS_PER_MINUTE);

    let out = aggregate(&points, range, 1_500, Channel::Temperature);
    assert_eq!(out, points);
}

#[test]
fn custom_threshold_keeps_longer_windows_raw() {
    let points: Vec<_> = (0..500)
        .map(|i| TimeSeriesPoint::new(i * 10_000, i as f64))
        .collect();
    let range = TimeRange::new(0, 499 * 10_000);
    let config = LodConfig {
        detail_threshold_ms: 2 * 60 * MS_PER_MINUTE,
        ..LodConfig::default()
    };

    let out = aggregate_with(&config, &points, range, 20, Channel::Temperature);
    assert_eq!(out.len(), 500);

    let decimated = aggregate(&points, range, 20, Channel::Temperature);
    assert!(decimated.len() < 500);
}

proptest! {
    #[test]
    fn decimation_keeps_window_extremes(
        points in series_strategy(50, 400),
        max_points in 4usize..40,
        lo_frac in 0.0f64..0.4,
        hi_frac in 0.6f64..1.0,
    ) {
        let span = points.last().unwrap().timestamp_ms;
        let range = TimeRange::new(
            (span as f64 * lo_frac) as i64,
            (span as f64 * hi_frac) as i64,
        );
        let visible = in_range(&points, range);
        prop_assume!(visible.len() > max_points);
        prop_assume!(range.duration_ms() > 30 * MS_PER_MINUTE);

        let out = aggregate(&points, range, max_points, Channel::Temperature);
        prop_assert!(out.len() <= visible.len());
        prop_assert_eq!(extremes(&out), extremes(&visible));
        prop_assert!(out.windows(2).all(|w| w[0].timestamp_ms < w[1].timestamp_ms));
    }

    #[test]
    fn under_budget_window_passes_through(
        points in series_strategy(3, 60),
        extra in 0usize..20,
    ) {
        let span = points.last().unwrap().timestamp_ms;
        let range = TimeRange::new(0, span);
        let max_points = points.len() + extra;

        let out = aggregate(&points, range, max_points, Channel::Temperature);
        prop_assert_eq!(out, points);
    }

    #[test]
    fn short_window_passes_through(
        points in series_strategy(3, 300),
        start_frac in 0.0f64..1.0,
        width_ms in 1i64..=(30 * MS_PER_MINUTE),
    ) {
        let span = points.last().unwrap().timestamp_ms;
        let start = (span as f64 * start_frac) as i64;
        let range = TimeRange::new(start, start + width_ms);
        let visible = in_range(&points, range);
        prop_assume!(!visible.is_empty());

        let out = aggregate(&points, range, 2, Channel::Temperature);
        prop_assert_eq!(out, visible);
    }
}
