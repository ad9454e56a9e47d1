//! Editing thresholds.

use ct_core::{MS_PER_MINUTE, MS_PER_SECOND};
use serde::{Deserialize, Serialize};

/// Tunables for gestures, merges, and history.
///
/// Distances are in pixels, times in milliseconds. Horizons expressed in
/// "intervals" are multiples of the target series' own sample interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditConfig {
    pub history_cap: usize,
    pub hit_radius_px: f64,
    pub fallback_hit_radius_px: f64,
    /// Drag anchor lookup: exact window, then nearest within the fallback.
    pub anchor_exact_ms: i64,
    pub anchor_fallback_ms: i64,
    pub trajectory_cadence_ms: i64,
    pub lookup_horizon_intervals: f64,
    pub carry_horizon_intervals: f64,
    pub paste_epsilon_ms: i64,
    /// Used when a series is too short to infer its own interval.
    pub default_interval_ms: i64,
    pub trend_window: usize,
    pub short_paste_ms: i64,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            history_cap: 10,
            hit_radius_px: 60.0,
            fallback_hit_radius_px: 200.0,
            anchor_exact_ms: MS_PER_SECOND,
            anchor_fallback_ms: 5 * MS_PER_SECOND,
            trajectory_cadence_ms: MS_PER_MINUTE,
            lookup_horizon_intervals: 5.0,
            carry_horizon_intervals: 2.0,
            paste_epsilon_ms: 30 * MS_PER_SECOND,
            default_interval_ms: MS_PER_MINUTE,
            trend_window: 5,
            short_paste_ms: 5 * MS_PER_MINUTE,
        }
    }
}
