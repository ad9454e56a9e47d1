//! Contracts the host chart must provide.

use ct_core::{DeviceId, SeriesSample, TimestampMs};

/// Pointer position in plot pixels. Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visible value-axis extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisExtent {
    pub min: f64,
    pub max: f64,
}

impl AxisExtent {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Span of the axis, floored to 1 when empty or inverted.
    pub fn range(&self) -> f64 {
        let r = self.max - self.min;
        if r.is_finite() && r > 0.0 { r } else { 1.0 }
    }
}

/// Rendered point closest to the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct HitPoint {
    pub device_id: DeviceId,
    pub timestamp_ms: TimestampMs,
    pub value: f64,
    pub pixel_distance: f64,
}

/// One captured pen position, in both screen and domain coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub x_px: f64,
    pub y_px: f64,
    pub timestamp_ms: TimestampMs,
    pub value: f64,
}

/// Chart the gestures happen on.
///
/// Queries take `&self`; the drawing hooks take `&mut self` and default to
/// no-ops so headless hosts only implement the transforms and hit testing.
pub trait ChartSurface {
    fn pixel_to_time(&self, px: f64) -> TimestampMs;
    fn pixel_to_value(&self, py: f64) -> f64;
    fn time_to_pixel(&self, ts: TimestampMs) -> f64;
    fn value_to_pixel(&self, value: f64) -> f64;

    /// Current value axis, `None` while the chart has no valid extent.
    fn value_extent(&self) -> Option<AxisExtent>;

    fn plot_height_px(&self) -> f64;

    /// Nearest rendered point within `max_distance_px` of the pointer.
    fn nearest_point(&self, at: Pointer, max_distance_px: f64) -> Option<HitPoint>;

    /// Devices whose rendered line passes within `max_distance_px`.
    fn series_near(&self, at: Pointer, max_distance_px: f64) -> Vec<DeviceId>;

    /// Whether a release at `at` counts as inside the plot.
    fn contains(&self, _at: Pointer) -> bool {
        true
    }

    /// Live feedback for a point being dragged.
    fn preview_value(&mut self, _device_id: &DeviceId, _timestamp_ms: TimestampMs, _value: f64) {}

    fn draw_trajectory(&mut self, _path: &[PathPoint]) {}

    fn clear_trajectory(&mut self) {}
}

/// Receives every committed series so the host can refresh its views.
pub trait UpdateSink {
    fn apply_update(&mut self, device_id: &DeviceId, series: &[SeriesSample]);
}

impl<F> UpdateSink for F
where
    F: FnMut(&DeviceId, &[SeriesSample]),
{
    fn apply_update(&mut self, device_id: &DeviceId, series: &[SeriesSample]) {
        self(device_id, series)
    }
}
