//! Single-point drag.

use ct_core::{Channel, DeviceId, DeviceSeriesMap, SeriesStore, TimestampMs, round_tenth, sort_series};

use crate::config::EditConfig;
use crate::outcome::{BatchOutcome, persist_batch};
use crate::series::find_anchor;
use crate::surface::{ChartSurface, Pointer, UpdateSink};

/// Value change for a vertical pointer move of `pixel_dy`.
///
/// Screen Y grows downward, so dragging up raises the value. A zero plot
/// height or value range is treated as 1.
pub fn value_delta(pixel_dy: f64, plot_height_px: f64, value_range: f64) -> f64 {
    let height = if plot_height_px.is_finite() && plot_height_px > 0.0 {
        plot_height_px
    } else {
        1.0
    };
    let range = if value_range.is_finite() && value_range > 0.0 {
        value_range
    } else {
        1.0
    };
    -pixel_dy / height * range
}

/// A point being dragged. Lives from pointer-down to pointer-up; nothing is
/// written until [`DragSession::commit`].
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    device_id: DeviceId,
    channel: Channel,
    anchor_timestamp_ms: TimestampMs,
    anchor_value: f64,
    anchor_y_px: f64,
    value_range: f64,
    plot_height_px: f64,
    current_value: f64,
}

impl DragSession {
    /// Grab the rendered point under the pointer.
    ///
    /// Returns `None`, silently, when the chart has no value extent or no
    /// point lies within the fallback radius.
    pub fn begin(
        surface: &dyn ChartSurface,
        config: &EditConfig,
        channel: Channel,
        at: Pointer,
    ) -> Option<Self> {
        let Some(extent) = surface.value_extent() else {
            tracing::debug!("drag ignored: no value extent");
            return None;
        };
        let hit = surface
            .nearest_point(at, config.hit_radius_px)
            .or_else(|| surface.nearest_point(at, config.fallback_hit_radius_px));
        let Some(hit) = hit else {
            tracing::debug!(x = at.x, y = at.y, "drag ignored: nothing under pointer");
            return None;
        };

        Some(Self {
            device_id: hit.device_id,
            channel,
            anchor_timestamp_ms: hit.timestamp_ms,
            anchor_value: hit.value,
            anchor_y_px: at.y,
            value_range: extent.range(),
            plot_height_px: surface.plot_height_px(),
            current_value: hit.value,
        })
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn anchor_timestamp_ms(&self) -> TimestampMs {
        self.anchor_timestamp_ms
    }

    pub fn anchor_value(&self) -> f64 {
        self.anchor_value
    }

    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    /// Track the pointer and preview the new value on the chart.
    pub fn update(&mut self, surface: &mut dyn ChartSurface, at: Pointer) -> f64 {
        let dy = at.y - self.anchor_y_px;
        self.current_value = if dy == 0.0 {
            self.anchor_value
        } else {
            round_tenth(self.anchor_value + value_delta(dy, self.plot_height_px, self.value_range))
        };
        surface.preview_value(&self.device_id, self.anchor_timestamp_ms, self.current_value);
        self.current_value
    }

    /// Write the dragged value into the device series.
    ///
    /// `None` when the value did not change or the device has no sample
    /// near the anchor time; the session is dropped without touching anything.
    pub fn commit(
        self,
        series: &mut DeviceSeriesMap,
        store: &dyn SeriesStore,
        sink: &mut dyn UpdateSink,
        config: &EditConfig,
    ) -> Option<BatchOutcome> {
        if self.current_value == self.anchor_value {
            tracing::debug!(device = %self.device_id, "drag dropped: value unchanged");
            return None;
        }
        let Some(current) = series.get(&self.device_id) else {
            tracing::debug!(device = %self.device_id, "drag dropped: device not loaded");
            return None;
        };
        let Some(index) = find_anchor(
            current,
            self.anchor_timestamp_ms,
            config.anchor_exact_ms,
            config.anchor_fallback_ms,
        ) else {
            tracing::debug!(
                device = %self.device_id,
                ts = self.anchor_timestamp_ms,
                "drag dropped: no sample at anchor"
            );
            return None;
        };

        let mut updated = current.clone();
        updated[index].set_value(self.channel, self.current_value);
        sort_series(&mut updated);
        series.insert(self.device_id.clone(), updated.clone());

        Some(persist_batch(&[(self.device_id, updated, 1)], store, sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_inverted_and_scaled() {
        assert_eq!(value_delta(-50.0, 100.0, 20.0), 10.0);
        assert_eq!(value_delta(25.0, 100.0, 20.0), -5.0);
    }

    #[test]
    fn delta_floors_degenerate_inputs() {
        assert_eq!(value_delta(-10.0, 0.0, 0.0), 10.0);
        assert_eq!(value_delta(-10.0, f64::NAN, -3.0), 10.0);
    }
}
