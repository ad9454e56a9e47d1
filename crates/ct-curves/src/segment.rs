//! Trend segments and the placement policy for one channel.

use crate::error::{CurveError, CurveResult};
use crate::family::CurveFamily;
use crate::params::CurveParams;
use ct_core::SegmentId;
use serde::{Deserialize, Serialize};

/// Shortest segment the editor allows, in minutes.
pub const MIN_SEGMENT_MINUTES: f64 = 5.0;

/// A time-bounded piece of a composite trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default)]
    pub id: SegmentId,
    pub curve_family: CurveFamily,
    pub start_offset_minutes: f64,
    pub duration_minutes: f64,
    pub params: CurveParams,
}

impl Segment {
    pub fn new(
        curve_family: CurveFamily,
        start_offset_minutes: f64,
        duration_minutes: f64,
        params: CurveParams,
    ) -> Self {
        Self {
            id: SegmentId::new(),
            curve_family,
            start_offset_minutes,
            duration_minutes,
            params,
        }
    }

    pub fn end_minutes(&self) -> f64 {
        self.start_offset_minutes + self.duration_minutes
    }

    /// Duration with the minimum clamp applied (non-finite counts as zero).
    pub fn effective_duration(&self) -> f64 {
        clamp_duration(self.duration_minutes)
    }
}

fn clamp_duration(minutes: f64) -> f64 {
    if minutes.is_finite() {
        minutes.max(MIN_SEGMENT_MINUTES)
    } else {
        MIN_SEGMENT_MINUTES
    }
}

fn clamp_start(minutes: f64) -> f64 {
    if minutes.is_finite() { minutes.max(0.0) } else { 0.0 }
}

/// One channel's ordered, non-overlapping segment list.
///
/// Inserting or moving re-sorts by start offset and then pushes any segment
/// that starts before its predecessor ends forward to that end. Resizing
/// never moves other segments: the new duration is clamped to the minimum
/// and to the gap before the next segment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentTrack {
    segments: Vec<Segment>,
}

impl SegmentTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a track from arbitrary segments, applying the placement policy.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let mut track = Self { segments };
        for seg in &mut track.segments {
            seg.start_offset_minutes = clamp_start(seg.start_offset_minutes);
            seg.duration_minutes = clamp_duration(seg.duration_minutes);
        }
        track.normalize();
        track
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// End of the last segment in minutes, 0 for an empty track.
    pub fn end_minutes(&self) -> f64 {
        self.segments.last().map(Segment::end_minutes).unwrap_or(0.0)
    }

    /// Place a new segment. Returns its id.
    pub fn insert(&mut self, mut segment: Segment) -> SegmentId {
        segment.start_offset_minutes = clamp_start(segment.start_offset_minutes);
        segment.duration_minutes = clamp_duration(segment.duration_minutes);
        let id = segment.id;
        self.segments.push(segment);
        self.normalize();
        id
    }

    /// Append a segment starting where the track currently ends.
    pub fn append(
        &mut self,
        family: CurveFamily,
        duration_minutes: f64,
        params: CurveParams,
    ) -> SegmentId {
        let start = self.end_minutes();
        self.insert(Segment::new(family, start, duration_minutes, params))
    }

    /// Drag a segment to a new start offset. Returns false for an unknown id.
    pub fn move_to(&mut self, id: SegmentId, start_offset_minutes: f64) -> bool {
        let Some(seg) = self.segments.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        seg.start_offset_minutes = clamp_start(start_offset_minutes);
        self.normalize();
        true
    }

    /// Change a segment's duration. Returns the duration actually applied.
    pub fn resize(&mut self, id: SegmentId, duration_minutes: f64) -> Option<f64> {
        let index = self.segments.iter().position(|s| s.id == id)?;
        let mut duration = clamp_duration(duration_minutes);
        if let Some(next) = self.segments.get(index + 1) {
            let gap = next.start_offset_minutes - self.segments[index].start_offset_minutes;
            duration = duration.min(gap.max(MIN_SEGMENT_MINUTES));
        }
        self.segments[index].duration_minutes = duration;
        Some(duration)
    }

    /// Replace a segment's parameters in place.
    pub fn set_params(&mut self, id: SegmentId, params: CurveParams) -> bool {
        match self.segments.iter_mut().find(|s| s.id == id) {
            Some(seg) => {
                seg.params = params;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: SegmentId) -> Option<Segment> {
        let index = self.segments.iter().position(|s| s.id == id)?;
        Some(self.segments.remove(index))
    }

    /// Sort by start and push overlapping segments forward.
    fn normalize(&mut self) {
        self.segments
            .sort_by(|a, b| a.start_offset_minutes.total_cmp(&b.start_offset_minutes));
        for i in 1..self.segments.len() {
            let prev_end = self.segments[i - 1].end_minutes();
            if self.segments[i].start_offset_minutes < prev_end {
                self.segments[i].start_offset_minutes = prev_end;
            }
        }
    }

    /// Check ordering, minimum duration, and non-overlap.
    ///
    /// Tracks built through this API always pass; this is for lists that
    /// arrive from a file.
    pub fn validate(&self) -> CurveResult<()> {
        for seg in &self.segments {
            if !(seg.start_offset_minutes.is_finite() && seg.start_offset_minutes >= 0.0) {
                return Err(CurveError::InvalidSegment {
                    id: seg.id.to_string(),
                    what: "start offset must be a non-negative number".to_string(),
                });
            }
            if !(seg.duration_minutes.is_finite() && seg.duration_minutes >= MIN_SEGMENT_MINUTES)
            {
                return Err(CurveError::InvalidSegment {
                    id: seg.id.to_string(),
                    what: format!("duration must be at least {MIN_SEGMENT_MINUTES} minutes"),
                });
            }
        }
        for pair in self.segments.windows(2) {
            if pair[0].end_minutes() > pair[1].start_offset_minutes {
                return Err(CurveError::Overlap {
                    first: pair[0].id.to_string(),
                    second: pair[1].id.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, duration: f64) -> Segment {
        Segment::new(CurveFamily::Up, start, duration, CurveParams::new(0.0, 1.0))
    }

    fn starts(track: &SegmentTrack) -> Vec<f64> {
        track.iter().map(|s| s.start_offset_minutes).collect()
    }

    #[test]
    fn insert_into_occupied_slot_is_pushed_forward() {
        let mut track = SegmentTrack::new();
        track.insert(seg(0.0, 60.0));
        track.insert(seg(30.0, 20.0));
        assert_eq!(starts(&track), vec![0.0, 60.0]);
        assert!(track.validate().is_ok());
    }

    #[test]
    fn move_resorts_and_cascades() {
        let mut track = SegmentTrack::new();
        let a = track.insert(seg(0.0, 30.0));
        track.insert(seg(30.0, 30.0));
        track.insert(seg(60.0, 30.0));
        // drag the first segment onto the middle of the last one
        assert!(track.move_to(a, 70.0));
        assert_eq!(starts(&track), vec![30.0, 60.0, 90.0]);
        assert_eq!(track.segments()[2].id, a);
    }

    #[test]
    fn resize_clamps_to_minimum_and_gap() {
        let mut track = SegmentTrack::new();
        let a = track.insert(seg(0.0, 30.0));
        track.insert(seg(40.0, 30.0));
        assert_eq!(track.resize(a, 1.0), Some(MIN_SEGMENT_MINUTES));
        assert_eq!(track.resize(a, 100.0), Some(40.0));
        assert_eq!(starts(&track), vec![0.0, 40.0]);
        assert!(track.resize(SegmentId::new(), 10.0).is_none());
    }

    #[test]
    fn append_starts_at_track_end() {
        let mut track = SegmentTrack::new();
        track.append(CurveFamily::Up, 60.0, CurveParams::new(2.0, 4.0));
        track.append(CurveFamily::Down, 60.0, CurveParams::new(4.0, 2.0));
        assert_eq!(starts(&track), vec![0.0, 60.0]);
        assert_eq!(track.end_minutes(), 120.0);
    }

    #[test]
    fn from_segments_repairs_bad_input() {
        let track = SegmentTrack::from_segments(vec![seg(10.0, 0.0), seg(-5.0, 20.0)]);
        assert_eq!(starts(&track), vec![0.0, 20.0]);
        assert!(track.validate().is_ok());
    }

    #[test]
    fn validate_reports_overlap_in_raw_lists() {
        let raw = r#"[
            {"curveFamily": "up", "startOffsetMinutes": 0, "durationMinutes": 60,
             "params": {"startValue": 0, "endValue": 1}},
            {"curveFamily": "down", "startOffsetMinutes": 30, "durationMinutes": 60,
             "params": {"startValue": 1, "endValue": 0}}
        ]"#;
        let track: SegmentTrack = serde_json::from_str(raw).unwrap();
        assert!(matches!(track.validate(), Err(CurveError::Overlap { .. })));
    }
}
