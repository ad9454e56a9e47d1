//! Trend profiles: a named pair of segment tracks, stored as YAML.

use std::path::Path;

use ct_core::Channel;
use ct_curves::SegmentTrack;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Temperature and humidity segment tracks for one synthetic device.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub temperature: SegmentTrack,
    #[serde(default)]
    pub humidity: SegmentTrack,
}

impl TrendProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn track(&self, channel: Channel) -> &SegmentTrack {
        match channel {
            Channel::Temperature => &self.temperature,
            Channel::Humidity => &self.humidity,
        }
    }

    pub fn track_mut(&mut self, channel: Channel) -> &mut SegmentTrack {
        match channel {
            Channel::Temperature => &mut self.temperature,
            Channel::Humidity => &mut self.humidity,
        }
    }

    /// Length of the longer track in minutes.
    pub fn duration_minutes(&self) -> f64 {
        self.temperature
            .end_minutes()
            .max(self.humidity.end_minutes())
    }
}

/// Load a profile from a YAML file.
pub fn load_profile(path: &Path) -> AppResult<TrendProfile> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let profile: TrendProfile = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Profile(format!("Failed to parse profile YAML: {}", e)))?;

    Ok(profile)
}

/// Save a profile to a YAML file.
pub fn save_profile(path: &Path, profile: &TrendProfile) -> AppResult<()> {
    let content = serde_yaml::to_string(profile)
        .map_err(|e| AppError::Profile(format!("Failed to serialize profile: {}", e)))?;

    std::fs::write(path, content).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Check a profile before it is synthesized.
pub fn validate_profile(profile: &TrendProfile) -> AppResult<()> {
    if profile.name.trim().is_empty() {
        return Err(AppError::Validation("Profile must have a name".to_string()));
    }
    if profile.temperature.is_empty() && profile.humidity.is_empty() {
        return Err(AppError::Validation(format!(
            "Profile '{}' must have at least one segment",
            profile.name
        )));
    }

    for channel in Channel::ALL {
        let track = profile.track(channel);
        track
            .validate()
            .map_err(|e| AppError::Validation(format!("{} track: {}", channel, e)))?;

        for seg in track.iter() {
            if !(seg.params.start_value.is_finite() && seg.params.end_value.is_finite()) {
                return Err(AppError::Validation(format!(
                    "{} track: segment {} has non-finite endpoint values",
                    channel, seg.id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_curves::{CurveFamily, CurveParams, Segment};

    #[test]
    fn yaml_uses_family_tags() {
        let yaml = r#"
name: pulldown
temperature:
  - curveFamily: exponentialDecay
    startOffsetMinutes: 0
    durationMinutes: 60
    params: { startValue: 20, endValue: 4, rate: 0.05 }
"#;
        let p: TrendProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(p.temperature.len(), 1);
        let seg = &p.temperature.segments()[0];
        assert_eq!(seg.curve_family, CurveFamily::ExponentialDecay);
        assert_eq!(seg.params.rate, Some(0.05));
        assert!(p.humidity.is_empty());
        validate_profile(&p).unwrap();
    }

    #[test]
    fn empty_or_overlapping_profiles_fail() {
        let p = TrendProfile::new("empty");
        assert!(matches!(validate_profile(&p), Err(AppError::Validation(_))));

        let mut p = TrendProfile::new("");
        p.temperature.append(CurveFamily::Up, 30.0, CurveParams::new(0.0, 1.0));
        assert!(validate_profile(&p).is_err());

        let mut p = TrendProfile::new("overlap");
        p.temperature = serde_yaml::from_str::<TrendProfile>(
            r#"
name: x
temperature:
  - { curveFamily: up, startOffsetMinutes: 0, durationMinutes: 30, params: { startValue: 0, endValue: 1 } }
  - { curveFamily: down, startOffsetMinutes: 20, durationMinutes: 30, params: { startValue: 1, endValue: 0 } }
"#,
        )
        .unwrap()
        .temperature;
        assert!(validate_profile(&p).is_err());

        let mut p = TrendProfile::new("nan");
        p.humidity.insert(Segment::new(
            CurveFamily::Constant,
            0.0,
            10.0,
            CurveParams::new(f64::NAN, 1.0),
        ));
        assert!(validate_profile(&p).is_err());
    }
}
