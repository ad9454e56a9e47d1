//! Curve parameters.
//!
//! `CurveParams` is what a segment stores: endpoints plus optional
//! family-specific fields. Missing fields are filled from the family's
//! [`ParamDefaults`] to produce [`ResolvedParams`], which is what the shape
//! functions consume. Time constants are in minutes, positions and
//! fractions are in progress units `[0, 1]`.

use serde::{Deserialize, Serialize};

/// Parameters attached to a segment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveParams {
    pub start_value: f64,
    pub end_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<f64>,
    /// Growth/decay rate per minute, or logistic steepness for `sigmoid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_interval: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_tau: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_tau: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duty_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupling: Option<f64>,
}

impl CurveParams {
    /// Parameters with only the endpoints set.
    pub fn new(start_value: f64, end_value: f64) -> Self {
        Self {
            start_value,
            end_value,
            ..Default::default()
        }
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = Some(amplitude);
        self
    }

    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn with_env_temp(mut self, env_temp: f64) -> Self {
        self.env_temp = Some(env_temp);
        self
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = Some(noise);
        self
    }

    /// Fill every missing field from `defaults`.
    pub fn resolve(&self, defaults: &ParamDefaults) -> ResolvedParams {
        ResolvedParams {
            start_value: self.start_value,
            end_value: self.end_value,
            amplitude: self.amplitude.unwrap_or(defaults.amplitude),
            frequency: self.frequency.unwrap_or(defaults.frequency),
            phase: self.phase.unwrap_or(defaults.phase),
            rate: self.rate.unwrap_or(defaults.rate),
            peak_position: self.peak_position.unwrap_or(defaults.peak_position),
            width: self.width.unwrap_or(defaults.width),
            step_count: self.step_count.unwrap_or(defaults.step_count),
            env_temp: self.env_temp.unwrap_or(defaults.env_temp),
            target_temp: self
                .target_temp
                .or(defaults.target_temp)
                .unwrap_or(self.end_value),
            open_count: self.open_count.unwrap_or(defaults.open_count),
            open_start: self.open_start.unwrap_or(defaults.open_start),
            open_interval: self.open_interval.unwrap_or(defaults.open_interval),
            open_duration: self.open_duration.unwrap_or(defaults.open_duration),
            response_tau: self.response_tau.unwrap_or(defaults.response_tau),
            recovery_tau: self.recovery_tau.unwrap_or(defaults.recovery_tau),
            noise: self.noise.unwrap_or(defaults.noise),
            duty_ratio: self.duty_ratio.unwrap_or(defaults.duty_ratio),
            zone_count: self.zone_count.unwrap_or(defaults.zone_count),
            coupling: self.coupling.unwrap_or(defaults.coupling),
        }
    }
}

/// Default values for the optional fields of one curve family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDefaults {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
    pub rate: f64,
    pub peak_position: f64,
    pub width: f64,
    pub step_count: u32,
    pub env_temp: f64,
    /// `None` means "use the segment's end value".
    pub target_temp: Option<f64>,
    pub open_count: u32,
    pub open_start: f64,
    pub open_interval: f64,
    pub open_duration: f64,
    pub response_tau: f64,
    pub recovery_tau: f64,
    pub noise: f64,
    pub duty_ratio: f64,
    pub zone_count: u32,
    pub coupling: f64,
}

impl ParamDefaults {
    /// Shared baseline; each family overrides the fields it uses.
    pub const BASE: ParamDefaults = ParamDefaults {
        amplitude: 1.0,
        frequency: 1.0,
        phase: 0.0,
        rate: 0.05,
        peak_position: 0.5,
        width: 0.15,
        step_count: 4,
        env_temp: 25.0,
        target_temp: None,
        open_count: 3,
        open_start: 0.2,
        open_interval: 0.25,
        open_duration: 0.05,
        response_tau: 3.0,
        recovery_tau: 15.0,
        noise: 0.2,
        duty_ratio: 0.5,
        zone_count: 3,
        coupling: 0.3,
    };
}

/// Fully populated parameters handed to shape functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedParams {
    pub start_value: f64,
    pub end_value: f64,
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
    pub rate: f64,
    pub peak_position: f64,
    pub width: f64,
    pub step_count: u32,
    pub env_temp: f64,
    pub target_temp: f64,
    pub open_count: u32,
    pub open_start: f64,
    pub open_interval: f64,
    pub open_duration: f64,
    pub response_tau: f64,
    pub recovery_tau: f64,
    pub noise: f64,
    pub duty_ratio: f64,
    pub zone_count: u32,
    pub coupling: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_win_over_defaults() {
        let params = CurveParams::new(2.0, 8.0).with_amplitude(5.0);
        let resolved = params.resolve(&ParamDefaults::BASE);
        assert_eq!(resolved.amplitude, 5.0);
        assert_eq!(resolved.frequency, ParamDefaults::BASE.frequency);
    }

    #[test]
    fn target_defaults_to_end_value() {
        let resolved = CurveParams::new(2.0, 8.0).resolve(&ParamDefaults::BASE);
        assert_eq!(resolved.target_temp, 8.0);

        let defaults = ParamDefaults {
            target_temp: Some(-3.0),
            ..ParamDefaults::BASE
        };
        assert_eq!(CurveParams::new(2.0, 8.0).resolve(&defaults).target_temp, -3.0);
    }

    #[test]
    fn camel_case_json_with_omitted_fields() {
        let params: CurveParams =
            serde_json::from_str(r#"{"startValue": 4.0, "endValue": -18.0, "envTemp": 30.0}"#)
                .unwrap();
        assert_eq!(params.start_value, 4.0);
        assert_eq!(params.env_temp, Some(30.0));
        assert!(params.rate.is_none());

        let text = serde_json::to_string(&CurveParams::new(1.0, 2.0)).unwrap();
        assert_eq!(text, r#"{"startValue":1.0,"endValue":2.0}"#);
    }
}
