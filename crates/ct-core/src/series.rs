//! Sample and series types shared across the engine.

use crate::ids::DeviceId;
use crate::time::TimestampMs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Measured quantity carried by a device series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Temperature,
    Humidity,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Temperature, Channel::Humidity];

    /// The channel that is not `self`.
    pub fn other(self) -> Channel {
        match self {
            Channel::Temperature => Channel::Humidity,
            Channel::Humidity => Channel::Temperature,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Temperature => "temperature",
            Channel::Humidity => "humidity",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "temperature" | "temp" | "t" => Ok(Channel::Temperature),
            "humidity" | "hum" | "rh" | "h" => Ok(Channel::Humidity),
            other => Err(format!("unknown channel: {other}")),
        }
    }
}

/// One value of one channel at one instant (synthesizer output).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp_ms: TimestampMs,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(timestamp_ms: TimestampMs, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }
}

/// One row of a device series: both channels at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSample {
    pub timestamp_ms: TimestampMs,
    pub temperature: f64,
    pub humidity: f64,
}

impl SeriesSample {
    pub fn new(timestamp_ms: TimestampMs, temperature: f64, humidity: f64) -> Self {
        Self {
            timestamp_ms,
            temperature,
            humidity,
        }
    }

    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
        }
    }

    pub fn set_value(&mut self, channel: Channel, value: f64) {
        match channel {
            Channel::Temperature => self.temperature = value,
            Channel::Humidity => self.humidity = value,
        }
    }

    /// Project one channel out as a plain point.
    pub fn point(&self, channel: Channel) -> TimeSeriesPoint {
        TimeSeriesPoint::new(self.timestamp_ms, self.value(channel))
    }
}

/// All cached device series, keyed by device. Ordered so snapshots and
/// batch reports iterate deterministically.
pub type DeviceSeriesMap = BTreeMap<DeviceId, Vec<SeriesSample>>;

/// Stable ascending sort by timestamp.
pub fn sort_series(series: &mut [SeriesSample]) {
    series.sort_by_key(|s| s.timestamp_ms);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_parsing() {
        assert_eq!("Temperature".parse::<Channel>(), Ok(Channel::Temperature));
        assert_eq!("rh".parse::<Channel>(), Ok(Channel::Humidity));
        assert!("pressure".parse::<Channel>().is_err());
        assert_eq!(Channel::Humidity.other(), Channel::Temperature);
    }

    #[test]
    fn sample_channel_access() {
        let mut s = SeriesSample::new(0, 4.0, 55.0);
        s.set_value(Channel::Humidity, 60.0);
        assert_eq!(s.value(Channel::Humidity), 60.0);
        assert_eq!(s.point(Channel::Temperature), TimeSeriesPoint::new(0, 4.0));
    }

    #[test]
    fn sort_is_stable() {
        let mut series = vec![
            SeriesSample::new(20, 1.0, 0.0),
            SeriesSample::new(10, 2.0, 0.0),
            SeriesSample::new(20, 3.0, 0.0),
        ];
        sort_series(&mut series);
        let temps: Vec<f64> = series.iter().map(|s| s.temperature).collect();
        assert_eq!(temps, vec![2.0, 1.0, 3.0]);
    }
}
