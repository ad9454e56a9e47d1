//! On-disk record format.

use ct_core::{DeviceId, SeriesSample, StoreError, StoreResult, format_iso8601, parse_iso8601};
use serde::{Deserialize, Serialize};

/// One persisted sample: `{ deviceId, timestamp, temperature, humidity }`
/// with an ISO 8601 UTC timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRecord {
    pub device_id: String,
    pub timestamp: String,
    pub temperature: f64,
    pub humidity: f64,
}

impl SeriesRecord {
    pub fn from_sample(device_id: &DeviceId, sample: &SeriesSample) -> StoreResult<Self> {
        let timestamp =
            format_iso8601(sample.timestamp_ms).ok_or_else(|| StoreError::InvalidTimestamp {
                device_id: device_id.to_string(),
                value: sample.timestamp_ms.to_string(),
            })?;
        Ok(Self {
            device_id: device_id.to_string(),
            timestamp,
            temperature: sample.temperature,
            humidity: sample.humidity,
        })
    }

    pub fn to_sample(&self) -> StoreResult<SeriesSample> {
        let ts = parse_iso8601(&self.timestamp).ok_or_else(|| StoreError::InvalidTimestamp {
            device_id: self.device_id.clone(),
            value: self.timestamp.clone(),
        })?;
        Ok(SeriesSample::new(ts, self.temperature, self.humidity))
    }
}

pub fn series_to_records(
    device_id: &DeviceId,
    series: &[SeriesSample],
) -> StoreResult<Vec<SeriesRecord>> {
    series
        .iter()
        .map(|s| SeriesRecord::from_sample(device_id, s))
        .collect()
}

/// Convert records back to a series sorted by time.
pub fn records_to_series(records: &[SeriesRecord]) -> StoreResult<Vec<SeriesSample>> {
    let mut series = records
        .iter()
        .map(SeriesRecord::to_sample)
        .collect::<StoreResult<Vec<_>>>()?;
    ct_core::sort_series(&mut series);
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uses_camel_case_and_iso_time() {
        let id = DeviceId::new("fridge-1");
        let rec = SeriesRecord::from_sample(&id, &SeriesSample::new(1_700_000_000_123, 4.5, 61.0))
            .unwrap();
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["deviceId"], "fridge-1");
        assert_eq!(json["timestamp"], "2023-11-14T22:13:20.123Z");
        assert_eq!(json["temperature"], 4.5);
    }

    #[test]
    fn offsets_are_normalised_to_epoch() {
        let rec = SeriesRecord {
            device_id: "d".into(),
            timestamp: "2024-01-01T02:00:00+02:00".into(),
            temperature: 0.0,
            humidity: 0.0,
        };
        assert_eq!(rec.to_sample().unwrap().timestamp_ms, 1_704_067_200_000);
    }

    #[test]
    fn bad_timestamp_is_reported() {
        let rec = SeriesRecord {
            device_id: "d".into(),
            timestamp: "yesterday".into(),
            temperature: 0.0,
            humidity: 0.0,
        };
        assert!(matches!(
            rec.to_sample(),
            Err(StoreError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn records_come_back_sorted() {
        let id = DeviceId::new("d");
        let series = vec![
            SeriesSample::new(120_000, 2.0, 0.0),
            SeriesSample::new(0, 1.0, 0.0),
        ];
        let recs = series_to_records(&id, &series).unwrap();
        let back = records_to_series(&recs).unwrap();
        assert_eq!(back[0].timestamp_ms, 0);
        assert_eq!(back[1].timestamp_ms, 120_000);
    }
}
