use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One station reading for one locality on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub locality: String,
    pub province: String,
    pub max_temperature: f64,
    #[serde(with = "time_of_day")]
    pub max_temperature_time: NaiveTime,
    pub min_temperature: f64,
    #[serde(with = "time_of_day")]
    pub min_temperature_time: NaiveTime,
    pub precipitation: f64,
    pub day: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl Observation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        locality: String,
        province: String,
        max_temperature: f64,
        max_temperature_time: NaiveTime,
        min_temperature: f64,
        min_temperature_time: NaiveTime,
        precipitation: f64,
        day: NaiveDate,
    ) -> Self {
        Self {
            locality,
            province,
            max_temperature,
            max_temperature_time,
            min_temperature,
            min_temperature_time,
            precipitation,
            day,
            id: None,
        }
    }

    /// Copy of this observation carrying a persistence id.
    pub fn with_id(self, id: i64) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    /// Midpoint of the day's temperature range
    pub fn mid_temperature(&self) -> f64 {
        (self.max_temperature + self.min_temperature) / 2.0
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}): max {:.1}°C at {}, min {:.1}°C at {}, precipitation {:.1} mm",
            self.day,
            self.locality,
            self.province,
            self.max_temperature,
            self.max_temperature_time.format("%H:%M"),
            self.min_temperature,
            self.min_temperature_time.format("%H:%M"),
            self.precipitation
        )?;

        if let Some(id) = self.id {
            write!(f, " [#{}]", id)?;
        }

        Ok(())
    }
}

/// ISO-8601 wall-clock times: written as `HH:MM:SS`, read as `HH:MM:SS` or `HH:MM`.
pub mod time_of_day {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const WRITE_FORMAT: &str = "%H:%M:%S";
    const READ_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(WRITE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        READ_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(&raw, format).ok())
            .ok_or_else(|| de::Error::custom(format!("invalid time of day '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Observation {
        Observation::new(
            "Navacerrada".to_string(),
            "Madrid".to_string(),
            12.4,
            NaiveTime::from_hms_opt(15, 20, 0).unwrap(),
            -1.5,
            NaiveTime::from_hms_opt(6, 40, 0).unwrap(),
            3.2,
            NaiveDate::from_ymd_opt(2017, 10, 29).unwrap(),
        )
    }

    #[test]
    fn test_with_id_keeps_fields() {
        let observation = sample();
        assert!(!observation.is_persisted());

        let persisted = observation.clone().with_id(7);
        assert_eq!(persisted.id, Some(7));
        assert_eq!(persisted.locality, observation.locality);
        assert_eq!(persisted.day, observation.day);
    }

    #[test]
    fn test_mid_temperature() {
        assert!((sample().mid_temperature() - 5.45).abs() < 1e-9);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["day"], "2017-10-29");
        assert_eq!(json["maxTemperatureTime"], "15:20:00");
        assert_eq!(json["minTemperatureTime"], "06:40:00");
        assert_eq!(json["locality"], "Navacerrada");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_reads_short_time_format() {
        let json = r#"{
            "locality": "Getafe",
            "province": "Madrid",
            "maxTemperature": 21.0,
            "maxTemperatureTime": "14:10",
            "minTemperature": 9.0,
            "minTemperatureTime": "07:05:00",
            "precipitation": 0.0,
            "day": "2017-10-30",
            "id": 3
        }"#;

        let observation: Observation = serde_json::from_str(json).unwrap();
        assert_eq!(
            observation.max_temperature_time,
            NaiveTime::from_hms_opt(14, 10, 0).unwrap()
        );
        assert_eq!(observation.id, Some(3));
    }

    #[test]
    fn test_rejects_bad_time() {
        let json = r#"{
            "locality": "Getafe",
            "province": "Madrid",
            "maxTemperature": 21.0,
            "maxTemperatureTime": "noon",
            "minTemperature": 9.0,
            "minTemperatureTime": "07:05",
            "precipitation": 0.0,
            "day": "2017-10-30"
        }"#;

        assert!(serde_json::from_str::<Observation>(json).is_err());
    }
}
