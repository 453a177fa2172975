use crate::models::Observation;

/// Append-only, ordered observations of one ingestion run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationStore {
    observations: Vec<Observation>,
}

impl ObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a whole file's records, keeping their order
    pub fn extend(&mut self, observations: Vec<Observation>) {
        self.observations.extend(observations);
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn into_inner(self) -> Vec<Observation> {
        self.observations
    }
}

impl<'a> IntoIterator for &'a ObservationStore {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn observation(day: u32, province: &str) -> Observation {
        Observation::new(
            "Getafe".to_string(),
            province.to_string(),
            20.0,
            NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            5.0,
            NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            0.0,
            NaiveDate::from_ymd_opt(2017, 10, day).unwrap(),
        )
    }

    #[test]
    fn test_append_keeps_order() {
        let mut store = ObservationStore::new();
        assert!(store.is_empty());

        store.extend(vec![observation(30, "Madrid")]);
        store.extend(vec![observation(29, "Soria"), observation(31, "Madrid")]);

        let days: Vec<u32> = store.iter().map(|o| chrono::Datelike::day(&o.day)).collect();
        assert_eq!(days, vec![30, 29, 31]);
        assert_eq!(store.len(), 3);
    }
}
