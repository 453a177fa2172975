use crate::models::Observation;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Hottest and coldest readings of one day and where they were taken
#[derive(Debug, Clone, PartialEq)]
pub struct DayExtremes {
    pub max_temperature: f64,
    pub max_locality: String,
    pub min_temperature: f64,
    pub min_locality: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyExtremes {
    pub days: BTreeMap<NaiveDate, DayExtremes>,
}

impl DailyExtremes {
    pub fn get(&self, day: NaiveDate) -> Option<&DayExtremes> {
        self.days.get(&day)
    }
}

/// Only strictly better readings replace an extremum, so on exact ties the
/// locality seen first keeps it.
pub(crate) fn compute(observations: &[Observation]) -> DailyExtremes {
    let mut days: BTreeMap<NaiveDate, DayExtremes> = BTreeMap::new();

    for observation in observations {
        match days.get_mut(&observation.day) {
            None => {
                days.insert(
                    observation.day,
                    DayExtremes {
                        max_temperature: observation.max_temperature,
                        max_locality: observation.locality.clone(),
                        min_temperature: observation.min_temperature,
                        min_locality: observation.locality.clone(),
                    },
                );
            }
            Some(extremes) => {
                if observation.max_temperature > extremes.max_temperature {
                    extremes.max_temperature = observation.max_temperature;
                    extremes.max_locality = observation.locality.clone();
                }
                if observation.min_temperature < extremes.min_temperature {
                    extremes.min_temperature = observation.min_temperature;
                    extremes.min_locality = observation.locality.clone();
                }
            }
        }
    }

    DailyExtremes { days }
}
