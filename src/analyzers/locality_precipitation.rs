use crate::analyzers::{AggregationMode, RunningMean};
use crate::models::Observation;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Highest precipitation per day and locality
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyMaxPrecipitation {
    pub days: BTreeMap<NaiveDate, BTreeMap<String, f64>>,
}

impl DailyMaxPrecipitation {
    pub fn get(&self, day: NaiveDate, locality: &str) -> Option<f64> {
        self.days.get(&day)?.get(locality).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WettestLocality {
    pub locality: String,
    pub average: f64,
}

/// Average precipitation per locality and the locality with the highest one
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalityPrecipitation {
    pub averages: BTreeMap<String, f64>,
    pub wettest: Option<WettestLocality>,
}

pub(crate) fn daily_max(observations: &[Observation]) -> DailyMaxPrecipitation {
    let mut days: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();

    for observation in observations.iter().filter(|o| o.precipitation >= 0.0) {
        days.entry(observation.day)
            .or_default()
            .entry(observation.locality.clone())
            .and_modify(|stored| {
                if observation.precipitation > *stored {
                    *stored = observation.precipitation;
                }
            })
            .or_insert(observation.precipitation);
    }

    DailyMaxPrecipitation { days }
}

/// Per-locality average over non-negative readings.
///
/// Reference mode divides `stored + sample` by the number of localities seen
/// so far plus one, not by the locality's own sample count; corrected mode
/// keeps an arithmetic mean.
pub(crate) fn averages(observations: &[Observation], mode: AggregationMode) -> LocalityPrecipitation {
    let mut buckets: BTreeMap<String, RunningMean> = BTreeMap::new();

    for observation in observations.iter().filter(|o| o.precipitation >= 0.0) {
        let map_len = buckets.len();

        match buckets.get_mut(&observation.locality) {
            None => {
                buckets.insert(
                    observation.locality.clone(),
                    RunningMean::seed(observation.precipitation),
                );
            }
            Some(mean) => match mode {
                AggregationMode::Reference => mean.push_map_sized(observation.precipitation, map_len),
                AggregationMode::Corrected => mean.push(observation.precipitation),
            },
        }
    }

    let averages: BTreeMap<String, f64> = buckets
        .into_iter()
        .map(|(locality, mean)| (locality, mean.value))
        .collect();

    let wettest = find_wettest(&averages);

    LocalityPrecipitation { averages, wettest }
}

/// First locality in iteration order holding the highest average.
fn find_wettest(averages: &BTreeMap<String, f64>) -> Option<WettestLocality> {
    let mut best: Option<WettestLocality> = None;

    for (locality, &average) in averages {
        let replace = match &best {
            None => true,
            Some(current) => average > current.average,
        };

        if replace {
            best = Some(WettestLocality {
                locality: locality.clone(),
                average,
            });
        }
    }

    best
}
