use crate::analyzers::{halfway, AggregationMode};
use crate::models::Observation;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A value and the locality that reported it
#[derive(Debug, Clone, PartialEq)]
pub struct Extremum {
    pub value: f64,
    pub locality: String,
}

impl Extremum {
    fn of(value: f64, observation: &Observation) -> Self {
        Self {
            value,
            locality: observation.locality.clone(),
        }
    }
}

/// Daily figures for a single province.
///
/// The maxima are `None` when no reading qualified, which only happens in
/// reference mode.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub max_temperature: Option<Extremum>,
    pub min_temperature: Extremum,
    pub mean_max_temperature: f64,
    pub mean_min_temperature: f64,
    pub max_precipitation: Option<Extremum>,
    pub mean_precipitation: f64,
}

impl DaySummary {
    /// Reference mode starts the means at zero, so the first reading is
    /// already halved, and only positive readings can become a maximum.
    /// Corrected mode starts everything from the first reading.
    fn seed(observation: &Observation, mode: AggregationMode) -> Self {
        match mode {
            AggregationMode::Reference => {
                let mut summary = Self {
                    max_temperature: None,
                    min_temperature: Extremum::of(observation.min_temperature, observation),
                    mean_max_temperature: 0.0,
                    mean_min_temperature: 0.0,
                    max_precipitation: None,
                    mean_precipitation: 0.0,
                };
                summary.absorb(observation);
                summary
            }
            AggregationMode::Corrected => Self {
                max_temperature: Some(Extremum::of(observation.max_temperature, observation)),
                min_temperature: Extremum::of(observation.min_temperature, observation),
                mean_max_temperature: observation.max_temperature,
                mean_min_temperature: observation.min_temperature,
                max_precipitation: Some(Extremum::of(observation.precipitation, observation)),
                mean_precipitation: observation.precipitation,
            },
        }
    }

    /// Extrema accept ties, so the latest locality wins them. Means are
    /// exponentially weighted like the province temperature mean.
    fn absorb(&mut self, observation: &Observation) {
        replace_max(&mut self.max_temperature, observation.max_temperature, observation);
        if observation.min_temperature <= self.min_temperature.value {
            self.min_temperature = Extremum::of(observation.min_temperature, observation);
        }
        replace_max(&mut self.max_precipitation, observation.precipitation, observation);

        self.mean_max_temperature = halfway(self.mean_max_temperature, observation.max_temperature);
        self.mean_min_temperature = halfway(self.mean_min_temperature, observation.min_temperature);
        self.mean_precipitation = halfway(self.mean_precipitation, observation.precipitation);
    }
}

/// An empty slot only takes a positive reading.
fn replace_max(slot: &mut Option<Extremum>, value: f64, observation: &Observation) {
    let accepts = match slot {
        None => value > 0.0,
        Some(current) => value >= current.value,
    };
    if accepts {
        *slot = Some(Extremum::of(value, observation));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceSummary {
    pub province: String,
    pub days: BTreeMap<NaiveDate, DaySummary>,
}

pub(crate) fn compute(
    observations: &[Observation],
    province: &str,
    mode: AggregationMode,
) -> ProvinceSummary {
    let mut days: BTreeMap<NaiveDate, DaySummary> = BTreeMap::new();

    for observation in observations.iter().filter(|o| o.province == province) {
        days.entry(observation.day)
            .and_modify(|summary| summary.absorb(observation))
            .or_insert_with(|| DaySummary::seed(observation, mode));
    }

    ProvinceSummary {
        province: province.to_string(),
        days,
    }
}
