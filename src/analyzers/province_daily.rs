use crate::analyzers::{halfway, AggregationMode, RunningMean};
use crate::models::Observation;
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvinceMetric {
    MaxTemperature,
    MinTemperature,
    MeanTemperature,
    MeanPrecipitation,
}

impl ProvinceMetric {
    pub fn label(&self) -> &'static str {
        match self {
            ProvinceMetric::MaxTemperature => "Maximum temperature",
            ProvinceMetric::MinTemperature => "Minimum temperature",
            ProvinceMetric::MeanTemperature => "Mean temperature",
            ProvinceMetric::MeanPrecipitation => "Mean precipitation",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ProvinceMetric::MeanPrecipitation => "mm",
            _ => "°C",
        }
    }
}

/// One value per province and day
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceDayTable {
    pub metric: ProvinceMetric,
    pub values: BTreeMap<String, BTreeMap<NaiveDate, f64>>,
}

impl ProvinceDayTable {
    pub fn get(&self, province: &str, day: NaiveDate) -> Option<f64> {
        self.values.get(province)?.get(&day).copied()
    }
}

/// Localities reporting precipitation, per province and day, in reading order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RainyLocalities {
    pub provinces: BTreeMap<String, BTreeMap<NaiveDate, Vec<String>>>,
}

impl RainyLocalities {
    pub fn get(&self, province: &str, day: NaiveDate) -> Option<&[String]> {
        self.provinces
            .get(province)?
            .get(&day)
            .map(|localities| localities.as_slice())
    }
}

/// Fold admitted observations into `province -> day`, seeding each bucket
/// with its first value and merging later ones with `combine(stored, new)`.
fn fold_by_province_day<A, V, C>(
    observations: &[Observation],
    metric: ProvinceMetric,
    admit: A,
    value: V,
    combine: C,
) -> ProvinceDayTable
where
    A: Fn(&Observation) -> bool,
    V: Fn(&Observation) -> f64,
    C: Fn(f64, f64) -> f64,
{
    let mut values: BTreeMap<String, BTreeMap<NaiveDate, f64>> = BTreeMap::new();

    for observation in observations.iter().filter(|&o| admit(o)) {
        let sample = value(observation);
        let days = values.entry(observation.province.clone()).or_default();

        days.entry(observation.day)
            .and_modify(|stored| *stored = combine(*stored, sample))
            .or_insert(sample);
    }

    ProvinceDayTable { metric, values }
}

/// Highest non-negative maximum per province and day.
pub(crate) fn max_temperature(observations: &[Observation]) -> ProvinceDayTable {
    fold_by_province_day(
        observations,
        ProvinceMetric::MaxTemperature,
        |o| o.max_temperature >= 0.0,
        |o| o.max_temperature,
        |stored, sample| if sample > stored { sample } else { stored },
    )
}

/// Non-negative minima per province and day.
///
/// In reference mode a bucket is replaced when the new value is *larger*,
/// reproducing the historical report.
pub(crate) fn min_temperature(observations: &[Observation], mode: AggregationMode) -> ProvinceDayTable {
    let replaces: fn(f64, f64) -> bool = match mode {
        AggregationMode::Reference => |stored: f64, sample: f64| sample > stored,
        AggregationMode::Corrected => |stored: f64, sample: f64| sample < stored,
    };

    fold_by_province_day(
        observations,
        ProvinceMetric::MinTemperature,
        |o| o.min_temperature >= 0.0,
        |o| o.min_temperature,
        |stored, sample| if replaces(stored, sample) { sample } else { stored },
    )
}

/// Exponentially weighted mean of `(max + min) / 2`; each new sample is
/// averaged with the stored mean, so later readings weigh more.
pub(crate) fn mean_temperature(observations: &[Observation]) -> ProvinceDayTable {
    fold_by_province_day(
        observations,
        ProvinceMetric::MeanTemperature,
        |o| o.max_temperature >= 0.0 && o.min_temperature >= 0.0,
        Observation::mid_temperature,
        halfway,
    )
}

/// Mean non-negative precipitation per province and day.
pub(crate) fn mean_precipitation(
    observations: &[Observation],
    mode: AggregationMode,
) -> ProvinceDayTable {
    let mut buckets: BTreeMap<String, BTreeMap<NaiveDate, RunningMean>> = BTreeMap::new();

    for observation in observations.iter().filter(|o| o.precipitation >= 0.0) {
        let days = buckets.entry(observation.province.clone()).or_default();
        let days_len = days.len();

        match days.get_mut(&observation.day) {
            None => {
                days.insert(observation.day, RunningMean::seed(observation.precipitation));
            }
            Some(mean) => match mode {
                AggregationMode::Reference => mean.push_map_sized(observation.precipitation, days_len),
                AggregationMode::Corrected => mean.push(observation.precipitation),
            },
        }
    }

    let values = buckets
        .into_iter()
        .map(|(province, days)| {
            let days = days.into_iter().map(|(day, mean)| (day, mean.value)).collect();
            (province, days)
        })
        .collect();

    ProvinceDayTable {
        metric: ProvinceMetric::MeanPrecipitation,
        values,
    }
}

/// Reference mode lists every locality with a non-negative reading, dry ones
/// included; corrected mode keeps only positive precipitation.
pub(crate) fn rainy_localities(observations: &[Observation], mode: AggregationMode) -> RainyLocalities {
    let admit: fn(&Observation) -> bool = match mode {
        AggregationMode::Reference => |o: &Observation| o.precipitation >= 0.0,
        AggregationMode::Corrected => |o: &Observation| o.precipitation > 0.0,
    };

    let mut provinces: BTreeMap<String, BTreeMap<NaiveDate, Vec<String>>> = BTreeMap::new();

    for observation in observations.iter().filter(|&o| admit(o)) {
        provinces
            .entry(observation.province.clone())
            .or_default()
            .entry(observation.day)
            .or_default()
            .push(observation.locality.clone());
    }

    RainyLocalities { provinces }
}
