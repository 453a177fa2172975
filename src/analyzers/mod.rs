//! Grouped statistics over a completed observation sequence.
//!
//! Every reducer is a single read-only pass with its own result map; no
//! state is shared between passes. Result maps are ordered so rendering is
//! deterministic.

pub mod daily_extremes;
pub mod locality_precipitation;
pub mod province_daily;
pub mod province_summary;

pub use daily_extremes::{DailyExtremes, DayExtremes};
pub use locality_precipitation::{DailyMaxPrecipitation, LocalityPrecipitation, WettestLocality};
pub use province_daily::{ProvinceDayTable, ProvinceMetric, RainyLocalities};
pub use province_summary::{DaySummary, Extremum, ProvinceSummary};

use crate::models::Observation;
use serde::{Deserialize, Serialize};

/// How the reducers with inherited defects behave.
///
/// `Reference` reproduces the historical output: the province minimum
/// keeps the larger value, the locality and province precipitation means
/// divide by the size of the enclosing map, and every non-negative
/// precipitation counts as rain. `Corrected` keeps true minima, arithmetic
/// means and strictly positive rainfall. The province summary follows the
/// same split: reference starts its means at zero and only lets positive
/// readings become a maximum.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    #[default]
    Reference,
    Corrected,
}

/// Selectable report passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportKind {
    DailyExtremes,
    ProvinceMaxTemperature,
    ProvinceMinTemperature,
    ProvinceMeanTemperature,
    DailyMaxPrecipitation,
    LocalityPrecipitation,
    ProvinceMeanPrecipitation,
    RainyLocalities,
    ProvinceSummary,
}

impl ReportKind {
    pub const ALL: [ReportKind; 9] = [
        ReportKind::DailyExtremes,
        ReportKind::ProvinceMaxTemperature,
        ReportKind::ProvinceMinTemperature,
        ReportKind::ProvinceMeanTemperature,
        ReportKind::DailyMaxPrecipitation,
        ReportKind::LocalityPrecipitation,
        ReportKind::ProvinceMeanPrecipitation,
        ReportKind::RainyLocalities,
        ReportKind::ProvinceSummary,
    ];
}

/// Output of one reducer pass
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateReport {
    DailyExtremes(DailyExtremes),
    ProvinceDaily(ProvinceDayTable),
    DailyMaxPrecipitation(DailyMaxPrecipitation),
    LocalityPrecipitation(LocalityPrecipitation),
    RainyLocalities(RainyLocalities),
    ProvinceSummary(ProvinceSummary),
}

/// Entry point for all reducers
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregationEngine {
    mode: AggregationMode,
}

impl AggregationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: AggregationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    pub fn daily_extremes(&self, observations: &[Observation]) -> DailyExtremes {
        daily_extremes::compute(observations)
    }

    pub fn province_max_temperature(&self, observations: &[Observation]) -> ProvinceDayTable {
        province_daily::max_temperature(observations)
    }

    pub fn province_min_temperature(&self, observations: &[Observation]) -> ProvinceDayTable {
        province_daily::min_temperature(observations, self.mode)
    }

    pub fn province_mean_temperature(&self, observations: &[Observation]) -> ProvinceDayTable {
        province_daily::mean_temperature(observations)
    }

    pub fn province_mean_precipitation(&self, observations: &[Observation]) -> ProvinceDayTable {
        province_daily::mean_precipitation(observations, self.mode)
    }

    pub fn rainy_localities(&self, observations: &[Observation]) -> RainyLocalities {
        province_daily::rainy_localities(observations, self.mode)
    }

    pub fn daily_max_precipitation(&self, observations: &[Observation]) -> DailyMaxPrecipitation {
        locality_precipitation::daily_max(observations)
    }

    pub fn locality_precipitation(&self, observations: &[Observation]) -> LocalityPrecipitation {
        locality_precipitation::averages(observations, self.mode)
    }

    pub fn province_summary(&self, observations: &[Observation], province: &str) -> ProvinceSummary {
        province_summary::compute(observations, province, self.mode)
    }

    /// Run one pass; `province` only matters for [`ReportKind::ProvinceSummary`].
    pub fn run(
        &self,
        kind: ReportKind,
        observations: &[Observation],
        province: &str,
    ) -> AggregateReport {
        match kind {
            ReportKind::DailyExtremes => {
                AggregateReport::DailyExtremes(self.daily_extremes(observations))
            }
            ReportKind::ProvinceMaxTemperature => {
                AggregateReport::ProvinceDaily(self.province_max_temperature(observations))
            }
            ReportKind::ProvinceMinTemperature => {
                AggregateReport::ProvinceDaily(self.province_min_temperature(observations))
            }
            ReportKind::ProvinceMeanTemperature => {
                AggregateReport::ProvinceDaily(self.province_mean_temperature(observations))
            }
            ReportKind::ProvinceMeanPrecipitation => {
                AggregateReport::ProvinceDaily(self.province_mean_precipitation(observations))
            }
            ReportKind::DailyMaxPrecipitation => {
                AggregateReport::DailyMaxPrecipitation(self.daily_max_precipitation(observations))
            }
            ReportKind::LocalityPrecipitation => {
                AggregateReport::LocalityPrecipitation(self.locality_precipitation(observations))
            }
            ReportKind::RainyLocalities => {
                AggregateReport::RainyLocalities(self.rainy_localities(observations))
            }
            ReportKind::ProvinceSummary => {
                AggregateReport::ProvinceSummary(self.province_summary(observations, province))
            }
        }
    }
}

/// Exponentially weighted update: the stored mean and the new sample count equally.
pub(crate) fn halfway(mean: f64, sample: f64) -> f64 {
    (mean + sample) / 2.0
}

/// Mean that also remembers how many samples it has absorbed
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RunningMean {
    pub value: f64,
    pub count: usize,
}

impl RunningMean {
    pub fn seed(sample: f64) -> Self {
        Self {
            value: sample,
            count: 1,
        }
    }

    /// Arithmetic update
    pub fn push(&mut self, sample: f64) {
        self.count += 1;
        self.value += (sample - self.value) / self.count as f64;
    }

    /// Historical update dividing by the size of the enclosing map plus one
    pub fn push_map_sized(&mut self, sample: f64, map_len: usize) {
        self.count += 1;
        self.value = (self.value + sample) / (map_len + 1) as f64;
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::obs;
    use super::*;

    #[test]
    fn test_running_mean_arithmetic() {
        let mut mean = RunningMean::seed(10.0);
        mean.push(20.0);
        mean.push(30.0);

        assert_eq!(mean.count, 3);
        assert!((mean.value - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_halfway_weights_latest_sample() {
        let mean = halfway(halfway(10.0, 20.0), 30.0);
        assert_eq!(mean, 22.5);
    }

    #[test]
    fn test_run_dispatches_every_kind() {
        let observations = vec![
            obs(29, "Madrid", "Getafe", 20.0, 8.0, 1.0),
            obs(29, "Madrid", "Alcalá", 22.0, 6.0, 0.0),
        ];
        let engine = AggregationEngine::new();

        for kind in ReportKind::ALL {
            let report = engine.run(kind, &observations, "Madrid");
            match (kind, report) {
                (ReportKind::DailyExtremes, AggregateReport::DailyExtremes(r)) => {
                    assert_eq!(r.days.len(), 1)
                }
                (ReportKind::DailyMaxPrecipitation, AggregateReport::DailyMaxPrecipitation(_))
                | (ReportKind::LocalityPrecipitation, AggregateReport::LocalityPrecipitation(_))
                | (ReportKind::RainyLocalities, AggregateReport::RainyLocalities(_))
                | (ReportKind::ProvinceSummary, AggregateReport::ProvinceSummary(_)) => {}
                (_, AggregateReport::ProvinceDaily(table)) => {
                    assert!(table.values.contains_key("Madrid"))
                }
                (kind, report) => panic!("{:?} produced {:?}", kind, report),
            }
        }
    }

    #[test]
    fn test_default_mode_is_reference() {
        assert_eq!(AggregationEngine::new().mode(), AggregationMode::Reference);
    }
}
