use crate::analyzers::{
    AggregateReport, DailyExtremes, DailyMaxPrecipitation, Extremum, LocalityPrecipitation,
    ProvinceDayTable, ProvinceSummary, RainyLocalities,
};
use crate::error::Result;
use std::io::Write;

const NO_DATA: &str = "  (no data)";

/// Renders reducer output as indented, human-readable lines
#[derive(Debug, Clone, Copy)]
pub struct ReportFormatter {
    precision: usize,
}

impl ReportFormatter {
    pub fn new() -> Self {
        Self { precision: 1 }
    }

    /// Decimal places used for every figure
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// One line per key, in map order
    pub fn render(&self, report: &AggregateReport) -> Vec<String> {
        match report {
            AggregateReport::DailyExtremes(extremes) => self.render_daily_extremes(extremes),
            AggregateReport::ProvinceDaily(table) => self.render_province_table(table),
            AggregateReport::DailyMaxPrecipitation(daily) => self.render_daily_max_precipitation(daily),
            AggregateReport::LocalityPrecipitation(averages) => {
                self.render_locality_precipitation(averages)
            }
            AggregateReport::RainyLocalities(rainy) => self.render_rainy_localities(rainy),
            AggregateReport::ProvinceSummary(summary) => self.render_province_summary(summary),
        }
    }

    pub fn write_report<W: Write>(&self, report: &AggregateReport, sink: &mut W) -> Result<()> {
        for line in self.render(report) {
            writeln!(sink, "{}", line)?;
        }
        Ok(())
    }

    /// Several reports separated by blank lines
    pub fn write_reports<W: Write>(&self, reports: &[AggregateReport], sink: &mut W) -> Result<()> {
        for (i, report) in reports.iter().enumerate() {
            if i > 0 {
                writeln!(sink)?;
            }
            self.write_report(report, sink)?;
        }
        sink.flush()?;
        Ok(())
    }

    fn num(&self, value: f64) -> String {
        format!("{:.*}", self.precision, value)
    }

    fn extremum(&self, extremum: Option<&Extremum>, unit: &str) -> String {
        match extremum {
            Some(e) => format!("{}{} at {}", self.num(e.value), unit, e.locality),
            None => "none recorded".to_string(),
        }
    }

    fn render_daily_extremes(&self, extremes: &DailyExtremes) -> Vec<String> {
        let mut lines = vec!["Daily temperature extremes".to_string()];

        for (day, e) in &extremes.days {
            lines.push(format!(
                "  {}: max {}°C at {}, min {}°C at {}",
                day,
                self.num(e.max_temperature),
                e.max_locality,
                self.num(e.min_temperature),
                e.min_locality
            ));
        }

        if extremes.days.is_empty() {
            lines.push(NO_DATA.to_string());
        }
        lines
    }

    fn render_province_table(&self, table: &ProvinceDayTable) -> Vec<String> {
        let mut lines = vec![format!(
            "{} by province and day ({})",
            table.metric.label(),
            table.metric.unit()
        )];

        for (province, days) in &table.values {
            lines.push(format!("  {}", province));
            for (day, value) in days {
                lines.push(format!("    {}: {}", day, self.num(*value)));
            }
        }

        if table.values.is_empty() {
            lines.push(NO_DATA.to_string());
        }
        lines
    }

    fn render_daily_max_precipitation(&self, daily: &DailyMaxPrecipitation) -> Vec<String> {
        let mut lines = vec!["Maximum precipitation by day and locality (mm)".to_string()];

        for (day, localities) in &daily.days {
            lines.push(format!("  {}", day));
            for (locality, value) in localities {
                lines.push(format!("    {}: {}", locality, self.num(*value)));
            }
        }

        if daily.days.is_empty() {
            lines.push(NO_DATA.to_string());
        }
        lines
    }

    fn render_locality_precipitation(&self, averages: &LocalityPrecipitation) -> Vec<String> {
        let mut lines = vec!["Average precipitation by locality (mm)".to_string()];

        for (locality, value) in &averages.averages {
            lines.push(format!("  {}: {}", locality, self.num(*value)));
        }

        match &averages.wettest {
            Some(wettest) => lines.push(format!(
                "Wettest locality: {} ({} mm)",
                wettest.locality,
                self.num(wettest.average)
            )),
            None => lines.push(NO_DATA.to_string()),
        }
        lines
    }

    fn render_rainy_localities(&self, rainy: &RainyLocalities) -> Vec<String> {
        let mut lines = vec!["Localities with precipitation by province and day".to_string()];

        for (province, days) in &rainy.provinces {
            lines.push(format!("  {}", province));
            for (day, localities) in days {
                lines.push(format!("    {}: {}", day, localities.join(", ")));
            }
        }

        if rainy.provinces.is_empty() {
            lines.push(NO_DATA.to_string());
        }
        lines
    }

    fn render_province_summary(&self, summary: &ProvinceSummary) -> Vec<String> {
        let mut lines = vec![format!("Daily summary for {}", summary.province)];

        for (day, s) in &summary.days {
            lines.push(format!("  {}", day));
            lines.push(format!(
                "    Maximum temperature: {}",
                self.extremum(s.max_temperature.as_ref(), "°C")
            ));
            lines.push(format!(
                "    Minimum temperature: {}",
                self.extremum(Some(&s.min_temperature), "°C")
            ));
            lines.push(format!(
                "    Mean maximum temperature: {}°C",
                self.num(s.mean_max_temperature)
            ));
            lines.push(format!(
                "    Mean minimum temperature: {}°C",
                self.num(s.mean_min_temperature)
            ));
            lines.push(format!(
                "    Maximum precipitation: {}",
                self.extremum(s.max_precipitation.as_ref(), " mm")
            ));
            lines.push(format!(
                "    Mean precipitation: {} mm",
                self.num(s.mean_precipitation)
            ));
        }

        if summary.days.is_empty() {
            lines.push(NO_DATA.to_string());
        }
        lines
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::obs;
    use crate::analyzers::{AggregationEngine, AggregationMode, ReportKind};

    fn sample() -> Vec<crate::models::Observation> {
        vec![
            obs(30, "Soria", "Soria", 12.0, 1.0, 0.0),
            obs(29, "Madrid", "A", 30.0, 10.0, 0.0),
            obs(29, "Madrid", "B", 32.0, 8.0, 2.5),
        ]
    }

    #[test]
    fn test_daily_extremes_lines_are_ordered() {
        let engine = AggregationEngine::new();
        let report = engine.run(ReportKind::DailyExtremes, &sample(), "");

        let lines = ReportFormatter::new().render(&report);

        assert_eq!(
            lines,
            vec![
                "Daily temperature extremes".to_string(),
                "  2017-10-29: max 32.0°C at B, min 8.0°C at B".to_string(),
                "  2017-10-30: max 12.0°C at Soria, min 1.0°C at Soria".to_string(),
            ]
        );
    }

    #[test]
    fn test_province_table_lists_each_key_once() {
        let engine = AggregationEngine::new();
        let report = engine.run(ReportKind::ProvinceMaxTemperature, &sample(), "");

        let lines = ReportFormatter::new().render(&report);

        assert_eq!(lines[0], "Maximum temperature by province and day (°C)");
        assert_eq!(lines[1], "  Madrid");
        assert_eq!(lines[2], "    2017-10-29: 32.0");
        assert_eq!(lines[3], "  Soria");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_rainy_localities_reference_lists_dry_ones() {
        let engine = AggregationEngine::with_mode(AggregationMode::Reference);
        let report = engine.run(ReportKind::RainyLocalities, &sample(), "");

        let lines = ReportFormatter::new().render(&report);
        assert!(lines.contains(&"    2017-10-29: A, B".to_string()));
    }

    #[test]
    fn test_wettest_locality_line() {
        let engine = AggregationEngine::new();
        let report = engine.run(ReportKind::LocalityPrecipitation, &sample(), "");

        let lines = ReportFormatter::new().with_precision(2).render(&report);
        assert_eq!(lines.last().unwrap(), "Wettest locality: B (2.50 mm)");
    }

    #[test]
    fn test_empty_summary_says_no_data() {
        let engine = AggregationEngine::new();
        let report = engine.run(ReportKind::ProvinceSummary, &sample(), "Cuenca");

        let lines = ReportFormatter::new().render(&report);
        assert_eq!(lines, vec!["Daily summary for Cuenca".to_string(), NO_DATA.to_string()]);
    }

    #[test]
    fn test_summary_without_positive_maximum() {
        let observations = vec![obs(29, "Huesca", "Candanchú", -2.0, -11.0, 0.0)];
        let report = AggregationEngine::with_mode(AggregationMode::Reference)
            .run(ReportKind::ProvinceSummary, &observations, "Huesca");

        let lines = ReportFormatter::new().render(&report);

        assert_eq!(lines[2], "    Maximum temperature: none recorded");
        assert_eq!(lines[3], "    Minimum temperature: -11.0°C at Candanchú");
        assert_eq!(lines[4], "    Mean maximum temperature: -1.0°C");
        assert_eq!(lines[6], "    Maximum precipitation: none recorded");
    }

    #[test]
    fn test_write_reports_to_sink() -> Result<()> {
        let engine = AggregationEngine::new();
        let reports: Vec<_> = [ReportKind::DailyExtremes, ReportKind::ProvinceSummary]
            .into_iter()
            .map(|kind| engine.run(kind, &sample(), "Madrid"))
            .collect();

        let mut sink = Vec::new();
        ReportFormatter::new().write_reports(&reports, &mut sink)?;

        let text = String::from_utf8(sink).unwrap();
        assert!(text.contains("\n\nDaily summary for Madrid\n"));
        assert!(text.contains("    Maximum precipitation: 2.5 mm at B\n"));
        Ok(())
    }
}
