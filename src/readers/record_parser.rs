use crate::error::{ProcessingError, Result};
use crate::models::Observation;
use crate::utils::constants::{
    COL_LOCALITY, COL_MAX_TEMP, COL_MAX_TEMP_TIME, COL_MIN_TEMP, COL_MIN_TEMP_TIME,
    COL_PRECIPITATION, COL_PROVINCE, DEFAULT_STATION_PREFIX_LEN, FIELD_DELIMITER, FILE_DATE_FORMAT,
    FILE_DATE_LEN, MIN_FIELDS, SHORT_TIME_OF_DAY_LEN, TIME_OF_DAY_FORMAT, TIME_OF_DAY_LEN,
};
use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

/// Result of parsing one data row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Parsed(Observation),
    /// Fewer than seven fields; dropped without error
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub parsed_rows: usize,
    pub skipped_rows: usize,
}

/// Parses UTF-8 station exports into observations.
pub struct RecordParser {
    station_prefix_len: usize,
}

impl RecordParser {
    pub fn new() -> Self {
        Self {
            station_prefix_len: DEFAULT_STATION_PREFIX_LEN,
        }
    }

    pub fn with_station_prefix_len(station_prefix_len: usize) -> Self {
        Self { station_prefix_len }
    }

    /// Read every observation of a normalized file.
    ///
    /// `source_file_name` is the raw export name (`Aemet20171029` or
    /// `Aemet20171029.csv`); it supplies the day for all rows.
    pub fn parse_file(&self, path: &Path, source_file_name: &str) -> Result<Vec<Observation>> {
        self.parse_file_with_stats(path, source_file_name)
            .map(|(observations, _)| observations)
    }

    /// Same as [`parse_file`](Self::parse_file), also counting skipped rows.
    ///
    /// The first field error aborts the whole file and nothing parsed so far
    /// is returned. The day is only read from the file name once a full row
    /// needs it, so a file without data rows loads empty under any name.
    pub fn parse_file_with_stats(
        &self,
        path: &Path,
        source_file_name: &str,
    ) -> Result<(Vec<Observation>, ParseStats)> {
        let mut file_day = None;

        let mut reader = ReaderBuilder::new()
            .delimiter(FIELD_DELIMITER)
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let mut observations = Vec::new();
        let mut stats = ParseStats::default();

        for record_result in reader.records() {
            let record = record_result?;
            if meaningful_width(&record) < MIN_FIELDS {
                stats.skipped_rows += 1;
                continue;
            }

            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let day = match file_day {
                Some(day) => day,
                None => {
                    let day = self.day_from_file_name(source_file_name)?;
                    file_day = Some(day);
                    day
                }
            };

            match self.parse_row(&record, line, day)? {
                RowOutcome::Parsed(observation) => {
                    observations.push(observation);
                    stats.parsed_rows += 1;
                }
                RowOutcome::Skipped => stats.skipped_rows += 1,
            }
        }

        Ok((observations, stats))
    }

    /// Parse one data row into an observation for `day`
    pub fn parse_row(&self, record: &StringRecord, line: u64, day: NaiveDate) -> Result<RowOutcome> {
        if meaningful_width(record) < MIN_FIELDS {
            return Ok(RowOutcome::Skipped);
        }

        let observation = Observation::new(
            record[COL_LOCALITY].to_string(),
            record[COL_PROVINCE].to_string(),
            parse_decimal(record, line, COL_MAX_TEMP)?,
            parse_time_field(record, line, COL_MAX_TEMP_TIME)?,
            parse_decimal(record, line, COL_MIN_TEMP)?,
            parse_time_field(record, line, COL_MIN_TEMP_TIME)?,
            parse_decimal(record, line, COL_PRECIPITATION)?,
            day,
        );

        Ok(RowOutcome::Parsed(observation))
    }

    pub fn day_from_file_name(&self, name: &str) -> Result<NaiveDate> {
        parse_day_with_prefix(name, self.station_prefix_len)
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Field count ignoring trailing empty fields
fn meaningful_width(record: &StringRecord) -> usize {
    (0..record.len())
        .rposition(|i| !record[i].is_empty())
        .map_or(0, |last| last + 1)
}

fn parse_decimal(record: &StringRecord, line: u64, column: usize) -> Result<f64> {
    let raw = &record[column];
    raw.trim()
        .parse::<f64>()
        .map_err(|e| ProcessingError::FieldParse {
            line,
            column,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

fn parse_time_field(record: &StringRecord, line: u64, column: usize) -> Result<NaiveTime> {
    let raw = &record[column];
    parse_time_of_day(raw).map_err(|e| ProcessingError::FieldParse {
        line,
        column,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Parse `HH:mm`, accepting `H:mm` for single-digit hours (e.g. `9:30`).
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime> {
    let padded = if raw.chars().count() == SHORT_TIME_OF_DAY_LEN {
        format!("0{}", raw)
    } else {
        raw.to_string()
    };

    if padded.len() != TIME_OF_DAY_LEN || padded.as_bytes()[2] != b':' {
        return Err(ProcessingError::InvalidTimeOfDay {
            value: raw.to_string(),
            reason: "expected HH:mm".to_string(),
        });
    }

    NaiveTime::parse_from_str(&padded, TIME_OF_DAY_FORMAT).map_err(|e| {
        ProcessingError::InvalidTimeOfDay {
            value: raw.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Day encoded in an export name such as `Aemet20171029`.
pub fn parse_day_from_file_name(name: &str) -> Result<NaiveDate> {
    parse_day_with_prefix(name, DEFAULT_STATION_PREFIX_LEN)
}

/// Skip `prefix_len` characters and read the next eight as `yyyyMMdd`.
pub fn parse_day_with_prefix(name: &str, prefix_len: usize) -> Result<NaiveDate> {
    let digits: String = name.chars().skip(prefix_len).take(FILE_DATE_LEN).collect();

    if digits.chars().count() != FILE_DATE_LEN {
        return Err(ProcessingError::InvalidFileName {
            name: name.to_string(),
            reason: format!(
                "expected {} date characters after a {}-character prefix",
                FILE_DATE_LEN, prefix_len
            ),
        });
    }

    NaiveDate::parse_from_str(&digits, FILE_DATE_FORMAT).map_err(|e| {
        ProcessingError::InvalidFileName {
            name: name.to_string(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 10, 29).unwrap()
    }

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("9:30").unwrap(), hm(9, 30));
        assert_eq!(parse_time_of_day("09:30").unwrap(), hm(9, 30));
        assert_eq!(parse_time_of_day("23:59").unwrap(), hm(23, 59));
        assert_eq!(parse_time_of_day("0:00").unwrap(), hm(0, 0));
    }

    #[test]
    fn test_parse_time_of_day_rejects_malformed() {
        assert!(parse_time_of_day("9:5").is_err());
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("0930").is_err());
        assert!(parse_time_of_day("09:30:00").is_err());
        assert!(parse_time_of_day("").is_err());
    }

    #[test]
    fn test_parse_day_from_file_name() {
        assert_eq!(parse_day_from_file_name("Aemet20171029").unwrap(), day());
        assert_eq!(parse_day_from_file_name("Aemet20171029.csv").unwrap(), day());
        assert_eq!(
            parse_day_with_prefix("AEMET-20171031", 6).unwrap(),
            NaiveDate::from_ymd_opt(2017, 10, 31).unwrap()
        );
    }

    #[test]
    fn test_parse_day_from_file_name_rejects_malformed() {
        assert!(matches!(
            parse_day_from_file_name("Aemet2017"),
            Err(ProcessingError::InvalidFileName { .. })
        ));
        assert!(parse_day_from_file_name("Aemet20171332").is_err());
        assert!(parse_day_from_file_name("Aemetabcdefgh").is_err());
    }

    #[test]
    fn test_parse_row() {
        let parser = RecordParser::new();
        let record = StringRecord::from(vec![
            "Navacerrada", "Madrid", "12.4", "15:20", "-1.5", "6:40", "3.2", "extra",
        ]);

        let outcome = parser.parse_row(&record, 2, day()).unwrap();
        let RowOutcome::Parsed(observation) = outcome else {
            panic!("row should parse");
        };

        assert_eq!(observation.locality, "Navacerrada");
        assert_eq!(observation.province, "Madrid");
        assert_eq!(observation.max_temperature, 12.4);
        assert_eq!(observation.max_temperature_time, hm(15, 20));
        assert_eq!(observation.min_temperature, -1.5);
        assert_eq!(observation.min_temperature_time, hm(6, 40));
        assert_eq!(observation.precipitation, 3.2);
        assert_eq!(observation.day, day());
        assert_eq!(observation.id, None);
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let parser = RecordParser::new();

        let short = StringRecord::from(vec!["Navacerrada", "Madrid", "12.4", "15:20"]);
        assert_eq!(parser.parse_row(&short, 2, day()).unwrap(), RowOutcome::Skipped);

        // A missing precipitation value leaves only six meaningful fields
        let trailing = StringRecord::from(vec![
            "Navacerrada", "Madrid", "12.4", "15:20", "-1.5", "6:40", "", "",
        ]);
        assert_eq!(parser.parse_row(&trailing, 3, day()).unwrap(), RowOutcome::Skipped);
    }

    #[test]
    fn test_bad_number_is_field_error() {
        let parser = RecordParser::new();
        let record = StringRecord::from(vec![
            "Navacerrada", "Madrid", "12,4", "15:20", "-1.5", "6:40", "3.2",
        ]);

        match parser.parse_row(&record, 5, day()) {
            Err(ProcessingError::FieldParse { line, column, value, .. }) => {
                assert_eq!(line, 5);
                assert_eq!(column, COL_MAX_TEMP);
                assert_eq!(value, "12,4");
            }
            other => panic!("expected field error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_time_is_field_error() {
        let parser = RecordParser::new();
        let record = StringRecord::from(vec![
            "Navacerrada", "Madrid", "12.4", "15:20", "-1.5", "6h40", "3.2",
        ]);

        assert!(matches!(
            parser.parse_row(&record, 2, day()),
            Err(ProcessingError::FieldParse { column: COL_MIN_TEMP_TIME, .. })
        ));
    }

    #[test]
    fn test_parse_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Localidad;Provincia;Tmax;HTmax;Tmin;HTmin;Precip")?;
        writeln!(file, "Móstoles;Madrid;18.2;15:10;7.1;6:50;0.0")?;
        writeln!(file, "incompleta;Madrid")?;
        writeln!(file, "Logroño;La Rioja;14.0;14:00;4.5;7:30;1.8;;")?;

        let parser = RecordParser::new();
        let (observations, stats) = parser.parse_file_with_stats(file.path(), "Aemet20171029")?;

        assert_eq!(observations.len(), 2);
        assert_eq!(stats, ParseStats { parsed_rows: 2, skipped_rows: 1 });
        assert_eq!(observations[0].locality, "Móstoles");
        assert_eq!(observations[1].locality, "Logroño");
        assert!(observations.iter().all(|o| o.day == day()));

        Ok(())
    }

    #[test]
    fn test_parse_file_aborts_on_field_error() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Localidad;Provincia;Tmax;HTmax;Tmin;HTmin;Precip")?;
        writeln!(file, "Móstoles;Madrid;18.2;15:10;7.1;6:50;0.0")?;
        writeln!(file, "Getafe;Madrid;n/a;15:10;7.1;6:50;0.0")?;

        let parser = RecordParser::new();
        let result = parser.parse_file(file.path(), "Aemet20171029");

        assert!(matches!(result, Err(ProcessingError::FieldParse { line: 3, .. })));
        Ok(())
    }

    #[test]
    fn test_header_only_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Localidad;Provincia;Tmax;HTmax;Tmin;HTmin;Precip")?;

        let parser = RecordParser::new();
        assert!(parser.parse_file(file.path(), "Aemet20171029")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_file_without_data_rows_ignores_its_name() -> Result<()> {
        let mut header_only = NamedTempFile::new()?;
        writeln!(header_only, "Localidad;Provincia;Tmax;HTmax;Tmin;HTmin;Precip")?;

        let parser = RecordParser::new();
        assert!(parser.parse_file(header_only.path(), "sin_fecha")?.is_empty());

        let mut short_only = NamedTempFile::new()?;
        writeln!(short_only, "Localidad;Provincia;Tmax;HTmax;Tmin;HTmin;Precip")?;
        writeln!(short_only, "incompleta;Madrid")?;
        writeln!(short_only, "Getafe;Madrid;18.2;15:10;;;")?;

        let (observations, stats) = parser.parse_file_with_stats(short_only.path(), "sin_fecha")?;
        assert!(observations.is_empty());
        assert_eq!(stats, ParseStats { parsed_rows: 0, skipped_rows: 2 });
        Ok(())
    }

    #[test]
    fn test_bad_file_name_fails_once_a_row_needs_the_day() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Localidad;Provincia;Tmax;HTmax;Tmin;HTmin;Precip")?;
        writeln!(file, "incompleta;Madrid")?;
        writeln!(file, "Móstoles;Madrid;18.2;15:10;7.1;6:50;0.0")?;

        let result = RecordParser::new().parse_file(file.path(), "sin_fecha");

        assert!(matches!(result, Err(ProcessingError::InvalidFileName { .. })));
        Ok(())
    }
}
