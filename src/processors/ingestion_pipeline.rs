use crate::config::AppConfig;
use crate::error::{ProcessingError, Result};
use crate::models::Observation;
use crate::processors::ObservationStore;
use crate::readers::{CharsetNormalizer, ParseStats, RecordParser};
use crate::utils::filename::source_path;
use crate::utils::progress::ProgressReporter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What happened to one source file
#[derive(Debug)]
pub enum FileOutcome {
    Loaded {
        name: String,
        normalized_path: PathBuf,
        records: usize,
        skipped_rows: usize,
    },
    /// Nothing from this file reached the store
    Failed { name: String, error: ProcessingError },
}

impl FileOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, FileOutcome::Loaded { .. })
    }
}

/// Store and per-file outcomes of one run
#[derive(Debug)]
pub struct IngestionRun {
    pub store: ObservationStore,
    pub outcomes: Vec<FileOutcome>,
}

impl IngestionRun {
    pub fn loaded_files(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_loaded()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ProcessingError)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Failed { name, error } => Some((name.as_str(), error)),
            FileOutcome::Loaded { .. } => None,
        })
    }

    pub fn skipped_rows(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                FileOutcome::Loaded { skipped_rows, .. } => *skipped_rows,
                FileOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Ingested {} observations from {}/{} files ({} short rows skipped)",
            self.store.len(),
            self.loaded_files(),
            self.outcomes.len(),
            self.skipped_rows()
        )];

        for (name, error) in self.failures() {
            lines.push(format!("  {} rejected: {}", name, error));
        }

        lines.join("\n")
    }
}

/// Normalizes and parses the configured exports, one file at a time.
pub struct IngestionPipeline {
    data_dir: PathBuf,
    source_files: Vec<String>,
    normalizer: CharsetNormalizer,
    parser: RecordParser,
}

impl IngestionPipeline {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let normalizer =
            CharsetNormalizer::with_encoding(config.encoding()?, &config.normalized_suffix);
        let parser = RecordParser::with_station_prefix_len(config.station_prefix_len);

        Ok(Self::with_parts(
            config.data_dir.clone(),
            config.source_files.clone(),
            normalizer,
            parser,
        ))
    }

    pub fn with_parts(
        data_dir: PathBuf,
        source_files: Vec<String>,
        normalizer: CharsetNormalizer,
        parser: RecordParser,
    ) -> Self {
        Self {
            data_dir,
            source_files,
            normalizer,
            parser,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn source_files(&self) -> &[String] {
        &self.source_files
    }

    /// Convert and parse one export; any error discards the whole file.
    pub fn ingest_file(&self, name: &str) -> Result<(Vec<Observation>, ParseStats, PathBuf)> {
        let source = source_path(&self.data_dir, name);
        debug!("Normalizing {} as {}", source.display(), self.normalizer.encoding().name());

        let normalized = self.normalizer.normalize(&source)?;
        let (observations, stats) = self.parser.parse_file_with_stats(&normalized, name)?;

        Ok((observations, stats, normalized))
    }

    /// Ingest every configured file in order.
    ///
    /// File-level failures are recorded and the run moves on to the next
    /// file; other errors end the run.
    pub fn run(&self, progress: Option<&ProgressReporter>) -> Result<IngestionRun> {
        let mut store = ObservationStore::new();
        let mut outcomes = Vec::with_capacity(self.source_files.len());

        for name in &self.source_files {
            if let Some(progress) = progress {
                progress.set_message(&format!("Ingesting {}", name));
            }

            match self.ingest_file(name) {
                Ok((observations, stats, normalized_path)) => {
                    info!(
                        "{}: {} observations, {} short rows skipped",
                        name, stats.parsed_rows, stats.skipped_rows
                    );
                    store.extend(observations);
                    outcomes.push(FileOutcome::Loaded {
                        name: name.clone(),
                        normalized_path,
                        records: stats.parsed_rows,
                        skipped_rows: stats.skipped_rows,
                    });
                }
                Err(error) if error.is_file_scoped() => {
                    warn!("{} rejected: {}", name, error);
                    outcomes.push(FileOutcome::Failed {
                        name: name.clone(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }

            if let Some(progress) = progress {
                progress.increment(1);
            }
        }

        Ok(IngestionRun { store, outcomes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &[u8] = b"Localidad;Provincia;Tmax;HTmax;Tmin;HTmin;Precip\r\n";

    fn write_export(dir: &Path, name: &str, rows: &[&[u8]]) {
        let mut bytes = HEADER.to_vec();
        for row in rows {
            bytes.extend_from_slice(row);
            bytes.extend_from_slice(b"\r\n");
        }
        std::fs::write(dir.join(format!("{}.csv", name)), bytes).unwrap();
    }

    fn pipeline(dir: &Path, files: &[&str]) -> IngestionPipeline {
        let config = AppConfig {
            source_files: files.iter().map(|f| f.to_string()).collect(),
            ..AppConfig::default()
        }
        .with_data_dir(dir.to_path_buf());

        IngestionPipeline::new(&config).unwrap()
    }

    #[test]
    fn test_run_loads_files_in_order() -> Result<()> {
        let dir = TempDir::new()?;
        write_export(dir.path(), "Aemet20171029", &[b"M\xf3stoles;Madrid;18.2;15:10;7.1;6:50;0.0"]);
        write_export(dir.path(), "Aemet20171030", &[b"Logro\xf1o;La Rioja;14.0;14:00;4.5;7:30;1.8"]);

        let progress = ProgressReporter::silent();
        let run = pipeline(dir.path(), &["Aemet20171029", "Aemet20171030"]).run(Some(&progress))?;

        assert_eq!(run.store.len(), 2);
        assert_eq!(run.loaded_files(), 2);
        assert_eq!(run.store.as_slice()[0].locality, "Móstoles");
        assert_eq!(run.store.as_slice()[1].locality, "Logroño");
        assert!(dir.path().join("Aemet20171029_utf8.csv").exists());

        Ok(())
    }

    #[test]
    fn test_bad_file_is_discarded_whole() -> Result<()> {
        let dir = TempDir::new()?;
        write_export(
            dir.path(),
            "Aemet20171029",
            &[
                b"Getafe;Madrid;18.2;15:10;7.1;6:50;0.0",
                b"Alcal\xe1;Madrid;--;15:10;7.1;6:50;0.0",
            ],
        );
        write_export(dir.path(), "Aemet20171030", &[b"Getafe;Madrid;17.0;14:40;6.0;7:10;0.2"]);

        let run = pipeline(dir.path(), &["Aemet20171029", "Aemet20171030"]).run(None)?;

        assert_eq!(run.store.len(), 1);
        assert_eq!(run.loaded_files(), 1);

        let failures: Vec<_> = run.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "Aemet20171029");
        assert!(matches!(failures[0].1, ProcessingError::FieldParse { line: 3, .. }));
        assert!(run.summary().contains("Aemet20171029 rejected"));

        Ok(())
    }

    #[test]
    fn test_missing_file_is_recorded() -> Result<()> {
        let dir = TempDir::new()?;

        let run = pipeline(dir.path(), &["Aemet20171029"]).run(None)?;

        assert!(run.store.is_empty());
        assert!(matches!(
            run.outcomes[0],
            FileOutcome::Failed { error: ProcessingError::Io(_), .. }
        ));
        Ok(())
    }

    #[test]
    fn test_short_rows_counted() -> Result<()> {
        let dir = TempDir::new()?;
        write_export(
            dir.path(),
            "Aemet20171029",
            &[b"Getafe;Madrid;18.2;15:10;7.1;6:50;0.0", b"Getafe;Madrid", b""],
        );

        let run = pipeline(dir.path(), &["Aemet20171029"]).run(None)?;

        assert_eq!(run.store.len(), 1);
        assert_eq!(run.skipped_rows(), 1);
        Ok(())
    }
}
