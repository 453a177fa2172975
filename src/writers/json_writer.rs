use crate::error::Result;
use crate::models::Observation;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// JSON export and import of observation sequences.
///
/// Output is a single array with camelCase keys, ISO dates and `HH:MM:SS`
/// times. Import also accepts `HH:MM` times.
#[derive(Debug, Clone, Copy)]
pub struct JsonStore {
    pretty: bool,
}

impl JsonStore {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Write `observations` to `path`, creating parent directories.
    pub fn export(&self, observations: &[Observation], path: &Path) -> Result<usize> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(observations, &mut writer)?;
        writer.flush()?;

        debug!("Exported {} observations to {}", observations.len(), path.display());
        Ok(observations.len())
    }

    pub fn import(&self, path: &Path) -> Result<Vec<Observation>> {
        let reader = BufReader::new(File::open(path)?);
        let observations: Vec<Observation> = serde_json::from_reader(reader)?;

        debug!("Imported {} observations from {}", observations.len(), path.display());
        Ok(observations)
    }

    pub fn write_to<W: Write>(&self, observations: &[Observation], writer: W) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(writer, observations)?;
        } else {
            serde_json::to_writer(writer, observations)?;
        }
        Ok(())
    }

    pub fn to_json_string(&self, observations: &[Observation]) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(observations)?
        } else {
            serde_json::to_string(observations)?
        };
        Ok(json)
    }

    pub fn from_json_str(&self, json: &str) -> Result<Vec<Observation>> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for JsonStore {
    fn default() -> Self {
        Self::new()
    }
}
