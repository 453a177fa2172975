use crate::error::{ProcessingError, Result};
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_NORMALIZED_SUFFIX};
use crate::utils::filename::normalized_path;
use encoding_rs::{Encoding, WINDOWS_1252};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Rewrites legacy single-byte exports as UTF-8 copies next to the source.
pub struct CharsetNormalizer {
    encoding: &'static Encoding,
    suffix: String,
}

impl CharsetNormalizer {
    pub fn new() -> Self {
        Self {
            encoding: WINDOWS_1252,
            suffix: DEFAULT_NORMALIZED_SUFFIX.to_string(),
        }
    }

    pub fn with_encoding(encoding: &'static Encoding, suffix: &str) -> Self {
        Self {
            encoding,
            suffix: suffix.to_string(),
        }
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Convert `source` and return the path of the UTF-8 copy
    pub fn normalize(&self, source: &Path) -> Result<PathBuf> {
        let destination = normalized_path(source, &self.suffix);
        self.normalize_to(source, &destination)?;
        Ok(destination)
    }

    /// Convert `source` into `destination`, one line at a time.
    ///
    /// Line terminators are rewritten as `\n`; line order and count are kept.
    pub fn normalize_to(&self, source: &Path, destination: &Path) -> Result<usize> {
        let mut bytes = Vec::new();
        {
            let file = File::open(source)?;
            let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
            reader.read_to_end(&mut bytes)?;
        }

        let text = self
            .encoding
            .decode_without_bom_handling_and_without_replacement(&bytes)
            .ok_or_else(|| ProcessingError::Encoding {
                path: source.to_path_buf(),
                encoding: self.encoding.name().to_string(),
            })?;

        let file = File::create(destination)?;
        let mut writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut line_count = 0;

        for line in text.lines() {
            writeln!(writer, "{}", line)?;
            line_count += 1;
        }

        writer.flush()?;
        Ok(line_count)
    }
}

impl Default for CharsetNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
