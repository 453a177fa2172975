use crate::utils::constants::{DEFAULT_DATA_DIR, SOURCE_EXTENSION};
use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

/// Generate default export filename with format: aemet-{YYMMDD}.json
pub fn generate_default_export_filename() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!("aemet-{:02}{:02}{:02}.json", year, month, day);
    PathBuf::from(DEFAULT_DATA_DIR).join(filename)
}

/// `data/Aemet20171029` -> `data/Aemet20171029.csv`
pub fn source_path(data_dir: &Path, name: &str) -> PathBuf {
    data_dir.join(format!("{}.{}", name, SOURCE_EXTENSION))
}

/// Sibling of `source` named `<stem><suffix>.csv`
pub fn normalized_path(source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    source.with_file_name(format!("{}{}.{}", stem, suffix, SOURCE_EXTENSION))
}
