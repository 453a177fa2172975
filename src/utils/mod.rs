pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::{generate_default_export_filename, normalized_path, source_path};
pub use progress::ProgressReporter;
