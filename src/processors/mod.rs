pub mod ingestion_pipeline;
pub mod observation_store;

pub use ingestion_pipeline::{FileOutcome, IngestionPipeline, IngestionRun};
pub use observation_store::ObservationStore;
