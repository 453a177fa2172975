use crate::analyzers::{AggregationEngine, ReportKind};
use crate::cli::args::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::Result;
use crate::models::Observation;
use crate::processors::{IngestionPipeline, IngestionRun};
use crate::repository::{CrudRepository, SqliteObservationRepository};
use crate::utils::filename::generate_default_export_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::{JsonStore, ReportFormatter};
use tracing::{debug, info, warn};

pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(&cli);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = &cli.data_dir {
        config = config.with_data_dir(data_dir.clone());
    }
    debug!("Using data directory {}", config.data_dir.display());

    match cli.command {
        Commands::Ingest { persist } => {
            let run = ingest(&config, cli.quiet)?;
            println!("{}", run.summary());

            if persist {
                persist_observations(&config, run.store.into_inner()).await?;
            }
        }

        Commands::Show => {
            let run = ingest(&config, cli.quiet)?;

            for observation in &run.store {
                println!("{}", observation);
            }
            println!("\n{}", run.summary());
        }

        Commands::Report {
            kind,
            province,
            mode,
        } => {
            let run = ingest(&config, cli.quiet)?;

            let engine = AggregationEngine::with_mode(mode.unwrap_or(config.aggregation_mode));
            let kinds = if kind.is_empty() {
                ReportKind::ALL.to_vec()
            } else {
                kind
            };
            info!("Running {} report(s) in {:?} mode", kinds.len(), engine.mode());

            let reports: Vec<_> = kinds
                .into_iter()
                .map(|kind| engine.run(kind, run.store.as_slice(), &province))
                .collect();

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            ReportFormatter::new().write_reports(&reports, &mut out)?;
        }

        Commands::Export { output_file } => {
            let output_file = output_file
                .or_else(|| config.export.path.clone())
                .unwrap_or_else(generate_default_export_filename);

            let run = ingest(&config, cli.quiet)?;
            let written = JsonStore::new().export(run.store.as_slice(), &output_file)?;

            println!("Exported {} observations to {}", written, output_file.display());
        }

        Commands::Import {
            input_file,
            persist,
        } => {
            let observations = JsonStore::new().import(&input_file)?;
            println!(
                "Imported {} observations from {}",
                observations.len(),
                input_file.display()
            );

            if persist {
                persist_observations(&config, observations).await?;
            } else {
                for observation in &observations {
                    println!("{}", observation);
                }
            }
        }
    }

    Ok(())
}

/// Run the configured pipeline with a per-file progress bar.
fn ingest(config: &AppConfig, quiet: bool) -> Result<IngestionRun> {
    let pipeline = IngestionPipeline::new(config)?;
    let progress = ProgressReporter::new(
        pipeline.source_files().len() as u64,
        "Ingesting station exports...",
        quiet,
    );

    let run = pipeline.run(Some(&progress))?;
    progress.finish_with_message(&format!("Loaded {} observations", run.store.len()));

    if run.store.is_empty() {
        warn!("No observations were loaded from {}", pipeline.data_dir().display());
    }

    Ok(run)
}

async fn persist_observations(config: &AppConfig, observations: Vec<Observation>) -> Result<()> {
    let repository = SqliteObservationRepository::connect(&config.database).await?;

    let saved = repository.save_all(observations).await?;
    info!(
        "Persisted {} observations, {} stored in total",
        saved.len(),
        repository.count().await?
    );
    println!("Persisted {} observations to {}", saved.len(), config.database.url);

    repository.close().await;
    Ok(())
}

fn setup_logging(cli: &Cli) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = cli.log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aemet_processor={}", log_level)));

    let initialized = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init();

    if initialized.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}
