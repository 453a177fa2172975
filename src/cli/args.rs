use crate::analyzers::{AggregationMode, ReportKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aemet-processor")]
#[command(about = "Ingest and summarize AEMET daily station CSV exports")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short,
        long,
        global = true,
        help = "Configuration file [default: aemet.toml when present]"
    )]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Directory holding the source exports")]
    pub data_dir: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Only log errors and hide progress bars"
    )]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize and parse the configured exports
    Ingest {
        #[arg(long, help = "Save parsed observations to the database")]
        persist: bool,
    },

    /// Ingest and print every observation
    Show,

    /// Ingest and print aggregate reports
    Report {
        #[arg(
            short,
            long,
            value_enum,
            help = "Reports to print, repeatable [default: all]"
        )]
        kind: Vec<ReportKind>,

        #[arg(
            short,
            long,
            default_value = "Madrid",
            help = "Province for the daily summary report"
        )]
        province: String,

        #[arg(
            short,
            long,
            value_enum,
            help = "Aggregation mode [default: from configuration]"
        )]
        mode: Option<AggregationMode>,
    },

    /// Ingest and write observations as JSON
    Export {
        #[arg(
            short,
            long,
            help = "Output JSON file path [default: data/aemet-{YYMMDD}.json]"
        )]
        output_file: Option<PathBuf>,
    },

    /// Read observations from a JSON export
    Import {
        #[arg(short, long, help = "JSON file written by the export command")]
        input_file: PathBuf,

        #[arg(long, help = "Save imported observations to the database")]
        persist: bool,
    },
}
