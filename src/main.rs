// src/main.rs

mod cli;

use clap::Parser;
use cli::Args;
use gitstract::observers::{AuthorPeriodRollup, DatasetExporter, LoggingObserver, ProgressObserver};
use gitstract::{GitDataExtractor, GitObserver};
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "gitstract=debug" } else { "gitstract=info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let start_time = Instant::now();
    let options = args.extraction_options();

    let mut logging = LoggingObserver::new();
    let mut progress = ProgressObserver::new();
    let mut exporter = DatasetExporter::new();
    let mut rollups: Vec<AuthorPeriodRollup> = args
        .rollups
        .iter()
        .map(|&period| AuthorPeriodRollup::new(period.into()).persisted())
        .collect();

    let result = {
        let mut extractor = GitDataExtractor::new()
            .with_observer(&mut logging)
            .with_observer(&mut exporter);
        if !args.no_progress {
            extractor.register(&mut progress);
        }
        for rollup in rollups.iter_mut() {
            extractor.register(rollup as &mut dyn GitObserver);
        }
        extractor.extract_information(&options)
    };

    match result {
        Ok(summary) => {
            println!(
                "Analysis finished in {:.2?}. Processed {} commits, {} authors, {} files at HEAD.",
                start_time.elapsed(),
                summary.commits_processed,
                summary.authors.len(),
                summary.final_files
            );
            println!("Repository: {}", summary.repository_root.display());
            if !summary.skipped_entries.is_empty() {
                println!(
                    "Skipped {} unsupported entries at HEAD.",
                    summary.skipped_entries.len()
                );
            }
            println!("Datasets written to {}", options.output_path.display());
        }
        Err(e) => {
            eprintln!("Error extracting repository data: {}", e);
            std::process::exit(1);
        }
    }
}
