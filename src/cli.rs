// src/cli.rs

use clap::Parser;
use gitstract::observers::Period;
use gitstract::ExtractionOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the git repository, or any directory inside it
    #[arg(short, long, env = "GITSTRACT_SOURCE", default_value = ".")]
    pub source: PathBuf,

    /// Directory to write the exported datasets to
    #[arg(short, long, env = "GITSTRACT_DESTINATION")]
    pub destination: PathBuf,

    /// JSON file mapping several emails onto one author
    #[arg(short, long)]
    pub author_map: Option<PathBuf>,

    /// Walk every reachable commit instead of only the first-parent chain
    #[arg(short = 'b', long)]
    pub include_branches: bool,

    /// Extensions or path suffixes to leave out, comma-separated
    #[arg(short, long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Only report files with these extensions, comma-separated
    #[arg(short, long, value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Only report common source code files. Ignored when --extensions is given
    #[arg(long)]
    pub code_files: bool,

    /// Per-author rollups to write, comma-separated
    #[arg(long, value_enum, value_delimiter = ',')]
    pub rollups: Vec<RollupPeriod>,

    /// Don't draw a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn extraction_options(&self) -> ExtractionOptions {
        let mut options = ExtractionOptions::new(&self.source, &self.destination)
            .with_branch_details(self.include_branches)
            .with_ignore_patterns(self.ignore.iter().map(|p| p.trim()).filter(|p| !p.is_empty()))
            .with_extensions(self.extensions.iter().map(|e| e.trim()).filter(|e| !e.is_empty()));
        if self.code_files && options.extensions.is_empty() {
            options = options.with_code_extensions();
        }
        if let Some(map) = &self.author_map {
            options = options.with_author_map(map);
        }
        options
    }
}

#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum RollupPeriod {
    Daily,
    /// ISO weeks
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl From<RollupPeriod> for Period {
    fn from(period: RollupPeriod) -> Self {
        match period {
            RollupPeriod::Daily => Period::Daily,
            RollupPeriod::Weekly => Period::Weekly,
            RollupPeriod::Monthly => Period::Monthly,
            RollupPeriod::Quarterly => Period::Quarterly,
            RollupPeriod::Yearly => Period::Yearly,
        }
    }
}
