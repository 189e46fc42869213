//! Antenna match command-line interface.
//!
//! - `analyze`: evaluate every antenna capture in a directory at one frequency
//! - `export`: write S11 trace CSVs for magnitude, phase and Smith-chart plots

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use antenna_match::config::{AnalysisConfig, DEFAULT_FILE_PREFIX};
use antenna_match::constants::{ghz_to_hz, hz_to_ghz, GOOD_MATCH_DB, MODERATE_MATCH_DB};
use antenna_match::dataset::AntennaDataset;
use antenna_match::io::{export_s11_traces, load_antenna_datasets, write_match_summary_csv};

#[derive(Parser)]
#[command(name = "antenna-match")]
#[command(author, version, about = "Antenna S-parameter match analysis", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report impedance match at a target frequency for every antenna capture
    Analyze {
        /// Directory containing the .s2p files
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// File-name prefix of the captures
        #[arg(long, default_value = DEFAULT_FILE_PREFIX)]
        prefix: String,

        /// Target frequency in GHz
        #[arg(short, long, default_value = "2.4")]
        target_ghz: f64,

        /// Reference impedance in ohms
        #[arg(long, default_value = "50.0")]
        z0: f64,

        /// |S11| dB threshold for a good match
        #[arg(long, default_value_t = GOOD_MATCH_DB, allow_hyphen_values = true)]
        good_db: f64,

        /// |S11| dB threshold for a moderate match
        #[arg(long, default_value_t = MODERATE_MATCH_DB, allow_hyphen_values = true)]
        moderate_db: f64,

        /// Also write a CSV summary of all reports
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Export S11 traces (dB, phase, real/imag) as CSV
    Export {
        /// Directory containing the .s2p files
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// File-name prefix of the captures
        #[arg(long, default_value = DEFAULT_FILE_PREFIX)]
        prefix: String,

        /// Output directory for CSV files
        #[arg(short, long, default_value = "traces")]
        out: PathBuf,
    },
}

fn load_all(config: &AnalysisConfig) -> Result<Vec<AntennaDataset>> {
    let datasets = load_antenna_datasets(config)
        .with_context(|| format!("failed to read {}", config.directory.display()))?;
    if datasets.is_empty() {
        bail!(
            "no {}*.s2p antenna files found in {}",
            config.file_prefix,
            config.directory.display()
        );
    }
    Ok(datasets)
}

fn cmd_analyze(config: AnalysisConfig, summary: Option<&Path>) -> Result<()> {
    config.validate()?;
    let datasets = load_all(&config)?;
    let evaluator = config.evaluator();

    println!(
        "\nAnalyzing frequency response around {:.1} GHz:",
        hz_to_ghz(config.target_frequency)
    );
    println!("{}", "-".repeat(50));

    let mut reports = Vec::with_capacity(datasets.len());
    for (i, dataset) in datasets.iter().enumerate() {
        let report = evaluator
            .evaluate_dataset(dataset, config.target_frequency)
            .with_context(|| format!("evaluating {}", dataset.name()))?;
        println!("\nAntenna {} ({}):", i + 1, dataset.name());
        println!("{report}");
        reports.push(report);
    }

    if let Some(path) = summary {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_match_summary_csv(
            &mut writer,
            datasets.iter().map(AntennaDataset::name).zip(reports.iter()),
        )
        .with_context(|| format!("writing {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("flushing {}", path.display()))?;
        info!("Wrote summary to {:?}", path);
    }
    Ok(())
}

fn cmd_export(config: &AnalysisConfig, out: &Path) -> Result<()> {
    let datasets = load_all(config)?;
    let written = export_s11_traces(&datasets, out)
        .with_context(|| format!("exporting traces to {}", out.display()))?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; RUST_LOG wins over -v
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            dir,
            prefix,
            target_ghz,
            z0,
            good_db,
            moderate_db,
            summary,
        } => {
            let config = AnalysisConfig::new(dir)
                .with_file_prefix(prefix)
                .with_target_frequency(ghz_to_hz(target_ghz))
                .with_reference_impedance(z0)
                .with_thresholds(good_db, moderate_db);
            cmd_analyze(config, summary.as_deref())
        }
        Commands::Export { dir, prefix, out } => {
            let config = AnalysisConfig::new(dir).with_file_prefix(prefix);
            cmd_export(&config, &out)
        }
    }
}
