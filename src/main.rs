use anyhow::Result;
use clap::{Parser, Subcommand};
use mps_charts::aggregate::{self, AggFn};
use mps_charts::chart;
use mps_charts::dataset::{self, Family, Metric};
use mps_charts::ratio;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mps-charts")]
#[command(about = "Render comparison charts from maximum planar subgraph benchmark results")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render per-family metric comparison charts
    Approx {
        /// Directory containing the result files
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory for charts
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Print aggregated and variance tables before rendering
        #[arg(short, long, default_value = "false")]
        verbose: bool,
    },

    /// Render approximation-ratio charts against the exact baseline
    Ratio {
        /// Directory containing the result files
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory for charts
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Print aggregated ratio tables before rendering
        #[arg(short, long, default_value = "false")]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Approx {
            input,
            output,
            verbose,
        } => run_approx(&input, &output, verbose),
        Commands::Ratio {
            input,
            output,
            verbose,
        } => run_ratio(&input, &output, verbose),
    }
}

/// Metric comparison pipeline: one chart per (metric, family) pair,
/// always reduced with the arithmetic mean.
fn run_approx(input: &Path, output: &Path, verbose: bool) -> Result<()> {
    let func = AggFn::Average;

    for &metric in Metric::all() {
        for &family in Family::all() {
            let rows = dataset::load_family(input, family)?;
            let agg = aggregate::aggregate(&rows, metric, func);
            let variance = aggregate::variance_by_instance(&rows, metric);

            if verbose {
                println!(
                    "\n[{} / {}] {} measurement rows",
                    metric.column(),
                    family.label(),
                    rows.len()
                );
                aggregate::print_table(&agg, metric, func);
                aggregate::print_variance(&variance, metric);
            }

            chart::render_approx(&agg, &variance, metric, family, func, output)?;
        }
    }

    Ok(())
}

/// Approximation-ratio pipeline: one chart per metric, normalized
/// against the FacialWalks baseline.
fn run_ratio(input: &Path, output: &Path, verbose: bool) -> Result<()> {
    let func = AggFn::Average;

    for &metric in Metric::all() {
        let rows = dataset::load_ratio_input(input)?;
        let ratios = ratio::ratio_to_baseline(&rows, metric);
        let agg = ratio::aggregate_ratios(&ratios, func);

        if verbose {
            println!(
                "\n[{}] {} measurement rows, {} ratio rows",
                metric.column(),
                rows.len(),
                ratios.len()
            );
            aggregate::print_table(&agg, metric, func);
        }

        chart::render_ratio(&agg, metric, func, output)?;
    }

    Ok(())
}
