use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use pph_core::{PtkpStatus, RegulationTables, TerCategory};
use pph_data::{RegulationLoader, bundled_set_dir};
use tracing_subscriber::EnvFilter;

/// Validate a regulation set directory and print a summary.
///
/// The directory must contain:
/// - regulation.toml: version and [deductions] parameters
/// - ptkp.csv: status,amount
/// - pasal17.csv: upper_bound,rate (empty bound for the top bracket)
/// - ter_bulanan.csv / ter_harian.csv: category,ceiling,rate
#[derive(Parser, Debug)]
#[command(name = "pph-data-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Regulation set directory (defaults to the bundled PMK-168/2023 set)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Fail unless the set is identical to the compiled-in tables
    #[arg(long, default_value_t = false)]
    compare_builtin: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info")))
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();
    let dir = args.dir.unwrap_or_else(bundled_set_dir);

    let tables = RegulationLoader::load_dir(&dir)
        .with_context(|| format!("Failed to load regulation set: {}", dir.display()))?;

    print_summary(&tables);

    if args.compare_builtin {
        if &tables != RegulationTables::builtin() {
            bail!(
                "{} differs from the built-in {} tables",
                dir.display(),
                RegulationTables::builtin().version
            );
        }
        println!("Identical to the built-in tables.");
    }

    Ok(())
}

fn print_summary(tables: &RegulationTables) {
    println!("Regulation set {}", tables.version);

    println!("PTKP:");
    for status in PtkpStatus::ALL {
        println!("  {:<5} {:>20}", status, tables.ptkp.get(status).to_string());
    }

    println!("Pasal 17: {} brackets", tables.pasal17.brackets.len());
    for bracket in &tables.pasal17.brackets {
        let bound = bracket
            .upper_bound
            .map(|bound| bound.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  up to {:>24}  {}", bound, bracket.rate.format_percent());
    }

    for category in TerCategory::ALL {
        println!(
            "TER {category}: {} monthly brackets, {} daily brackets",
            tables.ter.monthly.get(category).brackets.len(),
            tables.ter.daily.get(category).brackets.len()
        );
    }

    let deductions = &tables.deductions;
    println!(
        "Biaya jabatan {} (max {}), biaya pensiun {} (max {})",
        deductions.occupational_cost_rate.format_percent(),
        deductions.occupational_cost_cap,
        deductions.pension_cost_rate.format_percent(),
        deductions.pension_cost_cap
    );
    println!(
        "Non-employee DPP share {}, PPh 26 rate {}",
        deductions.non_employee_dpp_share.format_percent(),
        deductions.pph26_rate.format_percent()
    );
}
