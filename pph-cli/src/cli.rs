use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::render::OutputFormat;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// PPh 21/26 withholding calculator.
///
/// Uses the built-in PMK-168/2023 tables unless `--tables` points at a
/// regulation set on disk. Amounts use Indonesian notation: `.` groups
/// thousands and `,` starts the fraction (`1.500.000,50`).
#[derive(Debug, Parser)]
#[command(name = "pph", version)]
pub struct Cli {
    /// Directory holding a regulation set (regulation.toml plus CSV tables).
    #[arg(long, global = true, value_name = "DIR")]
    pub tables: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `pph_core=trace`. Overrides `RUST_LOG`.
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the withholding for one recipient.
    Calculate(CalculateArgs),

    /// Show the annual PTKP for one status, or for all of them.
    Ptkp {
        /// `TK/0` … `K/3`.
        #[arg(long)]
        status: Option<String>,
    },

    /// Apply the Pasal 17 brackets to an annual PKP.
    Pasal17 {
        #[arg(long)]
        pkp: String,
    },

    /// Look up a TER rate.
    TerRate {
        /// `A`, `B` or `C`.
        #[arg(long)]
        category: String,

        /// Gross income of the month (or the day with `--daily`).
        #[arg(long)]
        bruto: String,

        /// Use the daily table instead of the monthly one.
        #[arg(long)]
        daily: bool,
    },

    /// PPN on a DPP, or extracted from a PPN-inclusive price.
    Ppn {
        /// DPP, or the price including PPN with `--inclusive`.
        #[arg(long)]
        amount: String,

        /// Fraction (`0,11`) or percentage (`11%`).
        #[arg(long)]
        rate: String,

        #[arg(long)]
        inclusive: bool,

        /// Also charge PPnBM at this rate.
        #[arg(long, conflicts_with = "inclusive")]
        ppnbm_rate: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// PPh 22 on a goods transaction.
    Pph22 {
        #[arg(long)]
        dpp: String,

        /// Fraction (`0,015`) or percentage (`1,5%`).
        #[arg(long)]
        rate: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Print program, library and regulation versions.
    Version,
}

/// Inputs of `pph calculate`.
///
/// Flags override the matching keys of `--request`; `--bonus` entries are
/// added to the file's bonuses.
#[derive(Debug, Default, Args)]
pub struct CalculateArgs {
    /// TOML request file.
    #[arg(long, value_name = "FILE")]
    pub request: Option<PathBuf>,

    /// Recipient type, e.g. `pegawai_tetap`, `bukan_pegawai`, `wpln`.
    #[arg(long)]
    pub subject: Option<String>,

    /// Monthly gross income.
    #[arg(long)]
    pub bruto: Option<String>,

    /// Months paid in the year (1–12).
    #[arg(long)]
    pub months: Option<u8>,

    /// Monthly pension contribution paid by the employee.
    #[arg(long)]
    pub pension: Option<String>,

    /// Monthly zakat or mandatory donation.
    #[arg(long)]
    pub zakat: Option<String>,

    /// PTKP status, `TK/0` … `K/3`.
    #[arg(long)]
    pub ptkp: Option<String>,

    /// `lama` or `ter`.
    #[arg(long)]
    pub scheme: Option<String>,

    /// `A`, `B` or `C`; derived from the PTKP status when omitted.
    #[arg(long)]
    pub ter_category: Option<String>,

    /// Non-recurring payment as `MONTH:AMOUNT:NAME`. Repeatable.
    #[arg(long, value_name = "MONTH:AMOUNT:NAME")]
    pub bonus: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}
