use std::io::Write;

use anyhow::{Context, Result};
use pph_core::calculations::{
    Pph22Calculator, Pph22Input, PpnCalculator, PpnInput, PpnMode, PpnbmInput,
};
use pph_core::{Money, Pph21Calculator, Pph21Input, PtkpStatus, RegulationTables, TaxResult};
use pph_data::RegulationLoader;
use tracing::debug;

use crate::cli::{CalculateArgs, Cli, Command};
use crate::render::{self, JsonReport, OutputFormat};
use crate::request::{self, CalculationRequest};

/// Runs one parsed command line, writing its output to `out`.
pub fn execute(
    cli: &Cli,
    out: &mut impl Write,
) -> Result<()> {
    let loaded;
    let tables = match &cli.tables {
        Some(dir) => {
            loaded = RegulationLoader::load_dir(dir)
                .with_context(|| format!("cannot load regulation set '{}'", dir.display()))?;
            &loaded
        }
        None => RegulationTables::builtin(),
    };
    debug!(version = %tables.version, "regulation tables ready");

    match &cli.command {
        Command::Calculate(args) => calculate(tables, args, out),
        Command::Ptkp { status } => ptkp(tables, status.as_deref(), out),
        Command::Pasal17 { pkp } => pasal17(tables, pkp, out),
        Command::TerRate {
            category,
            bruto,
            daily,
        } => ter_rate(tables, category, bruto, *daily, out),
        Command::Ppn {
            amount,
            rate,
            inclusive,
            ppnbm_rate,
            format,
        } => {
            let amount = Money::parse_indonesian(amount).context("invalid --amount")?;
            let rate = request::parse_rate(rate)?;
            let result = match ppnbm_rate {
                Some(ppnbm_rate) => PpnCalculator::calculate_with_ppnbm(&PpnbmInput {
                    dpp: amount,
                    ppn_rate: rate,
                    ppnbm_rate: request::parse_rate(ppnbm_rate)?,
                })?,
                None => PpnCalculator::calculate(&PpnInput {
                    dpp: amount,
                    rate,
                    mode: if *inclusive {
                        PpnMode::Inclusive
                    } else {
                        PpnMode::Exclusive
                    },
                })?,
            };
            write_result(&result, None, *format, out)
        }
        Command::Pph22 { dpp, rate, format } => {
            let input = Pph22Input {
                dpp: Money::parse_indonesian(dpp).context("invalid --dpp")?,
                rate: request::parse_rate(rate)?,
            };
            let result = Pph22Calculator::calculate(&input)?;
            write_result(&result, None, *format, out)
        }
        Command::Version => {
            writeln!(out, "pph {}", env!("CARGO_PKG_VERSION"))?;
            writeln!(out, "pph-core {}", pph_core::version())?;
            writeln!(out, "regulation {}", tables.version)?;
            Ok(())
        }
    }
}

/// Combines the request file (if any) with the flags into one input.
pub fn build_input(args: &CalculateArgs) -> Result<Pph21Input> {
    let base = match &args.request {
        Some(path) => CalculationRequest::load(path)?,
        None => CalculationRequest::default(),
    };
    let overrides = CalculationRequest {
        subject: args.subject.clone(),
        bruto_monthly: args.bruto.clone(),
        months_paid: args.months,
        pension_contribution: args.pension.clone(),
        zakat_or_donation: args.zakat.clone(),
        ptkp_status: args.ptkp.clone(),
        scheme: args.scheme.clone(),
        ter_category: args.ter_category.clone(),
        bonus: Vec::new(),
    };

    let mut input = base.merge(overrides).into_input()?;
    for bonus in &args.bonus {
        input.bonuses.push(request::parse_bonus(bonus)?);
    }
    Ok(input)
}

fn calculate(
    tables: &RegulationTables,
    args: &CalculateArgs,
    out: &mut impl Write,
) -> Result<()> {
    let input = build_input(args)?;
    debug!(subject = %input.subject_type, scheme = %input.scheme, "calculating");

    let result = Pph21Calculator::new(tables)
        .calculate(&input)
        .context("calculation failed")?;

    write_result(&result, Some(tables), args.format, out)
}

fn write_result(
    result: &TaxResult,
    tables: Option<&RegulationTables>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    match format {
        OutputFormat::Table => write!(out, "{}", render::render_table(result))?,
        OutputFormat::Json => {
            let mut report = JsonReport::new(result);
            if let Some(tables) = tables {
                report = report.with_regulation(tables);
            }
            writeln!(out, "{}", report.to_json()?)?;
        }
    }
    Ok(())
}

fn ptkp(
    tables: &RegulationTables,
    status: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let statuses = match status {
        Some(status) => vec![request::parse_status(status)?],
        None => PtkpStatus::ALL.to_vec(),
    };
    write!(out, "{}", render::render_ptkp(tables, &statuses))?;
    Ok(())
}

fn pasal17(
    tables: &RegulationTables,
    pkp: &str,
    out: &mut impl Write,
) -> Result<()> {
    let pkp = Money::parse_indonesian(pkp).context("invalid --pkp")?;
    let layers = tables.pasal17.layers(pkp)?;
    let total = tables.pasal17.apply(pkp)?;
    let marginal_rate = tables.pasal17.marginal_rate(pkp);

    write!(out, "{}", render::render_pasal17(pkp, marginal_rate, &layers, total))?;
    Ok(())
}

fn ter_rate(
    tables: &RegulationTables,
    category: &str,
    bruto: &str,
    daily: bool,
    out: &mut impl Write,
) -> Result<()> {
    let category = request::parse_category(category)?;
    let bruto = Money::parse_indonesian(bruto).context("invalid --bruto")?;
    let (table, rate) = if daily {
        ("harian", tables.ter.daily_rate(category, bruto))
    } else {
        ("bulanan", tables.ter.monthly_rate(category, bruto))
    };

    writeln!(out, "TER {table} kategori {category}: {}", rate.format_percent())?;
    writeln!(out, "PPh atas {}: {}", bruto.format(), bruto.checked_mul(rate)?.format())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    fn run(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(args)?;
        let mut out = Vec::new();
        execute(&cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_ter_rate_for_ten_million() {
        let text = run(&["pph", "ter-rate", "--category", "A", "--bruto", "10.000.000"]).unwrap();

        assert_eq!(
            text,
            "TER bulanan kategori A: 2,00%\nPPh atas 10.000.000,0000: 200.000,0000\n"
        );
    }

    #[test]
    fn test_ptkp_without_status_lists_all() {
        let text = run(&["pph", "ptkp"]).unwrap();

        assert_eq!(text.lines().count(), PtkpStatus::ALL.len());
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        let error = run(&["pph", "ptkp", "--status", "K/9"]).unwrap_err();

        assert_eq!(error.to_string(), "unknown PTKP status 'K/9'");
    }

    #[test]
    fn test_calculate_without_bruto_fails() {
        let error = run(&["pph", "calculate"]).unwrap_err();

        assert!(format!("{error:#}").contains("monthly gross income is required"));
    }

    #[test]
    fn test_ppn_inclusive_price() {
        let text = run(&[
            "pph",
            "ppn",
            "--amount",
            "111.000",
            "--rate",
            "11%",
            "--inclusive",
        ])
        .unwrap();

        assert!(text.contains("100.000,0000"), "{text}");
        assert!(text.lines().last().unwrap().ends_with("11.000,0000"), "{text}");
    }

    #[test]
    fn test_pph22_rejects_rate_above_one() {
        let error = run(&["pph", "pph22", "--dpp", "1.000.000", "--rate", "150%"]).unwrap_err();

        assert!(error.to_string().starts_with("rate must be between 0 and 1"));
    }

    #[test]
    fn test_flag_bonus_is_appended() {
        let args = CalculateArgs {
            bruto: Some("10.000.000".into()),
            bonus: vec!["12:5.000.000:Bonus".into()],
            ..CalculateArgs::default()
        };

        let input = build_input(&args).unwrap();

        assert_eq!(input.bonuses.len(), 1);
        assert_eq!(input.bonuses[0].amount, Money::from_rupiah(5_000_000).unwrap());
    }
}
