//! Text and JSON output for the `pph` commands.

use std::fmt::Write as _;

use pph_core::regulation::Pasal17Layer;
use pph_core::{
    BreakdownRow, BreakdownVariant, Money, PtkpStatus, RegulationTables, TaxResult, ValueKind,
};
use serde::Serialize;

const LABEL_WIDTH: usize = 44;
const VALUE_WIDTH: usize = 24;

/// Output format of `pph calculate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn value_text(row: &BreakdownRow) -> String {
    match row.kind {
        ValueKind::Currency => row.value.format(),
        ValueKind::Percent => row.value.format_percent(),
        ValueKind::Text => String::new(),
    }
}

fn rule(
    out: &mut String,
    ch: char,
) {
    let line: String = std::iter::repeat_n(ch, LABEL_WIDTH + VALUE_WIDTH + 2).collect();
    out.push_str(&line);
    out.push('\n');
}

fn value_line(
    out: &mut String,
    indent: usize,
    label: &str,
    value: &str,
    note: Option<&str>,
) {
    let width = LABEL_WIDTH.saturating_sub(indent);
    let _ = write!(out, "{:indent$}{label:<width$}  {value:>VALUE_WIDTH$}", "");
    if let Some(note) = note {
        let _ = write!(out, "  ({note})");
    }
    out.push('\n');
}

/// Renders a breakdown as an aligned two-column worksheet.
pub fn render_table(result: &TaxResult) -> String {
    let mut out = String::new();

    for row in &result.breakdown {
        match row.variant {
            BreakdownVariant::Section => {
                if !out.is_empty() && !out.ends_with("\n\n") {
                    out.push('\n');
                }
                let _ = writeln!(out, "{}", row.label);
            }
            BreakdownVariant::Group => {
                let _ = writeln!(out, "  {}", row.label);
            }
            BreakdownVariant::Spacer => out.push('\n'),
            BreakdownVariant::Normal => {
                let value = value_text(row);
                value_line(&mut out, 4, &row.label, &value, row.note.as_deref());
            }
            BreakdownVariant::Subtotal => {
                value_line(&mut out, 2, &row.label, &row.value.format(), row.note.as_deref());
            }
            BreakdownVariant::Total => {
                out.push('\n');
                rule(&mut out, '=');
                value_line(&mut out, 0, &row.label, &row.value.format(), None);
            }
        }
    }

    out
}

/// JSON document written with `--format json`.
///
/// Money values are the raw scaled integers; divide by `scale`.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regulation: Option<&'a str>,
    pub scale: i64,
    #[serde(flatten)]
    pub result: &'a TaxResult,
}

impl<'a> JsonReport<'a> {
    pub fn new(result: &'a TaxResult) -> Self {
        Self {
            regulation: None,
            scale: Money::SCALE,
            result,
        }
    }

    /// Names the regulation set the result was computed under.
    pub fn with_regulation(
        mut self,
        tables: &'a RegulationTables,
    ) -> Self {
        self.regulation = Some(&tables.version);
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// PTKP amounts for the given statuses, one per line.
pub fn render_ptkp(
    tables: &RegulationTables,
    statuses: &[PtkpStatus],
) -> String {
    let mut out = String::new();
    for status in statuses {
        value_line(&mut out, 0, status.as_str(), &tables.ptkp.get(*status).format(), None);
    }
    out
}

/// Pasal 17 layers followed by the annual tax.
pub fn render_pasal17(
    pkp: Money,
    marginal_rate: Money,
    layers: &[Pasal17Layer],
    total: Money,
) -> String {
    let mut out = String::new();
    value_line(&mut out, 0, "PKP setahun", &pkp.format(), None);
    value_line(&mut out, 0, "Tarif marjinal", &marginal_rate.format_percent(), None);
    for layer in layers {
        let label = format!("{} x {}", layer.rate.format_percent(), layer.portion.format());
        value_line(&mut out, 2, &label, &layer.tax.format(), None);
    }
    rule(&mut out, '-');
    value_line(&mut out, 0, "PPh Pasal 17 setahun", &total.format(), None);
    out
}
