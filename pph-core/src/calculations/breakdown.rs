//! Append-only builder for [`TaxResult`] breakdowns.
//!
//! Subtotals and the total are computed by the builder, never supplied by
//! the caller, which keeps every result consistent:
//!
//! - a `Subtotal` row equals the sum of the `Normal` rows since the last
//!   `Section` or `Subtotal` row;
//! - the single `Total` row equals the sum of all `Subtotal` rows, and is
//!   the result's `total_tax`.
//!
//! Sections that are not closed by a subtotal are informational.
//!
//! # Example
//!
//! ```
//! use pph_core::calculations::BreakdownBuilder;
//! use pph_core::Money;
//!
//! let mut builder = BreakdownBuilder::new();
//! builder.section("Masa pajak");
//! builder.line("Januari", Money::from_rupiah(200_000).unwrap());
//! builder.line("Februari", Money::from_rupiah(200_000).unwrap());
//! builder.subtotal("Jumlah").unwrap();
//!
//! let result = builder.finish("Total PPh 21").unwrap();
//!
//! assert_eq!(result.total_tax, Money::from_rupiah(400_000).unwrap());
//! assert_eq!(result.breakdown.len(), 5);
//! ```

use crate::models::{BreakdownRow, BreakdownVariant, Money, MoneyError, TaxResult, ValueKind};

#[derive(Debug, Default)]
pub struct BreakdownBuilder {
    rows: Vec<BreakdownRow>,
}

impl BreakdownBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new section; unclosed lines before it stay informational.
    pub fn section(
        &mut self,
        label: impl Into<String>,
    ) -> &mut Self {
        self.push(label, Money::ZERO, BreakdownVariant::Section, ValueKind::Text, None)
    }

    pub fn group(
        &mut self,
        label: impl Into<String>,
    ) -> &mut Self {
        self.push(label, Money::ZERO, BreakdownVariant::Group, ValueKind::Text, None)
    }

    pub fn spacer(&mut self) -> &mut Self {
        self.push("", Money::ZERO, BreakdownVariant::Spacer, ValueKind::Text, None)
    }

    /// Informational row without an amount.
    pub fn text(
        &mut self,
        label: impl Into<String>,
    ) -> &mut Self {
        self.push(label, Money::ZERO, BreakdownVariant::Normal, ValueKind::Text, None)
    }

    /// Currency row counted toward the next subtotal.
    pub fn line(
        &mut self,
        label: impl Into<String>,
        value: Money,
    ) -> &mut Self {
        self.line_with_note(label, value, None::<String>)
    }

    pub fn line_with_note(
        &mut self,
        label: impl Into<String>,
        value: Money,
        note: Option<impl Into<String>>,
    ) -> &mut Self {
        self.push(
            label,
            value,
            BreakdownVariant::Normal,
            ValueKind::Currency,
            note.map(Into::into),
        )
    }

    /// Rate row. Keep it in an informational section, subtotals count it.
    pub fn rate(
        &mut self,
        label: impl Into<String>,
        rate: Money,
    ) -> &mut Self {
        self.push(label, rate, BreakdownVariant::Normal, ValueKind::Percent, None)
    }

    /// Closes the running sum with a subtotal row and returns its value.
    pub fn subtotal(
        &mut self,
        label: impl Into<String>,
    ) -> Result<Money, MoneyError> {
        let value = self.open_rows_sum()?;
        self.push(label, value, BreakdownVariant::Subtotal, ValueKind::Currency, None);
        Ok(value)
    }

    /// Appends the total row and produces the result.
    pub fn finish(
        mut self,
        total_label: impl Into<String>,
    ) -> Result<TaxResult, MoneyError> {
        let total = self
            .rows
            .iter()
            .filter(|row| row.variant == BreakdownVariant::Subtotal)
            .try_fold(Money::ZERO, |sum, row| sum.checked_add(row.value))?;
        self.push(total_label, total, BreakdownVariant::Total, ValueKind::Currency, None);
        Ok(TaxResult {
            total_tax: total,
            breakdown: self.rows,
        })
    }

    fn open_rows_sum(&self) -> Result<Money, MoneyError> {
        self.rows
            .iter()
            .rev()
            .take_while(|row| {
                !matches!(row.variant, BreakdownVariant::Section | BreakdownVariant::Subtotal)
            })
            .filter(|row| row.variant == BreakdownVariant::Normal)
            .try_fold(Money::ZERO, |sum, row| sum.checked_add(row.value))
    }

    fn push(
        &mut self,
        label: impl Into<String>,
        value: Money,
        variant: BreakdownVariant,
        kind: ValueKind,
        note: Option<String>,
    ) -> &mut Self {
        self.rows.push(BreakdownRow {
            label: label.into(),
            value,
            variant,
            kind,
            note,
        });
        self
    }
}
