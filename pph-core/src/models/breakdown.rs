use serde::{Deserialize, Serialize};

use super::Money;

/// Presentation role of a breakdown row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownVariant {
    Normal,
    Section,
    Subtotal,
    Total,
    Group,
    Spacer,
}

/// How the row's value should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Currency,
    /// The value is a rate (`0.0500` = 5%).
    Percent,
    /// The label carries all the information; the value is zero.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub label: String,
    pub value: Money,
    pub variant: BreakdownVariant,
    pub kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Outcome of a calculation: the amount due plus the rows explaining it.
///
/// The last row is the single `Total` row and its value equals `total_tax`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub total_tax: Money,
    pub breakdown: Vec<BreakdownRow>,
}

impl TaxResult {
    pub fn rows_with_variant(
        &self,
        variant: BreakdownVariant,
    ) -> impl Iterator<Item = &BreakdownRow> {
        self.breakdown.iter().filter(move |row| row.variant == variant)
    }
}
