//! Stateless lookups against the built-in regulation tables.
//!
//! These mirror the individual steps of [`Pph21Calculator`] for callers that
//! only need one table value. To use another regulation set, query its
//! [`RegulationTables`] directly.

use crate::calculations::{Pph21Calculator, Pph21Error};
use crate::models::{Money, MoneyError, Pph21Input, PtkpStatus, TaxResult, TerCategory};
use crate::regulation::RegulationTables;

/// Annual PTKP for `status`.
pub fn get_ptkp(status: PtkpStatus) -> Money {
    RegulationTables::builtin().ptkp.get(status)
}

/// Annual Pasal 17 tax on `pkp`.
///
/// ```
/// use pph_core::{Money, calculate_pasal17};
///
/// let tax = calculate_pasal17(Money::from_rupiah(65_000_000).unwrap()).unwrap();
/// assert_eq!(tax, Money::from_rupiah(3_750_000).unwrap());
/// ```
pub fn calculate_pasal17(pkp: Money) -> Result<Money, MoneyError> {
    RegulationTables::builtin().pasal17.apply(pkp)
}

/// TER bulanan rate for a month's gross income.
pub fn get_ter_bulanan_rate(
    category: TerCategory,
    bruto: Money,
) -> Money {
    RegulationTables::builtin()
        .ter
        .monthly_rate(category, bruto)
}

/// TER harian rate for a day's gross income.
pub fn get_ter_harian_rate(
    category: TerCategory,
    bruto: Money,
) -> Money {
    RegulationTables::builtin().ter.daily_rate(category, bruto)
}

pub fn calculate(input: &Pph21Input) -> Result<TaxResult, Pph21Error> {
    Pph21Calculator::new(RegulationTables::builtin()).calculate(input)
}

/// Version of this library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn get_ptkp_for_married_with_three_dependents() {
        assert_eq!(get_ptkp(PtkpStatus::K3), Money::from_rupiah(72_000_000).unwrap());
    }

    #[test]
    fn ter_rates_for_ten_million() {
        let bruto = Money::from_rupiah(10_000_000).unwrap();

        assert_eq!(get_ter_bulanan_rate(TerCategory::A, bruto), Money::from_raw(200));
        assert_eq!(get_ter_harian_rate(TerCategory::A, bruto), Money::from_raw(200));
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
