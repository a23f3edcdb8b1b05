//! Tarif efektif rata-rata (PP 58/2023).
//!
//! Each category table maps gross income to a single effective rate: the
//! rate of the first bracket whose ceiling is at least the income. There is
//! no interpolation between brackets.

use serde::{Deserialize, Serialize};

use super::{RegulationError, check_brackets};
use crate::models::{Money, TerCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerBracket {
    /// Inclusive income ceiling; `None` for the top bracket.
    pub ceiling: Option<Money>,
    pub rate: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerTable {
    pub brackets: Vec<TerBracket>,
}

impl TerTable {
    pub fn new(brackets: Vec<TerBracket>) -> Self {
        Self { brackets }
    }

    pub fn rate_for(
        &self,
        bruto: Money,
    ) -> Money {
        self.brackets
            .iter()
            .find(|bracket| bracket.ceiling.is_none_or(|ceiling| bruto <= ceiling))
            .or(self.brackets.last())
            .map(|bracket| bracket.rate)
            .unwrap_or(Money::ZERO)
    }

    fn validate(
        &self,
        name: &str,
    ) -> Result<(), RegulationError> {
        check_brackets(
            name,
            self.brackets
                .iter()
                .map(|bracket| (bracket.ceiling, bracket.rate)),
        )
    }
}

/// One table per TER category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerCategoryTables {
    pub a: TerTable,
    pub b: TerTable,
    pub c: TerTable,
}

impl TerCategoryTables {
    pub fn get(
        &self,
        category: TerCategory,
    ) -> &TerTable {
        match category {
            TerCategory::A => &self.a,
            TerCategory::B => &self.b,
            TerCategory::C => &self.c,
        }
    }

    fn validate(
        &self,
        period: &str,
    ) -> Result<(), RegulationError> {
        for category in TerCategory::ALL {
            self.get(category)
                .validate(&format!("ter_{period} {category}"))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerSchedule {
    pub monthly: TerCategoryTables,
    pub daily: TerCategoryTables,
}

impl TerSchedule {
    /// Effective rate (TER bulanan) for a month's gross income.
    pub fn monthly_rate(
        &self,
        category: TerCategory,
        bruto: Money,
    ) -> Money {
        self.monthly.get(category).rate_for(bruto)
    }

    /// Effective rate (TER harian) for a day's gross income.
    pub fn daily_rate(
        &self,
        category: TerCategory,
        bruto: Money,
    ) -> Money {
        self.daily.get(category).rate_for(bruto)
    }

    pub fn validate(&self) -> Result<(), RegulationError> {
        self.monthly.validate("bulanan")?;
        self.daily.validate("harian")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::regulation::RegulationTables;

    fn rp(whole: i64) -> Money {
        Money::from_rupiah(whole).unwrap()
    }

    fn ter() -> &'static TerSchedule {
        &RegulationTables::builtin().ter
    }

    // =========================================================================
    // monthly_rate tests
    // =========================================================================

    #[test]
    fn monthly_rate_is_zero_below_first_ceiling() {
        assert_eq!(ter().monthly_rate(TerCategory::A, rp(5_400_000)), Money::ZERO);
        assert_eq!(ter().monthly_rate(TerCategory::B, rp(6_200_000)), Money::ZERO);
        assert_eq!(ter().monthly_rate(TerCategory::C, rp(6_600_000)), Money::ZERO);
    }

    #[test]
    fn monthly_rate_ceiling_is_inclusive() {
        assert_eq!(ter().monthly_rate(TerCategory::A, rp(10_050_000)), Money::from_raw(200));
        assert_eq!(
            ter().monthly_rate(TerCategory::A, Money::create(10_050_000, 1).unwrap()),
            Money::from_raw(225)
        );
    }

    #[test]
    fn monthly_rate_for_ten_million_by_category() {
        assert_eq!(ter().monthly_rate(TerCategory::A, rp(10_000_000)), Money::from_raw(200));
        assert_eq!(ter().monthly_rate(TerCategory::B, rp(10_000_000)), Money::from_raw(150));
        assert_eq!(ter().monthly_rate(TerCategory::C, rp(10_000_000)), Money::from_raw(150));
    }

    #[test]
    fn monthly_rate_top_bracket_is_unbounded() {
        for category in TerCategory::ALL {
            assert_eq!(
                ter().monthly_rate(category, rp(5_000_000_000)),
                Money::from_raw(3_400)
            );
        }
    }

    #[test]
    fn monthly_tables_have_expected_sizes() {
        assert_eq!(ter().monthly.a.brackets.len(), 44);
        assert_eq!(ter().monthly.b.brackets.len(), 40);
        assert_eq!(ter().monthly.c.brackets.len(), 41);
    }

    #[test]
    fn monthly_rates_never_decrease() {
        for category in TerCategory::ALL {
            let rates: Vec<_> = ter()
                .monthly
                .get(category)
                .brackets
                .iter()
                .map(|bracket| bracket.rate)
                .collect();

            assert!(rates.windows(2).all(|pair| pair[0] <= pair[1]), "{category}");
        }
    }

    // =========================================================================
    // daily_rate tests
    // =========================================================================

    #[test]
    fn daily_rate_by_band() {
        assert_eq!(ter().daily_rate(TerCategory::A, rp(750_000)), Money::from_raw(25));
        assert_eq!(ter().daily_rate(TerCategory::B, rp(1_000_000)), Money::from_raw(125));
        assert_eq!(ter().daily_rate(TerCategory::C, rp(3_000_000)), Money::from_raw(150));
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_accepts_builtin_schedule() {
        assert_eq!(ter().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let mut invalid = ter().clone();
        invalid.daily.c.brackets[0].rate = Money::from_raw(10_001);

        assert!(matches!(
            invalid.validate(),
            Err(RegulationError::RateOutOfRange { .. })
        ));
    }
}
