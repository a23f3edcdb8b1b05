//! Progressive income tax rates of Pasal 17 UU PPh.
//!
//! Brackets are stored by cumulative upper bound, so the statutory schedule
//! of UU HPP reads:
//!
//! | Upper bound      | Rate |
//! |------------------|------|
//! | Rp60.000.000     | 5%   |
//! | Rp250.000.000    | 15%  |
//! | Rp500.000.000    | 25%  |
//! | Rp5.000.000.000  | 30%  |
//! | (none)           | 35%  |
//!
//! Each bracket's tax is rounded to whole rupiah (half away from zero)
//! before the brackets are summed.

use serde::{Deserialize, Serialize};

use super::{RegulationError, check_brackets};
use crate::models::{Money, MoneyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pasal17Bracket {
    /// Inclusive upper bound of taxable income; `None` for the top bracket.
    pub upper_bound: Option<Money>,
    pub rate: Money,
}

/// Tax on the slice of PKP falling inside one bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pasal17Layer {
    pub lower_bound: Money,
    pub upper_bound: Option<Money>,
    pub rate: Money,
    pub portion: Money,
    pub tax: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pasal17Schedule {
    pub brackets: Vec<Pasal17Bracket>,
}

impl Pasal17Schedule {
    pub fn new(brackets: Vec<Pasal17Bracket>) -> Self {
        Self { brackets }
    }

    /// Splits `pkp` across the brackets it reaches. Empty for `pkp <= 0`.
    pub fn layers(
        &self,
        pkp: Money,
    ) -> Result<Vec<Pasal17Layer>, MoneyError> {
        let mut layers = Vec::new();
        let mut remaining = pkp;
        let mut lower_bound = Money::ZERO;

        for bracket in &self.brackets {
            if remaining <= Money::ZERO {
                break;
            }

            let portion = match bracket.upper_bound {
                Some(upper) => remaining.min(upper.checked_sub(lower_bound)?),
                None => remaining,
            };
            let tax = portion.checked_mul(bracket.rate)?.round_to_rupiah()?;

            layers.push(Pasal17Layer {
                lower_bound,
                upper_bound: bracket.upper_bound,
                rate: bracket.rate,
                portion,
                tax,
            });

            remaining = remaining.checked_sub(portion)?;
            if let Some(upper) = bracket.upper_bound {
                lower_bound = upper;
            }
        }

        Ok(layers)
    }

    /// Annual tax on `pkp`.
    pub fn apply(
        &self,
        pkp: Money,
    ) -> Result<Money, MoneyError> {
        self.layers(pkp)?
            .iter()
            .try_fold(Money::ZERO, |total, layer| total.checked_add(layer.tax))
    }

    pub fn top_rate(&self) -> Money {
        self.brackets
            .last()
            .map(|bracket| bracket.rate)
            .unwrap_or(Money::ZERO)
    }

    /// Rate of the bracket containing `pkp`.
    pub fn marginal_rate(
        &self,
        pkp: Money,
    ) -> Money {
        self.brackets
            .iter()
            .find(|bracket| bracket.upper_bound.is_none_or(|upper| pkp <= upper))
            .map(|bracket| bracket.rate)
            .unwrap_or_else(|| self.top_rate())
    }

    pub fn validate(&self) -> Result<(), RegulationError> {
        check_brackets(
            "pasal17",
            self.brackets
                .iter()
                .map(|bracket| (bracket.upper_bound, bracket.rate)),
        )
    }
}
