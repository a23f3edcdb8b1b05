//! Versioned regulatory data used by the calculators.
//!
//! A [`RegulationTables`] bundles everything that changes when the statute
//! changes: PTKP thresholds, the Pasal 17 schedule, the TER tables and the
//! deduction parameters. The tables in force are compiled in and available
//! through [`RegulationTables::builtin`]; other sets can be constructed (or
//! loaded from disk by `pph-data`) and passed to the calculators instead.
//!
//! # Example
//!
//! ```
//! use pph_core::{Money, PtkpStatus, RegulationTables};
//!
//! let tables = RegulationTables::builtin();
//!
//! assert_eq!(tables.version, "PMK-168/2023");
//! assert_eq!(tables.ptkp.get(PtkpStatus::Tk0), Money::from_rupiah(54_000_000).unwrap());
//! ```

mod builtin;
pub mod pasal17;
pub mod ptkp;
pub mod ter;

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::ErrorKind;
use crate::models::{Money, PtkpStatus};

pub use pasal17::{Pasal17Bracket, Pasal17Layer, Pasal17Schedule};
pub use ptkp::PtkpTable;
pub use ter::{TerBracket, TerCategoryTables, TerSchedule, TerTable};

/// Errors reported when a regulation set is internally inconsistent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegulationError {
    /// PTKP must grow with each dependent.
    #[error("PTKP for {status} must exceed the threshold with one dependent fewer")]
    PtkpNotIncreasing { status: PtkpStatus },

    #[error("{table}: bracket {index} does not lie above the previous bracket")]
    UnorderedBrackets { table: String, index: usize },

    #[error("{table}: rate {rate} is outside 0..=1")]
    RateOutOfRange { table: String, rate: Money },

    /// Exactly one unbounded bracket must close every table.
    #[error("{table}: the last bracket must be the only unbounded one")]
    MissingUnboundedBracket { table: String },

    #[error("{table}: no brackets")]
    Empty { table: String },

    #[error("deduction parameter {field} is invalid: {value}")]
    InvalidDeduction { field: &'static str, value: Money },
}

impl RegulationError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

/// Checks bracket tables: ascending bounds, rates in `0..=1` and a single
/// trailing unbounded bracket.
pub(crate) fn check_brackets(
    table: &str,
    brackets: impl Iterator<Item = (Option<Money>, Money)>,
) -> Result<(), RegulationError> {
    let mut previous: Option<Money> = None;
    let mut unbounded_seen = false;
    let mut count = 0;

    for (index, (bound, rate)) in brackets.enumerate() {
        count += 1;

        if unbounded_seen {
            return Err(RegulationError::MissingUnboundedBracket {
                table: table.to_string(),
            });
        }
        if rate.is_negative() || rate > Money::ONE {
            return Err(RegulationError::RateOutOfRange {
                table: table.to_string(),
                rate,
            });
        }

        match bound {
            Some(bound) => {
                let ascending = match previous {
                    Some(previous) => bound > previous,
                    None => bound > Money::ZERO,
                };
                if !ascending {
                    return Err(RegulationError::UnorderedBrackets {
                        table: table.to_string(),
                        index,
                    });
                }
                previous = Some(bound);
            }
            None => unbounded_seen = true,
        }
    }

    if count == 0 {
        return Err(RegulationError::Empty {
            table: table.to_string(),
        });
    }
    if !unbounded_seen {
        return Err(RegulationError::MissingUnboundedBracket {
            table: table.to_string(),
        });
    }
    Ok(())
}

/// Deduction and flat-rate parameters applied around the rate tables.
///
/// Rates are encoded as [`Money`] (`0.0500` = 5%), caps are annual amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionConfig {
    /// Biaya jabatan rate for employees.
    pub occupational_cost_rate: Money,
    pub occupational_cost_cap: Money,
    /// Biaya pensiun rate for retirees.
    pub pension_cost_rate: Money,
    pub pension_cost_cap: Money,
    /// Share of gross treated as DPP for non-employees.
    pub non_employee_dpp_share: Money,
    pub pph26_rate: Money,
}

impl Default for DeductionConfig {
    fn default() -> Self {
        Self {
            occupational_cost_rate: Money::from_raw(500),
            occupational_cost_cap: Money::rupiah(6_000_000),
            pension_cost_rate: Money::from_raw(500),
            pension_cost_cap: Money::rupiah(2_400_000),
            non_employee_dpp_share: Money::from_raw(5_000),
            pph26_rate: Money::from_raw(2_000),
        }
    }
}

impl DeductionConfig {
    /// Validates the configuration parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RegulationError::InvalidDeduction`] if a rate or share is
    /// outside `0..=1`, or a cap is negative.
    pub fn validate(&self) -> Result<(), RegulationError> {
        let rates = [
            ("occupational_cost_rate", self.occupational_cost_rate),
            ("pension_cost_rate", self.pension_cost_rate),
            ("non_employee_dpp_share", self.non_employee_dpp_share),
            ("pph26_rate", self.pph26_rate),
        ];
        for (field, value) in rates {
            if value.is_negative() || value > Money::ONE {
                return Err(RegulationError::InvalidDeduction { field, value });
            }
        }

        let caps = [
            ("occupational_cost_cap", self.occupational_cost_cap),
            ("pension_cost_cap", self.pension_cost_cap),
        ];
        for (field, value) in caps {
            if value.is_negative() {
                return Err(RegulationError::InvalidDeduction { field, value });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulationTables {
    /// Identifier of the regulation the set implements.
    pub version: String,
    pub ptkp: PtkpTable,
    pub pasal17: Pasal17Schedule,
    pub ter: TerSchedule,
    pub deductions: DeductionConfig,
}

impl RegulationTables {
    /// Builds a fresh copy of the compiled-in tables.
    pub fn pmk_168_2023() -> Self {
        builtin::tables()
    }

    /// Shared instance of the compiled-in tables, built on first use.
    pub fn builtin() -> &'static RegulationTables {
        static TABLES: OnceLock<RegulationTables> = OnceLock::new();
        TABLES.get_or_init(|| {
            let tables = Self::pmk_168_2023();
            debug!(version = %tables.version, "built-in regulation tables initialized");
            tables
        })
    }

    pub fn validate(&self) -> Result<(), RegulationError> {
        self.ptkp.validate()?;
        self.pasal17.validate()?;
        self.ter.validate()?;
        self.deductions.validate()
    }
}
