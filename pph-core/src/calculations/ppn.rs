//! PPN (value added tax) and PPnBM (luxury-goods sales tax).
//!
//! PPN is charged on the DPP (tax base). When a price already includes PPN
//! the DPP is extracted first: `DPP = price / (1 + rate)`, rounded half away
//! from zero, and the PPN is whatever remains of the price.
//!
//! ```
//! use pph_core::calculations::{PpnCalculator, PpnInput, PpnMode};
//! use pph_core::Money;
//!
//! let input = PpnInput {
//!     dpp: Money::from_rupiah(111_000).unwrap(),
//!     rate: Money::from_raw(1_100),
//!     mode: PpnMode::Inclusive,
//! };
//!
//! let result = PpnCalculator::calculate(&input).unwrap();
//!
//! assert_eq!(result.total_tax, Money::from_rupiah(11_000).unwrap());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::breakdown::BreakdownBuilder;
use crate::error::ErrorKind;
use crate::models::{Money, MoneyError, TaxResult};

/// Errors shared by the transaction tax calculators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndirectTaxError {
    #[error("rate must be between 0 and 1, got {0}")]
    InvalidRate(Money),

    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl IndirectTaxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRate(_) => ErrorKind::InvalidArgument,
            Self::Money(error) => error.kind(),
        }
    }
}

pub(crate) fn check_rate(rate: Money) -> Result<Money, IndirectTaxError> {
    if rate.is_negative() || rate > Money::ONE {
        return Err(IndirectTaxError::InvalidRate(rate));
    }
    Ok(rate)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PpnMode {
    /// The amount is the DPP; PPN is added on top.
    #[default]
    Exclusive,
    /// The amount is a price that already includes PPN.
    Inclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PpnInput {
    /// DPP in exclusive mode, the PPN-inclusive price otherwise.
    pub dpp: Money,
    pub rate: Money,
    pub mode: PpnMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PpnbmInput {
    pub dpp: Money,
    pub ppn_rate: Money,
    pub ppnbm_rate: Money,
}

pub struct PpnCalculator;

impl PpnCalculator {
    pub fn calculate(input: &PpnInput) -> Result<TaxResult, IndirectTaxError> {
        let rate = check_rate(input.rate)?;

        let (dpp, ppn) = match input.mode {
            PpnMode::Exclusive => (input.dpp, input.dpp.checked_mul(rate)?),
            PpnMode::Inclusive => {
                let dpp = input.dpp.checked_div_by(Money::ONE.checked_add(rate)?)?;
                (dpp, input.dpp.checked_sub(dpp)?)
            }
        };

        let mut builder = BreakdownBuilder::new();
        builder.section("Dasar pengenaan pajak");
        if input.mode == PpnMode::Inclusive {
            builder.line("Harga termasuk PPN", input.dpp);
        }
        builder.line("DPP", dpp);
        builder.rate("Tarif PPN", rate);

        builder.section("PPN");
        builder.line("PPN", ppn);
        builder.subtotal("Jumlah PPN")?;

        Ok(builder.finish("Total PPN")?)
    }

    pub fn calculate_with_ppnbm(input: &PpnbmInput) -> Result<TaxResult, IndirectTaxError> {
        let ppn_rate = check_rate(input.ppn_rate)?;
        let ppnbm_rate = check_rate(input.ppnbm_rate)?;

        let ppn = input.dpp.checked_mul(ppn_rate)?;
        let ppnbm = input.dpp.checked_mul(ppnbm_rate)?;

        let mut builder = BreakdownBuilder::new();
        builder.section("Dasar pengenaan pajak");
        builder.line("DPP", input.dpp);
        builder.rate("Tarif PPN", ppn_rate);
        builder.rate("Tarif PPnBM", ppnbm_rate);

        builder.section("PPN dan PPnBM");
        builder.line("PPN", ppn);
        builder.line("PPnBM", ppnbm);
        builder.subtotal("Jumlah PPN dan PPnBM")?;

        Ok(builder.finish("Total PPN + PPnBM")?)
    }
}
