//! PPh 22 withholding on goods transactions: `DPP × rate`.

use serde::{Deserialize, Serialize};

use super::breakdown::BreakdownBuilder;
use super::ppn::{IndirectTaxError, check_rate};
use crate::models::{Money, TaxResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pph22Input {
    pub dpp: Money,
    pub rate: Money,
}

pub struct Pph22Calculator;

impl Pph22Calculator {
    pub fn calculate(input: &Pph22Input) -> Result<TaxResult, IndirectTaxError> {
        let rate = check_rate(input.rate)?;
        let tax = input.dpp.checked_mul(rate)?;

        let mut builder = BreakdownBuilder::new();
        builder.section("PPh 22");
        builder.line("DPP", input.dpp);
        builder.rate("Tarif", rate);
        builder.section("Pemotongan");
        builder.line("PPh 22", tax);
        builder.subtotal("Jumlah PPh 22")?;

        Ok(builder.finish("Total PPh 22")?)
    }
}
