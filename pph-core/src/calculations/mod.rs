//! Tax calculators.
//!
//! Every calculator returns a [`TaxResult`](crate::TaxResult) whose
//! breakdown is produced through [`BreakdownBuilder`].

pub mod breakdown;
pub mod common;
pub mod pph21;
pub mod pph22;
pub mod ppn;

pub use breakdown::BreakdownBuilder;
pub use pph21::{Pph21Calculator, Pph21Error};
pub use pph22::{Pph22Calculator, Pph22Input};
pub use ppn::{IndirectTaxError, PpnCalculator, PpnInput, PpnMode, PpnbmInput};
