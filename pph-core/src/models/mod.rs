mod breakdown;
mod money;
mod pph21_input;
mod ptkp_status;
mod scheme;
mod subject_type;

pub use breakdown::{BreakdownRow, BreakdownVariant, TaxResult, ValueKind};
pub use money::{Money, MoneyError};
pub use pph21_input::{Bonus, Pph21Input};
pub use ptkp_status::{MaritalStatus, PtkpStatus};
pub use scheme::{Scheme, TerCategory};
pub use subject_type::SubjectType;
