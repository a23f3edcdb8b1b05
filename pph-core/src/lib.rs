pub mod calculations;
pub mod error;
pub mod models;
pub mod queries;
pub mod regulation;

pub use calculations::{Pph21Calculator, Pph21Error};
pub use error::ErrorKind;
pub use models::*;
pub use queries::{
    calculate, calculate_pasal17, get_ptkp, get_ter_bulanan_rate, get_ter_harian_rate, version,
};
pub use regulation::{DeductionConfig, RegulationError, RegulationTables};
