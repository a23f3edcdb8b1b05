//! Regulation sets on disk.
//!
//! Loads [`RegulationTables`](pph_core::RegulationTables) from CSV and TOML
//! files so that a change in the statute only needs new data files.

mod loader;

pub use loader::{
    DeductionsRecord, MANIFEST_FILE, PASAL17_FILE, PTKP_FILE, Pasal17Record, PtkpRecord,
    RegulationLoader, RegulationLoaderError, RegulationManifest, TER_BULANAN_FILE,
    TER_HARIAN_FILE, TerRecord,
};

use std::path::PathBuf;

/// Directory of the regulation set shipped with this crate.
pub fn bundled_set_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("pmk-168-2023")
}
