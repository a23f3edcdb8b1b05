use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use pph_core::regulation::{
    Pasal17Bracket, Pasal17Schedule, PtkpTable, TerBracket, TerCategoryTables, TerSchedule,
    TerTable,
};
use pph_core::{
    DeductionConfig, ErrorKind, MaritalStatus, Money, MoneyError, PtkpStatus, RegulationError,
    RegulationTables, TerCategory,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

pub const MANIFEST_FILE: &str = "regulation.toml";
pub const PTKP_FILE: &str = "ptkp.csv";
pub const PASAL17_FILE: &str = "pasal17.csv";
pub const TER_BULANAN_FILE: &str = "ter_bulanan.csv";
pub const TER_HARIAN_FILE: &str = "ter_harian.csv";

/// Errors that can occur when loading a regulation set.
#[derive(Debug, Error)]
pub enum RegulationLoaderError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Unknown PTKP status '{0}'")]
    UnknownStatus(String),

    #[error("Unknown TER category '{0}'")]
    UnknownCategory(String),

    #[error("PTKP status {0} is missing")]
    MissingStatus(PtkpStatus),

    #[error("PTKP status {0} is listed more than once")]
    DuplicateStatus(PtkpStatus),

    /// An amount or rate has more than four decimal places or is too large.
    #[error("Unrepresentable amount: {0}")]
    InexactAmount(#[from] MoneyError),

    #[error("Invalid regulation set: {0}")]
    Invalid(#[from] RegulationError),
}

impl RegulationLoaderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CsvParse(_) | Self::TomlParse(_) => ErrorKind::Parse,
            Self::InexactAmount(error) => error.kind(),
            Self::Invalid(error) => error.kind(),
            Self::Io { .. }
            | Self::UnknownStatus(_)
            | Self::UnknownCategory(_)
            | Self::MissingStatus(_)
            | Self::DuplicateStatus(_) => ErrorKind::InvalidArgument,
        }
    }
}

impl From<csv::Error> for RegulationLoaderError {
    fn from(err: csv::Error) -> Self {
        RegulationLoaderError::CsvParse(err.to_string())
    }
}

impl From<toml::de::Error> for RegulationLoaderError {
    fn from(err: toml::de::Error) -> Self {
        RegulationLoaderError::TomlParse(err.to_string())
    }
}

/// `regulation.toml`: the set's identifier and its deduction parameters.
///
/// Decimal values are written as strings (`"0.05"`) so they are read
/// exactly.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RegulationManifest {
    pub version: String,
    pub deductions: Option<DeductionsRecord>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeductionsRecord {
    pub occupational_cost_rate: Decimal,
    pub occupational_cost_cap: Decimal,
    pub pension_cost_rate: Decimal,
    pub pension_cost_cap: Decimal,
    pub non_employee_dpp_share: Decimal,
    pub pph26_rate: Decimal,
}

impl TryFrom<&DeductionsRecord> for DeductionConfig {
    type Error = RegulationLoaderError;

    fn try_from(record: &DeductionsRecord) -> Result<Self, Self::Error> {
        Ok(DeductionConfig {
            occupational_cost_rate: Money::try_from(record.occupational_cost_rate)?,
            occupational_cost_cap: Money::try_from(record.occupational_cost_cap)?,
            pension_cost_rate: Money::try_from(record.pension_cost_rate)?,
            pension_cost_cap: Money::try_from(record.pension_cost_cap)?,
            non_employee_dpp_share: Money::try_from(record.non_employee_dpp_share)?,
            pph26_rate: Money::try_from(record.pph26_rate)?,
        })
    }
}

/// A row of `ptkp.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PtkpRecord {
    pub status: String,
    pub amount: Decimal,
}

/// A row of `pasal17.csv`; an empty `upper_bound` marks the top bracket.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Pasal17Record {
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

/// A row of `ter_bulanan.csv` or `ter_harian.csv`; an empty `ceiling`
/// marks the top bracket of the category.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TerRecord {
    pub category: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub ceiling: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn to_money(value: Option<Decimal>) -> Result<Option<Money>, RegulationLoaderError> {
    value
        .map(Money::try_from)
        .transpose()
        .map_err(RegulationLoaderError::from)
}

fn csv_records<R, T>(reader: R) -> Result<Vec<T>, RegulationLoaderError>
where
    R: Read,
    T: serde::de::DeserializeOwned,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: T = result?;
        records.push(record);
    }

    Ok(records)
}

/// Loader for regulation sets stored as CSV and TOML files.
///
/// A set is a directory holding `regulation.toml`, `ptkp.csv`,
/// `pasal17.csv`, `ter_bulanan.csv` and `ter_harian.csv`. Each file can
/// also be parsed on its own from any reader.
pub struct RegulationLoader;

impl RegulationLoader {
    pub fn parse_manifest<R: Read>(mut reader: R) -> Result<RegulationManifest, RegulationLoaderError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|source| RegulationLoaderError::Io {
                path: PathBuf::from(MANIFEST_FILE),
                source,
            })?;
        Ok(toml::from_str(&text)?)
    }

    /// Parse PTKP thresholds. Every status must appear exactly once.
    pub fn parse_ptkp<R: Read>(reader: R) -> Result<PtkpTable, RegulationLoaderError> {
        let mut single: [Option<Money>; 4] = [None; 4];
        let mut married: [Option<Money>; 4] = [None; 4];

        for record in csv_records::<_, PtkpRecord>(reader)? {
            let status = PtkpStatus::parse(&record.status)
                .ok_or_else(|| RegulationLoaderError::UnknownStatus(record.status.clone()))?;
            let slots = match status.marital_status() {
                MaritalStatus::Single => &mut single,
                MaritalStatus::Married => &mut married,
            };
            let slot = &mut slots[usize::from(status.dependents())];
            if slot.is_some() {
                return Err(RegulationLoaderError::DuplicateStatus(status));
            }
            *slot = Some(Money::try_from(record.amount)?);
        }

        let mut table = PtkpTable {
            single: [Money::ZERO; 4],
            married: [Money::ZERO; 4],
        };
        for status in PtkpStatus::ALL {
            let index = usize::from(status.dependents());
            let (source, target) = match status.marital_status() {
                MaritalStatus::Single => (&single, &mut table.single),
                MaritalStatus::Married => (&married, &mut table.married),
            };
            target[index] = source[index].ok_or(RegulationLoaderError::MissingStatus(status))?;
        }

        Ok(table)
    }

    pub fn parse_pasal17<R: Read>(reader: R) -> Result<Pasal17Schedule, RegulationLoaderError> {
        let brackets = csv_records::<_, Pasal17Record>(reader)?
            .into_iter()
            .map(|record| {
                Ok(Pasal17Bracket {
                    upper_bound: to_money(record.upper_bound)?,
                    rate: Money::try_from(record.rate)?,
                })
            })
            .collect::<Result<Vec<_>, RegulationLoaderError>>()?;

        Ok(Pasal17Schedule::new(brackets))
    }

    /// Parse a TER table file. Rows are grouped by category in file order.
    pub fn parse_ter<R: Read>(reader: R) -> Result<TerCategoryTables, RegulationLoaderError> {
        let mut tables = TerCategoryTables {
            a: TerTable::new(Vec::new()),
            b: TerTable::new(Vec::new()),
            c: TerTable::new(Vec::new()),
        };

        for record in csv_records::<_, TerRecord>(reader)? {
            let category = TerCategory::parse(&record.category)
                .ok_or_else(|| RegulationLoaderError::UnknownCategory(record.category.clone()))?;
            let bracket = TerBracket {
                ceiling: to_money(record.ceiling)?,
                rate: Money::try_from(record.rate)?,
            };
            match category {
                TerCategory::A => tables.a.brackets.push(bracket),
                TerCategory::B => tables.b.brackets.push(bracket),
                TerCategory::C => tables.c.brackets.push(bracket),
            }
        }

        Ok(tables)
    }

    /// Load and validate the regulation set stored in `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<RegulationTables, RegulationLoaderError> {
        let dir = dir.as_ref();
        debug!(dir = %dir.display(), "loading regulation set");

        let manifest = Self::parse_manifest(open(dir, MANIFEST_FILE)?)?;
        let deductions = match &manifest.deductions {
            Some(record) => DeductionConfig::try_from(record)?,
            None => DeductionConfig::default(),
        };

        let tables = RegulationTables {
            version: manifest.version,
            ptkp: Self::parse_ptkp(open(dir, PTKP_FILE)?)?,
            pasal17: Self::parse_pasal17(open(dir, PASAL17_FILE)?)?,
            ter: TerSchedule {
                monthly: Self::parse_ter(open(dir, TER_BULANAN_FILE)?)?,
                daily: Self::parse_ter(open(dir, TER_HARIAN_FILE)?)?,
            },
            deductions,
        };
        tables.validate()?;

        info!(version = %tables.version, dir = %dir.display(), "regulation set loaded");
        Ok(tables)
    }
}

fn open(
    dir: &Path,
    name: &str,
) -> Result<File, RegulationLoaderError> {
    let path = dir.join(name);
    File::open(&path).map_err(|source| RegulationLoaderError::Io { path, source })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn rp(whole: i64) -> Money {
        Money::from_rupiah(whole).unwrap()
    }

    const PTKP_CSV: &str = "\
status,amount
TK/0,54000000
TK/1,58500000
TK/2,63000000
TK/3,67500000
K/0,58500000
K/1,63000000
K/2,67500000
K/3,72000000
";

    // =========================================================================
    // manifest tests
    // =========================================================================

    #[test]
    fn test_parse_manifest_with_deductions() {
        let toml = r#"
version = "TEST-1"

[deductions]
occupational_cost_rate = "0.05"
occupational_cost_cap = "6000000"
pension_cost_rate = "0.05"
pension_cost_cap = "2400000"
non_employee_dpp_share = "0.5"
pph26_rate = "0.2"
"#;

        let manifest = RegulationLoader::parse_manifest(toml.as_bytes()).unwrap();

        assert_eq!(manifest.version, "TEST-1");
        let record = manifest.deductions.unwrap();
        assert_eq!(record.pph26_rate, dec!(0.2));
        assert_eq!(DeductionConfig::try_from(&record).unwrap(), DeductionConfig::default());
    }

    #[test]
    fn test_parse_manifest_without_deductions() {
        let manifest = RegulationLoader::parse_manifest("version = \"X\"".as_bytes()).unwrap();

        assert!(manifest.deductions.is_none());
    }

    #[test]
    fn test_parse_manifest_invalid_toml() {
        let result = RegulationLoader::parse_manifest("version = ".as_bytes());

        let error = result.unwrap_err();
        assert!(matches!(error, RegulationLoaderError::TomlParse(_)));
        assert_eq!(error.kind(), ErrorKind::Parse);
    }

    // =========================================================================
    // PTKP tests
    // =========================================================================

    #[test]
    fn test_parse_ptkp_all_statuses() {
        let table = RegulationLoader::parse_ptkp(PTKP_CSV.as_bytes()).unwrap();

        assert_eq!(table.get(PtkpStatus::Tk0), rp(54_000_000));
        assert_eq!(table.get(PtkpStatus::K3), rp(72_000_000));
    }

    #[test]
    fn test_parse_ptkp_missing_status() {
        let csv = PTKP_CSV.replace("K/3,72000000\n", "");

        let result = RegulationLoader::parse_ptkp(csv.as_bytes());

        assert!(matches!(
            result,
            Err(RegulationLoaderError::MissingStatus(PtkpStatus::K3))
        ));
    }

    #[test]
    fn test_parse_ptkp_duplicate_status() {
        let csv = format!("{PTKP_CSV}TK0,1\n");

        let result = RegulationLoader::parse_ptkp(csv.as_bytes());

        assert!(matches!(
            result,
            Err(RegulationLoaderError::DuplicateStatus(PtkpStatus::Tk0))
        ));
    }

    #[test]
    fn test_parse_ptkp_unknown_status() {
        let csv = "status,amount\nK/9,1\n";

        let result = RegulationLoader::parse_ptkp(csv.as_bytes());

        assert!(matches!(result, Err(RegulationLoaderError::UnknownStatus(s)) if s == "K/9"));
    }

    // =========================================================================
    // Pasal 17 tests
    // =========================================================================

    #[test]
    fn test_parse_pasal17_unbounded_top_bracket() {
        let csv = "upper_bound,rate\n60000000,0.05\n,0.15\n";

        let schedule = RegulationLoader::parse_pasal17(csv.as_bytes()).unwrap();

        assert_eq!(schedule.brackets.len(), 2);
        assert_eq!(schedule.brackets[0].upper_bound, Some(rp(60_000_000)));
        assert_eq!(schedule.brackets[1].upper_bound, None);
        assert_eq!(schedule.brackets[1].rate, Money::from_raw(1_500));
    }

    #[test]
    fn test_parse_pasal17_rejects_inexact_rate() {
        let csv = "upper_bound,rate\n,0.123456\n";

        let result = RegulationLoader::parse_pasal17(csv.as_bytes());

        assert!(matches!(
            result,
            Err(RegulationLoaderError::InexactAmount(MoneyError::InexactValue(_)))
        ));
    }

    #[test]
    fn test_parse_pasal17_bad_decimal() {
        let csv = "upper_bound,rate\nabc,0.05\n";

        let result = RegulationLoader::parse_pasal17(csv.as_bytes());

        assert!(matches!(result, Err(RegulationLoaderError::CsvParse(_))));
    }

    // =========================================================================
    // TER tests
    // =========================================================================

    #[test]
    fn test_parse_ter_groups_by_category() {
        let csv = "\
category,ceiling,rate
A,750000,0.0025
A,,0.02
B,750000,0.0025
B,,0.0175
C,,0.015
";

        let tables = RegulationLoader::parse_ter(csv.as_bytes()).unwrap();

        assert_eq!(tables.a.brackets.len(), 2);
        assert_eq!(tables.b.rate_for(rp(1_000_000)), Money::from_raw(175));
        assert_eq!(tables.c.rate_for(rp(1)), Money::from_raw(150));
    }

    #[test]
    fn test_parse_ter_unknown_category() {
        let csv = "category,ceiling,rate\nD,,0.01\n";

        let result = RegulationLoader::parse_ter(csv.as_bytes());

        assert!(matches!(result, Err(RegulationLoaderError::UnknownCategory(c)) if c == "D"));
    }

    // =========================================================================
    // load_dir tests
    // =========================================================================

    #[test]
    fn test_load_dir_missing_directory() {
        let result = RegulationLoader::load_dir("/nonexistent/regulation/set");

        assert!(matches!(result, Err(RegulationLoaderError::Io { .. })));
    }
}
