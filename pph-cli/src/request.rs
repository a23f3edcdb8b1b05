//! Calculation requests: TOML request files and command-line values.
//!
//! Amounts are written in Indonesian notation (`"10.000.000"`,
//! `"1.500.000,50"`) everywhere a human types them.
//!
//! ## Request file
//!
//! Every key is optional. Unknown keys are rejected.
//!
//! | Key | Type | Notes |
//! |------------------------|---------|----------------------------------------------|
//! | `subject` | string | e.g. `pegawai_tetap`, `bukan_pegawai`, `wpln` |
//! | `bruto_monthly` | amount | Required by the calculator |
//! | `months_paid` | integer | 1–12, default 12 |
//! | `pension_contribution` | amount | Monthly |
//! | `zakat_or_donation` | amount | Monthly |
//! | `ptkp_status` | string | `TK/0` … `K/3`, default `TK/0` |
//! | `scheme` | string | `lama` or `ter`, default `lama` |
//! | `ter_category` | string | `A`, `B` or `C`; derived from the status |
//! | `[[bonus]]` | table | `month`, `amount`, `name` |

use std::fs;
use std::path::Path;

use pph_core::{
    Bonus, ErrorKind, Money, MoneyError, Pph21Input, PtkpStatus, Scheme, SubjectType, TerCategory,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("cannot read request file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed request file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid amount for {field}: {source}")]
    Amount {
        field: String,
        #[source]
        source: MoneyError,
    },

    #[error("unknown {what} '{value}'")]
    UnknownValue { what: &'static str, value: String },

    #[error("invalid bonus '{0}', expected MONTH:AMOUNT:NAME")]
    MalformedBonus(String),
}

impl RequestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Amount { source, .. } => source.kind(),
            Self::UnknownValue { .. } => ErrorKind::InvalidArgument,
            Self::Io { .. } | Self::Toml(_) | Self::MalformedBonus(_) => ErrorKind::Parse,
        }
    }
}

fn amount(
    field: &str,
    text: &str,
) -> Result<Money, RequestError> {
    Money::parse_indonesian(text).map_err(|source| {
        tracing::warn!(field, input = text, "rejected amount");
        RequestError::Amount {
            field: field.to_string(),
            source,
        }
    })
}

fn optional_amount(
    field: &str,
    text: Option<&str>,
) -> Result<Option<Money>, RequestError> {
    text.map(|text| amount(field, text)).transpose()
}

pub fn parse_subject(s: &str) -> Result<SubjectType, RequestError> {
    SubjectType::parse(s).ok_or_else(|| RequestError::UnknownValue {
        what: "subject type",
        value: s.to_string(),
    })
}

pub fn parse_status(s: &str) -> Result<PtkpStatus, RequestError> {
    PtkpStatus::parse(s).ok_or_else(|| RequestError::UnknownValue {
        what: "PTKP status",
        value: s.to_string(),
    })
}

pub fn parse_scheme(s: &str) -> Result<Scheme, RequestError> {
    Scheme::parse(s).ok_or_else(|| RequestError::UnknownValue {
        what: "scheme",
        value: s.to_string(),
    })
}

pub fn parse_category(s: &str) -> Result<TerCategory, RequestError> {
    TerCategory::parse(s).ok_or_else(|| RequestError::UnknownValue {
        what: "TER category",
        value: s.to_string(),
    })
}

/// Parses a rate written as a fraction (`0,11`) or a percentage (`11%`,
/// `1,5%`).
pub fn parse_rate(s: &str) -> Result<Money, RequestError> {
    match s.trim().strip_suffix('%') {
        Some(percent) => {
            let value = amount("rate", percent.trim_end())?;
            value.checked_div(100).map_err(|source| RequestError::Amount {
                field: "rate".to_string(),
                source,
            })
        }
        None => amount("rate", s),
    }
}

/// Parses a `MONTH:AMOUNT:NAME` bonus. The name may itself contain `:`.
///
/// The month is only checked to be a number here; the calculator rejects
/// months outside 1–12.
pub fn parse_bonus(s: &str) -> Result<Bonus, RequestError> {
    let mut parts = s.splitn(3, ':');
    let (Some(month), Some(value), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(RequestError::MalformedBonus(s.to_string()));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(RequestError::MalformedBonus(s.to_string()));
    }
    let month: u8 = month
        .trim()
        .parse()
        .map_err(|_| RequestError::MalformedBonus(s.to_string()))?;

    Ok(Bonus::new(month, amount("bonus", value)?, name))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BonusEntry {
    pub month: u8,
    pub amount: String,
    pub name: String,
}

/// Request file contents, before amounts and codes are parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculationRequest {
    pub subject: Option<String>,
    pub bruto_monthly: Option<String>,
    pub months_paid: Option<u8>,
    pub pension_contribution: Option<String>,
    pub zakat_or_donation: Option<String>,
    pub ptkp_status: Option<String>,
    pub scheme: Option<String>,
    /// Derived from `ptkp_status` when absent.
    pub ter_category: Option<String>,
    #[serde(default)]
    pub bonus: Vec<BonusEntry>,
}

impl CalculationRequest {
    pub fn from_toml(text: &str) -> Result<Self, RequestError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, RequestError> {
        let text = fs::read_to_string(path).map_err(|source| RequestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let request = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), bonuses = request.bonus.len(), "request loaded");
        Ok(request)
    }

    /// Fields set in `other` replace the ones here; bonuses are appended.
    pub fn merge(
        mut self,
        other: CalculationRequest,
    ) -> Self {
        self.subject = other.subject.or(self.subject);
        self.bruto_monthly = other.bruto_monthly.or(self.bruto_monthly);
        self.months_paid = other.months_paid.or(self.months_paid);
        self.pension_contribution = other.pension_contribution.or(self.pension_contribution);
        self.zakat_or_donation = other.zakat_or_donation.or(self.zakat_or_donation);
        self.ptkp_status = other.ptkp_status.or(self.ptkp_status);
        self.scheme = other.scheme.or(self.scheme);
        self.ter_category = other.ter_category.or(self.ter_category);
        self.bonus.extend(other.bonus);
        self
    }

    /// Parses every field into a calculator input.
    ///
    /// A missing gross amount is left as `None`; the calculator reports it.
    pub fn into_input(self) -> Result<Pph21Input, RequestError> {
        let ptkp_status = self
            .ptkp_status
            .as_deref()
            .map(parse_status)
            .transpose()?
            .unwrap_or_default();
        let ter_category = match self.ter_category.as_deref() {
            Some(category) => parse_category(category)?,
            None => TerCategory::for_status(ptkp_status),
        };
        let bonuses = self
            .bonus
            .iter()
            .map(|entry| {
                let value = amount("bonus", &entry.amount)?;
                Ok(Bonus::new(entry.month, value, entry.name.trim()))
            })
            .collect::<Result<Vec<_>, RequestError>>()?;

        let mut input = Pph21Input {
            bruto_monthly: optional_amount("bruto_monthly", self.bruto_monthly.as_deref())?,
            pension_contribution: optional_amount(
                "pension_contribution",
                self.pension_contribution.as_deref(),
            )?,
            zakat_or_donation: optional_amount(
                "zakat_or_donation",
                self.zakat_or_donation.as_deref(),
            )?,
            ptkp_status,
            ter_category,
            bonuses,
            ..Pph21Input::default()
        };
        if let Some(subject) = self.subject.as_deref() {
            input.subject_type = parse_subject(subject)?;
        }
        if let Some(scheme) = self.scheme.as_deref() {
            input.scheme = parse_scheme(scheme)?;
        }
        if let Some(months) = self.months_paid {
            input.months_paid = months;
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rupiah(amount: i64) -> Money {
        Money::from_rupiah(amount).unwrap()
    }

    // =========================================================================
    // Bonus flags
    // =========================================================================

    #[test]
    fn test_parse_bonus() {
        let bonus = parse_bonus("12:5.000.000:Bonus akhir tahun").unwrap();

        assert_eq!(bonus, Bonus::new(12, rupiah(5_000_000), "Bonus akhir tahun"));
    }

    #[test]
    fn test_parse_bonus_keeps_colons_in_name() {
        let bonus = parse_bonus("3:1.000.000:THR: Idul Fitri").unwrap();

        assert_eq!(bonus.name, "THR: Idul Fitri");
    }

    #[test]
    fn test_parse_bonus_rejects_malformed_input() {
        for input in ["12:5.000.000", "x:5.000.000:Bonus", "12:5.000.000: "] {
            let error = parse_bonus(input).unwrap_err();
            assert!(matches!(error, RequestError::MalformedBonus(_)), "{input}");
        }
    }

    #[test]
    fn test_parse_bonus_reports_bad_amount() {
        let error = parse_bonus("12:lima juta:Bonus").unwrap_err();

        assert!(matches!(error, RequestError::Amount { .. }));
        assert_eq!(error.kind(), ErrorKind::Parse);
    }

    // =========================================================================
    // Rates
    // =========================================================================

    #[test]
    fn test_parse_rate_accepts_fraction_and_percentage() {
        assert_eq!(parse_rate("0,11").unwrap(), Money::from_raw(1_100));
        assert_eq!(parse_rate("11%").unwrap(), Money::from_raw(1_100));
        assert_eq!(parse_rate("1,5 %").unwrap(), Money::from_raw(150));
    }

    #[test]
    fn test_parse_rate_rejects_garbage() {
        assert!(parse_rate("sebelas persen").is_err());
        assert!(parse_rate("%").is_err());
    }

    // =========================================================================
    // Request files
    // =========================================================================

    #[test]
    fn test_request_into_input() {
        let request = CalculationRequest::from_toml(
            r#"
            subject = "pegawai_tetap"
            bruto_monthly = "10.000.000"
            months_paid = 6
            pension_contribution = "100.000"
            ptkp_status = "K/1"
            scheme = "ter"

            [[bonus]]
            month = 6
            amount = "2.500.000,50"
            name = "THR"
            "#,
        )
        .unwrap();

        let input = request.into_input().unwrap();

        let expected = Pph21Input::new(SubjectType::PegawaiTetap, rupiah(10_000_000))
            .with_months_paid(6)
            .with_pension_contribution(rupiah(100_000))
            .with_ptkp_status(PtkpStatus::K1)
            .with_scheme(Scheme::Ter)
            .with_ter_category(TerCategory::B)
            .with_bonus(Bonus::new(6, Money::create(2_500_000, 5000).unwrap(), "THR"));
        assert_eq!(input, expected);
    }

    #[test]
    fn test_empty_request_uses_defaults() {
        let input = CalculationRequest::default().into_input().unwrap();

        assert_eq!(input, Pph21Input::default());
    }

    #[test]
    fn test_explicit_category_is_kept() {
        let request = CalculationRequest {
            ptkp_status: Some("K/3".into()),
            ter_category: Some("a".into()),
            ..CalculationRequest::default()
        };

        assert_eq!(request.into_input().unwrap().ter_category, TerCategory::A);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let error = CalculationRequest::from_toml("salary = \"1.000\"").unwrap_err();

        assert!(matches!(error, RequestError::Toml(_)));
    }

    #[test]
    fn test_unknown_codes_are_invalid_arguments() {
        let request = CalculationRequest {
            subject: Some("karyawan".into()),
            ..CalculationRequest::default()
        };

        let error = request.into_input().unwrap_err();

        assert_eq!(error.kind(), ErrorKind::InvalidArgument);
        assert_eq!(error.to_string(), "unknown subject type 'karyawan'");
    }

    #[test]
    fn test_merge_prefers_overrides_and_appends_bonuses() {
        let base = CalculationRequest {
            bruto_monthly: Some("8.000.000".into()),
            scheme: Some("lama".into()),
            bonus: vec![BonusEntry {
                month: 3,
                amount: "1.000.000".into(),
                name: "THR".into(),
            }],
            ..CalculationRequest::default()
        };
        let overrides = CalculationRequest {
            scheme: Some("ter".into()),
            bonus: vec![BonusEntry {
                month: 12,
                amount: "2.000.000".into(),
                name: "Bonus".into(),
            }],
            ..CalculationRequest::default()
        };

        let merged = base.merge(overrides);

        assert_eq!(merged.bruto_monthly.as_deref(), Some("8.000.000"));
        assert_eq!(merged.scheme.as_deref(), Some("ter"));
        assert_eq!(merged.bonus.len(), 2);
        assert_eq!(merged.bonus[1].month, 12);
    }
}
