use std::fmt;

use serde::{Deserialize, Serialize};

use super::PtkpStatus;

/// Withholding method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Annualized progressive computation under Pasal 17.
    #[default]
    Lama,
    /// Monthly effective rate (tarif efektif rata-rata).
    Ter,
}

impl Scheme {
    pub fn requires_annualization(&self) -> bool {
        matches!(self, Self::Lama)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lama => "lama",
            Self::Ter => "ter",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lama" => Some(Self::Lama),
            "ter" => Some(Self::Ter),
            _ => None,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// TER table selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerCategory {
    #[default]
    A,
    B,
    C,
}

impl TerCategory {
    pub const ALL: [TerCategory; 3] = [Self::A, Self::B, Self::C];

    /// Category prescribed for a PTKP status.
    pub fn for_status(status: PtkpStatus) -> Self {
        match status {
            PtkpStatus::Tk0 | PtkpStatus::Tk1 | PtkpStatus::K0 => Self::A,
            PtkpStatus::Tk2 | PtkpStatus::Tk3 | PtkpStatus::K1 => Self::B,
            PtkpStatus::K2 | PtkpStatus::K3 => Self::C,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "A" | "a" => Some(Self::A),
            "B" | "b" => Some(Self::B),
            "C" | "c" => Some(Self::C),
            _ => None,
        }
    }
}

impl fmt::Display for TerCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.pad(self.as_str())
    }
}
