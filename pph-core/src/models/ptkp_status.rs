use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
}

/// Marital status plus number of dependents (0–3) used to look up PTKP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PtkpStatus {
    #[default]
    #[serde(rename = "TK/0")]
    Tk0,
    #[serde(rename = "TK/1")]
    Tk1,
    #[serde(rename = "TK/2")]
    Tk2,
    #[serde(rename = "TK/3")]
    Tk3,
    #[serde(rename = "K/0")]
    K0,
    #[serde(rename = "K/1")]
    K1,
    #[serde(rename = "K/2")]
    K2,
    #[serde(rename = "K/3")]
    K3,
}

impl PtkpStatus {
    pub const ALL: [PtkpStatus; 8] = [
        Self::Tk0,
        Self::Tk1,
        Self::Tk2,
        Self::Tk3,
        Self::K0,
        Self::K1,
        Self::K2,
        Self::K3,
    ];

    pub fn marital_status(&self) -> MaritalStatus {
        match self {
            Self::Tk0 | Self::Tk1 | Self::Tk2 | Self::Tk3 => MaritalStatus::Single,
            Self::K0 | Self::K1 | Self::K2 | Self::K3 => MaritalStatus::Married,
        }
    }

    pub fn dependents(&self) -> u8 {
        match self {
            Self::Tk0 | Self::K0 => 0,
            Self::Tk1 | Self::K1 => 1,
            Self::Tk2 | Self::K2 => 2,
            Self::Tk3 | Self::K3 => 3,
        }
    }

    /// Returns `None` for more than three dependents.
    pub fn from_parts(
        marital_status: MaritalStatus,
        dependents: u8,
    ) -> Option<Self> {
        let status = match (marital_status, dependents) {
            (MaritalStatus::Single, 0) => Self::Tk0,
            (MaritalStatus::Single, 1) => Self::Tk1,
            (MaritalStatus::Single, 2) => Self::Tk2,
            (MaritalStatus::Single, 3) => Self::Tk3,
            (MaritalStatus::Married, 0) => Self::K0,
            (MaritalStatus::Married, 1) => Self::K1,
            (MaritalStatus::Married, 2) => Self::K2,
            (MaritalStatus::Married, 3) => Self::K3,
            _ => return None,
        };
        Some(status)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tk0 => "TK/0",
            Self::Tk1 => "TK/1",
            Self::Tk2 => "TK/2",
            Self::Tk3 => "TK/3",
            Self::K0 => "K/0",
            Self::K1 => "K/1",
            Self::K2 => "K/2",
            Self::K3 => "K/3",
        }
    }

    /// Accepts `TK/0` style codes as well as the compact `TK0`, in any case.
    pub fn parse(s: &str) -> Option<Self> {
        let code = s.trim().to_ascii_uppercase().replace('/', "");
        match code.as_str() {
            "TK0" => Some(Self::Tk0),
            "TK1" => Some(Self::Tk1),
            "TK2" => Some(Self::Tk2),
            "TK3" => Some(Self::Tk3),
            "K0" => Some(Self::K0),
            "K1" => Some(Self::K1),
            "K2" => Some(Self::K2),
            "K3" => Some(Self::K3),
            _ => None,
        }
    }
}

impl fmt::Display for PtkpStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.pad(self.as_str())
    }
}
