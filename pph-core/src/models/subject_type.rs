use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of income recipient, which selects the withholding rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    #[default]
    PegawaiTetap,
    Pensiunan,
    PegawaiTidakTetap,
    BukanPegawai,
    PesertaKegiatan,
    ProgramPensiun,
    MantanPegawai,
    /// Foreign taxpayer, withheld under PPh 26.
    Wpln,
}

impl SubjectType {
    pub const ALL: [SubjectType; 8] = [
        Self::PegawaiTetap,
        Self::Pensiunan,
        Self::PegawaiTidakTetap,
        Self::BukanPegawai,
        Self::PesertaKegiatan,
        Self::ProgramPensiun,
        Self::MantanPegawai,
        Self::Wpln,
    ];

    /// Recipients paid every month who are entitled to PTKP.
    pub fn is_periodic_employee(&self) -> bool {
        matches!(self, Self::PegawaiTetap | Self::Pensiunan | Self::PegawaiTidakTetap)
    }

    /// Recipients withheld per payment, without PTKP.
    pub fn is_per_event(&self) -> bool {
        matches!(
            self,
            Self::BukanPegawai | Self::PesertaKegiatan | Self::ProgramPensiun | Self::MantanPegawai
        )
    }

    /// Income tax article the withholding falls under.
    pub fn article(&self) -> u8 {
        match self {
            Self::Wpln => 26,
            _ => 21,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PegawaiTetap => "pegawai_tetap",
            Self::Pensiunan => "pensiunan",
            Self::PegawaiTidakTetap => "pegawai_tidak_tetap",
            Self::BukanPegawai => "bukan_pegawai",
            Self::PesertaKegiatan => "peserta_kegiatan",
            Self::ProgramPensiun => "program_pensiun",
            Self::MantanPegawai => "mantan_pegawai",
            Self::Wpln => "wpln",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PegawaiTetap => "Pegawai tetap",
            Self::Pensiunan => "Pensiunan",
            Self::PegawaiTidakTetap => "Pegawai tidak tetap",
            Self::BukanPegawai => "Bukan pegawai",
            Self::PesertaKegiatan => "Peserta kegiatan",
            Self::ProgramPensiun => "Program pensiun",
            Self::MantanPegawai => "Mantan pegawai",
            Self::Wpln => "WPLN (PPh 26)",
        }
    }

    /// Accepts the snake_case code, with `-` allowed in place of `_`.
    pub fn parse(s: &str) -> Option<Self> {
        let code = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|subject| subject.as_str() == code)
    }
}

impl fmt::Display for SubjectType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.pad(self.label())
    }
}
