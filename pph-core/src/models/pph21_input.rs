use serde::{Deserialize, Serialize};

use super::{Money, PtkpStatus, Scheme, SubjectType, TerCategory};

/// A non-recurring payment (bonus, THR) received in a given month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    /// Calendar month, 1–12.
    pub month: u8,
    pub amount: Money,
    pub name: String,
}

impl Bonus {
    pub fn new(
        month: u8,
        amount: Money,
        name: impl Into<String>,
    ) -> Self {
        Self {
            month,
            amount,
            name: name.into(),
        }
    }
}

/// Description of employment income to be withheld on.
///
/// Monthly amounts (`bruto_monthly`, `pension_contribution`,
/// `zakat_or_donation`) are what the recipient receives or pays per month;
/// the calculator annualizes them when the scheme requires it.
///
/// ```
/// use pph_core::{Money, Pph21Input, PtkpStatus, Scheme, SubjectType, TerCategory};
///
/// let input = Pph21Input::new(SubjectType::PegawaiTetap, Money::from_rupiah(10_000_000).unwrap())
///     .with_ptkp_status(PtkpStatus::K1)
///     .with_scheme(Scheme::Ter)
///     .with_ter_category(TerCategory::B);
///
/// assert_eq!(input.months_paid, 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pph21Input {
    pub subject_type: SubjectType,
    pub bruto_monthly: Option<Money>,
    pub months_paid: u8,
    pub pension_contribution: Option<Money>,
    pub zakat_or_donation: Option<Money>,
    pub ptkp_status: PtkpStatus,
    pub scheme: Scheme,
    pub ter_category: TerCategory,
    pub bonuses: Vec<Bonus>,
}

impl Default for Pph21Input {
    fn default() -> Self {
        Self {
            subject_type: SubjectType::default(),
            bruto_monthly: None,
            months_paid: 12,
            pension_contribution: None,
            zakat_or_donation: None,
            ptkp_status: PtkpStatus::default(),
            scheme: Scheme::default(),
            ter_category: TerCategory::default(),
            bonuses: Vec::new(),
        }
    }
}

impl Pph21Input {
    pub fn new(
        subject_type: SubjectType,
        bruto_monthly: Money,
    ) -> Self {
        Self {
            subject_type,
            bruto_monthly: Some(bruto_monthly),
            ..Self::default()
        }
    }

    pub fn with_months_paid(
        mut self,
        months_paid: u8,
    ) -> Self {
        self.months_paid = months_paid;
        self
    }

    pub fn with_pension_contribution(
        mut self,
        amount: Money,
    ) -> Self {
        self.pension_contribution = Some(amount);
        self
    }

    pub fn with_zakat_or_donation(
        mut self,
        amount: Money,
    ) -> Self {
        self.zakat_or_donation = Some(amount);
        self
    }

    pub fn with_ptkp_status(
        mut self,
        status: PtkpStatus,
    ) -> Self {
        self.ptkp_status = status;
        self
    }

    pub fn with_scheme(
        mut self,
        scheme: Scheme,
    ) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_ter_category(
        mut self,
        category: TerCategory,
    ) -> Self {
        self.ter_category = category;
        self
    }

    pub fn with_bonus(
        mut self,
        bonus: Bonus,
    ) -> Self {
        self.bonuses.push(bonus);
        self
    }
}
