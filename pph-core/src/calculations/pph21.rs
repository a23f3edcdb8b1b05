//! PPh 21/26 withholding on employment income.
//!
//! The calculator supports the two withholding schemes in force:
//!
//! # Progressive scheme (`Scheme::Lama`)
//!
//! Used for periodic employees. The monthly gross is annualized and reduced
//! to taxable income before the Pasal 17 schedule is applied:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Annual gross = monthly gross × 12 |
//! | 2    | Biaya jabatan (employees) or biaya pensiun (retirees) = min(rate × gross, cap) |
//! | 3    | Pension contribution × 12 and zakat/donation × 12 |
//! | 4    | Net = gross − step 2 − step 3 |
//! | 5    | PKP = net − PTKP, floored at zero, rounded down to Rp1.000 |
//! | 6    | Annual tax = Pasal 17 on PKP |
//! | 7    | Partial years: annual tax × months paid / 12 |
//!
//! Bonuses are taxed by recomputing the annual position with each bonus
//! added in input order; a bonus's tax is the increase it causes.
//!
//! # Effective-rate scheme (`Scheme::Ter`)
//!
//! No PTKP and no annualization. Each paid month withholds a per-payment tax
//! on the monthly gross, which depends on the subject:
//!
//! | Subject | Per-payment tax |
//! |---------|-----------------|
//! | Periodic employees | gross × TER bulanan rate for (category, gross) |
//! | Bukan pegawai | Pasal 17 on 50% of gross |
//! | Peserta kegiatan, program pensiun, mantan pegawai | Pasal 17 on gross |
//! | WPLN | 20% of gross (PPh 26) |
//!
//! A month carrying bonuses withholds the tax on gross plus those bonuses;
//! each bonus is charged the increase over the withholding through the
//! previous bonus of that month.
//!
//! # Example
//!
//! ```
//! use pph_core::calculations::Pph21Calculator;
//! use pph_core::{Bonus, Money, Pph21Input, RegulationTables, SubjectType};
//!
//! let input = Pph21Input::new(SubjectType::PegawaiTetap, Money::from_rupiah(10_000_000).unwrap())
//!     .with_bonus(Bonus::new(12, Money::from_rupiah(5_000_000).unwrap(), "Bonus tahunan"));
//!
//! let calculator = Pph21Calculator::new(RegulationTables::builtin());
//! let result = calculator.calculate(&input).unwrap();
//!
//! assert_eq!(result.total_tax, Money::from_rupiah(3_750_000).unwrap());
//! ```

use thiserror::Error;
use tracing::{debug, warn};

use super::breakdown::BreakdownBuilder;
use crate::error::ErrorKind;
use crate::models::{
    Bonus, Money, MoneyError, Pph21Input, PtkpStatus, Scheme, SubjectType, TaxResult, TerCategory,
};
use crate::regulation::RegulationTables;

/// Errors that can occur during PPh 21/26 calculations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Pph21Error {
    #[error("monthly gross income is required")]
    MissingBrutoMonthly,

    #[error("months paid must be between 1 and 12, got {0}")]
    InvalidMonthsPaid(u8),

    #[error("bonus '{name}' has month {month}, expected 1 to 12")]
    InvalidBonusMonth { name: String, month: u8 },

    #[error("{field} must not be negative")]
    NegativeAmount { field: String },

    /// The scheme cannot be applied to this kind of recipient.
    #[error("scheme '{scheme}' is not available for {subject}")]
    UnsupportedScheme { subject: SubjectType, scheme: Scheme },

    /// The TER category disagrees with the one prescribed for the status.
    #[error("TER category {category} does not match PTKP status {status} (expected {expected})")]
    TerCategoryMismatch {
        status: PtkpStatus,
        category: TerCategory,
        expected: TerCategory,
    },

    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl Pph21Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Money(error) => error.kind(),
            _ => ErrorKind::Calculation,
        }
    }
}

/// Annual figures for one gross amount under the progressive scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AnnualPosition {
    cost_deduction: Money,
    pension: Money,
    zakat: Money,
    ptkp: Money,
    net: Money,
    pkp: Money,
    tax: Money,
}

/// How a single TER payment is taxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaymentBasis {
    EffectiveRate(TerCategory),
    Progressive { dpp_share: Money },
    Flat(Money),
}

/// Calculator for PPh 21/26 withholding.
///
/// Holds a reference to the regulation set; the calculator itself is
/// stateless and can be shared freely.
#[derive(Debug, Clone, Copy)]
pub struct Pph21Calculator<'a> {
    tables: &'a RegulationTables,
}

impl<'a> Pph21Calculator<'a> {
    pub fn new(tables: &'a RegulationTables) -> Self {
        Self { tables }
    }

    /// Computes the withholding and its breakdown.
    ///
    /// # Errors
    ///
    /// Returns [`Pph21Error`] if the input is incomplete, contains negative
    /// amounts or out-of-range months, combines a scheme or TER category
    /// that does not apply to the recipient, or if an amount overflows.
    pub fn calculate(
        &self,
        input: &Pph21Input,
    ) -> Result<TaxResult, Pph21Error> {
        let bruto = self.validate(input)?;

        debug!(
            subject = input.subject_type.as_str(),
            scheme = input.scheme.as_str(),
            months_paid = input.months_paid,
            bonuses = input.bonuses.len(),
            "calculating PPh {}",
            input.subject_type.article()
        );

        match input.scheme {
            Scheme::Lama => self.calculate_progressive(input, bruto),
            Scheme::Ter => self.calculate_effective_rate(input, bruto),
        }
    }

    fn validate(
        &self,
        input: &Pph21Input,
    ) -> Result<Money, Pph21Error> {
        let bruto = input.bruto_monthly.ok_or(Pph21Error::MissingBrutoMonthly)?;

        if !(1..=12).contains(&input.months_paid) {
            return Err(Pph21Error::InvalidMonthsPaid(input.months_paid));
        }

        if let Some(bonus) = input.bonuses.iter().find(|bonus| !(1..=12).contains(&bonus.month)) {
            return Err(Pph21Error::InvalidBonusMonth {
                name: bonus.name.clone(),
                month: bonus.month,
            });
        }

        let amounts = [
            ("bruto_monthly", Some(bruto)),
            ("pension_contribution", input.pension_contribution),
            ("zakat_or_donation", input.zakat_or_donation),
        ];
        for (field, amount) in amounts {
            if amount.is_some_and(Money::is_negative) {
                return Err(Pph21Error::NegativeAmount {
                    field: field.to_string(),
                });
            }
        }
        if let Some(bonus) = input.bonuses.iter().find(|bonus| bonus.amount.is_negative()) {
            return Err(Pph21Error::NegativeAmount {
                field: format!("bonus '{}'", bonus.name),
            });
        }

        let subject = input.subject_type;
        if input.scheme.requires_annualization() && !subject.is_periodic_employee() {
            return Err(Pph21Error::UnsupportedScheme {
                subject,
                scheme: input.scheme,
            });
        }

        if input.scheme == Scheme::Ter && subject.is_periodic_employee() {
            let expected = TerCategory::for_status(input.ptkp_status);
            if input.ter_category != expected {
                return Err(Pph21Error::TerCategoryMismatch {
                    status: input.ptkp_status,
                    category: input.ter_category,
                    expected,
                });
            }
        }

        Ok(bruto)
    }

    // -------------------------------------------------------------------------
    // Progressive scheme
    // -------------------------------------------------------------------------

    fn calculate_progressive(
        &self,
        input: &Pph21Input,
        bruto: Money,
    ) -> Result<TaxResult, Pph21Error> {
        let months = i64::from(input.months_paid);
        let annual_gross = bruto.mul_int(12)?;
        let base = self.annual_position(input, annual_gross)?;
        let regular_tax = self.deannualize(base.tax, input.months_paid)?;

        debug!(pkp = %base.pkp, annual_tax = %base.tax, "progressive scheme");

        let mut builder = BreakdownBuilder::new();

        builder.section("Penghasilan bruto");
        builder.line("Penghasilan bruto sebulan", bruto);
        let annualized_note = (months < 12).then(|| format!("disetahunkan dari {months} bulan"));
        builder.line_with_note("Penghasilan bruto setahun", annual_gross, annualized_note);
        for bonus in &input.bonuses {
            builder.line_with_note(
                bonus.name.as_str(),
                bonus.amount,
                Some(format!("bulan {}", bonus.month)),
            );
        }

        self.push_deductions(&mut builder, input, &base);

        builder.section("Penghasilan kena pajak");
        builder.line("Penghasilan neto setahun", base.net);
        builder.line_with_note("PKP setahun", base.pkp, Some("dibulatkan ke bawah ribuan"));

        builder.section("Tarif Pasal 17");
        for layer in self.tables.pasal17.layers(base.pkp)? {
            builder.line(
                format!("{} × {}", layer.rate.format_percent(), layer.portion),
                layer.tax,
            );
        }
        builder.line("PPh Pasal 17 setahun", base.tax);
        builder.rate("Tarif marjinal", self.tables.pasal17.marginal_rate(base.pkp));
        builder.spacer();

        builder.section(format!("PPh {} terutang", input.subject_type.article()));
        if months < 12 {
            builder.line_with_note(
                format!("PPh {months} bulan"),
                regular_tax,
                Some(format!("{months}/12 × PPh setahun")),
            );
        } else {
            builder.line("PPh setahun", regular_tax);
        }
        builder.subtotal("Jumlah PPh reguler")?;

        if !input.bonuses.is_empty() {
            builder.section("Bonus");
            let mut gross = annual_gross;
            let mut previous_tax = base.tax;
            for bonus in &input.bonuses {
                gross = gross.checked_add(bonus.amount)?;
                let position = self.annual_position(input, gross)?;
                let bonus_tax = position.tax.checked_sub(previous_tax)?;
                previous_tax = position.tax;

                builder.group(bonus_label(bonus));
                builder.line_with_note(
                    "PPh atas bonus",
                    bonus_tax,
                    Some(format!("PKP {}", position.pkp)),
                );
            }
            builder.subtotal("Jumlah PPh atas bonus")?;
        }

        Ok(builder.finish(total_label(input.subject_type))?)
    }

    fn annual_position(
        &self,
        input: &Pph21Input,
        gross: Money,
    ) -> Result<AnnualPosition, MoneyError> {
        let cost_deduction = self.cost_deduction(input.subject_type, gross)?;
        let pension = input.pension_contribution.unwrap_or_default().mul_int(12)?;
        let zakat = input.zakat_or_donation.unwrap_or_default().mul_int(12)?;
        let ptkp = self.tables.ptkp.get(input.ptkp_status);

        let net = gross
            .checked_sub(cost_deduction)?
            .checked_sub(pension)?
            .checked_sub(zakat)?;
        let pkp = net
            .checked_sub(ptkp)?
            .clamp_non_negative()
            .round_down_thousand();
        let tax = self.tables.pasal17.apply(pkp)?;

        Ok(AnnualPosition {
            cost_deduction,
            pension,
            zakat,
            ptkp,
            net,
            pkp,
            tax,
        })
    }

    /// Biaya pensiun for retirees, biaya jabatan for everyone else.
    fn cost_deduction(
        &self,
        subject: SubjectType,
        gross: Money,
    ) -> Result<Money, MoneyError> {
        let deductions = &self.tables.deductions;
        let (rate, cap) = match subject {
            SubjectType::Pensiunan => (deductions.pension_cost_rate, deductions.pension_cost_cap),
            _ => (deductions.occupational_cost_rate, deductions.occupational_cost_cap),
        };
        Ok(gross.checked_mul(rate)?.min(cap))
    }

    fn deannualize(
        &self,
        annual_tax: Money,
        months_paid: u8,
    ) -> Result<Money, MoneyError> {
        if months_paid >= 12 {
            return Ok(annual_tax);
        }
        annual_tax.percent(i64::from(months_paid), 12)
    }

    fn push_deductions(
        &self,
        builder: &mut BreakdownBuilder,
        input: &Pph21Input,
        base: &AnnualPosition,
    ) {
        let deductions = &self.tables.deductions;
        let (label, rate, cap) = match input.subject_type {
            SubjectType::Pensiunan => (
                "Biaya pensiun",
                deductions.pension_cost_rate,
                deductions.pension_cost_cap,
            ),
            _ => (
                "Biaya jabatan",
                deductions.occupational_cost_rate,
                deductions.occupational_cost_cap,
            ),
        };

        builder.section("Pengurangan");
        builder.line_with_note(
            label,
            base.cost_deduction,
            Some(format!("{} × bruto, maks. {cap}", rate.format_percent())),
        );
        if !base.pension.is_zero() {
            builder.line("Iuran pensiun setahun", base.pension);
        }
        if !base.zakat.is_zero() {
            builder.line("Zakat / sumbangan wajib setahun", base.zakat);
        }
        builder.line_with_note("PTKP", base.ptkp, Some(input.ptkp_status.as_str()));
    }

    // -------------------------------------------------------------------------
    // Effective-rate scheme
    // -------------------------------------------------------------------------

    fn calculate_effective_rate(
        &self,
        input: &Pph21Input,
        bruto: Money,
    ) -> Result<TaxResult, Pph21Error> {
        let basis = self.payment_basis(input);
        let monthly_tax = self.payment_tax(basis, bruto)?;

        debug!(?basis, monthly_tax = %monthly_tax, "effective-rate scheme");

        let mut builder = BreakdownBuilder::new();

        builder.section("Dasar pemotongan");
        builder.line("Penghasilan bruto sebulan", bruto);
        match basis {
            PaymentBasis::EffectiveRate(category) => {
                builder.rate(
                    format!("TER bulanan kategori {category}"),
                    self.tables.ter.monthly_rate(category, bruto),
                );
            }
            PaymentBasis::Progressive { dpp_share } => {
                builder.rate("Porsi DPP", dpp_share);
                builder.line("DPP sebulan", bruto.checked_mul(dpp_share)?);
                builder.text("Tarif Pasal 17 tanpa disetahunkan");
            }
            PaymentBasis::Flat(rate) => {
                builder.rate("Tarif PPh 26", rate);
            }
        }

        builder.section(format!("PPh {} per masa", input.subject_type.article()));
        for month in 1..=input.months_paid {
            builder.line(format!("Masa ke-{month}"), monthly_tax);
        }
        builder.subtotal("Jumlah PPh per masa")?;

        if !input.bonuses.is_empty() {
            builder.section("Bonus");
            let mut month_bonuses = [Money::ZERO; 12];
            for bonus in &input.bonuses {
                let base = if bonus.month <= input.months_paid {
                    bruto
                } else {
                    warn!(
                        bonus = bonus.name.as_str(),
                        month = bonus.month,
                        months_paid = input.months_paid,
                        "bonus paid in a month without regular income"
                    );
                    Money::ZERO
                };

                let slot = &mut month_bonuses[usize::from(bonus.month - 1)];
                let before = self.payment_tax(basis, base.checked_add(*slot)?)?;
                *slot = slot.checked_add(bonus.amount)?;
                let month_gross = base.checked_add(*slot)?;
                let after = self.payment_tax(basis, month_gross)?;

                builder.group(bonus_label(bonus));
                builder.line_with_note(
                    "Tambahan PPh",
                    after.checked_sub(before)?,
                    Some(format!("bruto masa {month_gross}")),
                );
            }
            builder.subtotal("Jumlah PPh atas bonus")?;
        }

        Ok(builder.finish(total_label(input.subject_type))?)
    }

    fn payment_basis(
        &self,
        input: &Pph21Input,
    ) -> PaymentBasis {
        let deductions = &self.tables.deductions;
        match input.subject_type {
            SubjectType::Wpln => PaymentBasis::Flat(deductions.pph26_rate),
            SubjectType::BukanPegawai => PaymentBasis::Progressive {
                dpp_share: deductions.non_employee_dpp_share,
            },
            subject if subject.is_per_event() => PaymentBasis::Progressive {
                dpp_share: Money::ONE,
            },
            _ => PaymentBasis::EffectiveRate(input.ter_category),
        }
    }

    fn payment_tax(
        &self,
        basis: PaymentBasis,
        amount: Money,
    ) -> Result<Money, MoneyError> {
        match basis {
            PaymentBasis::EffectiveRate(category) => {
                amount.checked_mul(self.tables.ter.monthly_rate(category, amount))
            }
            PaymentBasis::Progressive { dpp_share } => {
                self.tables.pasal17.apply(amount.checked_mul(dpp_share)?)
            }
            PaymentBasis::Flat(rate) => amount.checked_mul(rate),
        }
    }
}

fn bonus_label(bonus: &Bonus) -> String {
    format!("{} (bulan {})", bonus.name, bonus.month)
}

fn total_label(subject: SubjectType) -> String {
    format!("Total PPh {}", subject.article())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::BreakdownVariant;

    fn rp(whole: i64) -> Money {
        Money::from_rupiah(whole).unwrap()
    }

    fn calculator() -> Pph21Calculator<'static> {
        Pph21Calculator::new(RegulationTables::builtin())
    }

    fn employee(bruto: i64) -> Pph21Input {
        Pph21Input::new(SubjectType::PegawaiTetap, rp(bruto))
    }

    fn row_value(
        result: &TaxResult,
        label: &str,
    ) -> Money {
        result
            .breakdown
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value)
            .unwrap_or_else(|| panic!("no row labelled {label}"))
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_requires_bruto() {
        let input = Pph21Input::default();

        assert_eq!(calculator().calculate(&input), Err(Pph21Error::MissingBrutoMonthly));
    }

    #[test]
    fn validate_rejects_months_out_of_range() {
        for months in [0, 13] {
            let input = employee(10_000_000).with_months_paid(months);

            assert_eq!(
                calculator().calculate(&input),
                Err(Pph21Error::InvalidMonthsPaid(months))
            );
        }
    }

    #[test]
    fn validate_rejects_bonus_month_out_of_range() {
        let input = employee(10_000_000).with_bonus(Bonus::new(13, rp(1), "THR"));

        assert_eq!(
            calculator().calculate(&input),
            Err(Pph21Error::InvalidBonusMonth {
                name: "THR".to_string(),
                month: 13,
            })
        );
    }

    #[test]
    fn validate_rejects_negative_amounts() {
        let input = employee(10_000_000).with_zakat_or_donation(rp(-1));

        let error = calculator().calculate(&input).unwrap_err();

        assert_eq!(
            error,
            Pph21Error::NegativeAmount {
                field: "zakat_or_donation".to_string()
            }
        );
        assert_eq!(error.kind(), ErrorKind::Calculation);
    }

    #[test]
    fn validate_rejects_negative_bonus() {
        let input = employee(10_000_000).with_bonus(Bonus::new(3, rp(-5), "Koreksi"));

        assert!(matches!(
            calculator().calculate(&input),
            Err(Pph21Error::NegativeAmount { .. })
        ));
    }

    #[test]
    fn validate_rejects_lama_for_non_employee() {
        let input = Pph21Input::new(SubjectType::BukanPegawai, rp(10_000_000));

        assert_eq!(
            calculator().calculate(&input),
            Err(Pph21Error::UnsupportedScheme {
                subject: SubjectType::BukanPegawai,
                scheme: Scheme::Lama,
            })
        );
    }

    #[test]
    fn validate_rejects_inconsistent_ter_category() {
        let input = employee(10_000_000)
            .with_ptkp_status(PtkpStatus::K2)
            .with_scheme(Scheme::Ter)
            .with_ter_category(TerCategory::A);

        assert_eq!(
            calculator().calculate(&input),
            Err(Pph21Error::TerCategoryMismatch {
                status: PtkpStatus::K2,
                category: TerCategory::A,
                expected: TerCategory::C,
            })
        );
    }

    #[test]
    fn validate_ignores_ter_category_for_non_employees() {
        let input = Pph21Input::new(SubjectType::Wpln, rp(10_000_000))
            .with_ptkp_status(PtkpStatus::K3)
            .with_scheme(Scheme::Ter)
            .with_ter_category(TerCategory::A);

        assert!(calculator().calculate(&input).is_ok());
    }

    #[test]
    fn money_errors_keep_their_kind() {
        let error = Pph21Error::from(MoneyError::Overflow);

        assert_eq!(error.kind(), ErrorKind::Overflow);
    }

    // =========================================================================
    // progressive scheme tests
    // =========================================================================

    #[test]
    fn progressive_full_year() {
        let result = calculator().calculate(&employee(10_000_000)).unwrap();

        assert_eq!(row_value(&result, "Penghasilan bruto setahun"), rp(120_000_000));
        assert_eq!(row_value(&result, "Biaya jabatan"), rp(6_000_000));
        assert_eq!(row_value(&result, "PKP setahun"), rp(60_000_000));
        assert_eq!(result.total_tax, rp(3_000_000));
    }

    #[test]
    fn progressive_reports_marginal_bracket() {
        let low = calculator().calculate(&employee(10_000_000)).unwrap();
        let high = calculator().calculate(&employee(30_000_000)).unwrap();

        assert_eq!(row_value(&low, "Tarif marjinal"), Money::from_raw(500));
        assert_eq!(row_value(&high, "Tarif marjinal"), Money::from_raw(2_500));
    }

    #[test]
    fn progressive_partial_year_is_deannualized() {
        let input = employee(10_000_000).with_months_paid(1);

        let result = calculator().calculate(&input).unwrap();

        assert_eq!(result.total_tax, rp(250_000));
    }

    #[test]
    fn progressive_applies_pension_and_zakat() {
        // 120M - 6M - 1.2M - 0.6M - 54M = 58.2M
        let input = employee(10_000_000)
            .with_pension_contribution(rp(100_000))
            .with_zakat_or_donation(rp(50_000));

        let result = calculator().calculate(&input).unwrap();

        assert_eq!(row_value(&result, "PKP setahun"), rp(58_200_000));
        assert_eq!(result.total_tax, rp(2_910_000));
    }

    #[test]
    fn progressive_retiree_uses_pension_cost() {
        // 60M - min(3M, 2.4M) - 54M = 3.6M, 5% = 180K
        let input = Pph21Input::new(SubjectType::Pensiunan, rp(5_000_000));

        let result = calculator().calculate(&input).unwrap();

        assert_eq!(row_value(&result, "Biaya pensiun"), rp(2_400_000));
        assert_eq!(result.total_tax, rp(180_000));
    }

    #[test]
    fn progressive_income_below_ptkp_is_untaxed() {
        let result = calculator().calculate(&employee(4_000_000)).unwrap();

        assert_eq!(row_value(&result, "PKP setahun"), Money::ZERO);
        assert_eq!(result.total_tax, Money::ZERO);
    }

    #[test]
    fn progressive_rounds_pkp_down_to_thousand() {
        // 12 × 5,000,500 = 60,006,000; - 3,000,300 - 54M = 3,005,700 -> 3,005,000
        let result = calculator().calculate(&employee(5_000_500)).unwrap();

        assert_eq!(row_value(&result, "PKP setahun"), rp(3_005_000));
        assert_eq!(result.total_tax, rp(150_250));
    }

    #[test]
    fn progressive_bonus_is_taxed_at_the_margin() {
        let input = employee(10_000_000).with_bonus(Bonus::new(12, rp(5_000_000), "Bonus"));

        let result = calculator().calculate(&input).unwrap();

        assert_eq!(result.rows_with_variant(BreakdownVariant::Group).count(), 1);
        assert_eq!(row_value(&result, "PPh atas bonus"), rp(750_000));
        assert_eq!(result.total_tax, rp(3_750_000));
    }

    #[test]
    fn progressive_bonuses_accumulate_in_order() {
        // 120M + 140M gross: biaya jabatan stays capped at 6M
        let input = employee(10_000_000)
            .with_bonus(Bonus::new(3, rp(70_000_000), "THR"))
            .with_bonus(Bonus::new(12, rp(70_000_000), "Bonus"));

        let result = calculator().calculate(&input).unwrap();

        let bonus_taxes: Vec<_> = result
            .breakdown
            .iter()
            .filter(|row| row.label == "PPh atas bonus")
            .map(|row| row.value)
            .collect();
        // PKP 130M: 3M + 10.5M; PKP 200M: 3M + 21M
        assert_eq!(bonus_taxes, vec![rp(10_500_000), rp(10_500_000)]);
        assert_eq!(result.total_tax, rp(24_000_000));
    }

    #[test]
    fn progressive_total_label_follows_article() {
        let result = calculator().calculate(&employee(10_000_000)).unwrap();

        assert_eq!(result.breakdown.last().unwrap().label, "Total PPh 21");
    }

    // =========================================================================
    // effective-rate scheme tests
    // =========================================================================

    fn ter_employee(bruto: i64) -> Pph21Input {
        employee(bruto).with_scheme(Scheme::Ter)
    }

    #[test]
    fn ter_full_year() {
        let result = calculator().calculate(&ter_employee(10_000_000)).unwrap();

        assert_eq!(row_value(&result, "Masa ke-12"), rp(200_000));
        assert_eq!(result.total_tax, rp(2_400_000));
    }

    #[test]
    fn ter_withholds_only_paid_months() {
        let input = ter_employee(10_000_000).with_months_paid(3);

        let result = calculator().calculate(&input).unwrap();

        assert_eq!(result.total_tax, rp(600_000));
        assert!(result.breakdown.iter().all(|row| row.label != "Masa ke-4"));
    }

    #[test]
    fn ter_bonus_is_taxed_at_the_combined_rate() {
        // month 12: 15M × 6% = 900K, increment over 200K
        let input = ter_employee(10_000_000).with_bonus(Bonus::new(12, rp(5_000_000), "Bonus"));

        let result = calculator().calculate(&input).unwrap();

        assert_eq!(row_value(&result, "Tambahan PPh"), rp(700_000));
        assert_eq!(result.total_tax, rp(3_100_000));
    }

    #[test]
    fn ter_duplicate_bonus_months_stay_distinct() {
        // 20M × 9% = 1.8M after the second bonus
        let input = ter_employee(10_000_000)
            .with_bonus(Bonus::new(12, rp(5_000_000), "Bonus"))
            .with_bonus(Bonus::new(12, rp(5_000_000), "Bonus"));

        let result = calculator().calculate(&input).unwrap();

        let increments: Vec<_> = result
            .breakdown
            .iter()
            .filter(|row| row.label == "Tambahan PPh")
            .map(|row| row.value)
            .collect();
        assert_eq!(increments, vec![rp(700_000), rp(900_000)]);
        assert_eq!(result.rows_with_variant(BreakdownVariant::Group).count(), 2);
        assert_eq!(result.total_tax, rp(4_000_000));
    }

    #[test]
    fn ter_bonus_outside_paid_months_stands_alone() {
        // 10M × 2% with no regular income that month
        let input = ter_employee(10_000_000)
            .with_months_paid(6)
            .with_bonus(Bonus::new(12, rp(10_000_000), "Bonus"));

        let result = calculator().calculate(&input).unwrap();

        assert_eq!(row_value(&result, "Tambahan PPh"), rp(200_000));
        assert_eq!(result.total_tax, rp(1_400_000));
    }

    #[test]
    fn ter_non_employee_uses_half_dpp() {
        let input = Pph21Input::new(SubjectType::BukanPegawai, rp(10_000_000))
            .with_scheme(Scheme::Ter)
            .with_months_paid(1);

        let result = calculator().calculate(&input).unwrap();

        assert_eq!(row_value(&result, "DPP sebulan"), rp(5_000_000));
        assert_eq!(result.total_tax, rp(250_000));
    }

    #[test]
    fn ter_per_event_subjects_use_full_amount() {
        for subject in [
            SubjectType::PesertaKegiatan,
            SubjectType::ProgramPensiun,
            SubjectType::MantanPegawai,
        ] {
            // 60M × 5% + 40M × 15%
            let input = Pph21Input::new(subject, rp(100_000_000))
                .with_scheme(Scheme::Ter)
                .with_months_paid(1);

            let result = calculator().calculate(&input).unwrap();

            assert_eq!(result.total_tax, rp(9_000_000), "{subject:?}");
        }
    }

    #[test]
    fn ter_foreign_taxpayer_pays_flat_twenty_percent() {
        let input = Pph21Input::new(SubjectType::Wpln, rp(10_000_000))
            .with_scheme(Scheme::Ter)
            .with_months_paid(2);

        let result = calculator().calculate(&input).unwrap();

        assert_eq!(result.total_tax, rp(4_000_000));
        assert_eq!(result.breakdown.last().unwrap().label, "Total PPh 26");
    }

    // =========================================================================
    // step tests
    // =========================================================================

    #[test]
    fn cost_deduction_is_capped() {
        let cost = calculator()
            .cost_deduction(SubjectType::PegawaiTetap, rp(500_000_000))
            .unwrap();

        assert_eq!(cost, rp(6_000_000));
    }

    #[test]
    fn deannualize_keeps_full_year() {
        let tax = calculator().deannualize(rp(3_000_000), 12).unwrap();

        assert_eq!(tax, rp(3_000_000));
    }

    #[test]
    fn payment_basis_by_subject() {
        let input = Pph21Input::new(SubjectType::Pensiunan, rp(1)).with_ter_category(TerCategory::B);

        assert_eq!(
            calculator().payment_basis(&input),
            PaymentBasis::EffectiveRate(TerCategory::B)
        );
    }

    #[test]
    fn per_event_subjects_use_full_dpp() {
        let calculator = calculator();

        for subject in SubjectType::ALL {
            let basis = calculator.payment_basis(&Pph21Input::new(subject, rp(1)));
            let full_dpp = basis == PaymentBasis::Progressive { dpp_share: Money::ONE };

            assert_eq!(
                full_dpp,
                subject.is_per_event() && subject != SubjectType::BukanPegawai,
                "{subject}"
            );
        }
    }
}
