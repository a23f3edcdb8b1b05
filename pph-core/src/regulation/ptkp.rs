//! Penghasilan Tidak Kena Pajak (non-taxable income) thresholds.

use serde::{Deserialize, Serialize};

use super::RegulationError;
use crate::models::{MaritalStatus, Money, PtkpStatus};

/// Annual PTKP per status, indexed by number of dependents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PtkpTable {
    pub single: [Money; 4],
    pub married: [Money; 4],
}

impl PtkpTable {
    /// Annual threshold for `status`. Every status has an entry.
    pub fn get(
        &self,
        status: PtkpStatus,
    ) -> Money {
        let index = usize::from(status.dependents());
        match status.marital_status() {
            MaritalStatus::Single => self.single[index],
            MaritalStatus::Married => self.married[index],
        }
    }

    /// Checks that the threshold grows with each additional dependent.
    pub fn validate(&self) -> Result<(), RegulationError> {
        for status in PtkpStatus::ALL {
            if status.dependents() == 0 {
                if self.get(status).is_negative() {
                    return Err(RegulationError::PtkpNotIncreasing { status });
                }
                continue;
            }

            let previous =
                PtkpStatus::from_parts(status.marital_status(), status.dependents() - 1)
                    .ok_or(RegulationError::PtkpNotIncreasing { status })?;

            if self.get(status) <= self.get(previous) {
                return Err(RegulationError::PtkpNotIncreasing { status });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::regulation::RegulationTables;

    fn rp(whole: i64) -> Money {
        Money::from_rupiah(whole).unwrap()
    }

    #[test]
    fn builtin_values_match_pmk_101_2016() {
        let table = &RegulationTables::builtin().ptkp;

        assert_eq!(table.get(PtkpStatus::Tk0), rp(54_000_000));
        assert_eq!(table.get(PtkpStatus::Tk3), rp(67_500_000));
        assert_eq!(table.get(PtkpStatus::K0), rp(58_500_000));
        assert_eq!(table.get(PtkpStatus::K3), rp(72_000_000));
    }

    #[test]
    fn builtin_table_is_strictly_increasing() {
        let table = &RegulationTables::builtin().ptkp;

        assert_eq!(table.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_flat_dependents() {
        let mut table = RegulationTables::builtin().ptkp.clone();
        table.married[2] = table.married[1];

        assert_eq!(
            table.validate(),
            Err(RegulationError::PtkpNotIncreasing { status: PtkpStatus::K2 })
        );
    }
}
