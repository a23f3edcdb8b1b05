//! Statutory tables in force from January 2024 (PMK-168/2023).
//!
//! Bounded brackets are listed as `(ceiling in rupiah, raw rate)`, where the
//! raw rate is scaled by 10,000 (`200` = 2%). Each table ends with an
//! unbounded bracket at the listed top rate.

use super::pasal17::{Pasal17Bracket, Pasal17Schedule};
use super::ptkp::PtkpTable;
use super::ter::{TerBracket, TerCategoryTables, TerSchedule, TerTable};
use super::{DeductionConfig, RegulationTables};
use crate::models::Money;

pub(super) const VERSION: &str = "PMK-168/2023";

const PTKP_SINGLE: [Money; 4] = [
    Money::rupiah(54_000_000),
    Money::rupiah(58_500_000),
    Money::rupiah(63_000_000),
    Money::rupiah(67_500_000),
];

const PTKP_MARRIED: [Money; 4] = [
    Money::rupiah(58_500_000),
    Money::rupiah(63_000_000),
    Money::rupiah(67_500_000),
    Money::rupiah(72_000_000),
];

// UU HPP
const PASAL17: [(i64, i64); 4] = [
    (60_000_000, 500),
    (250_000_000, 1_500),
    (500_000_000, 2_500),
    (5_000_000_000, 3_000),
];
const PASAL17_TOP: i64 = 3_500;

const TER_BULANAN_A: [(i64, i64); 43] = [
    (5_400_000, 0),
    (5_650_000, 25),
    (5_950_000, 50),
    (6_300_000, 75),
    (6_750_000, 100),
    (7_500_000, 125),
    (8_550_000, 150),
    (9_650_000, 175),
    (10_050_000, 200),
    (10_350_000, 225),
    (10_700_000, 250),
    (11_050_000, 300),
    (11_600_000, 350),
    (12_500_000, 400),
    (13_750_000, 500),
    (15_100_000, 600),
    (16_950_000, 700),
    (19_750_000, 800),
    (24_150_000, 900),
    (26_450_000, 1_000),
    (28_000_000, 1_100),
    (30_050_000, 1_200),
    (32_400_000, 1_300),
    (35_400_000, 1_400),
    (39_100_000, 1_500),
    (43_850_000, 1_600),
    (47_800_000, 1_700),
    (51_400_000, 1_800),
    (56_300_000, 1_900),
    (62_200_000, 2_000),
    (68_600_000, 2_100),
    (77_500_000, 2_200),
    (89_000_000, 2_300),
    (103_000_000, 2_400),
    (125_000_000, 2_500),
    (157_000_000, 2_600),
    (206_000_000, 2_700),
    (337_000_000, 2_800),
    (454_000_000, 2_900),
    (550_000_000, 3_000),
    (695_000_000, 3_100),
    (910_000_000, 3_200),
    (1_400_000_000, 3_300),
];

const TER_BULANAN_B: [(i64, i64); 39] = [
    (6_200_000, 0),
    (6_500_000, 25),
    (6_850_000, 50),
    (7_300_000, 75),
    (9_200_000, 100),
    (10_750_000, 150),
    (11_250_000, 200),
    (11_600_000, 250),
    (12_600_000, 300),
    (13_600_000, 400),
    (14_950_000, 500),
    (16_400_000, 600),
    (18_450_000, 700),
    (21_850_000, 800),
    (26_000_000, 900),
    (27_700_000, 1_000),
    (29_350_000, 1_100),
    (31_450_000, 1_200),
    (33_950_000, 1_300),
    (37_100_000, 1_400),
    (41_100_000, 1_500),
    (45_800_000, 1_600),
    (49_500_000, 1_700),
    (53_800_000, 1_800),
    (58_500_000, 1_900),
    (64_000_000, 2_000),
    (71_000_000, 2_100),
    (80_000_000, 2_200),
    (93_000_000, 2_300),
    (109_000_000, 2_400),
    (129_000_000, 2_500),
    (163_000_000, 2_600),
    (211_000_000, 2_700),
    (374_000_000, 2_800),
    (459_000_000, 2_900),
    (555_000_000, 3_000),
    (704_000_000, 3_100),
    (957_000_000, 3_200),
    (1_405_000_000, 3_300),
];

const TER_BULANAN_C: [(i64, i64); 40] = [
    (6_600_000, 0),
    (6_950_000, 25),
    (7_350_000, 50),
    (7_800_000, 75),
    (8_850_000, 100),
    (9_800_000, 125),
    (10_950_000, 150),
    (11_200_000, 175),
    (12_050_000, 200),
    (12_950_000, 300),
    (14_150_000, 400),
    (15_550_000, 500),
    (17_050_000, 600),
    (19_500_000, 700),
    (22_700_000, 800),
    (26_600_000, 900),
    (28_100_000, 1_000),
    (30_100_000, 1_100),
    (32_600_000, 1_200),
    (35_400_000, 1_300),
    (38_900_000, 1_400),
    (43_000_000, 1_500),
    (47_400_000, 1_600),
    (51_200_000, 1_700),
    (55_800_000, 1_800),
    (60_400_000, 1_900),
    (66_700_000, 2_000),
    (74_500_000, 2_100),
    (83_200_000, 2_200),
    (95_600_000, 2_300),
    (110_000_000, 2_400),
    (134_000_000, 2_500),
    (169_000_000, 2_600),
    (221_000_000, 2_700),
    (390_000_000, 2_800),
    (463_000_000, 2_900),
    (561_000_000, 3_000),
    (709_000_000, 3_100),
    (965_000_000, 3_200),
    (1_419_000_000, 3_300),
];

const TER_BULANAN_TOP: i64 = 3_400;

const TER_HARIAN_A: [(i64, i64); 2] = [(750_000, 25), (2_500_000, 150)];
const TER_HARIAN_B: [(i64, i64); 2] = [(750_000, 25), (2_500_000, 125)];
const TER_HARIAN_C: [(i64, i64); 2] = [(750_000, 25), (2_500_000, 100)];

fn ter_table(
    bounded: &[(i64, i64)],
    top_rate: i64,
) -> TerTable {
    let brackets = bounded
        .iter()
        .map(|&(ceiling, rate)| TerBracket {
            ceiling: Some(Money::rupiah(ceiling)),
            rate: Money::from_raw(rate),
        })
        .chain(std::iter::once(TerBracket {
            ceiling: None,
            rate: Money::from_raw(top_rate),
        }))
        .collect();

    TerTable::new(brackets)
}

fn pasal17_schedule() -> Pasal17Schedule {
    let brackets = PASAL17
        .iter()
        .map(|&(upper, rate)| Pasal17Bracket {
            upper_bound: Some(Money::rupiah(upper)),
            rate: Money::from_raw(rate),
        })
        .chain(std::iter::once(Pasal17Bracket {
            upper_bound: None,
            rate: Money::from_raw(PASAL17_TOP),
        }))
        .collect();

    Pasal17Schedule::new(brackets)
}

pub(super) fn tables() -> RegulationTables {
    RegulationTables {
        version: VERSION.to_string(),
        ptkp: PtkpTable {
            single: PTKP_SINGLE,
            married: PTKP_MARRIED,
        },
        pasal17: pasal17_schedule(),
        ter: TerSchedule {
            monthly: TerCategoryTables {
                a: ter_table(&TER_BULANAN_A, TER_BULANAN_TOP),
                b: ter_table(&TER_BULANAN_B, TER_BULANAN_TOP),
                c: ter_table(&TER_BULANAN_C, TER_BULANAN_TOP),
            },
            daily: TerCategoryTables {
                a: ter_table(&TER_HARIAN_A, 200),
                b: ter_table(&TER_HARIAN_B, 175),
                c: ter_table(&TER_HARIAN_C, 150),
            },
        },
        deductions: DeductionConfig::default(),
    }
}
