//! Published employee contribution tables.
//!
//! Values are the legal bracket boundaries and rates; they must be kept in
//! sync with the official publications whenever a new table is issued.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::TableRegistry;
use crate::models::{Bracket, Period, RateTable};

type Row = (Decimal, Decimal, Decimal);

const TABLES: &[(i32, u32, &[Row])] = &[
    (2019, 1, &[
        (dec!(0.00), dec!(1751.81), dec!(0.08)),
        (dec!(1751.82), dec!(2919.72), dec!(0.09)),
        (dec!(2919.73), dec!(5839.45), dec!(0.11)),
    ]),
    (2020, 1, &[
        (dec!(0.00), dec!(1830.29), dec!(0.08)),
        (dec!(1830.30), dec!(3050.52), dec!(0.09)),
        (dec!(3050.53), dec!(6101.06), dec!(0.11)),
    ]),
    (2020, 3, &[
        (dec!(0.00), dec!(1045.00), dec!(0.075)),
        (dec!(1045.01), dec!(2089.60), dec!(0.09)),
        (dec!(2089.61), dec!(3134.40), dec!(0.12)),
        (dec!(3134.41), dec!(6101.06), dec!(0.14)),
    ]),
    (2021, 1, &[
        (dec!(0.00), dec!(1100.00), dec!(0.075)),
        (dec!(1100.01), dec!(2203.48), dec!(0.09)),
        (dec!(2203.49), dec!(3305.22), dec!(0.12)),
        (dec!(3305.23), dec!(6433.57), dec!(0.14)),
    ]),
    (2022, 1, &[
        (dec!(0.00), dec!(1212.00), dec!(0.075)),
        (dec!(1212.01), dec!(2427.35), dec!(0.09)),
        (dec!(2427.36), dec!(3641.03), dec!(0.12)),
        (dec!(3641.04), dec!(7087.22), dec!(0.14)),
    ]),
    (2023, 1, &[
        (dec!(0.00), dec!(1302.00), dec!(0.075)),
        (dec!(1302.01), dec!(2571.29), dec!(0.09)),
        (dec!(2571.30), dec!(3856.94), dec!(0.12)),
        (dec!(3856.95), dec!(7507.49), dec!(0.14)),
    ]),
    (2023, 5, &[
        (dec!(0.00), dec!(1320.00), dec!(0.075)),
        (dec!(1320.01), dec!(2571.29), dec!(0.09)),
        (dec!(2571.30), dec!(3856.94), dec!(0.12)),
        (dec!(3856.95), dec!(7507.49), dec!(0.14)),
    ]),
    (2024, 1, &[
        (dec!(0.00), dec!(1412.00), dec!(0.075)),
        (dec!(1412.01), dec!(2666.68), dec!(0.09)),
        (dec!(2666.69), dec!(4000.03), dec!(0.12)),
        (dec!(4000.04), dec!(7786.02), dec!(0.14)),
    ]),
    (2025, 1, &[
        (dec!(0.00), dec!(1518.00), dec!(0.075)),
        (dec!(1518.01), dec!(2793.88), dec!(0.09)),
        (dec!(2793.89), dec!(4190.83), dec!(0.12)),
        (dec!(4190.84), dec!(8157.41), dec!(0.14)),
    ]),
];

pub(super) fn registry() -> TableRegistry {
    let tables = TABLES
        .iter()
        .map(|&(year, month, rows)| {
            let brackets = rows
                .iter()
                .map(|&(min, max, rate)| Bracket::new(min, max, rate))
                .collect();
            RateTable::from_trusted(Period::from_parts(year, month), brackets)
        })
        .collect();

    // Already ascending and unique; see the registry tests.
    TableRegistry { tables }
}
