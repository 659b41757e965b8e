//! Worked kardex scenarios with hand-checked balances.

use chrono::NaiveDate;
use kardex_core::{
    reconstruct, KardexReport, LineKind, LotConsumption, Movement, OpeningBalance, Totals, Triple,
};
use rust_decimal_macros::dec;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn test_entry_on_top_of_opening_balance() {
    let opening = OpeningBalance::new(dec!(10), dec!(100));
    let movements = vec![Movement::entry(date(2024, 1, 10), dec!(5), dec!(12))];

    let result = reconstruct(date(2024, 1, 1), &opening, &movements);

    let balance = result.lines.last().unwrap().balance;
    assert_eq!(balance.quantity, dec!(15));
    assert_eq!(balance.total_cost, dec!(160));
    assert_eq!(balance.unit_cost.round_dp(4), dec!(10.6667));
}

#[test]
fn test_multi_lot_exit_two_lines() {
    let opening = OpeningBalance::new(dec!(20), dec!(220));
    let movements = vec![Movement::exit(date(2024, 1, 10), dec!(5), dec!(11)).with_lots(vec![
        LotConsumption::new("L1", dec!(3), dec!(10)),
        LotConsumption::new("L2", dec!(2), dec!(12)),
    ])];

    let result = reconstruct(date(2024, 1, 1), &opening, &movements);
    let lots: Vec<_> = result
        .lines
        .iter()
        .filter(|l| l.kind == LineKind::Lot)
        .collect();

    assert_eq!(lots.len(), 2);
    assert_eq!(lots[0].balance.quantity, dec!(17));
    assert_eq!(lots[0].balance.total_cost, dec!(190));
    assert_eq!(lots[1].balance.quantity, dec!(15));
    assert_eq!(lots[1].balance.total_cost, dec!(166));
}

#[test]
fn test_empty_period() {
    let report = KardexReport::build(date(2024, 1, 1), Some(OpeningBalance::default()), &[]);

    assert!(report.lines.is_empty());
    assert_eq!(report.totals, Totals::default());
    assert_eq!(report.final_balance.quantity, dec!(0));
    assert_eq!(report.final_balance.total_cost, dec!(0));
}

#[test]
fn test_accounting_identity_mixed_year() {
    let opening = OpeningBalance::new(dec!(120), dec!(1534.80));
    let movements = vec![
        Movement::entry(date(2024, 1, 15), dec!(40), dec!(13.10))
            .with_voucher("01", "F001-00001234")
            .with_operation("02"),
        Movement::exit(date(2024, 2, 3), dec!(70), dec!(12.9))
            .with_voucher("01", "F010-00000077")
            .with_operation("01")
            .with_lots(vec![
                LotConsumption::new("2023-11", dec!(60), dec!(12.79)),
                LotConsumption::new("2024-01", dec!(10), dec!(13.10)).with_total_cost(dec!(131)),
            ]),
        Movement::exit(date(2024, 3, 9), dec!(15.5), dec!(13.10))
            .with_voucher("00", "AJ-3")
            .with_operation("13")
            .with_total_cost(dec!(203.05)),
        Movement::entry(date(2024, 4, 1), dec!(0), dec!(0)).with_operation("99"),
    ];

    let report = KardexReport::build(date(2024, 1, 1), Some(opening), &movements);

    assert!(report.is_consistent());
    assert_eq!(
        report.final_balance.total_cost,
        opening.total_cost + report.totals.entries_monetary - report.totals.exits_monetary
    );
    assert_eq!(report.totals.entries_monetary, dec!(524));
    assert_eq!(report.totals.exits_monetary, dec!(1101.45));
    assert_eq!(report.final_balance.quantity, dec!(74.5));
    assert_eq!(report.final_balance.total_cost, dec!(957.35));
    // opening + 2 entries + 2 lots + 1 plain exit
    assert_eq!(report.lines.len(), 6);
}

#[test]
fn test_zero_stated_total_falls_back() {
    let movement = Movement::entry(date(2024, 1, 2), dec!(5), dec!(12)).with_total_cost(dec!(0));
    assert_eq!(movement.effective_total_cost(), dec!(60));

    let result = reconstruct(date(2024, 1, 1), &OpeningBalance::default(), &[movement]);
    assert_eq!(
        result.lines[0].entry,
        Triple::new(dec!(5), dec!(12), dec!(60))
    );
}

#[test]
fn test_stockout_recovers() {
    let movements = vec![
        Movement::exit(date(2024, 1, 2), dec!(4), dec!(10)),
        Movement::entry(date(2024, 1, 3), dec!(10), dec!(11)),
    ];
    let result = reconstruct(date(2024, 1, 1), &OpeningBalance::default(), &movements);

    assert_eq!(result.lines[0].balance.quantity, dec!(-4));
    assert_eq!(result.lines[0].balance.unit_cost, dec!(0));
    assert_eq!(result.lines[1].balance.quantity, dec!(6));
    assert_eq!(result.lines[1].balance.total_cost, dec!(70));
    assert_eq!(result.lines[1].balance.unit_cost.round_dp(4), dec!(11.6667));
}
