//! Property-based tests for kardex-core.
//!
//! These tests verify ledger invariants hold for arbitrary movement streams
//! using proptest.
//!
//! Run with: cargo test -p kardex-core --test `property_tests`

use chrono::NaiveDate;
use kardex_core::{
    reconstruct, Direction, KardexReport, LineKind, LotConsumption, Movement, OpeningBalance,
    Totals,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

// ============================================================================
// Arbitrary generators
// ============================================================================

fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (0i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn arb_unit_cost() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 4))
}

fn arb_stated_total() -> impl Strategy<Value = Option<Decimal>> {
    prop_oneof![
        Just(None),
        Just(Some(Decimal::ZERO)),
        (1i64..10_000_000i64).prop_map(|n| Some(Decimal::new(n, 2))),
    ]
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1u32..13u32, 1u32..29u32).prop_map(|(m, d)| NaiveDate::from_ymd_opt(2024, m, d).unwrap())
}

fn arb_lot() -> impl Strategy<Value = LotConsumption> {
    ("[A-Z]{1,3}", arb_quantity(), arb_unit_cost(), arb_stated_total()).prop_map(
        |(id, quantity, unit_cost, total_cost)| LotConsumption {
            lot_id: id,
            unit_cost,
            quantity,
            total_cost,
        },
    )
}

fn arb_movement() -> impl Strategy<Value = Movement> {
    (
        arb_date(),
        prop::bool::ANY,
        arb_quantity(),
        arb_unit_cost(),
        arb_stated_total(),
        prop::collection::vec(arb_lot(), 0..4),
        "([A-Z][0-9]{3}-)?[0-9]{1,6}",
    )
        .prop_map(|(date, is_entry, quantity, unit_cost, total_cost, lots, code)| {
            let direction = if is_entry {
                Direction::Entry
            } else {
                Direction::Exit
            };
            let mut movement = Movement::new(date, direction, quantity, unit_cost)
                .with_voucher("01", code)
                .with_operation("02");
            movement.total_cost = total_cost;
            if direction == Direction::Exit {
                movement.exit_lots = lots;
            }
            movement
        })
}

fn arb_movements() -> impl Strategy<Value = Vec<Movement>> {
    prop::collection::vec(arb_movement(), 0..40).prop_map(|mut movements| {
        movements.sort_by_key(|m| m.date);
        movements
    })
}

fn arb_opening() -> impl Strategy<Value = OpeningBalance> {
    ((-1_000i64..100_000i64), (0i64..10_000_000i64))
        .prop_map(|(q, c)| OpeningBalance::new(Decimal::new(q, 2), Decimal::new(c, 2)))
}

fn period_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

// ============================================================================
// Ledger Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every balance quantity is the previous one plus the signed line delta.
    #[test]
    fn prop_balance_continuity(opening in arb_opening(), movements in arb_movements()) {
        let result = reconstruct(period_start(), &opening, &movements);

        let mut previous = opening.quantity;
        for line in &result.lines {
            if line.kind == LineKind::Opening {
                prop_assert_eq!(line.balance.quantity, opening.quantity);
                continue;
            }
            prop_assert_eq!(line.balance.quantity, previous + line.quantity_delta());
            previous = line.balance.quantity;
        }
        prop_assert_eq!(result.final_balance.quantity, previous);
    }

    /// Unit cost is total/quantity for positive stock and zero otherwise.
    #[test]
    fn prop_unit_cost_rule(opening in arb_opening(), movements in arb_movements()) {
        let result = reconstruct(period_start(), &opening, &movements);

        for line in &result.lines {
            let balance = line.balance;
            if balance.quantity > Decimal::ZERO {
                prop_assert_eq!(balance.unit_cost, balance.total_cost / balance.quantity);
            } else {
                prop_assert_eq!(balance.unit_cost, Decimal::ZERO);
            }
        }
    }

    /// Reconstruction is deterministic.
    #[test]
    fn prop_reconstruction_is_pure(opening in arb_opening(), movements in arb_movements()) {
        let first = KardexReport::build(period_start(), Some(opening), &movements);
        let second = KardexReport::build(period_start(), Some(opening), &movements);
        prop_assert_eq!(first, second);
    }

    /// A k-lot exit yields k lines; everything else yields one.
    #[test]
    fn prop_lot_expansion(opening in arb_opening(), movements in arb_movements()) {
        let result = reconstruct(period_start(), &opening, &movements);

        let expected: usize = movements
            .iter()
            .map(|m| if m.is_multi_lot_exit() { m.exit_lots.len() } else { 1 })
            .sum::<usize>()
            + usize::from(opening.has_stock());
        prop_assert_eq!(result.lines.len(), expected);

        let lot_lines = result.lines.iter().filter(|l| l.kind == LineKind::Lot).count();
        let lots: usize = movements
            .iter()
            .filter(|m| m.is_multi_lot_exit())
            .map(|m| m.exit_lots.len())
            .sum();
        prop_assert_eq!(lot_lines, lots);
    }

    /// closing cost = opening cost + entries - exits.
    #[test]
    fn prop_accounting_identity(opening in arb_opening(), movements in arb_movements()) {
        let result = reconstruct(period_start(), &opening, &movements);
        let totals = Totals::from_movements(&movements);

        prop_assert_eq!(
            result.final_balance.total_cost,
            opening.total_cost + totals.entries_monetary - totals.exits_monetary
        );
        prop_assert_eq!(
            result.final_balance.quantity,
            opening.quantity + totals.entries_physical - totals.exits_physical
        );
    }

    /// Ledger cost deltas sum to the same totals the aggregator reports.
    #[test]
    fn prop_line_deltas_match_totals(movements in arb_movements()) {
        let result = reconstruct(period_start(), &OpeningBalance::default(), &movements);
        let totals = Totals::from_movements(&movements);

        let entries: Decimal = result.lines.iter().map(|l| l.entry.total_cost).sum();
        let exits: Decimal = result.lines.iter().map(|l| l.exit.total_cost).sum();
        prop_assert_eq!(entries, totals.entries_monetary);
        prop_assert_eq!(exits, totals.exits_monetary);
    }
}
