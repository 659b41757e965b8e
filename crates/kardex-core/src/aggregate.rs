//! Period totals.
//!
//! Totals are summed straight from the movements rather than from ledger
//! lines, so they can be used to cross-check a reconstruction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::Balance;
use crate::movement::{Direction, Movement, OpeningBalance};

/// Entries and exits for a period, in cost and in units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of effective total cost over entries.
    pub entries_monetary: Decimal,
    /// Sum of effective total cost over exits (lots expanded).
    pub exits_monetary: Decimal,
    /// Sum of entry quantities.
    pub entries_physical: Decimal,
    /// Sum of exit quantities (lots expanded).
    pub exits_physical: Decimal,
}

impl Totals {
    /// Sum all movements of a period.
    ///
    /// # Examples
    ///
    /// ```
    /// use kardex_core::{Movement, LotConsumption, Totals};
    /// use rust_decimal_macros::dec;
    /// use chrono::NaiveDate;
    ///
    /// let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
    /// let movements = vec![
    ///     Movement::entry(day, dec!(5), dec!(12)),
    ///     Movement::exit(day, dec!(99), dec!(99)).with_lots(vec![
    ///         LotConsumption::new("A", dec!(3), dec!(10)),
    ///         LotConsumption::new("B", dec!(2), dec!(12)),
    ///     ]),
    /// ];
    ///
    /// let totals = Totals::from_movements(&movements);
    /// assert_eq!(totals.entries_monetary, dec!(60));
    /// assert_eq!(totals.exits_monetary, dec!(54));
    /// assert_eq!(totals.exits_physical, dec!(5));
    /// ```
    #[must_use]
    pub fn from_movements<'a>(movements: impl IntoIterator<Item = &'a Movement>) -> Self {
        let mut totals = Self::default();
        for movement in movements {
            totals.add(movement);
        }
        totals
    }

    /// Add one movement to the running totals.
    pub fn add(&mut self, movement: &Movement) {
        match movement.direction {
            Direction::Entry => {
                self.entries_monetary = self
                    .entries_monetary
                    .saturating_add(movement.effective_total_cost());
                self.entries_physical = self.entries_physical.saturating_add(movement.quantity);
            }
            Direction::Exit if movement.exit_lots.is_empty() => {
                self.exits_monetary = self
                    .exits_monetary
                    .saturating_add(movement.effective_total_cost());
                self.exits_physical = self.exits_physical.saturating_add(movement.quantity);
            }
            Direction::Exit => {
                for lot in &movement.exit_lots {
                    self.exits_monetary = self
                        .exits_monetary
                        .saturating_add(lot.effective_total_cost());
                    self.exits_physical = self.exits_physical.saturating_add(lot.quantity);
                }
            }
        }
    }

    /// Closing quantity implied by these totals.
    #[must_use]
    pub fn closing_quantity(&self, opening: &OpeningBalance) -> Decimal {
        opening
            .quantity
            .saturating_add(self.entries_physical)
            .saturating_sub(self.exits_physical)
    }

    /// Closing cost implied by these totals.
    #[must_use]
    pub fn closing_total_cost(&self, opening: &OpeningBalance) -> Decimal {
        opening
            .total_cost
            .saturating_add(self.entries_monetary)
            .saturating_sub(self.exits_monetary)
    }

    /// Check a reconstructed final balance against these totals.
    #[must_use]
    pub fn reconciles(&self, opening: &OpeningBalance, final_balance: &Balance) -> bool {
        self.closing_quantity(opening) == final_balance.quantity
            && self.closing_total_cost(opening) == final_balance.total_cost
    }
}

impl<'a> FromIterator<&'a Movement> for Totals {
    fn from_iter<T: IntoIterator<Item = &'a Movement>>(iter: T) -> Self {
        Self::from_movements(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LotConsumption;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_totals_saturate() {
        let day = date(2024, 1, 2);
        let movements = vec![
            Movement::entry(day, Decimal::MAX, dec!(1)),
            Movement::entry(day, Decimal::MAX, dec!(1)),
        ];
        let totals = Totals::from_movements(&movements);

        assert_eq!(totals.entries_physical, Decimal::MAX);
        assert_eq!(totals.entries_monetary, Decimal::MAX);
        assert_eq!(totals.closing_quantity(&OpeningBalance::new(dec!(1), dec!(0))), Decimal::MAX);
    }

    #[test]
    fn test_empty_totals() {
        let totals = Totals::from_movements(&[]);
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_entry_zero_stated_total() {
        let movements = vec![Movement::entry(date(2024, 1, 1), dec!(5), dec!(12)).with_total_cost(dec!(0))];
        let totals = Totals::from_movements(&movements);
        assert_eq!(totals.entries_monetary, dec!(60));
        assert_eq!(totals.entries_physical, dec!(5));
    }

    #[test]
    fn test_plain_exit_uses_movement() {
        let movements = vec![Movement::exit(date(2024, 1, 1), dec!(2), dec!(3)).with_total_cost(dec!(6.5))];
        let totals = Totals::from_movements(&movements);
        assert_eq!(totals.exits_monetary, dec!(6.5));
        assert_eq!(totals.exits_physical, dec!(2));
        assert_eq!(totals.entries_monetary, dec!(0));
    }

    #[test]
    fn test_lots_on_entry_ignored() {
        let movements = vec![Movement::entry(date(2024, 1, 1), dec!(2), dec!(3))
            .with_lots(vec![LotConsumption::new("A", dec!(50), dec!(50))])];
        let totals = Totals::from_movements(&movements);
        assert_eq!(totals.entries_physical, dec!(2));
        assert_eq!(totals.exits_physical, dec!(0));
    }

    #[test]
    fn test_collect_and_reconcile() {
        let opening = OpeningBalance::new(dec!(20), dec!(220));
        let movements = vec![
            Movement::entry(date(2024, 1, 2), dec!(4), dec!(11)),
            Movement::exit(date(2024, 1, 3), dec!(5), dec!(11)).with_lots(vec![
                LotConsumption::new("A", dec!(3), dec!(10)),
                LotConsumption::new("B", dec!(2), dec!(12)),
            ]),
        ];
        let totals: Totals = movements.iter().collect();

        assert_eq!(totals.closing_quantity(&opening), dec!(19));
        assert_eq!(totals.closing_total_cost(&opening), dec!(210));

        let good = Balance {
            quantity: dec!(19),
            total_cost: dec!(210),
        };
        let bad = Balance {
            quantity: dec!(19),
            total_cost: dec!(211),
        };
        assert!(totals.reconciles(&opening, &good));
        assert!(!totals.reconciles(&opening, &bad));
    }
}
