//! Running-balance ledger reconstruction.
//!
//! The ledger is rebuilt in a single forward pass over movements that the
//! caller has already sorted by date. Every line carries the balance after
//! applying it, so the balance column is a pure running sum:
//!
//! - entries add their quantity and effective cost,
//! - exits without lots subtract their own quantity and effective cost,
//! - exits with lots subtract each lot in order, one line per lot.
//!
//! The unit cost of the balance is derived (`total_cost / quantity`) and is
//! zero whenever the quantity is not positive. Negative balances are kept as
//! they are; they usually point at a stockout or a data-entry error upstream.
//! Amounts beyond the range of [`Decimal`] saturate instead of overflowing.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::movement::{Direction, Movement, OpeningBalance};
use crate::normalize::VoucherCode;

/// Quantity, unit cost and total cost of one ledger column group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    /// Units.
    pub quantity: Decimal,
    /// Cost per unit.
    pub unit_cost: Decimal,
    /// Total cost.
    pub total_cost: Decimal,
}

impl Triple {
    /// All zeros, used for the unused side of a line.
    pub const ZERO: Self = Self {
        quantity: Decimal::ZERO,
        unit_cost: Decimal::ZERO,
        total_cost: Decimal::ZERO,
    };

    /// Create a triple.
    #[must_use]
    pub const fn new(quantity: Decimal, unit_cost: Decimal, total_cost: Decimal) -> Self {
        Self {
            quantity,
            unit_cost,
            total_cost,
        }
    }

    /// Check if every component is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.quantity.is_zero() && self.unit_cost.is_zero() && self.total_cost.is_zero()
    }
}

/// What produced a ledger line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Balance carried into the period; only the balance is populated.
    Opening,
    /// An entry, or an exit without lot detail.
    Movement,
    /// One lot of a multi-lot exit.
    Lot,
}

/// One row of the kardex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    /// What produced this line.
    pub kind: LineKind,
    /// Movement date (period start for the opening line).
    pub date: NaiveDate,
    /// Voucher type code.
    pub voucher_type: String,
    /// Voucher series.
    pub series: String,
    /// Voucher number.
    pub number: String,
    /// Operation type.
    pub operation_type: String,
    /// Side the line moves; `None` for the opening line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Consumed lot, for [`LineKind::Lot`] lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_id: Option<String>,
    /// Entry columns.
    pub entry: Triple,
    /// Exit columns.
    pub exit: Triple,
    /// Balance after this line.
    pub balance: Triple,
}

impl LedgerLine {
    /// Change in balance quantity caused by this line.
    #[must_use]
    pub fn quantity_delta(&self) -> Decimal {
        self.entry.quantity - self.exit.quantity
    }

    /// Change in balance cost caused by this line.
    #[must_use]
    pub fn cost_delta(&self) -> Decimal {
        self.entry.total_cost - self.exit.total_cost
    }

    fn opening(date: NaiveDate, balance: Triple) -> Self {
        Self {
            kind: LineKind::Opening,
            date,
            voucher_type: String::new(),
            series: String::new(),
            number: String::new(),
            operation_type: String::new(),
            direction: None,
            lot_id: None,
            entry: Triple::ZERO,
            exit: Triple::ZERO,
            balance,
        }
    }

    fn header(kind: LineKind, movement: &Movement, voucher: VoucherCode) -> Self {
        Self {
            kind,
            date: movement.date,
            voucher_type: movement.voucher_type.clone(),
            series: voucher.series,
            number: voucher.number,
            operation_type: movement.operation_type.clone(),
            direction: Some(movement.direction),
            lot_id: None,
            entry: Triple::ZERO,
            exit: Triple::ZERO,
            balance: Triple::ZERO,
        }
    }
}

/// Running inventory position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Units on hand (may be negative).
    pub quantity: Decimal,
    /// Total cost of the units on hand.
    pub total_cost: Decimal,
}

impl Balance {
    /// Weighted unit cost; zero when the quantity is not positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use kardex_core::Balance;
    /// use rust_decimal_macros::dec;
    ///
    /// let balance = Balance { quantity: dec!(15), total_cost: dec!(160) };
    /// assert_eq!(balance.unit_cost().round_dp(4), dec!(10.6667));
    ///
    /// let empty = Balance { quantity: dec!(0), total_cost: dec!(3) };
    /// assert_eq!(empty.unit_cost(), dec!(0));
    /// ```
    #[must_use]
    pub fn unit_cost(&self) -> Decimal {
        if self.quantity > Decimal::ZERO {
            self.total_cost
                .checked_div(self.quantity)
                .unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        }
    }

    /// The balance as a ledger column group.
    #[must_use]
    pub fn snapshot(&self) -> Triple {
        Triple::new(self.quantity, self.unit_cost(), self.total_cost)
    }

    /// Running sums saturate rather than overflow.
    fn apply(&mut self, direction: Direction, quantity: Decimal, cost: Decimal) {
        let sign = direction.sign();
        self.quantity = self.quantity.saturating_add(sign * quantity);
        self.total_cost = self.total_cost.saturating_add(sign * cost);
    }
}

impl From<OpeningBalance> for Balance {
    fn from(opening: OpeningBalance) -> Self {
        Self {
            quantity: opening.quantity,
            total_cost: opening.total_cost,
        }
    }
}

/// Result of a full reconstruction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconstruction {
    /// Ledger lines in emission order.
    pub lines: Vec<LedgerLine>,
    /// Balance after the last line.
    pub final_balance: Balance,
}

/// Rebuild the kardex for one product/warehouse pair.
///
/// `movements` must already be sorted by date; they are never reordered.
///
/// # Examples
///
/// ```
/// use kardex_core::{reconstruct, Movement, OpeningBalance};
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let opening = OpeningBalance::new(dec!(10), dec!(100));
/// let movements = vec![Movement::entry(start, dec!(5), dec!(12))];
///
/// let result = reconstruct(start, &opening, &movements);
/// assert_eq!(result.lines.len(), 2); // opening line + entry
/// assert_eq!(result.final_balance.quantity, dec!(15));
/// assert_eq!(result.final_balance.total_cost, dec!(160));
/// ```
#[must_use]
pub fn reconstruct(
    period_start: NaiveDate,
    opening: &OpeningBalance,
    movements: &[Movement],
) -> Reconstruction {
    let mut lines = ledger_lines(period_start, opening, movements);
    let collected: Vec<LedgerLine> = lines.by_ref().collect();
    Reconstruction {
        lines: collected,
        final_balance: lines.balance(),
    }
}

/// Lazily yield ledger lines, for callers that stream large periods.
pub fn ledger_lines<'a, I>(
    period_start: NaiveDate,
    opening: &OpeningBalance,
    movements: I,
) -> LedgerLines<'a, I::IntoIter>
where
    I: IntoIterator<Item = &'a Movement>,
{
    let balance = Balance::from(*opening);
    let opening_line = opening
        .has_stock()
        .then(|| LedgerLine::opening(period_start, balance.snapshot()));
    LedgerLines {
        movements: movements.into_iter(),
        balance,
        opening: opening_line,
        pending: None,
    }
}

/// Iterator over ledger lines. See [`ledger_lines`].
#[derive(Debug)]
pub struct LedgerLines<'a, I> {
    movements: I,
    balance: Balance,
    opening: Option<LedgerLine>,
    pending: Option<PendingLots<'a>>,
}

/// Multi-lot exit whose lots are still being emitted.
#[derive(Debug)]
struct PendingLots<'a> {
    movement: &'a Movement,
    voucher: VoucherCode,
    next: usize,
}

impl<'a, I> LedgerLines<'a, I>
where
    I: Iterator<Item = &'a Movement>,
{
    /// Balance after the lines yielded so far.
    #[must_use]
    pub fn balance(&self) -> Balance {
        self.balance
    }

    fn movement_line(&mut self, movement: &Movement) -> LedgerLine {
        let cost = movement.effective_total_cost();
        self.balance
            .apply(movement.direction, movement.quantity, cost);

        let moved = Triple::new(movement.quantity, movement.unit_cost, cost);
        let mut line = LedgerLine::header(LineKind::Movement, movement, movement.voucher());
        match movement.direction {
            Direction::Entry => line.entry = moved,
            Direction::Exit => line.exit = moved,
        }
        line.balance = self.balance.snapshot();
        line
    }

    fn next_lot(&mut self) -> Option<LedgerLine> {
        let pending = self.pending.as_mut()?;
        let movement = pending.movement;
        let Some(lot) = movement.exit_lots.get(pending.next) else {
            self.pending = None;
            return None;
        };
        pending.next += 1;

        let cost = lot.effective_total_cost();
        let mut line = LedgerLine::header(LineKind::Lot, movement, pending.voucher.clone());
        self.balance.apply(Direction::Exit, lot.quantity, cost);
        line.lot_id = Some(lot.lot_id.clone());
        line.exit = Triple::new(lot.quantity, lot.unit_cost, cost);
        line.balance = self.balance.snapshot();
        Some(line)
    }
}

impl<'a, I> Iterator for LedgerLines<'a, I>
where
    I: Iterator<Item = &'a Movement>,
{
    type Item = LedgerLine;

    fn next(&mut self) -> Option<LedgerLine> {
        if let Some(line) = self.opening.take() {
            return Some(line);
        }
        if let Some(line) = self.next_lot() {
            return Some(line);
        }

        let movement = self.movements.next()?;
        if movement.is_multi_lot_exit() {
            self.pending = Some(PendingLots {
                movement,
                voucher: movement.voucher(),
                next: 0,
            });
            return self.next_lot();
        }
        Some(self.movement_line(movement))
    }
}
