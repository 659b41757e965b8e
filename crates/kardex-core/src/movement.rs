//! Movement types as supplied by the upstream ledger query.
//!
//! A [`Movement`] is one stock event (entry or exit) for a single
//! product/warehouse pair. Exits that were already matched against several
//! FIFO lots carry the consumed lots in [`Movement::exit_lots`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::normalize::{effective_total_cost, parse_voucher_code, VoucherCode};

/// Whether a movement increases or decreases the inventory balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Direction {
    /// Purchase, initial stock, return from customer.
    Entry,
    /// Sale, consumption, transfer out.
    Exit,
}

impl Direction {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
        }
    }

    /// `1` for entries, `-1` for exits.
    #[must_use]
    pub fn sign(self) -> Decimal {
        match self {
            Self::Entry => Decimal::ONE,
            Self::Exit => Decimal::NEGATIVE_ONE,
        }
    }
}

/// Error returned when a direction code is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown movement direction: {0:?}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ENTRY" | "E" | "IN" | "ENTRADA" | "INGRESO" => Ok(Self::Entry),
            "EXIT" | "S" | "OUT" | "SALIDA" => Ok(Self::Exit),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = ParseDirectionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quantity and cost carried into the reporting period.
///
/// A missing opening balance is equivalent to [`OpeningBalance::default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningBalance {
    /// Units on hand at period start.
    pub quantity: Decimal,
    /// Total cost of those units.
    pub total_cost: Decimal,
}

impl OpeningBalance {
    /// Create an opening balance.
    #[must_use]
    pub const fn new(quantity: Decimal, total_cost: Decimal) -> Self {
        Self {
            quantity,
            total_cost,
        }
    }

    /// Whether an opening line is printed for this balance.
    #[must_use]
    pub fn has_stock(&self) -> bool {
        self.quantity > Decimal::ZERO
    }
}

/// One FIFO lot consumed by an exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotConsumption {
    /// Upstream lot identifier.
    #[serde(default)]
    pub lot_id: String,
    /// Acquisition cost per unit of this lot.
    pub unit_cost: Decimal,
    /// Units taken from this lot.
    pub quantity: Decimal,
    /// Stated cost of the consumed units, if the upstream computed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<Decimal>,
}

impl LotConsumption {
    /// Create a lot consumption without a stated total.
    #[must_use]
    pub fn new(lot_id: impl Into<String>, quantity: Decimal, unit_cost: Decimal) -> Self {
        Self {
            lot_id: lot_id.into(),
            unit_cost,
            quantity,
            total_cost: None,
        }
    }

    /// Set the stated total cost.
    #[must_use]
    pub const fn with_total_cost(mut self, total_cost: Decimal) -> Self {
        self.total_cost = Some(total_cost);
        self
    }

    /// Stated total, or `quantity * unit_cost` when missing or zero.
    #[must_use]
    pub fn effective_total_cost(&self) -> Decimal {
        effective_total_cost(self.quantity, self.unit_cost, self.total_cost)
    }
}

/// A single stock movement.
///
/// # Examples
///
/// ```
/// use kardex_core::{Movement, LotConsumption};
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let sale = Movement::exit(date, dec!(5), dec!(11))
///     .with_voucher("01", "F001-000123")
///     .with_lots(vec![
///         LotConsumption::new("L1", dec!(3), dec!(10)),
///         LotConsumption::new("L2", dec!(2), dec!(12)),
///     ]);
///
/// assert_eq!(sale.voucher().series, "F001");
/// assert_eq!(sale.voucher().number, "000123");
/// assert_eq!(sale.effective_total_cost(), dec!(55));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Movement date.
    pub date: NaiveDate,
    /// Entry or exit.
    pub direction: Direction,
    /// Operation type code or description (purchase, sale, ...).
    #[serde(default)]
    pub operation_type: String,
    /// Voucher (document) type code.
    #[serde(default)]
    pub voucher_type: String,
    /// `series-number` voucher identifier.
    #[serde(default)]
    pub voucher_code: String,
    /// Units moved.
    pub quantity: Decimal,
    /// Recorded cost per unit.
    pub unit_cost: Decimal,
    /// Stated total cost, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<Decimal>,
    /// Lots consumed, for exits resolved against several lots.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exit_lots: Vec<LotConsumption>,
}

impl Movement {
    /// Create a movement with empty header fields.
    #[must_use]
    pub const fn new(
        date: NaiveDate,
        direction: Direction,
        quantity: Decimal,
        unit_cost: Decimal,
    ) -> Self {
        Self {
            date,
            direction,
            operation_type: String::new(),
            voucher_type: String::new(),
            voucher_code: String::new(),
            quantity,
            unit_cost,
            total_cost: None,
            exit_lots: Vec::new(),
        }
    }

    /// Create an entry movement.
    #[must_use]
    pub const fn entry(date: NaiveDate, quantity: Decimal, unit_cost: Decimal) -> Self {
        Self::new(date, Direction::Entry, quantity, unit_cost)
    }

    /// Create an exit movement.
    #[must_use]
    pub const fn exit(date: NaiveDate, quantity: Decimal, unit_cost: Decimal) -> Self {
        Self::new(date, Direction::Exit, quantity, unit_cost)
    }

    /// Set the voucher type and code.
    #[must_use]
    pub fn with_voucher(
        mut self,
        voucher_type: impl Into<String>,
        voucher_code: impl Into<String>,
    ) -> Self {
        self.voucher_type = voucher_type.into();
        self.voucher_code = voucher_code.into();
        self
    }

    /// Set the operation type.
    #[must_use]
    pub fn with_operation(mut self, operation_type: impl Into<String>) -> Self {
        self.operation_type = operation_type.into();
        self
    }

    /// Set the stated total cost.
    #[must_use]
    pub const fn with_total_cost(mut self, total_cost: Decimal) -> Self {
        self.total_cost = Some(total_cost);
        self
    }

    /// Attach the lots consumed by this exit.
    #[must_use]
    pub fn with_lots(mut self, lots: Vec<LotConsumption>) -> Self {
        self.exit_lots = lots;
        self
    }

    /// Whether this movement expands into one ledger line per lot.
    #[must_use]
    pub fn is_multi_lot_exit(&self) -> bool {
        self.direction == Direction::Exit && !self.exit_lots.is_empty()
    }

    /// Series and number parsed from [`Movement::voucher_code`].
    #[must_use]
    pub fn voucher(&self) -> VoucherCode {
        parse_voucher_code(&self.voucher_code)
    }

    /// Stated total, or `quantity * unit_cost` when missing or zero.
    ///
    /// Only the movement's own fields are used; lot detail is not consulted.
    #[must_use]
    pub fn effective_total_cost(&self) -> Decimal {
        effective_total_cost(self.quantity, self.unit_cost, self.total_cost)
    }
}
