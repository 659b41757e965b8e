//! Core types for kardex
//!
//! This crate rebuilds the inventory ledger (kardex) of one product/warehouse
//! pair from its opening balance and its date-ordered stock movements:
//!
//! - [`Movement`] - An entry or exit, optionally resolved against FIFO lots
//! - [`parse_voucher_code`] / [`effective_total_cost`] - Movement normalization
//! - [`reconstruct`] / [`ledger_lines`] - Running-balance ledger reconstruction
//! - [`Totals`] - Period entries and exits, in cost and in units
//! - [`KardexReport`] - Everything above bundled for display and export
//!
//! All computations are pure and use exact decimal arithmetic, so
//! `closing = opening + entries - exits` holds exactly.
//!
//! # Example
//!
//! ```
//! use kardex_core::{KardexReport, LotConsumption, Movement, OpeningBalance};
//! use rust_decimal_macros::dec;
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let movements = vec![
//!     Movement::entry(start, dec!(5), dec!(12)).with_voucher("01", "F001-10"),
//!     Movement::exit(start.succ_opt().unwrap(), dec!(5), dec!(11))
//!         .with_voucher("01", "F100-3")
//!         .with_lots(vec![
//!             LotConsumption::new("L1", dec!(3), dec!(10)),
//!             LotConsumption::new("L2", dec!(2), dec!(12)),
//!         ]),
//! ];
//!
//! let report = KardexReport::build(start, Some(OpeningBalance::new(dec!(10), dec!(100))), &movements);
//!
//! // opening line + entry + one line per lot
//! assert_eq!(report.lines.len(), 4);
//! assert_eq!(report.final_balance.quantity, dec!(10));
//! assert_eq!(report.final_balance.total_cost, dec!(106));
//! assert!(report.is_consistent());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregate;
pub mod ledger;
pub mod movement;
pub mod normalize;
pub mod report;

pub use aggregate::Totals;
pub use ledger::{
    ledger_lines, reconstruct, Balance, LedgerLine, LedgerLines, LineKind, Reconstruction, Triple,
};
pub use movement::{Direction, LotConsumption, Movement, OpeningBalance, ParseDirectionError};
pub use normalize::{effective_total_cost, parse_voucher_code, VoucherCode};
pub use report::KardexReport;

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
