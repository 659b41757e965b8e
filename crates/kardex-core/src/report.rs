//! A complete kardex for one product/warehouse pair and period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::Totals;
use crate::ledger::{reconstruct, Balance, LedgerLine};
use crate::movement::{Movement, OpeningBalance};

/// Ledger lines, final balance and totals built from the same input.
///
/// This is what the on-screen table and every exporter consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KardexReport {
    /// First day of the reporting period.
    pub period_start: NaiveDate,
    /// Balance carried into the period.
    pub opening: OpeningBalance,
    /// Ledger lines, including the opening line when there is stock.
    pub lines: Vec<LedgerLine>,
    /// Balance after the last line.
    pub final_balance: Balance,
    /// Entries and exits of the period.
    pub totals: Totals,
}

impl KardexReport {
    /// Reconstruct the ledger and aggregate totals.
    ///
    /// A missing opening balance counts as zero.
    #[must_use]
    pub fn build(
        period_start: NaiveDate,
        opening: Option<OpeningBalance>,
        movements: &[Movement],
    ) -> Self {
        let opening = opening.unwrap_or_default();
        let reconstruction = reconstruct(period_start, &opening, movements);
        Self {
            period_start,
            opening,
            lines: reconstruction.lines,
            final_balance: reconstruction.final_balance,
            totals: Totals::from_movements(movements),
        }
    }

    /// Whether the final balance satisfies
    /// `closing = opening + entries - exits` in units and in cost.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.totals.reconciles(&self.opening, &self.final_balance)
    }

    /// Ledger lines produced by movements (the opening line excluded).
    pub fn movement_lines(&self) -> impl Iterator<Item = &LedgerLine> {
        self.lines
            .iter()
            .filter(|line| line.kind != crate::LineKind::Opening)
    }
}
