//! Kardex input documents.
//!
//! The CLI reads one JSON document per product and warehouse:
//!
//! ```json
//! {
//!   "period_start": "2024-01-01",
//!   "metadata": { "product_code": "P-100" },
//!   "opening_balance": { "quantity": "20", "total_cost": "200" },
//!   "movements": [
//!     { "date": "2024-02-01", "direction": "entry", "quantity": "30", "unit_cost": "10.5" }
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use kardex_core::{KardexReport, Movement, OpeningBalance};
use kardex_export::ReportMetadata;
use serde::Deserialize;
use tracing::{debug, warn};

/// A parsed input document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KardexInput {
    /// First day of the reporting period.
    #[serde(default)]
    pub period_start: Option<NaiveDate>,
    /// Report header.
    #[serde(default)]
    pub metadata: ReportMetadata,
    /// Position carried into the period.
    #[serde(default)]
    pub opening_balance: Option<OpeningBalance>,
    /// Movements of the period.
    #[serde(default)]
    pub movements: Vec<Movement>,
}

impl KardexInput {
    /// Parse a document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).context("invalid kardex input")
    }

    /// Read and parse a document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to read {}", path.display()))
    }

    /// Stable-sort movements by date. Returns whether they were out of order.
    ///
    /// Movements sharing a date keep their document order.
    pub fn sort_movements(&mut self) -> bool {
        let sorted = self.movements.windows(2).all(|w| w[0].date <= w[1].date);
        if !sorted {
            self.movements.sort_by_key(|m| m.date);
        }
        !sorted
    }

    /// Resolve the period start.
    ///
    /// An explicit value wins, then the document's own `period_start`, then
    /// January 1 of the earliest movement's year.
    pub fn resolve_period_start(&self, explicit: Option<NaiveDate>) -> Result<NaiveDate> {
        explicit
            .or(self.period_start)
            .or_else(|| {
                self.movements
                    .iter()
                    .map(|m| m.date)
                    .min()
                    .and_then(|d| NaiveDate::from_ymd_opt(d.year(), 1, 1))
            })
            .context("period start is required when there are no movements")
    }

    /// Sort, resolve the period and reconstruct.
    pub fn into_report(
        mut self,
        period_start: Option<NaiveDate>,
    ) -> Result<(KardexReport, ReportMetadata)> {
        if self.sort_movements() {
            warn!("movements were not in date order and have been re-sorted");
        }
        let period_start = self.resolve_period_start(period_start)?;
        debug!(
            %period_start,
            movements = self.movements.len(),
            has_opening = self.opening_balance.is_some(),
            "reconstructing kardex"
        );

        let report = KardexReport::build(period_start, self.opening_balance, &self.movements);
        if !report.is_consistent() {
            warn!(
                closing_total_cost = %report.totals.closing_total_cost(&report.opening),
                final_total_cost = %report.final_balance.total_cost,
                "totals do not reconcile with the final balance"
            );
        }
        Ok((report, self.metadata))
    }
}
