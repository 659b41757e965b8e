//! Report header information.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::format_date;

/// Descriptive header printed above each kardex table.
///
/// Everything is optional; absent fields are simply not printed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportMetadata {
    /// Company (taxpayer) name.
    pub company_name: Option<String>,
    /// Company tax identifier.
    pub tax_id: Option<String>,
    /// Establishment code or address.
    pub establishment: Option<String>,
    /// Warehouse name or code.
    pub warehouse: Option<String>,
    /// Product code.
    pub product_code: Option<String>,
    /// Product description.
    pub product_description: Option<String>,
    /// Unit of measure.
    pub unit_of_measure: Option<String>,
    /// Valuation method (e.g. FIFO, weighted average).
    pub valuation_method: Option<String>,
    /// Last day of the reporting period.
    pub period_end: Option<NaiveDate>,
}

impl ReportMetadata {
    /// Labelled header fields, skipping absent ones.
    ///
    /// The period is always first: `start` or `start - end`.
    #[must_use]
    pub fn fields(&self, period_start: NaiveDate, date_format: &str) -> Vec<(&'static str, String)> {
        let period = match self.period_end {
            Some(end) => format!(
                "{} - {}",
                format_date(period_start, date_format),
                format_date(end, date_format)
            ),
            None => format_date(period_start, date_format),
        };

        let optional = [
            ("Company", &self.company_name),
            ("Tax ID", &self.tax_id),
            ("Establishment", &self.establishment),
            ("Warehouse", &self.warehouse),
            ("Product code", &self.product_code),
            ("Product", &self.product_description),
            ("Unit of measure", &self.unit_of_measure),
            ("Valuation method", &self.valuation_method),
        ];

        std::iter::once(("Period", period))
            .chain(
                optional
                    .into_iter()
                    .filter_map(|(label, value)| value.clone().map(|v| (label, v))),
            )
            .collect()
    }

    /// Base name for exported files.
    #[must_use]
    pub fn document_name(&self, period_start: NaiveDate) -> String {
        match &self.product_code {
            Some(code) => format!("kardex-{code}-{}", period_start.format("%Y%m%d")),
            None => format!("kardex-{}", period_start.format("%Y%m%d")),
        }
    }
}
