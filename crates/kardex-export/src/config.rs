//! Exporter configuration.

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::error::{ExportError, Result};
use crate::layout::Layout;

/// Paper size of the printable document (always landscape).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Paper {
    /// ISO A4.
    #[default]
    A4,
    /// US Letter.
    Letter,
}

impl Paper {
    /// CSS `@page` size.
    #[must_use]
    pub const fn css_size(self) -> &'static str {
        match self {
            Self::A4 => "A4 landscape",
            Self::Letter => "letter landscape",
        }
    }
}

impl FromStr for Paper {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "letter" => Ok(Self::Letter),
            _ => Err(format!("unknown paper size: {s}")),
        }
    }
}

impl fmt::Display for Paper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A4 => write!(f, "a4"),
            Self::Letter => write!(f, "letter"),
        }
    }
}

/// Exporter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Title of the valorized layout.
    pub valorized_title: String,
    /// Title of the physical layout.
    pub physical_title: String,
    /// Paper size for printable output.
    pub paper: Paper,
    /// strftime-style date format for date cells.
    pub date_format: String,
    /// Whether to print the metadata block above each table.
    pub include_metadata: bool,
    /// Operation-type text of the opening line.
    pub opening_label: String,
    /// First-cell text of the totals row.
    pub totals_label: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            valorized_title: "Permanent Inventory Record - Valorized".to_string(),
            physical_title: "Permanent Inventory Record - Physical Units".to_string(),
            paper: Paper::A4,
            date_format: "%d/%m/%Y".to_string(),
            include_metadata: true,
            opening_label: "OPENING BALANCE".to_string(),
            totals_label: "TOTALS".to_string(),
        }
    }
}

impl ExportConfig {
    /// Set the paper size.
    #[must_use]
    pub const fn with_paper(mut self, paper: Paper) -> Self {
        self.paper = paper;
        self
    }

    /// Set the date format.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::DateFormat`] if `format` has an unknown or
    /// incomplete strftime specifier.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        validate_date_format(&format)?;
        self.date_format = format;
        Ok(self)
    }

    /// Set the title of one layout.
    #[must_use]
    pub fn with_title(mut self, layout: Layout, title: impl Into<String>) -> Self {
        match layout {
            Layout::Valorized => self.valorized_title = title.into(),
            Layout::Physical => self.physical_title = title.into(),
        }
        self
    }

    /// Skip the metadata block.
    #[must_use]
    pub const fn without_metadata(mut self) -> Self {
        self.include_metadata = false;
        self
    }

    /// Title of a layout.
    #[must_use]
    pub fn title(&self, layout: Layout) -> &str {
        match layout {
            Layout::Valorized => &self.valorized_title,
            Layout::Physical => &self.physical_title,
        }
    }
}

/// Check that a strftime format only uses known specifiers.
///
/// # Errors
///
/// Returns [`ExportError::DateFormat`] naming the rejected format.
pub fn validate_date_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ExportError::DateFormat(format.to_string()));
    }
    Ok(())
}

/// Format a date, falling back to ISO 8601 when `format` is invalid.
pub(crate) fn format_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_err() {
        out = date.to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_parse() {
        assert_eq!("A4".parse::<Paper>(), Ok(Paper::A4));
        assert_eq!("letter".parse::<Paper>(), Ok(Paper::Letter));
        assert!("legal".parse::<Paper>().is_err());
    }

    #[test]
    fn test_with_date_format_rejects_unknown_specifier() {
        let config = ExportConfig::default().with_date_format("%Y-%m-%d").unwrap();
        assert_eq!(config.date_format, "%Y-%m-%d");

        let err = ExportConfig::default().with_date_format("%Q").unwrap_err();
        assert!(matches!(err, ExportError::DateFormat(ref f) if f == "%Q"));
        assert!(ExportConfig::default().with_date_format("%d/%").is_err());
    }

    #[test]
    fn test_format_date_falls_back_to_iso() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(format_date(date, "%d/%m/%Y"), "09/03/2024");
        assert_eq!(format_date(date, "%Q"), "2024-03-09");
    }

    #[test]
    fn test_with_title() {
        let config = ExportConfig::default().with_title(Layout::Physical, "Formato 12.1");
        assert_eq!(config.title(Layout::Physical), "Formato 12.1");
        assert_eq!(
            config.title(Layout::Valorized),
            "Permanent Inventory Record - Valorized"
        );
    }
}
