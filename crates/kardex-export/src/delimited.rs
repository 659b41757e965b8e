//! CSV exporter.

use std::io::Write;

use csv::WriterBuilder;
use kardex_core::KardexReport;

use crate::config::ExportConfig;
use crate::error::Result;
use crate::exporter::Exporter;
use crate::layout::{build_table, Cell, Layout, Table};
use crate::metadata::ReportMetadata;

/// Writes one layout as a flat CSV table.
///
/// The two header rows collapse into one (`Entries Quantity`, ...), the
/// metadata block is left out and numbers use a plain `.` decimal point at
/// their display precision.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    config: ExportConfig,
    layout: Layout,
    delimiter: u8,
}

impl CsvExporter {
    /// Exporter for one layout.
    #[must_use]
    pub const fn new(layout: Layout, config: ExportConfig) -> Self {
        Self {
            config,
            layout,
            delimiter: b',',
        }
    }

    /// Use a different field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new(Layout::Valorized, ExportConfig::default())
    }
}

fn flat_headers(table: &Table) -> Vec<String> {
    let mut headers = Vec::with_capacity(table.width());
    let mut columns = table.columns.iter();
    for (index, group) in table.groups.iter().enumerate() {
        for column in columns.by_ref().take(group.span) {
            if index == 0 {
                headers.push(column.label.to_string());
            } else {
                headers.push(format!("{} {}", group.label, column.label));
            }
        }
    }
    headers
}

impl Exporter for CsvExporter {
    fn media_type(&self) -> &'static str {
        "text/csv"
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }

    fn render<W: Write>(
        &self,
        report: &KardexReport,
        metadata: &ReportMetadata,
        mut w: W,
    ) -> Result<()> {
        let table = build_table(self.layout, report, metadata, &self.config);
        let mut wrt = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(&mut w);

        wrt.write_record(flat_headers(&table))?;
        for row in &table.rows {
            wrt.write_record(row.cells.iter().map(Cell::display))?;
        }
        wrt.flush()?;
        Ok(())
    }
}
