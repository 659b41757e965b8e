//! Document exporters for kardex reports.
//!
//! Every exporter renders from the same [`Table`] model built by
//! [`build_table`], in either the valorized (quantities and costs) or the
//! physical (quantities only) layout:
//!
//! - [`WorkbookExporter`] - SpreadsheetML workbook, one worksheet per layout
//! - [`PrintableExporter`] - paginated landscape HTML, one page per layout
//! - [`CsvExporter`] - one layout as a flat table
//! - [`JsonExporter`] - the whole report as JSON
//!
//! [`export`] renders a document in memory and then hands it to a
//! [`DocumentSink`].
//!
//! # Example
//!
//! ```
//! use kardex_core::{KardexReport, Movement, NaiveDate, OpeningBalance};
//! use kardex_export::{export, MemorySink, ReportMetadata, WorkbookExporter};
//! use rust_decimal_macros::dec;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let movements = vec![Movement::exit(start, dec!(4), dec!(10))];
//! let report = KardexReport::build(start, Some(OpeningBalance::new(dec!(10), dec!(100))), &movements);
//!
//! let mut sink = MemorySink::new();
//! let info = export(&WorkbookExporter::default(), &report, &ReportMetadata::default(), &mut sink).unwrap();
//! assert_eq!(info.file_name, "kardex-20240101.xml");
//! assert!(sink.is_finalized());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod delimited;
pub mod error;
pub mod exporter;
pub mod layout;
pub mod metadata;
pub mod printable;
pub mod sink;
pub mod workbook;

pub use config::{validate_date_format, ExportConfig, Paper};
pub use delimited::CsvExporter;
pub use error::{ExportError, Result};
pub use exporter::{export, Exporter, JsonExporter};
pub use layout::{
    build_table, format_decimal, Cell, Column, ColumnKind, HeaderGroup, Layout, Row, RowKind,
    Table,
};
pub use metadata::ReportMetadata;
pub use printable::PrintableExporter;
pub use sink::{DocumentInfo, DocumentSink, FileSink, MemorySink, WriterSink};
pub use workbook::WorkbookExporter;
