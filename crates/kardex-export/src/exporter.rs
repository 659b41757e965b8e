//! The exporter trait and the render-then-deliver driver.

use std::io::Write;

use kardex_core::KardexReport;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::metadata::ReportMetadata;
use crate::sink::{DocumentInfo, DocumentSink};

/// Renders a kardex report into one document format.
pub trait Exporter {
    /// MIME type of the produced document.
    fn media_type(&self) -> &'static str;

    /// File extension, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Render the whole document into `w`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    fn render<W: Write>(&self, report: &KardexReport, metadata: &ReportMetadata, w: W)
        -> Result<()>;

    /// Render into a fresh buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    fn render_to_vec(&self, report: &KardexReport, metadata: &ReportMetadata) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.render(report, metadata, &mut buf)?;
        Ok(buf)
    }
}

/// Render a report and deliver it to a sink.
///
/// The document is rendered completely in memory first; the sink is only
/// opened once rendering has succeeded, then receives the bytes and is
/// finalized.
///
/// # Errors
///
/// Returns the exporter's error if rendering fails (the sink is untouched),
/// or the sink's error if delivery fails.
pub fn export<E, S>(
    exporter: &E,
    report: &KardexReport,
    metadata: &ReportMetadata,
    mut sink: S,
) -> Result<DocumentInfo>
where
    E: Exporter + ?Sized,
    S: DocumentSink,
{
    let bytes = exporter.render_to_vec(report, metadata)?;
    let info = DocumentInfo {
        file_name: format!(
            "{}.{}",
            metadata.document_name(report.period_start),
            exporter.file_extension()
        ),
        media_type: exporter.media_type(),
        len: bytes.len(),
    };
    debug!(
        file_name = %info.file_name,
        media_type = info.media_type,
        bytes = info.len,
        lines = report.lines.len(),
        "delivering document"
    );

    sink.open(&info)?;
    sink.write(&bytes)?;
    sink.finalize()?;
    Ok(info)
}

/// Serializes the report and its metadata as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

#[derive(Serialize)]
struct JsonDocument<'a> {
    metadata: &'a ReportMetadata,
    report: &'a KardexReport,
}

impl Exporter for JsonExporter {
    fn media_type(&self) -> &'static str {
        "application/json"
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn render<W: Write>(
        &self,
        report: &KardexReport,
        metadata: &ReportMetadata,
        mut w: W,
    ) -> Result<()> {
        serde_json::to_writer_pretty(&mut w, &JsonDocument { metadata, report })?;
        w.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::sink::MemorySink;
    use chrono::NaiveDate;
    use kardex_core::{Movement, OpeningBalance};
    use rust_decimal_macros::dec;

    fn report() -> KardexReport {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        KardexReport::build(
            start,
            Some(OpeningBalance::new(dec!(10), dec!(100))),
            &[Movement::entry(start, dec!(5), dec!(12))],
        )
    }

    struct FailingExporter;

    impl Exporter for FailingExporter {
        fn media_type(&self) -> &'static str {
            "text/plain"
        }

        fn file_extension(&self) -> &'static str {
            "txt"
        }

        fn render<W: Write>(&self, _: &KardexReport, _: &ReportMetadata, _: W) -> Result<()> {
            Err(ExportError::Xml("boom".to_string()))
        }
    }

    #[test]
    fn test_export_json() {
        let mut sink = MemorySink::new();
        let info = export(&JsonExporter, &report(), &ReportMetadata::default(), &mut sink).unwrap();

        assert_eq!(info.file_name, "kardex-20240101.json");
        assert_eq!(info.len, sink.bytes().len());
        assert!(sink.is_finalized());

        let value: serde_json::Value = serde_json::from_slice(sink.bytes()).unwrap();
        assert_eq!(value["report"]["lines"].as_array().unwrap().len(), 2);
        assert!(value["metadata"].is_object());
    }

    #[test]
    fn test_render_failure_leaves_sink_untouched() {
        let mut sink = MemorySink::new();
        let result = export(&FailingExporter, &report(), &ReportMetadata::default(), &mut sink);

        assert!(matches!(result, Err(ExportError::Xml(_))));
        assert!(sink.info().is_none());
        assert!(sink.bytes().is_empty());
    }
}
