//! Printable (paginated HTML) exporter.
//!
//! Each layout becomes a `<section>` that starts on a new landscape page.
//! Table headers are marked as header groups so browsers and print engines
//! repeat them on every page of a long kardex.

use std::fmt::Write as _;
use std::io::Write;

use kardex_core::KardexReport;
use quick_xml::escape::escape;

use crate::config::ExportConfig;
use crate::error::Result;
use crate::exporter::Exporter;
use crate::layout::{build_table, Cell, Layout, RowKind, Table};
use crate::metadata::ReportMetadata;

/// Renders all configured layouts into one printable HTML document.
#[derive(Debug, Clone)]
pub struct PrintableExporter {
    config: ExportConfig,
    layouts: Vec<Layout>,
}

impl Default for PrintableExporter {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

impl PrintableExporter {
    /// Exporter with both layouts.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            layouts: Layout::BOTH.to_vec(),
        }
    }

    /// Restrict the document to the given layouts, in order.
    #[must_use]
    pub fn with_layouts(mut self, layouts: impl IntoIterator<Item = Layout>) -> Self {
        self.layouts = layouts.into_iter().collect();
        self
    }

    fn stylesheet(&self) -> String {
        format!(
            "@page {{ size: {}; margin: 12mm; }}\n\
             body {{ font-family: Arial, Helvetica, sans-serif; font-size: 8pt; }}\n\
             section.layout + section.layout {{ break-before: page; page-break-before: always; }}\n\
             h1 {{ font-size: 12pt; margin: 0 0 4pt 0; }}\n\
             dl.metadata {{ display: grid; grid-template-columns: max-content auto; gap: 1pt 8pt; margin: 0 0 6pt 0; }}\n\
             dl.metadata dt {{ font-weight: bold; }}\n\
             dl.metadata dd {{ margin: 0; }}\n\
             table {{ border-collapse: collapse; width: 100%; table-layout: fixed; }}\n\
             thead {{ display: table-header-group; }}\n\
             tfoot {{ display: table-row-group; }}\n\
             tr {{ break-inside: avoid; page-break-inside: avoid; }}\n\
             th, td {{ border: 0.5pt solid #000; padding: 1pt 3pt; }}\n\
             th {{ background: #d9d9d9; text-align: center; }}\n\
             td.num {{ text-align: right; }}\n\
             tr.totals td {{ font-weight: bold; }}\n",
            self.config.paper.css_size()
        )
    }
}

impl Exporter for PrintableExporter {
    fn media_type(&self) -> &'static str {
        "text/html"
    }

    fn file_extension(&self) -> &'static str {
        "html"
    }

    fn render<W: Write>(
        &self,
        report: &KardexReport,
        metadata: &ReportMetadata,
        mut w: W,
    ) -> Result<()> {
        let tables: Vec<Table> = self
            .layouts
            .iter()
            .map(|&layout| build_table(layout, report, metadata, &self.config))
            .collect();

        let title = tables
            .first()
            .map_or_else(|| self.config.valorized_title.clone(), |t| t.title.clone());

        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        writeln!(out, "<title>{}</title>", escape(title.as_str())).unwrap();
        out.push_str("<style>\n");
        out.push_str(&self.stylesheet());
        out.push_str("</style>\n</head>\n<body>\n");
        for table in &tables {
            write_section(&mut out, table);
        }
        out.push_str("</body>\n</html>\n");

        w.write_all(out.as_bytes())?;
        Ok(())
    }
}

fn write_section(out: &mut String, table: &Table) {
    writeln!(out, "<section class=\"layout {}\">", table.layout.as_str()).unwrap();
    writeln!(out, "<h1>{}</h1>", escape(table.title.as_str())).unwrap();

    if !table.metadata.is_empty() {
        out.push_str("<dl class=\"metadata\">\n");
        for (label, value) in &table.metadata {
            writeln!(
                out,
                "<dt>{}</dt><dd>{}</dd>",
                escape(*label),
                escape(value.as_str())
            )
            .unwrap();
        }
        out.push_str("</dl>\n");
    }

    out.push_str("<table>\n<colgroup>\n");
    for column in &table.columns {
        writeln!(out, "<col style=\"width: {}ch\">", column.width).unwrap();
    }
    out.push_str("</colgroup>\n<thead>\n<tr>");
    for group in &table.groups {
        if group.span > 1 {
            write!(out, "<th colspan=\"{}\">{}</th>", group.span, escape(group.label)).unwrap();
        } else {
            write!(out, "<th>{}</th>", escape(group.label)).unwrap();
        }
    }
    out.push_str("</tr>\n<tr>");
    for column in &table.columns {
        write!(out, "<th>{}</th>", escape(column.label)).unwrap();
    }
    out.push_str("</tr>\n</thead>\n");

    let (body, totals): (Vec<_>, Vec<_>) =
        table.rows.iter().partition(|row| row.kind != RowKind::Totals);

    out.push_str("<tbody>\n");
    for row in body {
        write_row(out, table, &row.cells, row_class(row.kind));
    }
    out.push_str("</tbody>\n<tfoot>\n");
    for row in totals {
        write_row(out, table, &row.cells, "totals");
    }
    out.push_str("</tfoot>\n</table>\n</section>\n");
}

const fn row_class(kind: RowKind) -> &'static str {
    match kind {
        RowKind::Opening => "opening",
        RowKind::Movement => "movement",
        RowKind::Lot => "lot",
        RowKind::Totals => "totals",
    }
}

fn write_row(out: &mut String, table: &Table, cells: &[Cell], class: &str) {
    write!(out, "<tr class=\"{class}\">").unwrap();
    for (cell, column) in cells.iter().zip(&table.columns) {
        let text = cell.display();
        if column.kind.is_numeric() {
            write!(out, "<td class=\"num\">{}</td>", escape(text.as_str())).unwrap();
        } else {
            write!(out, "<td>{}</td>", escape(text.as_str())).unwrap();
        }
    }
    out.push_str("</tr>\n");
}
