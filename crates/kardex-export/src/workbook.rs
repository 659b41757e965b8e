//! SpreadsheetML 2003 workbook exporter.
//!
//! Produces a single XML file that Excel and LibreOffice open as a workbook
//! with one worksheet per layout. Numeric cells are typed as numbers and
//! carry a number-format style, so the values stay usable for formulas.

use std::io::Write;

use kardex_core::KardexReport;
use quick_xml::events::{BytesDecl, BytesPI, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::config::ExportConfig;
use crate::error::{xml, Result};
use crate::exporter::Exporter;
use crate::layout::{build_table, Cell, ColumnKind, Layout, RowKind, Table};
use crate::metadata::ReportMetadata;

type XmlResult = std::result::Result<(), quick_xml::Error>;

const SPREADSHEET_NS: &str = "urn:schemas-microsoft-com:office:spreadsheet";
const EXCEL_NS: &str = "urn:schemas-microsoft-com:office:excel";

/// Points per character of column width.
const POINTS_PER_CHAR: u32 = 7;

/// Writes every configured layout as a worksheet of one workbook.
#[derive(Debug, Clone)]
pub struct WorkbookExporter {
    config: ExportConfig,
    layouts: Vec<Layout>,
}

impl Default for WorkbookExporter {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

impl WorkbookExporter {
    /// Exporter with both layouts.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            layouts: Layout::BOTH.to_vec(),
        }
    }

    /// Restrict the workbook to the given layouts, in order.
    #[must_use]
    pub fn with_layouts(mut self, layouts: impl IntoIterator<Item = Layout>) -> Self {
        self.layouts = layouts.into_iter().collect();
        self
    }
}

impl Exporter for WorkbookExporter {
    fn media_type(&self) -> &'static str {
        "application/vnd.ms-excel"
    }

    fn file_extension(&self) -> &'static str {
        "xml"
    }

    fn render<W: Write>(
        &self,
        report: &KardexReport,
        metadata: &ReportMetadata,
        mut w: W,
    ) -> Result<()> {
        let mut wr = Writer::new_with_indent(&mut w, b' ', 1);

        wr.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml)?;
        wr.write_event(Event::PI(BytesPI::new(
            r#"mso-application progid="Excel.Sheet""#,
        )))
        .map_err(xml)?;

        let workbook = BytesStart::new("Workbook").with_attributes([
            ("xmlns", SPREADSHEET_NS),
            ("xmlns:ss", SPREADSHEET_NS),
            ("xmlns:x", EXCEL_NS),
        ]);
        wr.write_event(Event::Start(workbook)).map_err(xml)?;

        write_styles(&mut wr).map_err(xml)?;
        for &layout in &self.layouts {
            let table = build_table(layout, report, metadata, &self.config);
            write_worksheet(&mut wr, &table).map_err(xml)?;
        }

        wr.write_event(Event::End(BytesStart::new("Workbook").to_end()))
            .map_err(xml)?;
        wr.get_mut().write_all(b"\n")?;
        Ok(())
    }
}

fn start<W: Write>(wr: &mut Writer<W>, name: &str, attrs: &[(&str, &str)]) -> XmlResult {
    let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
    wr.write_event(Event::Start(elem))?;
    Ok(())
}

fn end<W: Write>(wr: &mut Writer<W>, name: &str) -> XmlResult {
    wr.write_event(Event::End(BytesStart::new(name).to_end()))?;
    Ok(())
}

fn empty<W: Write>(wr: &mut Writer<W>, name: &str, attrs: &[(&str, &str)]) -> XmlResult {
    let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
    wr.write_event(Event::Empty(elem))?;
    Ok(())
}

fn write_style<W: Write>(
    wr: &mut Writer<W>,
    id: &str,
    bold: bool,
    format: Option<&str>,
    header: bool,
) -> XmlResult {
    start(wr, "Style", &[("ss:ID", id)])?;
    if header {
        empty(
            wr,
            "Alignment",
            &[
                ("ss:Horizontal", "Center"),
                ("ss:Vertical", "Center"),
                ("ss:WrapText", "1"),
            ],
        )?;
        start(wr, "Borders", &[])?;
        for position in ["Bottom", "Left", "Right", "Top"] {
            empty(
                wr,
                "Border",
                &[
                    ("ss:Position", position),
                    ("ss:LineStyle", "Continuous"),
                    ("ss:Weight", "1"),
                ],
            )?;
        }
        end(wr, "Borders")?;
        empty(wr, "Interior", &[("ss:Color", "#D9D9D9"), ("ss:Pattern", "Solid")])?;
    }
    if bold {
        empty(wr, "Font", &[("ss:Bold", "1")])?;
    }
    if let Some(format) = format {
        empty(wr, "NumberFormat", &[("ss:Format", format)])?;
    }
    end(wr, "Style")
}

fn write_styles<W: Write>(wr: &mut Writer<W>) -> XmlResult {
    start(wr, "Styles", &[])?;

    start(wr, "Style", &[("ss:ID", "title")])?;
    empty(wr, "Font", &[("ss:Bold", "1"), ("ss:Size", "14")])?;
    end(wr, "Style")?;

    write_style(wr, "label", true, None, false)?;
    write_style(wr, "header", true, None, true)?;
    write_style(wr, "text", false, None, false)?;
    for (id, format) in NUMBER_STYLES {
        write_style(wr, id, false, Some(format), false)?;
    }
    write_style(wr, "total_text", true, None, false)?;
    for (id, format) in TOTAL_NUMBER_STYLES {
        write_style(wr, id, true, Some(format), false)?;
    }

    end(wr, "Styles")
}

const NUMBER_STYLES: [(&str, &str); 3] = [
    ("qty", "0.00"),
    ("unit", "0.0000"),
    ("money", "#,##0.00"),
];

const TOTAL_NUMBER_STYLES: [(&str, &str); 3] = [
    ("total_qty", "0.00"),
    ("total_unit", "0.0000"),
    ("total_money", "#,##0.00"),
];

const fn style_id(kind: ColumnKind, totals: bool) -> &'static str {
    match (kind, totals) {
        (ColumnKind::Text, false) => "text",
        (ColumnKind::Quantity, false) => "qty",
        (ColumnKind::UnitCost, false) => "unit",
        (ColumnKind::Money, false) => "money",
        (ColumnKind::Text, true) => "total_text",
        (ColumnKind::Quantity, true) => "total_qty",
        (ColumnKind::UnitCost, true) => "total_unit",
        (ColumnKind::Money, true) => "total_money",
    }
}

fn string_cell<W: Write>(
    wr: &mut Writer<W>,
    style: &str,
    merge_across: usize,
    value: &str,
) -> XmlResult {
    let merge = merge_across.to_string();
    let mut attrs = vec![("ss:StyleID", style)];
    if merge_across > 0 {
        attrs.push(("ss:MergeAcross", merge.as_str()));
    }
    start(wr, "Cell", &attrs)?;
    data(wr, "String", value)?;
    end(wr, "Cell")
}

fn data<W: Write>(wr: &mut Writer<W>, ty: &str, value: &str) -> XmlResult {
    start(wr, "Data", &[("ss:Type", ty)])?;
    wr.write_event(Event::Text(BytesText::new(value)))?;
    end(wr, "Data")
}

fn write_worksheet<W: Write>(wr: &mut Writer<W>, table: &Table) -> XmlResult {
    let last = table.width().saturating_sub(1);

    start(wr, "Worksheet", &[("ss:Name", table.layout.sheet_name())])?;
    start(wr, "Table", &[])?;

    for column in &table.columns {
        let width = (u32::from(column.width) * POINTS_PER_CHAR).to_string();
        empty(wr, "Column", &[("ss:Width", width.as_str())])?;
    }

    start(wr, "Row", &[])?;
    string_cell(wr, "title", last, &table.title)?;
    end(wr, "Row")?;

    for (label, value) in &table.metadata {
        start(wr, "Row", &[])?;
        string_cell(wr, "label", 1, label)?;
        string_cell(wr, "text", last.saturating_sub(2), value)?;
        end(wr, "Row")?;
    }
    empty(wr, "Row", &[])?;

    start(wr, "Row", &[])?;
    for group in &table.groups {
        string_cell(wr, "header", group.span.saturating_sub(1), group.label)?;
    }
    end(wr, "Row")?;

    start(wr, "Row", &[])?;
    for column in &table.columns {
        string_cell(wr, "header", 0, column.label)?;
    }
    end(wr, "Row")?;

    for row in &table.rows {
        let totals = row.kind == RowKind::Totals;
        start(wr, "Row", &[])?;
        for (cell, column) in row.cells.iter().zip(&table.columns) {
            let style = style_id(column.kind, totals);
            match cell {
                Cell::Empty => empty(wr, "Cell", &[("ss:StyleID", style)])?,
                Cell::Text(text) => {
                    let style = if totals { "total_text" } else { "text" };
                    string_cell(wr, style, 0, text)?;
                }
                Cell::Number { .. } => {
                    start(wr, "Cell", &[("ss:StyleID", style)])?;
                    data(wr, "Number", &cell.display())?;
                    end(wr, "Cell")?;
                }
            }
        }
        end(wr, "Row")?;
    }

    end(wr, "Table")?;

    start(wr, "WorksheetOptions", &[("xmlns", EXCEL_NS)])?;
    start(wr, "PageSetup", &[])?;
    empty(wr, "Layout", &[("x:Orientation", "Landscape")])?;
    end(wr, "PageSetup")?;
    end(wr, "WorksheetOptions")?;

    end(wr, "Worksheet")
}
