//! Valorized and physical kardex layouts.
//!
//! [`build_table`] maps a [`KardexReport`] onto a renderer-neutral [`Table`]:
//! merged header groups, fixed-width columns, one body row per ledger line
//! and a trailing totals row. Every exporter renders from this model, so the
//! workbook, the printable document and CSV always agree cell for cell.

use kardex_core::{Direction, KardexReport, LedgerLine, LineKind, Triple};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{format_date, ExportConfig};
use crate::metadata::ReportMetadata;

/// Decimal places of monetary columns.
pub const MONEY_SCALE: u32 = 2;
/// Decimal places of unit-cost columns.
pub const UNIT_COST_SCALE: u32 = 4;
/// Decimal places of quantity columns.
pub const QUANTITY_SCALE: u32 = 2;

/// Which view of the kardex to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Quantities and costs.
    Valorized,
    /// Quantities only.
    Physical,
}

impl Layout {
    /// Both layouts, in document order.
    pub const BOTH: [Self; 2] = [Self::Valorized, Self::Physical];

    /// Worksheet name.
    #[must_use]
    pub const fn sheet_name(self) -> &'static str {
        match self {
            Self::Valorized => "Valorized",
            Self::Physical => "Physical",
        }
    }

    /// Short lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valorized => "valorized",
            Self::Physical => "physical",
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "valorized" | "monetary" => Ok(Self::Valorized),
            "physical" | "units" => Ok(Self::Physical),
            _ => Err(format!("unknown layout: {s}")),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a column holds, which fixes its alignment and decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Free text.
    Text,
    /// Units.
    Quantity,
    /// Cost per unit.
    UnitCost,
    /// Total cost.
    Money,
}

impl ColumnKind {
    /// Decimal places for numeric kinds.
    #[must_use]
    pub const fn scale(self) -> u32 {
        match self {
            Self::Text | Self::Quantity => QUANTITY_SCALE,
            Self::UnitCost => UNIT_COST_SCALE,
            Self::Money => MONEY_SCALE,
        }
    }

    /// Whether values are right-aligned numbers.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Text)
    }
}

/// One leaf column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Header text.
    pub label: &'static str,
    /// Width in characters.
    pub width: u16,
    /// Content kind.
    pub kind: ColumnKind,
}

/// A header cell spanning several leaf columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderGroup {
    /// Group text.
    pub label: &'static str,
    /// Number of leaf columns covered.
    pub span: usize,
}

/// A body cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Blank.
    Empty,
    /// Text.
    Text(String),
    /// A number shown with a fixed number of decimal places.
    Number {
        /// Unrounded value.
        value: Decimal,
        /// Decimal places to show.
        scale: u32,
    },
}

impl Cell {
    fn number(value: Decimal, kind: ColumnKind) -> Self {
        Self::Number {
            value,
            scale: kind.scale(),
        }
    }

    /// Text shown for this cell.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.clone(),
            Self::Number { value, scale } => format_decimal(*value, *scale),
        }
    }
}

/// Where a row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// Balance carried into the period.
    Opening,
    /// An entry or a plain exit.
    Movement,
    /// One lot of a multi-lot exit.
    Lot,
    /// Period totals.
    Totals,
}

/// A body row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Row origin.
    pub kind: RowKind,
    /// One cell per leaf column.
    pub cells: Vec<Cell>,
}

/// A rendered layout, ready for any output form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Layout this table renders.
    pub layout: Layout,
    /// Title line.
    pub title: String,
    /// Labelled header fields (empty when metadata is disabled).
    pub metadata: Vec<(&'static str, String)>,
    /// First header row (merged groups).
    pub groups: Vec<HeaderGroup>,
    /// Second header row (leaf columns).
    pub columns: Vec<Column>,
    /// Body rows, totals last.
    pub rows: Vec<Row>,
}

impl Table {
    /// Number of leaf columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// The trailing totals row.
    #[must_use]
    pub fn totals(&self) -> Option<&Row> {
        self.rows.last().filter(|row| row.kind == RowKind::Totals)
    }
}

const DOCUMENT_COLUMNS: [Column; 5] = [
    Column {
        label: "Date",
        width: 11,
        kind: ColumnKind::Text,
    },
    Column {
        label: "Voucher type",
        width: 8,
        kind: ColumnKind::Text,
    },
    Column {
        label: "Series",
        width: 8,
        kind: ColumnKind::Text,
    },
    Column {
        label: "Number",
        width: 12,
        kind: ColumnKind::Text,
    },
    Column {
        label: "Operation type",
        width: 16,
        kind: ColumnKind::Text,
    },
];

const VALORIZED_TRIPLE: [Column; 3] = [
    Column {
        label: "Quantity",
        width: 11,
        kind: ColumnKind::Quantity,
    },
    Column {
        label: "Unit cost",
        width: 12,
        kind: ColumnKind::UnitCost,
    },
    Column {
        label: "Total cost",
        width: 14,
        kind: ColumnKind::Money,
    },
];

const PHYSICAL_QUANTITY: Column = Column {
    label: "Quantity",
    width: 12,
    kind: ColumnKind::Quantity,
};

const SIDES: [&str; 3] = ["Entries", "Exits", "Balance"];

fn columns(layout: Layout) -> (Vec<HeaderGroup>, Vec<Column>) {
    let mut groups = vec![HeaderGroup {
        label: "Document",
        span: DOCUMENT_COLUMNS.len(),
    }];
    let mut columns = DOCUMENT_COLUMNS.to_vec();

    for side in SIDES {
        match layout {
            Layout::Valorized => {
                groups.push(HeaderGroup {
                    label: side,
                    span: VALORIZED_TRIPLE.len(),
                });
                columns.extend(VALORIZED_TRIPLE);
            }
            Layout::Physical => {
                groups.push(HeaderGroup {
                    label: side,
                    span: 1,
                });
                columns.push(PHYSICAL_QUANTITY);
            }
        }
    }
    (groups, columns)
}

/// Cells of one entry/exit/balance group.
fn side_cells(layout: Layout, triple: &Triple, blank: bool) -> Vec<Cell> {
    match (layout, blank) {
        (Layout::Valorized, true) => vec![Cell::Empty, Cell::Empty, Cell::Empty],
        (Layout::Physical, true) => vec![Cell::Empty],
        (Layout::Valorized, false) => vec![
            Cell::number(triple.quantity, ColumnKind::Quantity),
            Cell::number(triple.unit_cost, ColumnKind::UnitCost),
            Cell::number(triple.total_cost, ColumnKind::Money),
        ],
        (Layout::Physical, false) => vec![Cell::number(triple.quantity, ColumnKind::Quantity)],
    }
}

fn line_row(layout: Layout, line: &LedgerLine, config: &ExportConfig) -> Row {
    let date = Cell::Text(format_date(line.date, &config.date_format));
    let mut cells = match line.kind {
        LineKind::Opening => vec![
            date,
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::Text(config.opening_label.clone()),
        ],
        LineKind::Movement | LineKind::Lot => vec![
            date,
            text(&line.voucher_type),
            text(&line.series),
            text(&line.number),
            text(&line.operation_type),
        ],
    };

    // the moved side is shown even when it is zero
    let (show_entry, show_exit) = match line.direction {
        Some(Direction::Entry) => (true, false),
        Some(Direction::Exit) => (false, true),
        None => {
            let moved = line.kind != LineKind::Opening;
            (moved && !line.entry.is_zero(), moved && !line.exit.is_zero())
        }
    };
    cells.extend(side_cells(layout, &line.entry, !show_entry));
    cells.extend(side_cells(layout, &line.exit, !show_exit));
    cells.extend(side_cells(layout, &line.balance, false));

    let kind = match line.kind {
        LineKind::Opening => RowKind::Opening,
        LineKind::Movement => RowKind::Movement,
        LineKind::Lot => RowKind::Lot,
    };
    Row { kind, cells }
}

fn totals_row(layout: Layout, report: &KardexReport, config: &ExportConfig) -> Row {
    let totals = &report.totals;
    let mut cells = vec![
        Cell::Text(config.totals_label.clone()),
        Cell::Empty,
        Cell::Empty,
        Cell::Empty,
        Cell::Empty,
    ];

    match layout {
        Layout::Valorized => {
            cells.extend([
                Cell::number(totals.entries_physical, ColumnKind::Quantity),
                Cell::Empty,
                Cell::number(totals.entries_monetary, ColumnKind::Money),
                Cell::number(totals.exits_physical, ColumnKind::Quantity),
                Cell::Empty,
                Cell::number(totals.exits_monetary, ColumnKind::Money),
            ]);
            cells.extend(side_cells(layout, &report.final_balance.snapshot(), false));
        }
        Layout::Physical => {
            cells.extend([
                Cell::number(totals.entries_physical, ColumnKind::Quantity),
                Cell::number(totals.exits_physical, ColumnKind::Quantity),
                Cell::number(report.final_balance.quantity, ColumnKind::Quantity),
            ]);
        }
    }

    Row {
        kind: RowKind::Totals,
        cells,
    }
}

fn text(value: &str) -> Cell {
    if value.is_empty() {
        Cell::Empty
    } else {
        Cell::Text(value.to_string())
    }
}

/// Map a report onto one layout.
///
/// # Examples
///
/// ```
/// use kardex_core::{KardexReport, Movement, OpeningBalance};
/// use kardex_export::{build_table, ExportConfig, Layout, ReportMetadata};
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let movements = vec![Movement::entry(start, dec!(5), dec!(12))];
/// let report = KardexReport::build(start, Some(OpeningBalance::new(dec!(10), dec!(100))), &movements);
///
/// let table = build_table(Layout::Valorized, &report, &ReportMetadata::default(), &ExportConfig::default());
/// assert_eq!(table.width(), 14);
/// assert_eq!(table.rows.len(), 3); // opening, entry, totals
/// assert_eq!(table.rows[1].cells[13].display(), "160.00");
/// assert_eq!(table.rows[1].cells[12].display(), "10.6667");
/// ```
#[must_use]
pub fn build_table(
    layout: Layout,
    report: &KardexReport,
    metadata: &ReportMetadata,
    config: &ExportConfig,
) -> Table {
    let (groups, columns) = columns(layout);

    let mut rows: Vec<Row> = report
        .lines
        .iter()
        .map(|line| line_row(layout, line, config))
        .collect();
    rows.push(totals_row(layout, report, config));

    let metadata = if config.include_metadata {
        metadata.fields(report.period_start, &config.date_format)
    } else {
        Vec::new()
    };

    Table {
        layout,
        title: config.title(layout).to_string(),
        metadata,
        groups,
        columns,
        rows,
    }
}

/// Format a decimal with exactly `scale` places, rounding half away from zero.
///
/// # Examples
///
/// ```
/// use kardex_export::format_decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_decimal(dec!(10.666666), 4), "10.6667");
/// assert_eq!(format_decimal(dec!(2.005), 2), "2.01");
/// assert_eq!(format_decimal(dec!(7), 2), "7.00");
/// ```
#[must_use]
pub fn format_decimal(value: Decimal, scale: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.to_string()
}
