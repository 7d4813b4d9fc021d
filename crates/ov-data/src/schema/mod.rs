//! Header-keyed string tables
//!
//! Only the shape of ingested data matters to the core: a table is a list
//! of rows whose cells are addressed by column name. How a table got here
//! (CSV file, in-memory fixture) is a `sources` concern.

use ahash::AHashMap;

/// Sentinel the source data uses for "not applicable".
const NOT_APPLICABLE: &str = "n/a";

/// An in-memory table with a header row and string cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    index: AHashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        Self {
            headers,
            index,
            rows: Vec::new(),
        }
    }

    /// Convenience constructor for tests and fixtures.
    pub fn from_rows<S: Into<String>>(
        headers: impl IntoIterator<Item = S>,
        rows: impl IntoIterator<Item = Vec<S>>,
    ) -> Self {
        let mut table = Table::new(headers.into_iter().map(Into::into).collect());
        for row in rows {
            table.push_row(row.into_iter().map(Into::into).collect());
        }
        table
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row { table: self, cells })
    }
}

/// One row of a table, borrowing the table's header index.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    cells: &'a [String],
}

impl Row<'_> {
    /// The trimmed cell under `name`, or `""` when the column or the cell
    /// is absent.
    pub fn field(&self, name: &str) -> &str {
        self.table
            .index
            .get(name)
            .and_then(|&i| self.cells.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }
}

/// Parse a numeric cell leniently.
///
/// The "n/a" sentinel and the empty string both mean "no value" and return
/// `None`. Any other unparseable value is a logged anomaly that parses to
/// NaN; downstream consumers coerce it to zero rather than aborting
/// ingestion.
pub fn parse_flexible(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == NOT_APPLICABLE {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(value = %raw, "unparseable numeric field");
            Some(f64::NAN)
        }
    }
}

/// A finite parsed value, or `None` for sentinels and anomalies.
pub fn parse_finite(raw: &str) -> Option<f64> {
    parse_flexible(raw).filter(|v| v.is_finite())
}
