//! CSV-backed table loading

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use csv::ReaderBuilder;

use crate::schema::Table;
use crate::DataError;

/// Loads a header-keyed [`Table`] from a CSV file.
///
/// The ingestion core never touches files; everything it sees comes through
/// a `Table`, so this is the only place CSV mechanics live.
pub struct CsvTableSource {
    path: PathBuf,
}

impl CsvTableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the whole file into a `Table`. Short rows are tolerated; their
    /// missing cells read as empty fields.
    pub fn load(&self) -> Result<Table, DataError> {
        let file = File::open(&self.path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut table = Table::new(headers);
        for record in reader.records() {
            let record = record?;
            table.push_row(record.iter().map(|s| s.to_string()).collect());
        }

        tracing::debug!(
            path = %self.path.display(),
            rows = table.len(),
            "loaded csv table"
        );
        Ok(table)
    }

    pub fn source_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.csv")
    }
}
