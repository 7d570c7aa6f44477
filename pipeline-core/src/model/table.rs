use std::fmt;
use std::io::Read;

/// A single parsed CSV cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    /// Classifies a raw CSV field: empty is `Missing`, anything `f64` accepts is
    /// a `Number`, the rest is kept verbatim as `Text`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(value) => CellValue::Number(value),
            Err(_) => CellValue::Text(trimmed.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(value) => write!(f, "{}", value),
            CellValue::Text(value) => write!(f, "{}", value),
            CellValue::Missing => Ok(()),
        }
    }
}

/// Ordered, immutable table loaded from a tabular artifact.
///
/// Rows keep the column order of the CSV header; cells are addressed by
/// column name through [`MetricRow`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl MetricTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a table from already-classified cells.
    ///
    /// Short rows are padded with `Missing`, long rows are truncated to the
    /// header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Missing);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Parses CSV content with a header row.
    ///
    /// # Arguments
    ///
    /// * `reader` - Source of the CSV bytes.
    ///
    /// # Returns
    ///
    /// * `Ok(MetricTable)` on success (an empty body yields an empty table).
    /// * `Err` if a record is malformed or its width differs from the header.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(CellValue::parse).collect());
        }

        Ok(Self { columns, rows })
    }

    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, csv::Error> {
        Self::from_csv_reader(bytes)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn row(&self, index: usize) -> Option<MetricRow<'_>> {
        self.rows.get(index).map(|cells| MetricRow { table: self, cells })
    }

    pub fn rows(&self) -> impl Iterator<Item = MetricRow<'_>> {
        self.rows.iter().map(move |cells| MetricRow { table: self, cells })
    }

    /// Numeric values of a column, in row order, skipping non-numeric and NaN
    /// cells. Returns `None` if the column does not exist.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<f64>> {
        let index = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row[index].as_f64())
                .filter(|value| !value.is_nan())
                .collect(),
        )
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct MetricRow<'a> {
    table: &'a MetricTable,
    cells: &'a [CellValue],
}

impl<'a> MetricRow<'a> {
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        self.table
            .column_index(column)
            .and_then(|index| self.cells.get(index))
    }

    pub fn cells(&self) -> &'a [CellValue] {
        self.cells
    }
}
