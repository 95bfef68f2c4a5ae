//! In-memory tabular data and its CSV encoding.

use crate::error::{Error, ErrorKind, Result};

/// A table of string cells with named columns.
///
/// Every row has exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Create an empty dataset with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Create a dataset from columns and rows, checking row widths.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<String>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dataset = Self::new(columns);
        for row in rows {
            dataset.push_row(row)?;
        }
        Ok(dataset)
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::new(ErrorKind::InvalidBatchInput(format!(
                "row {} has {} fields but the dataset has {} columns",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            ))));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows, in order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows (the header is not a row).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of one column.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// Stack datasets on top of each other, in order.
    ///
    /// Columns are the union of all inputs in first-seen order; cells for
    /// columns a part does not have are left empty. Repeated column names
    /// are matched by occurrence. Parts without columns contribute nothing.
    pub fn concat(parts: impl IntoIterator<Item = Dataset>) -> Dataset {
        let mut combined = Dataset::default();

        for part in parts {
            if part.columns.is_empty() {
                continue;
            }

            if combined.columns.is_empty() {
                combined = part;
                continue;
            }

            if part.columns == combined.columns {
                combined.rows.extend(part.rows);
                continue;
            }

            // The n-th column of a given name maps to the n-th column of that
            // name in the combined set.
            let mut mapping = Vec::with_capacity(part.columns.len());
            for (position, column) in part.columns.iter().enumerate() {
                let occurrence = part.columns[..position]
                    .iter()
                    .filter(|c| *c == column)
                    .count();
                let existing = combined
                    .columns
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| *c == column)
                    .map(|(index, _)| index)
                    .nth(occurrence);

                let target = match existing {
                    Some(index) => index,
                    None => {
                        combined.columns.push(column.clone());
                        for row in &mut combined.rows {
                            row.push(String::new());
                        }
                        combined.columns.len() - 1
                    }
                };
                mapping.push(target);
            }

            let width = combined.columns.len();
            for row in part.rows {
                let mut widened = vec![String::new(); width];
                for (cell, &target) in row.into_iter().zip(&mapping) {
                    widened[target] = cell;
                }
                combined.rows.push(widened);
            }
        }

        combined
    }
}

/// Converts between delimited text and [`Dataset`]s.
pub trait TabularCodec: Send + Sync {
    /// Render a dataset, header row first.
    fn encode(&self, dataset: &Dataset) -> Result<String>;

    /// Read text with a header row.
    fn decode(&self, text: &str) -> Result<Dataset>;
}

/// Comma-separated values, UTF-8, header row included.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCodec;

impl TabularCodec for CsvCodec {
    fn encode(&self, dataset: &Dataset) -> Result<String> {
        if dataset.columns().is_empty() {
            return Ok(String::new());
        }

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(dataset.columns())?;
        for row in dataset.rows() {
            writer.write_record(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::new(ErrorKind::Csv(e.to_string())))?;
        String::from_utf8(bytes).map_err(|e| Error::with_source(ErrorKind::Csv(e.to_string()), e))
    }

    fn decode(&self, text: &str) -> Result<Dataset> {
        let decode_error =
            |e: csv::Error| Error::with_source(ErrorKind::ResultDecoding(e.to_string()), e);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .map_err(decode_error)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut dataset = Dataset::new(columns);
        for record in reader.records() {
            let record = record.map_err(decode_error)?;
            dataset.rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(dataset)
    }
}
