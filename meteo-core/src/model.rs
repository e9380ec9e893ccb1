use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, WeatherError};

/// A named point to fetch weather for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }
}

/// Row-oriented weather data with a fixed column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row; it must have exactly one value per column.
    pub fn push_row(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(WeatherError::RowWidth {
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.rows.push(values);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    /// Cell at `row` under the column labelled `label`.
    pub fn get(&self, row: usize, label: &str) -> Option<&Value> {
        let col = self.column_index(label)?;
        self.rows.get(row).and_then(|values| values.get(col))
    }

    /// Stack tables by row. Every table must carry the same columns in the
    /// same order as the first one.
    pub fn concat(tables: impl IntoIterator<Item = Table>) -> Result<Table> {
        let mut tables = tables.into_iter();
        let Some(mut combined) = tables.next() else {
            return Ok(Table::default());
        };

        for table in tables {
            if table.columns != combined.columns {
                return Err(WeatherError::SchemaMismatch {
                    expected: combined.columns.clone(),
                    found: table.columns,
                });
            }
            combined.rows.extend(table.rows);
        }

        Ok(combined)
    }
}

/// Borrowed view of one table row, addressable by column label.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn get(&self, label: &str) -> Option<&'a Value> {
        let col = self.columns.iter().position(|c| c == label)?;
        self.values.get(col)
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + use<'a> {
        let (columns, values) = (self.columns, self.values);
        columns.iter().map(String::as_str).zip(values.iter())
    }
}
