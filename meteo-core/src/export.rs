use serde_json::Value;
use std::{io, path::Path};
use tracing::info;

use crate::{
    error::{Result, WeatherError},
    model::Table,
};

impl Table {
    /// Write the table as UTF-8 CSV with a header row and no index column.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        info!(path = %path.display(), rows = self.len(), "Writing CSV");

        let wtr = csv::Writer::from_path(path)
            .map_err(|e| WeatherError::CsvWrite(path.to_path_buf(), e))?;
        self.write_records(wtr)
            .map_err(|e| WeatherError::CsvWrite(path.to_path_buf(), e))
    }

    /// Same as [`Table::write_csv`] but into any writer, e.g. stdout.
    pub fn write_csv_to<W: io::Write>(&self, writer: W) -> Result<()> {
        self.write_records(csv::Writer::from_writer(writer))
            .map_err(WeatherError::CsvOutput)
    }

    /// Read a CSV written by [`Table::write_csv`]. Every cell comes back as a
    /// string, empty cells included.
    pub fn read_csv(path: &Path) -> Result<Table> {
        let read = || -> Result<Table, csv::Error> {
            let mut rdr = csv::Reader::from_path(path)?;
            let columns = rdr.headers()?.iter().map(str::to_string).collect();

            let mut table = Table::new(columns);
            for record in rdr.records() {
                let values = record?
                    .iter()
                    .map(|cell| Value::String(cell.to_string()))
                    .collect();
                if let Err(e) = table.push_row(values) {
                    return Err(io::Error::new(io::ErrorKind::InvalidData, e.to_string()).into());
                }
            }
            Ok(table)
        };

        read().map_err(|e| WeatherError::CsvRead(path.to_path_buf(), e))
    }

    fn write_records<W: io::Write>(&self, mut wtr: csv::Writer<W>) -> Result<(), csv::Error> {
        wtr.write_record(self.columns())?;
        for row in self.rows() {
            wtr.write_record(row.values().iter().map(cell_text))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Table {
        let mut table = Table::new(
            ["location", "latitude", "elevation", "time (UTC)", "temperature_2m (°C)"]
                .map(String::from)
                .to_vec(),
        );
        table
            .push_row(vec![
                json!("Nashik"),
                json!(20.5943),
                Value::Null,
                json!("2024-01-01T00:00"),
                json!(5.3),
            ])
            .unwrap();
        table
            .push_row(vec![
                json!("Nashik, MH"),
                json!(20.5943),
                json!(560),
                json!("2024-01-01T01:00"),
                json!(4.9),
            ])
            .unwrap();
        table
    }

    #[test]
    fn csv_round_trip_preserves_cells_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.csv");

        let table = sample();
        table.write_csv(&path).expect("write should succeed");
        let back = Table::read_csv(&path).expect("read should succeed");

        assert_eq!(back.columns(), table.columns());
        assert_eq!(back.len(), table.len());
        for (original, read) in table.rows().zip(back.rows()) {
            for (value, text) in original.values().iter().zip(read.values()) {
                assert_eq!(text, &Value::String(cell_text(value)));
            }
        }
        assert_eq!(back.get(1, "location"), Some(&json!("Nashik, MH")));
        assert_eq!(back.get(0, "elevation"), Some(&json!("")));
    }

    #[test]
    fn header_row_without_index_column() {
        let mut out = Vec::new();
        sample().write_csv_to(&mut out).unwrap();
        let text = String::from_utf8(out).expect("csv is utf-8");

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("location,latitude,elevation,time (UTC),temperature_2m (°C)")
        );
        assert_eq!(lines.next(), Some("Nashik,20.5943,,2024-01-01T00:00,5.3"));
        assert_eq!(lines.next(), Some("\"Nashik, MH\",20.5943,560,2024-01-01T01:00,4.9"));
    }

    #[test]
    fn read_missing_file_reports_path() {
        let err = Table::read_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
