//! CSV and JSON table decoders
//!
//! These sit at the edge of the system: they only turn bytes into a
//! [`Table`] and leave every semantic check to the validator.

use dataset_spi::{Cell, Column, DatasetError, Result, Table, TableDecoder};
use serde_json::{Map, Value};

/// Decoder for comma-separated files with a header row.
///
/// Every field is kept as [`Cell::Text`]; empty fields become [`Cell::Null`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvDecoder;

impl TableDecoder for CsvDecoder {
    fn format(&self) -> &str {
        "csv"
    }

    fn decode(&self, bytes: &[u8]) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| DatasetError::Decode(format!("Failed to read headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record =
                result.map_err(|e| DatasetError::Decode(format!("Failed to read record: {}", e)))?;
            rows.push(
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            Cell::Null
                        } else {
                            Cell::Text(field.to_string())
                        }
                    })
                    .collect(),
            );
        }

        Ok(Table::from_rows(headers, rows))
    }
}

/// Decoder for JSON payloads.
///
/// Accepts record orientation (`[{"timestamp": .., "cpu": ..}, ..]`) and
/// column orientation (`{"timestamp": [..], "cpu": [..]}`).
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDecoder;

impl JsonDecoder {
    /// Decode an already-parsed JSON document.
    pub fn decode_value(&self, value: &Value) -> Result<Table> {
        match value {
            Value::Array(records) => Self::from_records(records),
            Value::Object(columns) => Self::from_columns(columns),
            _ => Err(DatasetError::Decode(
                "Expected an array of records or an object of columns".to_string(),
            )),
        }
    }

    fn from_records(records: &[Value]) -> Result<Table> {
        // Column order follows first appearance across records
        let mut headers: Vec<String> = Vec::new();
        for record in records {
            let object = record.as_object().ok_or_else(|| {
                DatasetError::Decode("Every record must be a JSON object".to_string())
            })?;
            for key in object.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .filter_map(Value::as_object)
            .map(|object| {
                headers
                    .iter()
                    .map(|h| object.get(h).map_or(Cell::Null, to_cell))
                    .collect()
            })
            .collect();

        Ok(Table::from_rows(headers, rows))
    }

    fn from_columns(columns: &Map<String, Value>) -> Result<Table> {
        let columns = columns
            .iter()
            .map(|(name, values)| {
                let cells = values
                    .as_array()
                    .ok_or_else(|| {
                        DatasetError::Decode(format!("Column '{}' must be a JSON array", name))
                    })?
                    .iter()
                    .map(to_cell)
                    .collect();
                Ok(Column::new(name.clone(), cells))
            })
            .collect::<Result<Vec<_>>>()?;

        Table::new(columns)
    }
}

impl TableDecoder for JsonDecoder {
    fn format(&self) -> &str {
        "json"
    }

    fn decode(&self, bytes: &[u8]) -> Result<Table> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| DatasetError::Decode(format!("Failed to parse JSON: {}", e)))?;
        self.decode_value(&value)
    }
}

fn to_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::Number(n) => n.as_f64().map_or(Cell::Null, Cell::Number),
        Value::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

/// Pick a decoder from a file extension (case-insensitive).
pub fn decoder_for_extension(extension: &str) -> Result<Box<dyn TableDecoder>> {
    match extension.to_lowercase().as_str() {
        "csv" => Ok(Box::new(CsvDecoder)),
        "json" => Ok(Box::new(JsonDecoder)),
        other => Err(DatasetError::UnsupportedFileType(other.to_string())),
    }
}

/// Pick a decoder from an upload file name (`load.CSV`, `data.json`).
pub fn decoder_for_filename(filename: &str) -> Result<Box<dyn TableDecoder>> {
    let extension = filename.rsplit_once('.').map_or("", |(_, ext)| ext);
    decoder_for_extension(extension)
}
