//! Conversion between JSON, CSV and XML documents.

use super::xml;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

const PARQUET_NOTE: &str = "Parquet output requires native module. Returning JSON schema format.";

/// Document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    /// JSON value or JSON text.
    Json,
    /// Delimited text.
    Csv,
    /// XML text.
    Xml,
    /// Columnar output described as a schema; never accepted as input.
    Parquet,
}

/// Conversion options; every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    /// Single-character field separator.
    pub csv_delimiter: String,
    /// Whether the first CSV row names the columns.
    pub csv_header: bool,
    /// Name of the XML document element.
    pub xml_root_name: String,
    /// Name of the XML element wrapping each array item.
    pub xml_item_name: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            csv_delimiter: ",".to_owned(),
            csv_header: true,
            xml_root_name: xml::DEFAULT_ROOT.to_owned(),
            xml_item_name: "item".to_owned(),
        }
    }
}

/// Transformation input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequest {
    /// Source document.
    pub data: Value,
    /// Source format.
    pub from_format: DataFormat,
    /// Target format.
    pub to_format: DataFormat,
    /// Conversion options.
    #[serde(default)]
    pub options: Option<TransformOptions>,
}

/// Transformation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TransformOutcome {
    /// Source and target formats are equal; data is echoed.
    #[serde(rename_all = "camelCase")]
    Unchanged {
        /// The input, untouched.
        transformed_data: Value,
        /// Explanation.
        message: String,
    },
    /// Data was converted.
    #[serde(rename_all = "camelCase")]
    Converted {
        /// Source format.
        from_format: DataFormat,
        /// Target format.
        to_format: DataFormat,
        /// Converted document.
        transformed_data: Value,
        /// Array length of the parsed input, or 1.
        record_count: usize,
    },
}

/// Transformation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Parquet cannot be read.
    #[error("Parquet input not supported. Please convert to JSON first.")]
    ParquetInput,
    /// Delimiter is not exactly one ASCII character.
    #[error("csvDelimiter must be a single ASCII character")]
    InvalidDelimiter,
    /// CSV or XML source must be supplied as text.
    #[error("{0} input must be a string")]
    ExpectedText(&'static str),
    /// Source JSON text failed to parse.
    #[error("invalid JSON: {0}")]
    Json(String),
    /// CSV read or write failed.
    #[error("invalid CSV: {0}")]
    Csv(String),
    /// XML read or write failed.
    #[error("invalid XML: {0}")]
    Xml(String),
}

/// Converts `request.data` from one format to another.
///
/// # Errors
///
/// Returns [`TransformError`] for unreadable input or unsupported formats.
pub fn transform(request: TransformRequest) -> Result<TransformOutcome, TransformError> {
    let TransformRequest {
        data,
        from_format,
        to_format,
        options,
    } = request;
    if from_format == to_format {
        return Ok(TransformOutcome::Unchanged {
            transformed_data: data,
            message: "No transformation needed - formats are the same".to_owned(),
        });
    }
    let opts = options.unwrap_or_default();

    let parsed = match from_format {
        DataFormat::Json => match data {
            Value::String(text) => {
                serde_json::from_str(&text).map_err(|err| TransformError::Json(err.to_string()))?
            }
            other => other,
        },
        DataFormat::Csv => {
            let separator = delimiter(&opts)?;
            parse_csv(text_input(&data, "CSV")?, separator, opts.csv_header)?
        }
        DataFormat::Xml => xml::parse(text_input(&data, "XML")?)?,
        DataFormat::Parquet => return Err(TransformError::ParquetInput),
    };

    let transformed_data = match to_format {
        DataFormat::Json => parsed.clone(),
        DataFormat::Csv => {
            let separator = delimiter(&opts)?;
            Value::String(write_csv(&parsed, separator, opts.csv_header)?)
        }
        DataFormat::Xml => Value::String(xml::write(
            &parsed,
            &opts.xml_root_name,
            &opts.xml_item_name,
        )?),
        DataFormat::Parquet => json!({
            "_note": PARQUET_NOTE,
            "schema": parquet_schema(&parsed),
            "data": parsed,
        }),
    };

    Ok(TransformOutcome::Converted {
        from_format,
        to_format,
        transformed_data,
        record_count: parsed.as_array().map_or(1, Vec::len),
    })
}

fn text_input<'a>(data: &'a Value, format: &'static str) -> Result<&'a str, TransformError> {
    data.as_str().ok_or(TransformError::ExpectedText(format))
}

fn delimiter(opts: &TransformOptions) -> Result<u8, TransformError> {
    match opts.csv_delimiter.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(TransformError::InvalidDelimiter),
    }
}

fn csv_error(err: impl ToString) -> TransformError {
    TransformError::Csv(err.to_string())
}

/// Reads delimited text into an array of objects keyed by header, or an
/// array of string arrays without a header. Fields are trimmed and blank
/// lines skipped.
fn parse_csv(text: &str, separator: u8, header: bool) -> Result<Value, TransformError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(header)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns = if header {
        Some(reader.headers().map_err(csv_error)?.clone())
    } else {
        None
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let fields = record.map_err(csv_error)?;
        let row = match &columns {
            Some(names) => Value::Object(
                names
                    .iter()
                    .zip(fields.iter())
                    .map(|(name, field)| (name.to_owned(), Value::String(field.to_owned())))
                    .collect(),
            ),
            None => Value::Array(
                fields
                    .iter()
                    .map(|field| Value::String(field.to_owned()))
                    .collect(),
            ),
        };
        rows.push(row);
    }
    Ok(Value::Array(rows))
}

/// Writes records as delimited text. Object records use the first record's
/// keys as columns; a non-array value is a single record.
fn write_csv(data: &Value, separator: u8, header: bool) -> Result<String, TransformError> {
    let records: Vec<&Value> = match data {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    let Some(first) = records.first() else {
        return Ok(String::new());
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(separator)
        .from_writer(Vec::new());

    match first {
        Value::Object(sample) => {
            let columns: Vec<&String> = sample.keys().collect();
            if header {
                writer
                    .write_record(columns.iter().map(|column| column.as_str()))
                    .map_err(csv_error)?;
            }
            for record in &records {
                let row: Vec<String> = columns
                    .iter()
                    .map(|column| record.get(column.as_str()).map_or_else(String::new, cell))
                    .collect();
                writer.write_record(&row).map_err(csv_error)?;
            }
        }
        _ => {
            for record in &records {
                let row: Vec<String> = match record {
                    Value::Array(cells) => cells.iter().map(cell).collect(),
                    scalar => vec![cell(scalar)],
                };
                writer.write_record(&row).map_err(csv_error)?;
            }
        }
    }

    let bytes = writer.into_inner().map_err(csv_error)?;
    String::from_utf8(bytes).map_err(csv_error)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            value.to_string()
        }
    }
}

/// Column types inferred from the first record.
fn parquet_schema(data: &Value) -> Value {
    let Some(Value::Object(sample)) = data.as_array().and_then(|items| items.first()) else {
        return Value::Object(Map::new());
    };
    let utf8 = json!({"type": "BYTE_ARRAY", "convertedType": "UTF8"});
    sample
        .iter()
        .map(|(key, value)| {
            let column = match value {
                Value::Number(number) if number.is_i64() || number.is_u64() => {
                    json!({"type": "INT64"})
                }
                Value::Number(_) => json!({"type": "DOUBLE"}),
                Value::Bool(_) => json!({"type": "BOOLEAN"}),
                _ => utf8.clone(),
            };
            (key.clone(), column)
        })
        .collect::<Map<_, _>>()
        .into()
}
