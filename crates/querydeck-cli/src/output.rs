//! Structured output for command results.
//!
//! Handles JSON, YAML and CSV serialization of whatever a command produced.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during serialization.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// The `--output` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Csv,
}

/// Writes command output and flushes, so a closed pipe surfaces as an error.
pub fn emit<W: Write>(writer: &mut W, out: &str) -> io::Result<()> {
    writer.write_all(out.as_bytes())?;
    writer.flush()
}

/// Serializes `data` in the requested format.
pub fn serialize<T: Serialize>(data: &T, format: OutputFormat) -> Result<String, SerializeError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)? + "\n"),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?),
        OutputFormat::Csv => to_csv(&serde_json::to_value(data)?),
    }
}

/// Flattens a JSON value to CSV.
///
/// Tabular results (`{rows, columns}`) use the column order for headers.
/// Arrays of objects take their headers from the first element. A single
/// object becomes `key,value` pairs; a scalar becomes one `value` cell.
fn to_csv(value: &Value) -> Result<String, SerializeError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    match value {
        Value::Object(_) if is_tabular(value) => {
            let headers: Vec<&str> = value["columns"]
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|c| c.get("name").and_then(Value::as_str))
                .collect();
            write_objects(&mut wtr, &headers, value["rows"].as_array().into_iter().flatten())?;
        }
        Value::Array(arr) => match arr.first() {
            Some(Value::Object(first)) => {
                let headers: Vec<&str> = first.keys().map(String::as_str).collect();
                write_objects(&mut wtr, &headers, arr.iter())?;
            }
            _ => {
                wtr.write_record(["value"])?;
                for item in arr {
                    wtr.write_record([cell(item)])?;
                }
            }
        },
        Value::Object(obj) => {
            wtr.write_record(["key", "value"])?;
            for (k, v) in obj {
                wtr.write_record([k.as_str(), &cell(v)])?;
            }
        }
        scalar => {
            wtr.write_record(["value"])?;
            wtr.write_record([cell(scalar)])?;
        }
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| SerializeError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

fn is_tabular(value: &Value) -> bool {
    value.get("rows").is_some_and(Value::is_array)
        && value.get("columns").is_some_and(Value::is_array)
}

fn write_objects<'a, W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    headers: &[&str],
    items: impl Iterator<Item = &'a Value>,
) -> Result<(), csv::Error> {
    wtr.write_record(headers)?;
    for item in items {
        if let Value::Object(obj) = item {
            wtr.write_record(headers.iter().map(|h| obj.get(*h).map(cell).unwrap_or_default()))?;
        }
    }
    Ok(())
}

fn cell(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
