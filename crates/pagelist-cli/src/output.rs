//! Structured output of command results.
//!
//! Records are written as JSON, YAML or CSV. CSV columns are the sorted
//! union of the field names of every record, so sparse records line up.

use std::borrow::Borrow;
use std::collections::BTreeSet;

use clap::ValueEnum;
use pagelist_seeker::PageRecord;
use serde::Serialize;
use thiserror::Error;

/// Output format selected with `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// YAML
    Yaml,
    /// CSV with one column per field
    Csv,
}

/// Errors that can occur during serialization.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(String),

    #[error("CSV output needs a list of records")]
    NotTabular,
}

/// Serializes page records in the given format.
pub fn serialize_records<P: Borrow<PageRecord>>(
    records: &[P],
    format: OutputFormat,
) -> Result<String, SerializeError> {
    let records: Vec<&PageRecord> = records.iter().map(Borrow::borrow).collect();
    match format {
        OutputFormat::Json => to_json(&records),
        OutputFormat::Yaml => to_yaml(&records),
        OutputFormat::Csv => records_to_csv(&records),
    }
}

/// Serializes any other value. CSV is not available for these.
pub fn serialize_value<T: Serialize>(
    data: &T,
    format: OutputFormat,
) -> Result<String, SerializeError> {
    match format {
        OutputFormat::Json => to_json(data),
        OutputFormat::Yaml => to_yaml(data),
        OutputFormat::Csv => Err(SerializeError::NotTabular),
    }
}

/// Serializes data to JSON format.
pub fn to_json<T: Serialize + ?Sized>(data: &T) -> Result<String, SerializeError> {
    let mut json = serde_json::to_string_pretty(data)?;
    json.push('\n');
    Ok(json)
}

/// Serializes data to YAML format.
pub fn to_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, SerializeError> {
    Ok(serde_yaml::to_string(data)?)
}

/// Writes records as CSV. List fields are joined with commas.
fn records_to_csv(records: &[&PageRecord]) -> Result<String, SerializeError> {
    let headers: BTreeSet<&str> = records.iter().flat_map(|r| r.keys()).collect();
    if headers.is_empty() {
        return Ok(String::new());
    }

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(&headers)
        .map_err(|e| SerializeError::Csv(e.to_string()))?;

    for record in records {
        let row: Vec<String> = headers
            .iter()
            .map(|h| record.text(h).map(|t| t.into_owned()).unwrap_or_default())
            .collect();
        wtr.write_record(&row)
            .map_err(|e| SerializeError::Csv(e.to_string()))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| SerializeError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SerializeError::Csv(e.to_string()))
}
