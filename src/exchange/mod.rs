//! CSV import and export of health tracker data.
//!
//! Every record is a single line of double-quoted, comma separated fields.
//! The first line of a file is a header and is never imported.

pub mod records;

use std::{marker::PhantomData, path::Path, str::FromStr};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::{error::ExchangeError, jobs::ExecutionContext};

pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// A type that can be written to and read from one CSV line.
pub trait CsvRecord: Sized + Send + Sync + 'static {
    const HEADER: &'static [&'static str];

    /// Pattern every importable line must match in full.
    const PATTERN: &'static str;

    fn from_fields(fields: &[&str], line: usize) -> Result<Self, ExchangeError>;

    fn to_fields(&self) -> Vec<String>;
}

/// A record that can be stored through an execution context.
#[async_trait]
pub trait Importable: CsvRecord {
    const SINGULAR: &'static str;
    const PLURAL: &'static str;

    async fn store(&self, context: &ExecutionContext) -> Result<(), ExchangeError>;
}

/// Validates and stores the records of one type.
///
/// Every line after the header is checked against the record pattern and
/// converted before anything is stored, so a malformed line rejects the
/// whole import.
pub struct CsvImporter<R> {
    pattern: Regex,
    _record: PhantomData<fn() -> R>,
}

impl<R: Importable> CsvImporter<R> {
    pub fn new() -> Result<Self, ExchangeError> {
        Ok(Self {
            pattern: Regex::new(R::PATTERN)?,
            _record: PhantomData,
        })
    }

    /// Convert every line after the header, reporting the first invalid one.
    pub fn parse(&self, records: &[&str]) -> Result<Vec<R>, ExchangeError> {
        records
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, record)| {
                let line = index + 1;
                let record = record.trim();
                if !self.pattern.is_match(record) {
                    return Err(ExchangeError::RecordFormat {
                        line,
                        record: record.to_string(),
                    });
                }

                R::from_fields(&split_fields(record), line)
            })
            .collect()
    }

    /// Import every line after the header. Returns the number of records stored.
    pub async fn import(
        &self,
        records: &[&str],
        context: &ExecutionContext,
    ) -> Result<u64, ExchangeError> {
        let parsed = self.parse(records)?;

        for record in &parsed {
            record.store(context).await?;
        }

        Ok(parsed.len() as u64)
    }
}

/// Write a header line plus one line per record to `path`, creating the
/// parent directory when missing. Returns the number of records written.
pub async fn write_csv<R: CsvRecord>(path: &Path, records: &[R]) -> Result<u64, ExchangeError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let mut content = format_fields(R::HEADER.iter().map(|name| name.to_string()))?;
    content.push('\n');
    for record in records {
        content.push_str(&format_fields(record.to_fields())?);
        content.push('\n');
    }

    tokio::fs::write(path, content).await?;
    Ok(records.len() as u64)
}

/// Quote and join one line. Fields are never escaped, so a value holding a
/// double quote cannot be written.
fn format_fields(fields: impl IntoIterator<Item = String>) -> Result<String, ExchangeError> {
    let quoted = fields
        .into_iter()
        .map(|field| {
            if field.contains('"') {
                Err(ExchangeError::QuotedValue(field))
            } else {
                Ok(format!("\"{}\"", field))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(quoted.join(","))
}

fn split_fields(record: &str) -> Vec<&str> {
    let inner = record
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(record);
    inner.split("\",\"").collect()
}

pub(crate) fn field<'a>(
    fields: &[&'a str],
    index: usize,
    name: &'static str,
    line: usize,
) -> Result<&'a str, ExchangeError> {
    fields
        .get(index)
        .copied()
        .ok_or_else(|| ExchangeError::FieldValue {
            line,
            field: name,
            value: String::new(),
        })
}

pub(crate) fn parse_value<T: FromStr>(
    value: &str,
    name: &'static str,
    line: usize,
) -> Result<T, ExchangeError> {
    value.trim().parse().map_err(|_| ExchangeError::FieldValue {
        line,
        field: name,
        value: value.to_string(),
    })
}

pub(crate) fn parse_optional<T: FromStr>(
    value: &str,
    name: &'static str,
    line: usize,
) -> Result<Option<T>, ExchangeError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_value(value, name, line).map(Some)
    }
}

pub(crate) fn parse_date(
    value: &str,
    name: &'static str,
    line: usize,
) -> Result<NaiveDate, ExchangeError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ExchangeError::FieldValue {
        line,
        field: name,
        value: value.to_string(),
    })
}

pub(crate) fn parse_timestamp(
    value: &str,
    name: &'static str,
    line: usize,
) -> Result<NaiveDateTime, ExchangeError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|_| {
        ExchangeError::FieldValue {
            line,
            field: name,
            value: value.to_string(),
        }
    })
}

pub(crate) fn format_optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
