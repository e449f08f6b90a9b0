use crate::domain::model::{AverageRecord, Record, TimePoint};
use crate::utils::error::{ChartError, Result};
use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct LikesRow {
    #[serde(rename = "Platform")]
    platform: String,
    #[serde(rename = "Likes")]
    likes: String,
}

#[derive(Debug, Deserialize)]
struct AverageRow {
    #[serde(rename = "Platform")]
    platform: String,
    #[serde(rename = "PostType")]
    post_type: String,
    #[serde(rename = "AvgLikes")]
    avg_likes: String,
}

#[derive(Debug, Deserialize)]
struct TimeRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "AvgLikes")]
    avg_likes: String,
}

/// Name used in error messages for a source location: its last path segment.
pub fn source_name(location: &str) -> String {
    location
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty())
        .unwrap_or(location)
        .to_string()
}

/// Numeric CSV cells must hold a finite number; anything else is rejected here
/// so NaN never reaches the summarizer.
fn parse_number(source_name: &str, line: u64, column: &str, text: &str) -> Result<f64> {
    let parsed = text
        .trim()
        .parse::<f64>()
        .map_err(|_| ChartError::ParseError {
            source_name: source_name.to_string(),
            line,
            message: format!("{} value '{}' is not a number", column, text),
        })?;

    if !parsed.is_finite() {
        return Err(ChartError::ParseError {
            source_name: source_name.to_string(),
            line,
            message: format!("{} value '{}' is not finite", column, text),
        });
    }

    Ok(parsed)
}

/// Ragged rows are reported against their line like any other bad row.
fn record_error(source_name: &str, err: csv::Error) -> ChartError {
    match err.kind() {
        ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => ChartError::ParseError {
            source_name: source_name.to_string(),
            line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
            message: format!("expected {} fields, found {}", expected_len, len),
        },
        _ => ChartError::CsvError(err),
    }
}

/// Reads every row of `data` into `T`, handing each row its 1-based line number.
fn read_rows<T, U, F>(source_name: &str, data: &[u8], mut convert: F) -> Result<Vec<U>>
where
    T: DeserializeOwned,
    F: FnMut(T, u64) -> Result<U>,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    let mut record = StringRecord::new();

    while reader
        .read_record(&mut record)
        .map_err(|e| record_error(source_name, e))?
    {
        let line = record.position().map(|pos| pos.line()).unwrap_or(0);
        let row: T = record
            .deserialize(Some(&headers))
            .map_err(|e| ChartError::ParseError {
                source_name: source_name.to_string(),
                line,
                message: e.to_string(),
            })?;
        rows.push(convert(row, line)?);
    }

    tracing::debug!("Parsed {} rows from {}", rows.len(), source_name);
    Ok(rows)
}

/// `Platform,Likes` rows for the box plot.
pub fn parse_likes(source_name: &str, data: &[u8]) -> Result<Vec<Record>> {
    read_rows(source_name, data, |row: LikesRow, line| {
        let value = parse_number(source_name, line, "Likes", &row.likes)?;
        Ok(Record::new(row.platform, value))
    })
}

/// `Platform,PostType,AvgLikes` rows for the grouped bar chart.
pub fn parse_averages(source_name: &str, data: &[u8]) -> Result<Vec<AverageRecord>> {
    read_rows(source_name, data, |row: AverageRow, line| {
        Ok(AverageRecord {
            avg_likes: parse_number(source_name, line, "AvgLikes", &row.avg_likes)?,
            platform: row.platform,
            post_type: row.post_type,
        })
    })
}

/// `Date,AvgLikes` rows for the line chart, in file order.
pub fn parse_timeline(source_name: &str, data: &[u8]) -> Result<Vec<TimePoint>> {
    read_rows(source_name, data, |row: TimeRow, line| {
        Ok(TimePoint {
            avg_likes: parse_number(source_name, line, "AvgLikes", &row.avg_likes)?,
            date: row.date,
        })
    })
}
