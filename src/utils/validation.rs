use crate::utils::error::{ChartError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Whether a source location should be fetched over HTTP instead of read from storage.
pub fn is_remote_source(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ChartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ChartError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ChartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ChartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ChartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// A CSV source is either an http(s) URL or a local `.csv` path.
pub fn validate_csv_source(field_name: &str, location: &str) -> Result<()> {
    if is_remote_source(location) {
        return validate_url(field_name, location);
    }

    validate_path(field_name, location)?;

    let extension = std::path::Path::new(location)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => Ok(()),
        Some(other) => Err(ChartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: location.to_string(),
            reason: format!("Unsupported file extension: {}. Allowed extensions: csv", other),
        }),
        None => Err(ChartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: location.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ChartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ChartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("source", "https://example.com/data.csv").is_ok());
        assert!(validate_url("source", "http://example.com").is_ok());
        assert!(validate_url("source", "").is_err());
        assert!(validate_url("source", "invalid-url").is_err());
        assert!(validate_url("source", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_csv_source() {
        assert!(validate_csv_source("box_plot", "socialMedia.csv").is_ok());
        assert!(validate_csv_source("box_plot", "data/Likes.CSV").is_ok());
        assert!(validate_csv_source("box_plot", "https://example.com/socialMedia.csv").is_ok());
        assert!(validate_csv_source("box_plot", "socialMedia.txt").is_err());
        assert!(validate_csv_source("box_plot", "socialMedia").is_err());
        assert!(validate_csv_source("box_plot", "").is_err());
    }

    #[test]
    fn test_is_remote_source() {
        assert!(is_remote_source("HTTP://example.com/a.csv"));
        assert!(is_remote_source("https://example.com/a.csv"));
        assert!(!is_remote_source("./https/a.csv"));
    }

    #[test]
    fn test_validate_range_and_non_empty() {
        assert!(validate_range("width", 800u32, 100, 10_000).is_ok());
        assert!(validate_range("width", 20u32, 100, 10_000).is_err());

        assert!(validate_non_empty_string("pipeline.name", "  ").is_err());
    }
}
