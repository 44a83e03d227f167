use crate::utils::error::{PbnError, Result};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PbnError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PbnError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PbnError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(PbnError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// 回傳小寫副檔名；不在允許清單內就拒絕
pub fn validate_file_extension(file_name: &str, allowed_extensions: &[&str]) -> Result<String> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if allowed_set.contains(extension.as_str()) {
        Ok(extension)
    } else {
        Err(PbnError::UnsupportedFileFormat { extension })
    }
}

/// Form-level required field check shared by the admin inputs.
pub fn require_fields(entity: &str, fields: &[(&str, &str)], message: &str) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    tracing::debug!("{} input missing fields: {}", entity, missing.join(", "));
    Err(PbnError::InputValidation {
        entity: entity.to_string(),
        message: message.to_string(),
    })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PbnError::InvalidConfigValueError {
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
        assert!(validate_url("api_url", "https://example.com/api").is_ok());
        assert!(validate_url("api_url", "http://localhost:8001/api").is_ok());
        assert!(validate_url("api_url", "").is_err());
        assert!(validate_url("api_url", "invalid-url").is_err());
        assert!(validate_url("api_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("timeout_seconds", 5, 1).is_ok());
        assert!(validate_positive_number("timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_file_extension_is_case_insensitive() {
        let allowed = ["csv", "xlsx", "xls"];
        assert_eq!(validate_file_extension("domains.CSV", &allowed).unwrap(), "csv");
        assert_eq!(validate_file_extension("a.b.xlsx", &allowed).unwrap(), "xlsx");

        match validate_file_extension("domains.txt", &allowed) {
            Err(PbnError::UnsupportedFileFormat { extension }) => assert_eq!(extension, "txt"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(validate_file_extension("no_extension", &allowed).is_err());
    }

    #[test]
    fn test_require_fields() {
        assert!(require_fields("faq", &[("question", "Q?"), ("answer", "A")], "wajib").is_ok());
        assert!(require_fields("faq", &[("question", "  "), ("answer", "A")], "wajib").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("dr", 50, 0, 100).is_ok());
        assert!(validate_range("dr", 101, 0, 100).is_err());
    }
}
