use crate::utils::error::{GatewayError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(GatewayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(GatewayError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(GatewayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| GatewayError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(GatewayError::InvalidConfigValueError {
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
        assert!(validate_url("analysis_endpoint", "https://example.com/analyze").is_ok());
        assert!(validate_url("analysis_endpoint", "http://localhost:8000").is_ok());
        assert!(validate_url("analysis_endpoint", "").is_err());
        assert!(validate_url("analysis_endpoint", "not a url").is_err());
        assert!(validate_url("analysis_endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("value".to_string());
        let missing: Option<String> = None;

        assert_eq!(
            validate_required_field("analysis_endpoint", &present).unwrap(),
            "value"
        );
        assert!(matches!(
            validate_required_field("analysis_endpoint", &missing),
            Err(GatewayError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timeout_secs", 30, 1, 900).is_ok());
        assert!(validate_range("timeout_secs", 0, 1, 900).is_err());
        assert!(validate_range("timeout_secs", 901, 1, 900).is_err());
    }
}
