use crate::domain::model::{PropertyInput, PROPERTY_TYPES, US_STATES};
use crate::utils::error::{Result, ScoreError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ScoreError::InvalidValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ScoreError::InvalidValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ScoreError::InvalidValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ScoreError::InvalidValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ScoreError::InvalidValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Requires a finite amount strictly greater than zero.
pub fn validate_positive_amount(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ScoreError::InvalidValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a positive number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range(field_name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(ScoreError::InvalidValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ScoreError::InvalidValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(ScoreError::InvalidValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Unsupported value. Allowed: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

impl Validate for PropertyInput {
    fn validate(&self) -> Result<()> {
        validate_one_of("state", &self.state, &US_STATES)?;
        validate_url("listing_url", &self.listing_url)?;
        validate_positive_amount("purchase_price", self.purchase_price)?;
        validate_positive_amount("yearly_income", self.yearly_income)?;
        validate_one_of("property_type", &self.property_type, &PROPERTY_TYPES)?;
        validate_range("bedrooms", self.bedrooms, 1.0, 20.0)?;
        validate_range("bathrooms", self.bathrooms, 1.0, 20.0)?;

        if !self.down_payment_amount.is_finite()
            || self.down_payment_amount < 0.0
            || self.down_payment_amount >= self.purchase_price
        {
            return Err(ScoreError::InvalidValue {
                field: "down_payment_amount".to_string(),
                value: self.down_payment_amount.to_string(),
                reason: "Down payment must be at least 0 and below the purchase price"
                    .to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> PropertyInput {
        PropertyInput {
            state: "Texas".to_string(),
            listing_url: "https://zillow.com/homedetails/123".to_string(),
            purchase_price: 500_000.0,
            yearly_income: 120_000.0,
            property_type: "Single-family".to_string(),
            bedrooms: 3.0,
            bathrooms: 2.0,
            down_payment_amount: 100_000.0,
            down_payment_percentage: 20.0,
        }
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("listing_url", "https://example.com").is_ok());
        assert!(validate_url("listing_url", "http://example.com").is_ok());
        assert!(validate_url("listing_url", "").is_err());
        assert!(validate_url("listing_url", "invalid-url").is_err());
        assert!(validate_url("listing_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_amount() {
        assert!(validate_positive_amount("purchase_price", 500_000.0).is_ok());
        assert!(validate_positive_amount("purchase_price", 0.0).is_err());
        assert!(validate_positive_amount("purchase_price", -1.0).is_err());
        assert!(validate_positive_amount("purchase_price", f64::NAN).is_err());
    }

    #[test]
    fn test_valid_property_input_passes() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn test_unknown_state_rejected() {
        let mut input = valid_input();
        input.state = "Atlantis".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_down_payment_must_stay_below_price() {
        let mut input = valid_input();
        input.down_payment_amount = 500_000.0;
        assert!(input.validate().is_err());

        input.down_payment_amount = 0.0;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_unknown_property_type_rejected() {
        let mut input = valid_input();
        input.property_type = "Castle".to_string();
        assert!(input.validate().is_err());
    }
}
