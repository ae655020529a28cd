use crate::adapters::gateway::{DEFAULT_GATEWAY_ENDPOINT, DEFAULT_GATEWAY_MODEL};
use crate::core::loan::{DownPayment, LoanTerms};
use crate::domain::model::{LineItemKey, PropertyInput};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ScoreError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Analysis profile loaded from a TOML file. Lets a property be re-scored
/// without retyping a dozen flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub profile: ProfileConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    pub property: PropertyConfig,
    #[serde(default)]
    pub loan: LoanConfig,
    /// Payment line-item overrides as raw text, keyed by line item.
    #[serde(default)]
    pub overrides: HashMap<String, String>,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyConfig {
    pub state: String,
    pub listing_url: String,
    pub purchase_price: f64,
    pub yearly_income: f64,
    pub property_type: String,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub down_payment: Option<f64>,
    pub down_payment_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanConfig {
    pub interest_rate: Option<f64>,
    pub property_tax_rate: Option<f64>,
    pub utilities: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub monitor: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScoreError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ScoreError::InvalidValue {
            field: "profile".to_string(),
            value: "<toml>".to_string(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` with the environment value; unresolved
    /// placeholders are left in place and caught by validation.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(endpoint) = &self.gateway.endpoint {
            validation::validate_url("gateway.endpoint", endpoint)?;
        }
        if let Some(api_key) = &self.gateway.api_key {
            if api_key.contains("${") {
                return Err(ScoreError::InvalidValue {
                    field: "gateway.api_key".to_string(),
                    value: api_key.clone(),
                    reason: "Unresolved environment variable".to_string(),
                });
            }
        }

        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_positive_amount(
            "property.purchase_price",
            self.property.purchase_price,
        )?;
        validation::validate_positive_amount(
            "property.yearly_income",
            self.property.yearly_income,
        )?;

        for key in self.overrides.keys() {
            key.parse::<LineItemKey>()?;
        }

        Ok(())
    }

    pub fn loan_terms(&self) -> Result<LoanTerms> {
        let down = match (self.property.down_payment, self.property.down_payment_percent) {
            (Some(amount), _) => DownPayment::Amount(amount),
            (None, Some(percent)) => DownPayment::Percent(percent),
            (None, None) => {
                return Err(ScoreError::MissingConfig {
                    field: "property.down_payment or property.down_payment_percent".to_string(),
                })
            }
        };

        let mut terms = LoanTerms::new(self.property.purchase_price, down)?;
        if let Some(rate) = self.loan.interest_rate {
            terms = terms.with_interest_rate(rate)?;
        }
        if let Some(rate) = self.loan.property_tax_rate {
            terms = terms.with_property_tax_rate(rate)?;
        }
        if let Some(utilities) = self.loan.utilities {
            terms = terms.with_utilities_estimate(utilities)?;
        }
        Ok(terms)
    }

    pub fn property_input(&self, terms: &LoanTerms) -> PropertyInput {
        PropertyInput {
            state: self.property.state.clone(),
            listing_url: self.property.listing_url.clone(),
            purchase_price: terms.purchase_price(),
            yearly_income: self.property.yearly_income,
            property_type: self.property.property_type.clone(),
            bedrooms: self.property.bedrooms,
            bathrooms: self.property.bathrooms,
            down_payment_amount: terms.down_payment(),
            down_payment_percentage: terms.down_payment_percent(),
        }
    }

    pub fn line_item_overrides(&self) -> Result<Vec<(LineItemKey, String)>> {
        let mut entries: Vec<(LineItemKey, String)> = self
            .overrides
            .iter()
            .map(|(key, value)| Ok((key.parse::<LineItemKey>()?, value.clone())))
            .collect::<Result<_>>()?;
        entries.sort_by_key(|(key, _)| key.index());
        Ok(entries)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.output.monitor.unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn gateway_endpoint(&self) -> &str {
        self.gateway
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_GATEWAY_ENDPOINT)
    }

    fn gateway_model(&self) -> &str {
        self.gateway.model.as_deref().unwrap_or(DEFAULT_GATEWAY_MODEL)
    }

    fn api_key(&self) -> Option<&str> {
        self.gateway.api_key.as_deref()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.gateway.timeout_seconds
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC_PROFILE: &str = r#"
[profile]
name = "austin-condo"
description = "Condo near the lake"

[gateway]
endpoint = "https://gateway.example.com/v1/chat/completions"
api_key = "sk-test"
timeout_seconds = 30

[property]
state = "Texas"
listing_url = "https://zillow.com/homedetails/123"
purchase_price = 500000.0
yearly_income = 120000.0
property_type = "Condo"
bedrooms = 2.0
bathrooms = 2.0
down_payment_percent = 20.0

[loan]
interest_rate = 6.5

[overrides]
hoa_fees = "250"

[output]
path = "./reports"
monitor = true
"#;

    #[test]
    fn test_parse_basic_profile() {
        let config = TomlConfig::from_toml_str(BASIC_PROFILE).unwrap();

        assert_eq!(config.profile.name, "austin-condo");
        assert_eq!(
            config.gateway_endpoint(),
            "https://gateway.example.com/v1/chat/completions"
        );
        assert_eq!(config.gateway_model(), DEFAULT_GATEWAY_MODEL);
        assert_eq!(config.timeout_seconds(), Some(30));
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());

        let terms = config.loan_terms().unwrap();
        assert_eq!(terms.down_payment(), 100_000.0);
        assert_eq!(terms.annual_interest_rate_percent(), 6.5);

        let overrides = config.line_item_overrides().unwrap();
        assert_eq!(overrides, vec![(LineItemKey::HoaFees, "250".to_string())]);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PROPSCORE_TEST_KEY", "sk-from-env");

        let toml_content = r#"
[profile]
name = "env-test"

[gateway]
api_key = "${PROPSCORE_TEST_KEY}"

[property]
state = "Texas"
listing_url = "https://zillow.com/homedetails/1"
purchase_price = 400000.0
yearly_income = 100000.0
property_type = "Single-family"
bedrooms = 3.0
bathrooms = 2.0
down_payment = 80000.0

[output]
path = "./reports"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("sk-from-env"));

        std::env::remove_var("PROPSCORE_TEST_KEY");
    }

    #[test]
    fn test_unresolved_api_key_fails_validation() {
        let toml_content = r#"
[profile]
name = "unresolved"

[gateway]
api_key = "${PROPSCORE_MISSING_VAR}"

[property]
state = "Texas"
listing_url = "https://zillow.com/homedetails/1"
purchase_price = 400000.0
yearly_income = 100000.0
property_type = "Single-family"
bedrooms = 3.0
bathrooms = 2.0
down_payment = 80000.0

[output]
path = "./reports"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_endpoint_fails_validation() {
        let toml_content = r#"
[profile]
name = "bad-endpoint"

[gateway]
endpoint = "not-a-url"

[property]
state = "Texas"
listing_url = "https://zillow.com/homedetails/1"
purchase_price = 400000.0
yearly_income = 100000.0
property_type = "Single-family"
bedrooms = 3.0
bathrooms = 2.0
down_payment = 80000.0

[output]
path = "./reports"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_override_key_fails_validation() {
        let toml_content = r#"
[profile]
name = "bad-override"

[property]
state = "Texas"
listing_url = "https://zillow.com/homedetails/1"
purchase_price = 400000.0
yearly_income = 100000.0
property_type = "Single-family"
bedrooms = 3.0
bathrooms = 2.0
down_payment = 80000.0

[overrides]
swimming_pool = "100"

[output]
path = "./reports"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_down_payment_is_an_error() {
        let toml_content = r#"
[profile]
name = "no-down"

[property]
state = "Texas"
listing_url = "https://zillow.com/homedetails/1"
purchase_price = 400000.0
yearly_income = 100000.0
property_type = "Single-family"
bedrooms = 3.0
bathrooms = 2.0

[output]
path = "./reports"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.loan_terms(),
            Err(ScoreError::MissingConfig { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC_PROFILE.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.profile.name, "austin-condo");
    }
}
