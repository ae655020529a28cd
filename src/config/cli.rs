use crate::adapters::gateway::{DEFAULT_GATEWAY_ENDPOINT, DEFAULT_GATEWAY_MODEL};
use crate::core::loan::{DownPayment, LoanTerms};
use crate::domain::model::{LineItemKey, PropertyInput};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ScoreError};
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "propscore")]
#[command(about = "Scores a residential property investment via an AI analysis gateway")]
pub struct CliConfig {
    /// Analysis gateway endpoint
    #[arg(long, default_value = DEFAULT_GATEWAY_ENDPOINT)]
    pub gateway_endpoint: String,

    /// Model id the gateway routes the analysis to
    #[arg(long, default_value = DEFAULT_GATEWAY_MODEL)]
    pub model: String,

    /// Gateway API key; falls back to the GATEWAY_API_KEY environment variable
    #[arg(long)]
    pub api_key: Option<String>,

    /// Gateway request timeout in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// US state the property is in
    #[arg(long)]
    pub state: String,

    /// Listing URL for the property
    #[arg(long)]
    pub listing_url: String,

    #[arg(long)]
    pub purchase_price: f64,

    /// Buyer's yearly income
    #[arg(long)]
    pub yearly_income: f64,

    #[arg(long, default_value = "Single-family")]
    pub property_type: String,

    #[arg(long, default_value = "3")]
    pub bedrooms: f64,

    #[arg(long, default_value = "2")]
    pub bathrooms: f64,

    /// Down payment as a dollar amount; takes precedence over the percentage
    #[arg(long)]
    pub down_payment: Option<f64>,

    /// Down payment as a percentage of the purchase price
    #[arg(long, default_value = "20")]
    pub down_payment_percent: f64,

    /// Annual interest rate in percent
    #[arg(long, default_value = "7.0")]
    pub interest_rate: f64,

    /// Annual property tax rate as a fraction of the price (default 0.012)
    #[arg(long)]
    pub property_tax_rate: Option<f64>,

    /// Monthly utilities estimate (default 200)
    #[arg(long)]
    pub utilities: Option<f64>,

    /// Payment line-item override, e.g. --set hoa_fees=150 (repeatable)
    #[arg(long = "set", value_name = "ITEM=VALUE")]
    pub overrides: Vec<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Log process cpu/memory usage around the analysis phases
    #[arg(long)]
    pub monitor: bool,
}

impl CliConfig {
    /// Resolves the immutable loan terms for this run. An explicit dollar
    /// amount wins over the percentage.
    pub fn loan_terms(&self) -> Result<LoanTerms> {
        let down = match self.down_payment {
            Some(amount) => DownPayment::Amount(amount),
            None => DownPayment::Percent(self.down_payment_percent),
        };

        let mut terms =
            LoanTerms::new(self.purchase_price, down)?.with_interest_rate(self.interest_rate)?;
        if let Some(rate) = self.property_tax_rate {
            terms = terms.with_property_tax_rate(rate)?;
        }
        if let Some(utilities) = self.utilities {
            terms = terms.with_utilities_estimate(utilities)?;
        }
        Ok(terms)
    }

    /// The gateway payload's property block, with the down payment taken
    /// from the resolved terms so amount and percentage cannot diverge.
    pub fn property_input(&self, terms: &LoanTerms) -> PropertyInput {
        PropertyInput {
            state: self.state.clone(),
            listing_url: self.listing_url.clone(),
            purchase_price: terms.purchase_price(),
            yearly_income: self.yearly_income,
            property_type: self.property_type.clone(),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            down_payment_amount: terms.down_payment(),
            down_payment_percentage: terms.down_payment_percent(),
        }
    }

    /// Parses `--set item=value` pairs. Values stay raw text; the payment
    /// model decides whether they commit.
    pub fn line_item_overrides(&self) -> Result<Vec<(LineItemKey, String)>> {
        self.overrides
            .iter()
            .map(|entry| {
                let (key, value) =
                    entry
                        .split_once('=')
                        .ok_or_else(|| ScoreError::InvalidValue {
                            field: "set".to_string(),
                            value: entry.clone(),
                            reason: "Expected ITEM=VALUE".to_string(),
                        })?;
                Ok((key.trim().parse::<LineItemKey>()?, value.trim().to_string()))
            })
            .collect()
    }
}

impl ConfigProvider for CliConfig {
    fn gateway_endpoint(&self) -> &str {
        &self.gateway_endpoint
    }

    fn gateway_model(&self) -> &str {
        &self.model
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("gateway_endpoint", &self.gateway_endpoint)?;
        validation::validate_non_empty_string("model", &self.model)?;
        validation::validate_path("output_path", &self.output_path)?;
        self.line_item_overrides().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> CliConfig {
        CliConfig {
            gateway_endpoint: DEFAULT_GATEWAY_ENDPOINT.to_string(),
            model: DEFAULT_GATEWAY_MODEL.to_string(),
            api_key: Some("test-key".to_string()),
            timeout_seconds: None,
            state: "Texas".to_string(),
            listing_url: "https://zillow.com/homedetails/123".to_string(),
            purchase_price: 500_000.0,
            yearly_income: 120_000.0,
            property_type: "Single-family".to_string(),
            bedrooms: 3.0,
            bathrooms: 2.0,
            down_payment: None,
            down_payment_percent: 20.0,
            interest_rate: 7.0,
            property_tax_rate: None,
            utilities: None,
            overrides: vec![],
            output_path: "./output".to_string(),
            verbose: false,
            monitor: false,
        }
    }

    #[test]
    fn percent_down_payment_resolves_against_the_price() {
        let terms = base_config().loan_terms().unwrap();
        assert_eq!(terms.down_payment(), 100_000.0);
        assert_eq!(terms.loan_amount(), 400_000.0);
    }

    #[test]
    fn explicit_amount_wins_over_the_percentage() {
        let mut config = base_config();
        config.down_payment = Some(50_000.0);
        let terms = config.loan_terms().unwrap();
        assert_eq!(terms.down_payment(), 50_000.0);
        assert_eq!(terms.down_payment_percent(), 10.0);
    }

    #[test]
    fn property_input_carries_the_resolved_down_payment() {
        let config = base_config();
        let terms = config.loan_terms().unwrap();
        let input = config.property_input(&terms);
        assert_eq!(input.down_payment_amount, 100_000.0);
        assert_eq!(input.down_payment_percentage, 20.0);
    }

    #[test]
    fn overrides_parse_into_key_and_raw_text() {
        let mut config = base_config();
        config.overrides = vec![
            "hoa_fees=150".to_string(),
            "utilities = 275.5".to_string(),
            "principalAndInterest=2000".to_string(),
        ];

        let parsed = config.line_item_overrides().unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], (LineItemKey::HoaFees, "150".to_string()));
        assert_eq!(parsed[1], (LineItemKey::Utilities, "275.5".to_string()));
        assert_eq!(
            parsed[2],
            (LineItemKey::PrincipalAndInterest, "2000".to_string())
        );
    }

    #[test]
    fn malformed_overrides_fail_validation() {
        let mut config = base_config();
        config.overrides = vec!["hoa_fees".to_string()];
        assert!(config.validate().is_err());

        config.overrides = vec!["swimming_pool=100".to_string()];
        assert!(config.validate().is_err());
    }
}
