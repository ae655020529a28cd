use crate::utils::error::{Result, ScoreError};
use serde::{Deserialize, Serialize};

/// Down payment as the user entered it. Resolved against the purchase price
/// once, at construction; amount and percentage never live as two
/// independently mutable fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DownPayment {
    Amount(f64),
    Percent(f64),
}

/// Immutable input parameters for one payment computation session. Editing a
/// line item never re-derives these; a changed term means a new `LoanTerms`
/// and a re-initialized payment model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    purchase_price: f64,
    down_payment: f64,
    annual_interest_rate_percent: f64,
    property_tax_rate_annual: f64,
    base_utilities_estimate: f64,
}

impl LoanTerms {
    pub const AMORTIZATION_YEARS: u32 = 30;
    pub const DEFAULT_INTEREST_RATE_PERCENT: f64 = 7.0;
    /// Flat national-average placeholder, not a real-world guarantee.
    pub const DEFAULT_PROPERTY_TAX_RATE: f64 = 0.012;
    pub const DEFAULT_UTILITIES_ESTIMATE: f64 = 200.0;

    pub fn new(purchase_price: f64, down_payment: DownPayment) -> Result<Self> {
        if !purchase_price.is_finite() || purchase_price <= 0.0 {
            return Err(ScoreError::InvalidValue {
                field: "purchase_price".to_string(),
                value: purchase_price.to_string(),
                reason: "Purchase price must be a positive number".to_string(),
            });
        }

        let resolved = match down_payment {
            DownPayment::Amount(amount) => amount,
            DownPayment::Percent(percent) => purchase_price * percent / 100.0,
        };
        if !resolved.is_finite() || resolved < 0.0 || resolved >= purchase_price {
            return Err(ScoreError::InvalidValue {
                field: "down_payment".to_string(),
                value: resolved.to_string(),
                reason: "Down payment must be at least 0 and below the purchase price"
                    .to_string(),
            });
        }

        Ok(Self {
            purchase_price,
            down_payment: resolved,
            annual_interest_rate_percent: Self::DEFAULT_INTEREST_RATE_PERCENT,
            property_tax_rate_annual: Self::DEFAULT_PROPERTY_TAX_RATE,
            base_utilities_estimate: Self::DEFAULT_UTILITIES_ESTIMATE,
        })
    }

    pub fn with_interest_rate(mut self, annual_percent: f64) -> Result<Self> {
        if !annual_percent.is_finite() || annual_percent < 0.0 {
            return Err(ScoreError::InvalidValue {
                field: "interest_rate".to_string(),
                value: annual_percent.to_string(),
                reason: "Interest rate must be a non-negative number".to_string(),
            });
        }
        self.annual_interest_rate_percent = annual_percent;
        Ok(self)
    }

    pub fn with_property_tax_rate(mut self, annual_fraction: f64) -> Result<Self> {
        if !annual_fraction.is_finite() || annual_fraction < 0.0 {
            return Err(ScoreError::InvalidValue {
                field: "property_tax_rate".to_string(),
                value: annual_fraction.to_string(),
                reason: "Property tax rate must be a non-negative fraction of the price"
                    .to_string(),
            });
        }
        self.property_tax_rate_annual = annual_fraction;
        Ok(self)
    }

    pub fn with_utilities_estimate(mut self, monthly: f64) -> Result<Self> {
        if !monthly.is_finite() || monthly < 0.0 {
            return Err(ScoreError::InvalidValue {
                field: "utilities".to_string(),
                value: monthly.to_string(),
                reason: "Utilities estimate must be a non-negative amount".to_string(),
            });
        }
        self.base_utilities_estimate = monthly;
        Ok(self)
    }

    pub fn purchase_price(&self) -> f64 {
        self.purchase_price
    }

    pub fn down_payment(&self) -> f64 {
        self.down_payment
    }

    pub fn down_payment_percent(&self) -> f64 {
        self.down_payment / self.purchase_price * 100.0
    }

    pub fn loan_amount(&self) -> f64 {
        self.purchase_price - self.down_payment
    }

    pub fn annual_interest_rate_percent(&self) -> f64 {
        self.annual_interest_rate_percent
    }

    pub fn property_tax_rate_annual(&self) -> f64 {
        self.property_tax_rate_annual
    }

    pub fn base_utilities_estimate(&self) -> f64 {
        self.base_utilities_estimate
    }

    pub fn amortization_months(&self) -> u32 {
        Self::AMORTIZATION_YEARS * 12
    }
}
