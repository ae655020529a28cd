use serde::{Deserialize, Serialize};

/// States accepted by the analysis gateway prompt.
pub const US_STATES: [&str; 50] = [
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
];

pub const PROPERTY_TYPES: [&str; 7] = [
    "Single-family",
    "Condo",
    "Multi-family",
    "Townhome",
    "Duplex",
    "Triplex",
    "Fourplex",
];

/// Property and financing details supplied once per analysis session.
/// Field names serialize in camelCase to match the gateway payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInput {
    pub state: String,
    pub listing_url: String,
    pub purchase_price: f64,
    pub yearly_income: f64,
    pub property_type: String,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub down_payment_amount: f64,
    pub down_payment_percentage: f64,
}

/// One of the six fixed payment line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineItemKey {
    PrincipalAndInterest,
    MortgageInsurance,
    PropertyTaxes,
    HomeownersInsurance,
    HoaFees,
    Utilities,
}

impl LineItemKey {
    pub const ALL: [LineItemKey; 6] = [
        LineItemKey::PrincipalAndInterest,
        LineItemKey::MortgageInsurance,
        LineItemKey::PropertyTaxes,
        LineItemKey::HomeownersInsurance,
        LineItemKey::HoaFees,
        LineItemKey::Utilities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LineItemKey::PrincipalAndInterest => "principalAndInterest",
            LineItemKey::MortgageInsurance => "mortgageInsurance",
            LineItemKey::PropertyTaxes => "propertyTaxes",
            LineItemKey::HomeownersInsurance => "homeownersInsurance",
            LineItemKey::HoaFees => "hoaFees",
            LineItemKey::Utilities => "utilities",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LineItemKey::PrincipalAndInterest => "Principal & Interest",
            LineItemKey::MortgageInsurance => "PMI",
            LineItemKey::PropertyTaxes => "Property Taxes",
            LineItemKey::HomeownersInsurance => "Homeowners Insurance",
            LineItemKey::HoaFees => "HOA Fees",
            LineItemKey::Utilities => "Utilities",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            LineItemKey::PrincipalAndInterest => 0,
            LineItemKey::MortgageInsurance => 1,
            LineItemKey::PropertyTaxes => 2,
            LineItemKey::HomeownersInsurance => 3,
            LineItemKey::HoaFees => 4,
            LineItemKey::Utilities => 5,
        }
    }
}

impl std::str::FromStr for LineItemKey {
    type Err = crate::utils::error::ScoreError;

    /// Accepts both the wire spelling and snake_case (for CLI flags).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "principalAndInterest" | "principal_and_interest" => {
                Ok(LineItemKey::PrincipalAndInterest)
            }
            "mortgageInsurance" | "mortgage_insurance" => Ok(LineItemKey::MortgageInsurance),
            "propertyTaxes" | "property_taxes" => Ok(LineItemKey::PropertyTaxes),
            "homeownersInsurance" | "homeowners_insurance" => Ok(LineItemKey::HomeownersInsurance),
            "hoaFees" | "hoa_fees" => Ok(LineItemKey::HoaFees),
            "utilities" => Ok(LineItemKey::Utilities),
            other => Err(crate::utils::error::ScoreError::InvalidValue {
                field: "line_item".to_string(),
                value: other.to_string(),
                reason: format!(
                    "Unknown line item. Valid keys: {}",
                    LineItemKey::ALL
                        .iter()
                        .map(|k| k.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }),
        }
    }
}

/// The six line-item values plus their sum. `total` is always recomputed
/// from the items, never stored on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPayment {
    pub principal_and_interest: f64,
    pub mortgage_insurance: f64,
    pub property_taxes: f64,
    pub homeowners_insurance: f64,
    pub hoa_fees: f64,
    pub utilities: f64,
    pub total: f64,
}

impl MonthlyPayment {
    pub fn get(&self, key: LineItemKey) -> f64 {
        match key {
            LineItemKey::PrincipalAndInterest => self.principal_and_interest,
            LineItemKey::MortgageInsurance => self.mortgage_insurance,
            LineItemKey::PropertyTaxes => self.property_taxes,
            LineItemKey::HomeownersInsurance => self.homeowners_insurance,
            LineItemKey::HoaFees => self.hoa_fees,
            LineItemKey::Utilities => self.utilities,
        }
    }
}

/// Listing estimates generated by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingData {
    pub address: String,
    pub listing_price: f64,
    pub property_type: String,
    pub square_footage: f64,
    pub hoa_fees: f64,
    pub property_tax_estimate: f64,
    #[serde(default)]
    pub great_schools_rating: Option<f64>,
    #[serde(default)]
    pub year_built: Option<i32>,
    #[serde(default)]
    pub lot_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyClassification {
    #[serde(rename = "Safe")]
    Safe,
    #[serde(rename = "Moderately Safe")]
    ModeratelySafe,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl SafetyClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyClassification::Safe => "Safe",
            SafetyClassification::ModeratelySafe => "Moderately Safe",
            SafetyClassification::HighRisk => "High Risk",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyData {
    pub incident_count: f64,
    pub crime_types: Vec<String>,
    pub recency: String,
    pub classification: SafetyClassification,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicsData {
    pub median_household_income: f64,
    pub population_density: f64,
    pub homeownership_ratio: f64,
    pub median_home_value: f64,
    pub employment_rate: f64,
}

/// One of the five weighted scoring categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub name: String,
    pub score: f64,
    pub weight: f64,
    pub weighted_score: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    #[serde(rename = "Good Opportunity")]
    GoodOpportunity,
    #[serde(rename = "Proceed Carefully")]
    ProceedCarefully,
    #[serde(rename = "Do Not Invest")]
    DoNotInvest,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::StrongBuy => "Strong Buy",
            Verdict::GoodOpportunity => "Good Opportunity",
            Verdict::ProceedCarefully => "Proceed Carefully",
            Verdict::DoNotInvest => "Do Not Invest",
        }
    }
}

/// The structured report returned by the analysis gateway, with the local
/// payment snapshot attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentAnalysis {
    pub overall_score: f64,
    pub verdict: Verdict,
    pub category_scores: Vec<CategoryScore>,
    pub strengths: Vec<String>,
    pub risks: Vec<String>,
    pub explanation: String,
    #[serde(default)]
    pub monthly_payment: MonthlyPayment,
    pub listing_data: ListingData,
    #[serde(default)]
    pub safety_data: Option<SafetyData>,
    #[serde(default)]
    pub demographics_data: Option<DemographicsData>,
}

/// Progression of one analysis session, traced step by step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStep {
    Idle,
    FetchingListing,
    AnalyzingSafety,
    AnalyzingDemographics,
    CalculatingScore,
    Complete,
    Error,
}

impl AnalysisStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStep::Idle => "idle",
            AnalysisStep::FetchingListing => "fetching-listing",
            AnalysisStep::AnalyzingSafety => "analyzing-safety",
            AnalysisStep::AnalyzingDemographics => "analyzing-demographics",
            AnalysisStep::CalculatingScore => "calculating-score",
            AnalysisStep::Complete => "complete",
            AnalysisStep::Error => "error",
        }
    }
}
