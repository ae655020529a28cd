use crate::core::report::format_usd;
use crate::domain::model::{InvestmentAnalysis, MonthlyPayment, PropertyInput};
use crate::domain::ports::{AnalysisProvider, ConfigProvider};
use crate::utils::error::{Result, ScoreError};
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_GATEWAY_ENDPOINT: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_GATEWAY_MODEL: &str = "google/gemini-2.5-flash";
pub const API_KEY_ENV_VAR: &str = "GATEWAY_API_KEY";

const ANALYSIS_TOOL_NAME: &str = "investment_analysis";

const SYSTEM_PROMPT: &str = "You are an expert real estate investment analyst. You analyze properties using a weighted scoring framework across 5 categories:

1. Deal Economics (35% weight): Affordability, cash burden, leverage, monthly payment ratio
2. Location (25% weight): Safety, desirability, amenities, school ratings
3. Market (15% weight): Demand, income levels, stability, appreciation potential
4. Condition (15% weight): Property quality, age, maintenance risk
5. Exit (10% weight): Resale or rental flexibility, buyer/renter appeal

Score each category from 1-10, then calculate the final percentage score.

Score Interpretation:
- 85-100%: Strong Buy
- 70-84%: Good Opportunity
- 55-69%: Proceed Carefully
- Below 55%: Do Not Invest

You must respond with valid JSON only, no markdown or code blocks.";

/// Connection settings for the analysis gateway.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub timeout_seconds: Option<u64>,
}

impl GatewaySettings {
    /// Builds settings from any config source, falling back to the
    /// `GATEWAY_API_KEY` environment variable for the key.
    pub fn from_config(config: &impl ConfigProvider) -> Result<Self> {
        let api_key = config
            .api_key()
            .map(str::to_owned)
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok())
            .ok_or_else(|| ScoreError::MissingConfig {
                field: format!("api_key (flag, profile, or {})", API_KEY_ENV_VAR),
            })?;

        Ok(Self {
            endpoint: config.gateway_endpoint().to_string(),
            api_key,
            model: config.gateway_model().to_string(),
            timeout_seconds: config.timeout_seconds(),
        })
    }
}

/// `AnalysisProvider` backed by an OpenAI-style chat-completions gateway
/// with tool calling. One request per analysis; no retry.
pub struct GatewayAnalysisProvider {
    settings: GatewaySettings,
    client: Client,
}

impl GatewayAnalysisProvider {
    pub fn new(settings: GatewaySettings) -> Self {
        Self {
            settings,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl AnalysisProvider for GatewayAnalysisProvider {
    async fn analyze(
        &self,
        input: &PropertyInput,
        payment: Option<&MonthlyPayment>,
    ) -> Result<InvestmentAnalysis> {
        let body = serde_json::json!({
            "model": self.settings.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_analysis_prompt(input, payment) }
            ],
            "tools": [analysis_tool_schema()],
            "tool_choice": {
                "type": "function",
                "function": { "name": ANALYSIS_TOOL_NAME }
            }
        });

        tracing::debug!("Calling analysis gateway at {}", self.settings.endpoint);
        let mut request = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&body);
        if let Some(timeout) = self.settings.timeout_seconds {
            request = request.timeout(std::time::Duration::from_secs(timeout));
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Gateway response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Gateway error: {} {}", status, body);
            return Err(match status.as_u16() {
                429 => ScoreError::RateLimited,
                402 => ScoreError::CreditsExhausted,
                code => ScoreError::GatewayStatus { status: code, body },
            });
        }

        let data: serde_json::Value = response.json().await?;
        parse_tool_call(&data)
    }
}

/// Extracts the forced tool call from a chat-completions response and parses
/// its arguments into the analysis payload.
fn parse_tool_call(data: &serde_json::Value) -> Result<InvestmentAnalysis> {
    let function = data
        .pointer("/choices/0/message/tool_calls/0/function")
        .ok_or_else(|| ScoreError::InvalidResponse {
            message: "Response carries no tool call".to_string(),
        })?;

    let name = function.get("name").and_then(|n| n.as_str());
    if name != Some(ANALYSIS_TOOL_NAME) {
        return Err(ScoreError::InvalidResponse {
            message: format!("Unexpected tool call: {}", name.unwrap_or("<none>")),
        });
    }

    let arguments = function
        .get("arguments")
        .and_then(|a| a.as_str())
        .ok_or_else(|| ScoreError::InvalidResponse {
            message: "Tool call carries no arguments".to_string(),
        })?;

    serde_json::from_str(arguments).map_err(|e| ScoreError::InvalidResponse {
        message: format!("Tool arguments did not parse: {}", e),
    })
}

/// The user prompt: property details, financial details, the local payment
/// breakdown and the derived affordability metrics.
pub fn build_analysis_prompt(input: &PropertyInput, payment: Option<&MonthlyPayment>) -> String {
    let monthly_payment_info = payment
        .map(|p| {
            format!(
                "\nMonthly Payment Breakdown:\n\
                 - Principal & Interest: {}\n\
                 - Mortgage Insurance (PMI): {}\n\
                 - Property Taxes: {}\n\
                 - Homeowners Insurance: {}\n\
                 - HOA Fees: {}\n\
                 - Utilities: {}\n\
                 - Total Monthly: {}\n",
                format_usd(p.principal_and_interest),
                format_usd(p.mortgage_insurance),
                format_usd(p.property_taxes),
                format_usd(p.homeowners_insurance),
                format_usd(p.hoa_fees),
                format_usd(p.utilities),
                format_usd(p.total),
            )
        })
        .unwrap_or_default();

    let housing_ratio = payment
        .map(|p| format!("{:.1}", p.total * 12.0 / input.yearly_income * 100.0))
        .unwrap_or_else(|| "N/A".to_string());
    let down_payment_percent = format!("{:.1}", input.down_payment_percentage);
    let pmi_required = if input.down_payment_percentage < 20.0 {
        "Yes"
    } else {
        "No"
    };

    format!(
        "Analyze this residential property investment:\n\n\
         Property Details:\n\
         - State: {state}\n\
         - Listing URL: {listing_url}\n\
         - Property Type: {property_type}\n\
         - Bedrooms: {bedrooms}\n\
         - Bathrooms: {bathrooms}\n\
         - Purchase Price: {price}\n\n\
         Financial Details:\n\
         - Buyer's Yearly Income: {income}\n\
         - Down Payment: {down} ({down_pct}%)\n\
         - Loan Amount: {loan}\n\
         {payment_info}\n\
         Key Metrics:\n\
         - Housing Cost to Income Ratio: {ratio}%\n\
         - Down Payment Percentage: {down_pct}%\n\
         - PMI Required: {pmi}\n\n\
         Based on typical data for {state}, provide a comprehensive investment analysis. Generate realistic estimates for:\n\
         1. Property details (square footage, year built, etc. based on the property type and price point)\n\
         2. Safety data (typical crime statistics for the area)\n\
         3. Demographics data (income levels, homeownership rates, etc.)\n\n\
         Score each of the 5 categories and calculate the overall investment score.",
        state = input.state,
        listing_url = input.listing_url,
        property_type = input.property_type,
        bedrooms = input.bedrooms,
        bathrooms = input.bathrooms,
        price = format_usd(input.purchase_price),
        income = format_usd(input.yearly_income),
        down = format_usd(input.down_payment_amount),
        down_pct = down_payment_percent,
        loan = format_usd(input.purchase_price - input.down_payment_amount),
        payment_info = monthly_payment_info,
        ratio = housing_ratio,
        pmi = pmi_required,
    )
}

/// JSON Schema for the forced `investment_analysis` tool call.
fn analysis_tool_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": ANALYSIS_TOOL_NAME,
            "description": "Return a comprehensive real estate investment analysis",
            "parameters": {
                "type": "object",
                "properties": {
                    "overallScore": {
                        "type": "number",
                        "description": "Overall investment score as percentage (0-100)"
                    },
                    "verdict": {
                        "type": "string",
                        "enum": ["Strong Buy", "Good Opportunity", "Proceed Carefully", "Do Not Invest"]
                    },
                    "categoryScores": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "score": { "type": "number", "description": "Score from 1-10" },
                                "weight": { "type": "number" },
                                "weightedScore": { "type": "number" },
                                "reasoning": { "type": "string" }
                            },
                            "required": ["name", "score", "weight", "weightedScore", "reasoning"]
                        }
                    },
                    "strengths": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "3-4 key investment strengths"
                    },
                    "risks": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "3-4 key risks or red flags"
                    },
                    "explanation": {
                        "type": "string",
                        "description": "Plain-language summary of the analysis"
                    },
                    "listingData": {
                        "type": "object",
                        "properties": {
                            "address": { "type": "string" },
                            "listingPrice": { "type": "number" },
                            "propertyType": { "type": "string" },
                            "squareFootage": { "type": "number" },
                            "hoaFees": { "type": "number" },
                            "propertyTaxEstimate": { "type": "number" },
                            "greatSchoolsRating": { "type": "number", "nullable": true },
                            "yearBuilt": { "type": "number", "nullable": true },
                            "lotSize": { "type": "string", "nullable": true }
                        },
                        "required": ["address", "listingPrice", "propertyType", "squareFootage", "hoaFees", "propertyTaxEstimate"]
                    },
                    "safetyData": {
                        "type": "object",
                        "properties": {
                            "incidentCount": { "type": "number" },
                            "crimeTypes": { "type": "array", "items": { "type": "string" } },
                            "recency": { "type": "string" },
                            "classification": { "type": "string", "enum": ["Safe", "Moderately Safe", "High Risk"] }
                        },
                        "required": ["incidentCount", "crimeTypes", "recency", "classification"]
                    },
                    "demographicsData": {
                        "type": "object",
                        "properties": {
                            "medianHouseholdIncome": { "type": "number" },
                            "populationDensity": { "type": "number" },
                            "homeownershipRatio": { "type": "number" },
                            "medianHomeValue": { "type": "number" },
                            "employmentRate": { "type": "number" }
                        },
                        "required": ["medianHouseholdIncome", "populationDensity", "homeownershipRatio", "medianHomeValue", "employmentRate"]
                    }
                },
                "required": ["overallScore", "verdict", "categoryScores", "strengths", "risks", "explanation", "listingData", "safetyData", "demographicsData"]
            }
        }
    })
}
