use httpmock::prelude::*;
use propscore::core::session::{REPORT_JSON_FILE, REPORT_TEXT_FILE, SCORES_CSV_FILE};
use propscore::{
    AnalysisEngine, DownPayment, GatewayAnalysisProvider, GatewaySettings, LineItemKey, LoanTerms,
    PaymentModel, PropertyInput, ScoreError,
};
use tempfile::TempDir;

fn analysis_arguments() -> String {
    serde_json::json!({
        "overallScore": 82,
        "verdict": "Good Opportunity",
        "categoryScores": [
            {
                "name": "Deal Economics",
                "score": 8,
                "weight": 0.35,
                "weightedScore": 2.8,
                "reasoning": "Comfortable payment-to-income ratio"
            },
            {
                "name": "Location",
                "score": 9,
                "weight": 0.25,
                "weightedScore": 2.25,
                "reasoning": "Strong school district"
            }
        ],
        "strengths": ["Good schools", "Stable market"],
        "risks": ["Roof is 20 years old"],
        "explanation": "A well-priced family home.",
        "listingData": {
            "address": "77 Oak Ln, Austin, TX",
            "listingPrice": 500000,
            "propertyType": "Single-family",
            "squareFootage": 2200,
            "hoaFees": 0,
            "propertyTaxEstimate": 6000,
            "greatSchoolsRating": 9,
            "yearBuilt": 2004,
            "lotSize": "0.3 acres"
        },
        "safetyData": {
            "incidentCount": 8,
            "crimeTypes": ["theft"],
            "recency": "last 12 months",
            "classification": "Safe"
        },
        "demographicsData": {
            "medianHouseholdIncome": 91000,
            "populationDensity": 2800,
            "homeownershipRatio": 0.64,
            "medianHomeValue": 455000,
            "employmentRate": 0.96
        }
    })
    .to_string()
}

fn gateway_response() -> serde_json::Value {
    serde_json::json!({
        "choices": [{
            "message": {
                "tool_calls": [{
                    "function": {
                        "name": "investment_analysis",
                        "arguments": analysis_arguments()
                    }
                }]
            }
        }]
    })
}

fn sample_input() -> PropertyInput {
    PropertyInput {
        state: "Texas".to_string(),
        listing_url: "https://zillow.com/homedetails/77-oak-ln".to_string(),
        purchase_price: 500_000.0,
        yearly_income: 120_000.0,
        property_type: "Single-family".to_string(),
        bedrooms: 4.0,
        bathrooms: 2.5,
        down_payment_amount: 100_000.0,
        down_payment_percentage: 20.0,
    }
}

fn provider_for(server: &MockServer) -> GatewayAnalysisProvider {
    GatewayAnalysisProvider::new(GatewaySettings {
        endpoint: server.url("/v1/chat/completions"),
        api_key: "test-key".to_string(),
        model: "google/gemini-2.5-flash".to_string(),
        timeout_seconds: Some(5),
    })
}

#[tokio::test]
async fn end_to_end_analysis_writes_the_report_bundle() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let gateway_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer test-key");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(gateway_response());
    });

    // Build the payment breakdown the way the CLI does: defaults from the
    // loan terms, then raw-text edits.
    let terms = LoanTerms::new(500_000.0, DownPayment::Amount(100_000.0)).unwrap();
    let mut model = PaymentModel::new(&terms);
    model.set_line_item(LineItemKey::HoaFees, "50");
    model.set_line_item(LineItemKey::Utilities, "not-a-number"); // rejected
    let snapshot = model.snapshot();
    assert_eq!(snapshot.hoa_fees, 50.0);
    assert_eq!(snapshot.utilities, 200.0);

    let provider = provider_for(&server);
    let sink = propscore::LocalReportSink::new(output_path.clone());
    let engine = AnalysisEngine::new(provider, sink);

    let analysis = engine.run(&sample_input(), Some(&snapshot)).await.unwrap();

    gateway_mock.assert();
    assert_eq!(analysis.overall_score, 82.0);
    assert_eq!(analysis.monthly_payment, snapshot);

    // All three report files land under the output directory.
    let base = temp_dir.path();
    assert!(base.join(REPORT_TEXT_FILE).exists());
    assert!(base.join(REPORT_JSON_FILE).exists());
    assert!(base.join(SCORES_CSV_FILE).exists());

    let text = std::fs::read_to_string(base.join(REPORT_TEXT_FILE)).unwrap();
    assert!(text.contains("Overall Score: 82% - Good Opportunity"));
    assert!(text.contains("77 Oak Ln, Austin, TX"));
    assert!(text.contains("HOA Fees"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(base.join(REPORT_JSON_FILE)).unwrap())
            .unwrap();
    assert_eq!(json["verdict"], "Good Opportunity");
    assert_eq!(json["monthlyPayment"]["hoaFees"], 50.0);
    assert_eq!(json["monthlyPayment"]["utilities"], 200.0);

    let csv = std::fs::read_to_string(base.join(SCORES_CSV_FILE)).unwrap();
    assert!(csv.starts_with("category,score,weight,weighted_score,reasoning"));
    assert!(csv.contains("Deal Economics"));
    assert!(csv.contains("Location"));
}

#[tokio::test]
async fn rate_limited_gateway_aborts_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let gateway_mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(429);
    });

    let provider = provider_for(&server);
    let sink = propscore::LocalReportSink::new(output_path);
    let engine = AnalysisEngine::new(provider, sink);

    let err = engine.run(&sample_input(), None).await.unwrap_err();

    gateway_mock.assert();
    assert!(matches!(err, ScoreError::RateLimited));
    assert!(!temp_dir.path().join(REPORT_JSON_FILE).exists());
}

#[tokio::test]
async fn exhausted_credits_surface_the_gateway_wording() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(402);
    });

    let provider = provider_for(&server);
    let sink = propscore::LocalReportSink::new(temp_dir.path().to_str().unwrap().to_string());
    let engine = AnalysisEngine::new(provider, sink);

    let err = engine.run(&sample_input(), None).await.unwrap_err();
    assert_eq!(
        err.user_friendly_message(),
        "AI credits exhausted. Please add credits to continue."
    );
}

#[tokio::test]
async fn malformed_tool_call_is_rejected() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "choices": [{ "message": { "content": "no tool call here" } }]
            }));
    });

    let provider = provider_for(&server);
    let sink = propscore::LocalReportSink::new(temp_dir.path().to_str().unwrap().to_string());
    let engine = AnalysisEngine::new(provider, sink);

    let err = engine.run(&sample_input(), None).await.unwrap_err();
    assert!(matches!(err, ScoreError::InvalidResponse { .. }));
    assert!(!temp_dir.path().join(REPORT_TEXT_FILE).exists());
}
