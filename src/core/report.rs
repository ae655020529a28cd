use crate::domain::model::{InvestmentAnalysis, LineItemKey, MonthlyPayment};
use crate::utils::error::{Result, ScoreError};
use std::fmt::Write as _;

/// Rendered forms of one analysis, ready to be written by a `ReportSink`.
#[derive(Debug, Clone)]
pub struct ReportBundle {
    pub text: String,
    pub json: String,
    pub scores_csv: String,
}

pub fn render_bundle(analysis: &InvestmentAnalysis) -> Result<ReportBundle> {
    Ok(ReportBundle {
        text: render_text(analysis),
        json: serde_json::to_string_pretty(analysis)?,
        scores_csv: render_scores_csv(analysis)?,
    })
}

/// Whole-dollar USD with thousands separators, e.g. `$1,996`.
pub fn format_usd(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = amount.abs().round() as u64;
    let digits = rounded.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

fn render_text(analysis: &InvestmentAnalysis) -> String {
    let mut out = String::new();
    let generated_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    let _ = writeln!(out, "Investment Analysis");
    let _ = writeln!(out, "Generated: {}", generated_at);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Overall Score: {:.0}% - {}",
        analysis.overall_score,
        analysis.verdict.as_str()
    );
    let _ = writeln!(out);

    let listing = &analysis.listing_data;
    let _ = writeln!(out, "Property Details");
    let _ = writeln!(out, "  Address:        {}", listing.address);
    let _ = writeln!(
        out,
        "  Listing Price:  {}",
        format_usd(listing.listing_price)
    );
    let _ = writeln!(out, "  Type:           {}", listing.property_type);
    let _ = writeln!(out, "  Square Footage: {:.0}", listing.square_footage);
    if let Some(year) = listing.year_built {
        let _ = writeln!(out, "  Year Built:     {}", year);
    }
    if let Some(rating) = listing.great_schools_rating {
        let _ = writeln!(out, "  Schools Rating: {:.0}/10", rating);
    }
    if let Some(lot) = &listing.lot_size {
        let _ = writeln!(out, "  Lot Size:       {}", lot);
    }
    let _ = writeln!(out);

    if let Some(safety) = &analysis.safety_data {
        let _ = writeln!(out, "Neighborhood Safety");
        let _ = writeln!(
            out,
            "  Classification: {} ({:.0} incidents, {})",
            safety.classification.as_str(),
            safety.incident_count,
            safety.recency
        );
        if !safety.crime_types.is_empty() {
            let _ = writeln!(out, "  Crime Types:    {}", safety.crime_types.join(", "));
        }
        let _ = writeln!(out);
    }

    if let Some(demo) = &analysis.demographics_data {
        let _ = writeln!(out, "Demographics");
        let _ = writeln!(
            out,
            "  Median Income:  {}",
            format_usd(demo.median_household_income)
        );
        let _ = writeln!(
            out,
            "  Median Home:    {}",
            format_usd(demo.median_home_value)
        );
        let _ = writeln!(
            out,
            "  Homeownership:  {:.1}%",
            demo.homeownership_ratio * 100.0
        );
        let _ = writeln!(out, "  Employment:     {:.1}%", demo.employment_rate * 100.0);
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Score Breakdown");
    for category in &analysis.category_scores {
        let _ = writeln!(
            out,
            "  {:<15} {:>4.1}/10 (weight {:.0}%) -> {:.1}",
            category.name,
            category.score,
            category.weight * 100.0,
            category.weighted_score
        );
        let _ = writeln!(out, "    {}", category.reasoning);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Key Strengths");
    for strength in &analysis.strengths {
        let _ = writeln!(out, "  + {}", strength);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Key Risks");
    for risk in &analysis.risks {
        let _ = writeln!(out, "  - {}", risk);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Analysis Summary");
    let _ = writeln!(out, "  {}", analysis.explanation);
    let _ = writeln!(out);

    let _ = writeln!(out, "Monthly Payment Breakdown");
    render_payment_lines(&mut out, &analysis.monthly_payment);

    out
}

fn render_payment_lines(out: &mut String, payment: &MonthlyPayment) {
    for key in LineItemKey::ALL {
        let _ = writeln!(
            out,
            "  {:<21} {}",
            key.label(),
            format_usd(payment.get(key))
        );
    }
    let _ = writeln!(out, "  {:<21} {}", "Total", format_usd(payment.total));
}

fn render_scores_csv(analysis: &InvestmentAnalysis) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["category", "score", "weight", "weighted_score", "reasoning"])?;
    for category in &analysis.category_scores {
        let score = category.score.to_string();
        let weight = category.weight.to_string();
        let weighted = category.weighted_score.to_string();
        writer.write_record([
            category.name.as_str(),
            score.as_str(),
            weight.as_str(),
            weighted.as_str(),
            category.reasoning.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ScoreError::ReportError {
            message: e.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|e| ScoreError::ReportError {
        message: e.to_string(),
    })
}
