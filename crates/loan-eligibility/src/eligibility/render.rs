use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::ApplicantRecord;
use super::inference::{InferenceError, Prediction};

/// Class label every artifact uses for an eligible applicant.
pub const ELIGIBLE_LABEL: i64 = 1;
pub const HIGH_RISK_LABEL: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Eligible,
    HighCreditRisk,
}

impl Verdict {
    pub fn from_label(label: i64) -> Result<Self, InferenceError> {
        match label {
            ELIGIBLE_LABEL => Ok(Self::Eligible),
            HIGH_RISK_LABEL => Ok(Self::HighCreditRisk),
            other => Err(InferenceError::UnknownLabel { label: other }),
        }
    }

    pub const fn headline(self) -> &'static str {
        match self {
            Self::Eligible => "Eligible for Loan",
            Self::HighCreditRisk => "High Credit Risk",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::Eligible => "Based on your inputs, you are likely to be approved for a loan.",
            Self::HighCreditRisk => {
                "Based on your inputs, you are considered a high credit risk for this loan."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub parameter: &'static str,
    pub value: String,
}

/// Rendered outcome for one submission.
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityReport {
    pub verdict: Verdict,
    pub headline: &'static str,
    pub message: &'static str,
    pub label: i64,
    pub confidence: f64,
    pub confidence_display: String,
    pub probabilities: Vec<f64>,
    pub summary: Vec<SummaryEntry>,
    pub evaluated_at: DateTime<Utc>,
}

impl EligibilityReport {
    pub fn build(
        record: &ApplicantRecord,
        prediction: Prediction,
        evaluated_at: DateTime<Utc>,
    ) -> Result<Self, InferenceError> {
        let verdict = Verdict::from_label(prediction.label)?;
        Ok(Self {
            verdict,
            headline: verdict.headline(),
            message: verdict.message(),
            label: prediction.label,
            confidence: prediction.confidence,
            confidence_display: format_percent(prediction.confidence),
            probabilities: prediction.probabilities,
            summary: summary_table(record),
            evaluated_at,
        })
    }
}

pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Non-negative US dollar amount with thousands separators, e.g. `$12,500.00`.
pub fn format_usd(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("${grouped}.{cents}")
}

pub fn summary_table(record: &ApplicantRecord) -> Vec<SummaryEntry> {
    let entry = |parameter: &'static str, value: String| SummaryEntry { parameter, value };
    vec![
        entry("Age", record.age().to_string()),
        entry(
            "Monthly Income (USD)",
            format_usd(record.stated_monthly_income()),
        ),
        entry("Loan Amount (USD)", format_usd(record.loan_amount())),
        entry(
            "Employment Status",
            record.employment_status().label().to_string(),
        ),
        entry("Credit Score", record.credit_score().to_string()),
        entry("Loan Term (months)", record.loan_term().months().to_string()),
        entry("Loan Purpose", record.loan_purpose().label().to_string()),
        entry("Delinquencies", record.delinquencies().to_string()),
    ]
}

/// Plain-text rendering used by the command line.
pub fn render_text(report: &EligibilityReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Prediction Result");
    let _ = writeln!(out, "{}", report.headline);
    let _ = writeln!(out, "Confidence Score: {}", report.confidence_display);
    let _ = writeln!(out, "{}", report.message);
    let _ = writeln!(out, "\nApplicant Information Summary");

    let width = report
        .summary
        .iter()
        .map(|entry| entry.parameter.len())
        .max()
        .unwrap_or(0);
    for entry in &report.summary {
        let _ = writeln!(out, "- {:<width$}  {}", entry.parameter, entry.value);
    }
    out
}
