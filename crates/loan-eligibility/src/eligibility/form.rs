use serde::Serialize;
use serde_json::{json, Value};

use super::domain::{
    ApplicantRecord, ApplicantSubmission, EmploymentStatus, LoanPurpose, LoanTerm,
};

pub const AGE_RANGE: (i64, i64) = (18, 100);
pub const INCOME_RANGE: (f64, f64) = (0.0, 100_000.0);
pub const LOAN_AMOUNT_RANGE: (f64, f64) = (1_000.0, 50_000.0);
pub const CREDIT_SCORE_RANGE: (i64, i64) = (300, 850);
pub const DELINQUENCIES_RANGE: (i64, i64) = (0, 20);

pub const DEFAULT_AGE: i64 = 30;
pub const DEFAULT_INCOME: f64 = 5_000.0;
pub const DEFAULT_LOAN_AMOUNT: f64 = 10_000.0;
pub const DEFAULT_EMPLOYMENT_STATUS: EmploymentStatus = EmploymentStatus::Employed;
pub const DEFAULT_CREDIT_SCORE: i64 = 700;
pub const DEFAULT_LOAN_TERM: LoanTerm = LoanTerm::TwelveMonths;
pub const DEFAULT_LOAN_PURPOSE: LoanPurpose = LoanPurpose::DebtConsolidation;
pub const DEFAULT_DELINQUENCIES: i64 = 0;

/// Input control description for one applicant field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Integer { min: i64, max: i64 },
    Float { min: f64, max: f64, step: f64 },
    Choice { options: Vec<Value> },
}

/// One entry of the applicant form contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub column: &'static str,
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub default: Value,
}

/// Form contract in column order.
pub fn applicant_form() -> Vec<FormField> {
    vec![
        FormField {
            column: "Age",
            key: "age",
            label: "Age",
            kind: FieldKind::Integer {
                min: AGE_RANGE.0,
                max: AGE_RANGE.1,
            },
            default: json!(DEFAULT_AGE),
        },
        FormField {
            column: "StatedMonthlyIncome",
            key: "stated_monthly_income",
            label: "Stated Monthly Income (USD)",
            kind: FieldKind::Float {
                min: INCOME_RANGE.0,
                max: INCOME_RANGE.1,
                step: 100.0,
            },
            default: json!(DEFAULT_INCOME),
        },
        FormField {
            column: "LoanAmount",
            key: "loan_amount",
            label: "Loan Amount (USD)",
            kind: FieldKind::Float {
                min: LOAN_AMOUNT_RANGE.0,
                max: LOAN_AMOUNT_RANGE.1,
                step: 500.0,
            },
            default: json!(DEFAULT_LOAN_AMOUNT),
        },
        FormField {
            column: "EmploymentStatus",
            key: "employment_status",
            label: "Employment Status",
            kind: FieldKind::Choice {
                options: EmploymentStatus::ordered()
                    .into_iter()
                    .map(|status| json!(status.label()))
                    .collect(),
            },
            default: json!(DEFAULT_EMPLOYMENT_STATUS.label()),
        },
        FormField {
            column: "CreditScore",
            key: "credit_score",
            label: "Credit Score",
            kind: FieldKind::Integer {
                min: CREDIT_SCORE_RANGE.0,
                max: CREDIT_SCORE_RANGE.1,
            },
            default: json!(DEFAULT_CREDIT_SCORE),
        },
        FormField {
            column: "LoanTerm",
            key: "loan_term",
            label: "Loan Term (months)",
            kind: FieldKind::Choice {
                options: LoanTerm::ordered()
                    .into_iter()
                    .map(|term| json!(term.months()))
                    .collect(),
            },
            default: json!(DEFAULT_LOAN_TERM.months()),
        },
        FormField {
            column: "LoanPurpose",
            key: "loan_purpose",
            label: "Loan Purpose",
            kind: FieldKind::Choice {
                options: LoanPurpose::ordered()
                    .into_iter()
                    .map(|purpose| json!(purpose.label()))
                    .collect(),
            },
            default: json!(DEFAULT_LOAN_PURPOSE.label()),
        },
        FormField {
            column: "Delinquencies",
            key: "delinquencies",
            label: "Number of Delinquencies in Last 2 Years",
            kind: FieldKind::Integer {
                min: DELINQUENCIES_RANGE.0,
                max: DELINQUENCIES_RANGE.1,
            },
            default: json!(DEFAULT_DELINQUENCIES),
        },
    ]
}

impl ApplicantSubmission {
    /// Submission prefilled with every form default.
    pub fn with_defaults() -> Self {
        Self {
            age: Some(DEFAULT_AGE as f64),
            stated_monthly_income: Some(DEFAULT_INCOME),
            loan_amount: Some(DEFAULT_LOAN_AMOUNT),
            employment_status: Some(DEFAULT_EMPLOYMENT_STATUS.label().to_string()),
            credit_score: Some(DEFAULT_CREDIT_SCORE as f64),
            loan_term: Some(f64::from(DEFAULT_LOAN_TERM.months())),
            loan_purpose: Some(DEFAULT_LOAN_PURPOSE.label().to_string()),
            delinquencies: Some(DEFAULT_DELINQUENCIES as f64),
        }
    }
}

/// Rejections raised before a submission reaches feature assembly.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} must be between {min} and {max} (found {found})")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        found: f64,
    },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be a whole number (found {found})")]
    NotWhole { field: &'static str, found: f64 },
    #[error("{field} must be one of {options} (found '{found}')")]
    InvalidOption {
        field: &'static str,
        options: String,
        found: String,
    },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::NotFinite { field }
            | ValidationError::NotWhole { field, .. }
            | ValidationError::InvalidOption { field, .. } => field,
        }
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Missing { field })
}

fn whole(value: f64, field: &'static str) -> Result<i64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value.fract() != 0.0 {
        return Err(ValidationError::NotWhole { field, found: value });
    }
    Ok(value as i64)
}

fn integer_in(
    value: Option<f64>,
    field: &'static str,
    (min, max): (i64, i64),
) -> Result<i64, ValidationError> {
    let value = required(value, field)?;
    let whole_value = whole(value, field)?;
    if (min..=max).contains(&whole_value) {
        Ok(whole_value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: min as f64,
            max: max as f64,
            found: value,
        })
    }
}

fn float_in(
    value: Option<f64>,
    field: &'static str,
    (min, max): (f64, f64),
) -> Result<f64, ValidationError> {
    let value = required(value, field)?;
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            found: value,
        })
    }
}

fn option_list<I>(labels: I) -> String
where
    I: IntoIterator<Item = String>,
{
    labels.into_iter().collect::<Vec<_>>().join(", ")
}

impl TryFrom<ApplicantSubmission> for ApplicantRecord {
    type Error = ValidationError;

    fn try_from(submission: ApplicantSubmission) -> Result<Self, Self::Error> {
        let age = integer_in(submission.age, "Age", AGE_RANGE)?;
        let income = float_in(
            submission.stated_monthly_income,
            "StatedMonthlyIncome",
            INCOME_RANGE,
        )?;
        let loan_amount = float_in(submission.loan_amount, "LoanAmount", LOAN_AMOUNT_RANGE)?;

        let raw_status = required(submission.employment_status, "EmploymentStatus")?;
        let employment_status = raw_status.parse::<EmploymentStatus>().map_err(|_| {
            ValidationError::InvalidOption {
                field: "EmploymentStatus",
                options: option_list(
                    EmploymentStatus::ordered()
                        .into_iter()
                        .map(|status| status.label().to_string()),
                ),
                found: raw_status.clone(),
            }
        })?;

        let credit_score = integer_in(submission.credit_score, "CreditScore", CREDIT_SCORE_RANGE)?;

        let raw_term = whole(required(submission.loan_term, "LoanTerm")?, "LoanTerm")?;
        let loan_term =
            LoanTerm::from_months(raw_term).ok_or_else(|| ValidationError::InvalidOption {
                field: "LoanTerm",
                options: option_list(
                    LoanTerm::ordered()
                        .into_iter()
                        .map(|term| term.months().to_string()),
                ),
                found: raw_term.to_string(),
            })?;

        let raw_purpose = required(submission.loan_purpose, "LoanPurpose")?;
        let loan_purpose =
            raw_purpose
                .parse::<LoanPurpose>()
                .map_err(|_| ValidationError::InvalidOption {
                    field: "LoanPurpose",
                    options: option_list(
                        LoanPurpose::ordered()
                            .into_iter()
                            .map(|purpose| purpose.label().to_string()),
                    ),
                    found: raw_purpose.clone(),
                })?;

        let delinquencies =
            integer_in(submission.delinquencies, "Delinquencies", DELINQUENCIES_RANGE)?;

        // Ranges above guarantee the narrowing casts are lossless.
        Ok(ApplicantRecord::new(
            age as u8,
            income,
            loan_amount,
            employment_status,
            credit_score as u16,
            loan_term,
            loan_purpose,
            delinquencies as u8,
        ))
    }
}
