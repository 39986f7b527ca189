use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Current employment situation declared on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentStatus {
    Employed,
    #[serde(rename = "Self-employed")]
    SelfEmployed,
    Unemployed,
}

impl EmploymentStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Employed, Self::SelfEmployed, Self::Unemployed]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Employed => "Employed",
            Self::SelfEmployed => "Self-employed",
            Self::Unemployed => "Unemployed",
        }
    }
}

/// Declared use of the loan proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanPurpose {
    #[serde(rename = "Debt Consolidation")]
    DebtConsolidation,
    #[serde(rename = "Home Improvement")]
    HomeImprovement,
    Business,
    Education,
    Other,
}

impl LoanPurpose {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::DebtConsolidation,
            Self::HomeImprovement,
            Self::Business,
            Self::Education,
            Self::Other,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DebtConsolidation => "Debt Consolidation",
            Self::HomeImprovement => "Home Improvement",
            Self::Business => "Business",
            Self::Education => "Education",
            Self::Other => "Other",
        }
    }
}

/// Repayment term offered on the form, in months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u16")]
pub enum LoanTerm {
    TwelveMonths,
    ThirtySixMonths,
    SixtyMonths,
}

impl LoanTerm {
    pub const fn ordered() -> [Self; 3] {
        [Self::TwelveMonths, Self::ThirtySixMonths, Self::SixtyMonths]
    }

    pub const fn months(self) -> u16 {
        match self {
            Self::TwelveMonths => 12,
            Self::ThirtySixMonths => 36,
            Self::SixtyMonths => 60,
        }
    }

    pub fn from_months(months: i64) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|term| i64::from(term.months()) == months)
    }
}

impl From<LoanTerm> for u16 {
    fn from(value: LoanTerm) -> Self {
        value.months()
    }
}

/// Raised when a choice field carries a value outside its option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOption(pub String);

impl fmt::Display for UnknownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown option '{}'", self.0)
    }
}

impl std::error::Error for UnknownOption {}

fn match_label<T: Copy>(raw: &str, options: &[T], label: fn(T) -> &'static str) -> Option<T> {
    let trimmed = raw.trim();
    options
        .iter()
        .copied()
        .find(|option| label(*option).eq_ignore_ascii_case(trimmed))
}

impl FromStr for EmploymentStatus {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match_label(s, &Self::ordered(), Self::label).ok_or_else(|| UnknownOption(s.to_string()))
    }
}

impl FromStr for LoanPurpose {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match_label(s, &Self::ordered(), Self::label).ok_or_else(|| UnknownOption(s.to_string()))
    }
}

/// Raw form payload as submitted. Every field is optional so that omissions surface
/// as validation errors naming the field rather than as opaque decode failures.
/// Integer fields decode as plain numbers; whole-number checks happen in validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicantSubmission {
    #[serde(alias = "Age")]
    pub age: Option<f64>,
    #[serde(alias = "StatedMonthlyIncome")]
    pub stated_monthly_income: Option<f64>,
    #[serde(alias = "LoanAmount")]
    pub loan_amount: Option<f64>,
    #[serde(alias = "EmploymentStatus")]
    pub employment_status: Option<String>,
    #[serde(alias = "CreditScore")]
    pub credit_score: Option<f64>,
    #[serde(alias = "LoanTerm")]
    pub loan_term: Option<f64>,
    #[serde(alias = "LoanPurpose")]
    pub loan_purpose: Option<String>,
    #[serde(alias = "Delinquencies")]
    pub delinquencies: Option<f64>,
}

/// Validated applicant snapshot. Fields are private so a record can only be produced
/// by the form validator and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplicantRecord {
    age: u8,
    stated_monthly_income: f64,
    loan_amount: f64,
    employment_status: EmploymentStatus,
    credit_score: u16,
    loan_term: LoanTerm,
    loan_purpose: LoanPurpose,
    delinquencies: u8,
}

impl ApplicantRecord {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        age: u8,
        stated_monthly_income: f64,
        loan_amount: f64,
        employment_status: EmploymentStatus,
        credit_score: u16,
        loan_term: LoanTerm,
        loan_purpose: LoanPurpose,
        delinquencies: u8,
    ) -> Self {
        Self {
            age,
            stated_monthly_income,
            loan_amount,
            employment_status,
            credit_score,
            loan_term,
            loan_purpose,
            delinquencies,
        }
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn stated_monthly_income(&self) -> f64 {
        self.stated_monthly_income
    }

    pub fn loan_amount(&self) -> f64 {
        self.loan_amount
    }

    pub fn employment_status(&self) -> EmploymentStatus {
        self.employment_status
    }

    pub fn credit_score(&self) -> u16 {
        self.credit_score
    }

    pub fn loan_term(&self) -> LoanTerm {
        self.loan_term
    }

    pub fn loan_purpose(&self) -> LoanPurpose {
        self.loan_purpose
    }

    pub fn delinquencies(&self) -> u8 {
        self.delinquencies
    }
}
