use crate::cli::ArtifactArgs;
use clap::Args;
use loan_eligibility::config::AppConfig;
use loan_eligibility::eligibility::form::{
    DEFAULT_AGE, DEFAULT_CREDIT_SCORE, DEFAULT_DELINQUENCIES, DEFAULT_EMPLOYMENT_STATUS,
    DEFAULT_INCOME, DEFAULT_LOAN_AMOUNT, DEFAULT_LOAN_PURPOSE, DEFAULT_LOAN_TERM,
};
use loan_eligibility::eligibility::{
    applicant_form, render_text, ApplicantSubmission, EligibilityService, FieldKind,
    ModelAvailability,
};
use loan_eligibility::error::AppError;
use serde_json::Value;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Applicant age in years (18-100)
    #[arg(long, default_value_t = DEFAULT_AGE)]
    pub(crate) age: i64,
    /// Stated monthly income in USD (0-100000)
    #[arg(long, default_value_t = DEFAULT_INCOME)]
    pub(crate) monthly_income: f64,
    /// Requested loan amount in USD (1000-50000)
    #[arg(long, default_value_t = DEFAULT_LOAN_AMOUNT)]
    pub(crate) loan_amount: f64,
    /// Employment status: Employed, Self-employed or Unemployed
    #[arg(long, default_value = DEFAULT_EMPLOYMENT_STATUS.label())]
    pub(crate) employment_status: String,
    /// Credit score (300-850)
    #[arg(long, default_value_t = DEFAULT_CREDIT_SCORE)]
    pub(crate) credit_score: i64,
    /// Loan term in months: 12, 36 or 60
    #[arg(long, default_value_t = i64::from(DEFAULT_LOAN_TERM.months()))]
    pub(crate) loan_term: i64,
    /// Loan purpose, e.g. "Debt Consolidation"
    #[arg(long, default_value = DEFAULT_LOAN_PURPOSE.label())]
    pub(crate) loan_purpose: String,
    /// Delinquencies in the last two years (0-20)
    #[arg(long, default_value_t = DEFAULT_DELINQUENCIES)]
    pub(crate) delinquencies: i64,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

impl PredictArgs {
    pub(crate) fn submission(&self) -> ApplicantSubmission {
        ApplicantSubmission {
            age: Some(self.age as f64),
            stated_monthly_income: Some(self.monthly_income),
            loan_amount: Some(self.loan_amount),
            employment_status: Some(self.employment_status.clone()),
            credit_score: Some(self.credit_score as f64),
            loan_term: Some(self.loan_term as f64),
            loan_purpose: Some(self.loan_purpose.clone()),
            delinquencies: Some(self.delinquencies as f64),
        }
    }
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    args.artifacts.apply(&mut config.model);

    let service = EligibilityService::new(ModelAvailability::load(&config.model.source()));
    let report = service.evaluate(args.submission())?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

pub(crate) fn run_form() {
    println!("Applicant Information");
    for field in applicant_form() {
        let domain = match &field.kind {
            FieldKind::Integer { min, max } => format!("integer {min}-{max}"),
            FieldKind::Float { min, max, step } => format!("number {min}-{max}, step {step}"),
            FieldKind::Choice { options } => {
                let options: Vec<String> = options.iter().map(display_value).collect();
                format!("one of {}", options.join(", "))
            }
        };
        println!(
            "- {} [--{}]: {} (default {})",
            field.label,
            cli_flag(field.key),
            domain,
            display_value(&field.default)
        );
    }
}

fn display_value(value: &Value) -> String {
    match value.as_str() {
        Some(text) => text.to_string(),
        None => value.to_string(),
    }
}

fn cli_flag(key: &str) -> String {
    match key {
        "stated_monthly_income" => "monthly-income".to_string(),
        other => other.replace('_', "-"),
    }
}
