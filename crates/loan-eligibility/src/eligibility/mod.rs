//! Applicant intake and eligibility scoring.
//!
//! A submission flows through a fixed pipeline: the raw form is validated into an
//! [`ApplicantRecord`], assembled into a [`FeatureRow`] matching the artifact's columns,
//! scored by a [`ModelArtifact`], and rendered into an [`EligibilityReport`].

pub mod artifact;
pub mod domain;
pub mod features;
pub mod form;
pub mod inference;
pub mod model;
pub mod render;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use artifact::{ArtifactError, ArtifactLoader, ArtifactSource, ModelAvailability};
pub use domain::{ApplicantRecord, ApplicantSubmission, EmploymentStatus, LoanPurpose, LoanTerm};
pub use features::{
    assemble, assemble_for, check_schema, FeatureError, FeatureRow, FeatureValue, FEATURE_COLUMNS,
};
pub use form::{applicant_form, FieldKind, FormField, ValidationError};
pub use inference::{invoke, InferenceError, Prediction};
pub use model::{
    Classifier, ColumnTransform, GaussianNb, LogisticRegression, ModelArtifact, ModelError,
    PipelineArtifact, TabularPreprocessor,
};
pub use render::{render_text, EligibilityReport, SummaryEntry, Verdict, ELIGIBLE_LABEL};
pub use router::eligibility_router;
pub use service::{EligibilityError, EligibilityService, ModelStatusView, SubmissionStage};
