//! Loan eligibility screening: applicant form contract, feature assembly,
//! model inference, and verdict rendering.

pub mod config;
pub mod eligibility;
pub mod error;
pub mod telemetry;
