//! End-to-end scenarios driving artifact loading from disk, the service facade, and the
//! HTTP router through the public API only.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use loan_eligibility::eligibility::{
    eligibility_router, ApplicantSubmission, ArtifactError, ArtifactLoader, ArtifactSource,
    EligibilityError, EligibilityService, ModelAvailability, Verdict, FEATURE_COLUMNS,
};

const FEATURES: usize = 16;
const CREDIT_INDEX: usize = 6;
const DELINQUENCY_INDEX: usize = 15;

fn preprocessor_json() -> Value {
    json!({
        "input_columns": FEATURE_COLUMNS,
        "transforms": [
            { "kind": "standard_scale", "column": "Age", "mean": 40.0, "scale": 12.0 },
            { "kind": "standard_scale", "column": "StatedMonthlyIncome", "mean": 6000.0, "scale": 3000.0 },
            { "kind": "standard_scale", "column": "LoanAmount", "mean": 15000.0, "scale": 9000.0 },
            { "kind": "one_hot", "column": "EmploymentStatus", "categories": ["Employed", "Self-employed", "Unemployed"] },
            { "kind": "standard_scale", "column": "CreditScore", "mean": 680.0, "scale": 60.0 },
            { "kind": "one_hot", "column": "LoanTerm", "categories": ["12", "36", "60"] },
            { "kind": "one_hot", "column": "LoanPurpose", "categories": ["Business", "Debt Consolidation", "Education", "Home Improvement", "Other"] },
            { "kind": "standard_scale", "column": "Delinquencies", "mean": 2.0, "scale": 3.0 }
        ]
    })
}

/// Naive Bayes whose classes differ only in credit score and delinquency means.
fn classifier_json() -> Value {
    let class_means = |credit: f64, delinquency: f64| {
        let mut theta = vec![0.0; FEATURES];
        theta[CREDIT_INDEX] = credit;
        theta[DELINQUENCY_INDEX] = delinquency;
        theta
    };
    json!({
        "kind": "gaussian_nb",
        "classes": [0, 1],
        "class_prior": [0.5, 0.5],
        "theta": [class_means(-1.0, 0.5), class_means(1.0, -0.5)],
        "var": [vec![1.0; FEATURES], vec![1.0; FEATURES]]
    })
}

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec_pretty(value).expect("serialize artifact"))
        .expect("write artifact");
    path
}

fn pipeline_source(dir: &Path) -> ArtifactSource {
    let pipeline = json!({
        "preprocessor": preprocessor_json(),
        "classifier": classifier_json(),
    });
    ArtifactSource::Pipeline {
        path: write_json(dir, "model_pipeline.json", &pipeline),
    }
}

fn split_source(dir: &Path) -> ArtifactSource {
    ArtifactSource::Split {
        model: write_json(dir, "model.json", &classifier_json()),
        preprocessor: write_json(dir, "preprocessor.json", &preprocessor_json()),
    }
}

fn submission() -> ApplicantSubmission {
    ApplicantSubmission {
        loan_term: Some(36.0),
        ..ApplicantSubmission::with_defaults()
    }
}

fn boundary_submission() -> ApplicantSubmission {
    ApplicantSubmission {
        age: Some(18.0),
        credit_score: Some(300.0),
        delinquencies: Some(20.0),
        loan_amount: Some(50000.0),
        ..submission()
    }
}

async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[test]
fn missing_artifact_reports_missing_and_blocks_verdicts() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("model_pipeline.json");

    let availability = ModelAvailability::load(&ArtifactSource::Pipeline { path: path.clone() });
    assert!(!availability.is_ready());

    let service = EligibilityService::new(availability);
    assert_eq!(service.load_error(), Some(&ArtifactError::Missing { path }));

    let err = service
        .evaluate(submission())
        .expect_err("no verdict without a model");
    assert!(matches!(err, EligibilityError::ModelUnavailable { .. }));
}

#[test]
fn unparseable_artifact_reports_corrupt() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("model_pipeline.json");
    fs::write(&path, b"\x80\x04\x95pickle-bytes").expect("write garbage");

    let err = ArtifactLoader::load(&ArtifactSource::Pipeline { path: path.clone() })
        .err()
        .expect("garbage does not deserialize");

    match err {
        ArtifactError::Corrupt { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn width_mismatch_between_preprocessor_and_classifier_is_corrupt() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut classifier = classifier_json();
    classifier["theta"] = json!([[0.0, 1.0], [1.0, 0.0]]);
    classifier["var"] = json!([[1.0, 1.0], [1.0, 1.0]]);

    let source = ArtifactSource::Split {
        model: write_json(dir.path(), "model.json", &classifier),
        preprocessor: write_json(dir.path(), "preprocessor.json", &preprocessor_json()),
    };

    let err = ArtifactLoader::load(&source)
        .err()
        .expect("widths disagree");
    assert!(err.to_string().contains("16 features"));
}

#[test]
fn preprocessor_with_foreign_columns_is_rejected_at_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut preprocessor = preprocessor_json();
    let mut columns: Vec<Value> = FEATURE_COLUMNS.iter().map(|column| json!(column)).collect();
    columns.push(json!("Region"));
    preprocessor["input_columns"] = Value::Array(columns);

    let preprocessor_path = write_json(dir.path(), "preprocessor.json", &preprocessor);
    let split = ArtifactSource::Split {
        model: write_json(dir.path(), "model.json", &classifier_json()),
        preprocessor: preprocessor_path.clone(),
    };
    match ArtifactLoader::load(&split).err().expect("schema is not the applicant form") {
        ArtifactError::Corrupt { path, reason } => {
            assert_eq!(path, preprocessor_path);
            assert!(reason.contains("Region"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let pipeline = ArtifactSource::Pipeline {
        path: write_json(
            dir.path(),
            "model_pipeline.json",
            &json!({ "preprocessor": preprocessor, "classifier": classifier_json() }),
        ),
    };
    let service = EligibilityService::new(ModelAvailability::load(&pipeline));
    assert_eq!(service.model_status().status, "unavailable");
}

#[test]
fn split_layout_reports_missing_preprocessor() {
    let dir = tempfile::tempdir().expect("temp dir");
    let preprocessor = dir.path().join("preprocessor.json");
    let source = ArtifactSource::Split {
        model: write_json(dir.path(), "model.json", &classifier_json()),
        preprocessor: preprocessor.clone(),
    };

    let err = ArtifactLoader::load(&source)
        .err()
        .expect("preprocessor is absent");
    assert_eq!(err, ArtifactError::Missing { path: preprocessor });
}

#[test]
fn pipeline_artifact_scores_reference_applicant_as_eligible() {
    let dir = tempfile::tempdir().expect("temp dir");
    let service = EligibilityService::new(ModelAvailability::load(&pipeline_source(dir.path())));

    let report = service.evaluate(submission()).expect("submission renders");

    assert_eq!(report.verdict, Verdict::Eligible);
    assert!(report.confidence > 0.5 && report.confidence <= 1.0);
    assert!((report.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    assert!(report.confidence_display.ends_with('%'));
}

#[test]
fn split_and_pipeline_layouts_agree() {
    let dir = tempfile::tempdir().expect("temp dir");
    let pipeline = EligibilityService::new(ModelAvailability::load(&pipeline_source(dir.path())));
    let split = EligibilityService::new(ModelAvailability::load(&split_source(dir.path())));

    for candidate in [submission(), boundary_submission()] {
        let a = pipeline.evaluate(candidate.clone()).expect("pipeline renders");
        let b = split.evaluate(candidate).expect("split renders");
        assert_eq!(a.label, b.label);
        assert_eq!(a.confidence, b.confidence);
    }
}

#[tokio::test]
async fn boundary_applicant_is_high_risk_over_http() {
    let dir = tempfile::tempdir().expect("temp dir");
    let availability = ModelAvailability::load(&pipeline_source(dir.path()));
    let router = eligibility_router(Arc::new(EligibilityService::new(availability)));

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/loan/eligibility")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&boundary_submission()).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["verdict"], json!("high_credit_risk"));
    assert_eq!(payload["headline"], json!("High Credit Risk"));
    assert_eq!(payload["summary"][2]["value"], json!("$50,000.00"));
}

#[tokio::test]
async fn form_still_renders_when_artifact_is_missing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let availability = ModelAvailability::load(&ArtifactSource::Pipeline {
        path: dir.path().join("absent.json"),
    });
    let router = eligibility_router(Arc::new(EligibilityService::new(availability)));

    let response = router
        .clone()
        .oneshot(
            axum::http::Request::get("/api/v1/loan/form")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("form route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/loan/eligibility")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&submission()).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("submit route executes");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
