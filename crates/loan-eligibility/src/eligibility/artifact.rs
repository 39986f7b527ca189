use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{error, info};

use super::model::{Classifier, ModelArtifact, PipelineArtifact, TabularPreprocessor};

/// Where the trained artifacts live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    /// One file bundling the preprocessor with the classifier.
    Pipeline { path: PathBuf },
    /// Separate classifier and preprocessor files.
    Split {
        model: PathBuf,
        preprocessor: PathBuf,
    },
}

impl ArtifactSource {
    pub fn paths(&self) -> Vec<&Path> {
        match self {
            ArtifactSource::Pipeline { path } => vec![path.as_path()],
            ArtifactSource::Split {
                model,
                preprocessor,
            } => vec![model.as_path(), preprocessor.as_path()],
        }
    }
}

/// Load failures. Either kind leaves the model unavailable until restart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArtifactError {
    #[error("model artifact not found: {}", path.display())]
    Missing { path: PathBuf },
    #[error("model artifact {} could not be loaded: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
}

pub struct ArtifactLoader;

impl ArtifactLoader {
    pub fn load(source: &ArtifactSource) -> Result<Arc<dyn ModelArtifact>, ArtifactError> {
        let (artifact, origin) = match source {
            ArtifactSource::Pipeline { path } => {
                let artifact: PipelineArtifact = read_json(path)?;
                (artifact, path)
            }
            ArtifactSource::Split {
                model,
                preprocessor,
            } => {
                let classifier: Classifier = read_json(model)?;
                let preprocessor_artifact: TabularPreprocessor = read_json(preprocessor)?;
                preprocessor_artifact
                    .check()
                    .and_then(|()| preprocessor_artifact.check_schema())
                    .map_err(|reason| ArtifactError::Corrupt {
                        path: preprocessor.clone(),
                        reason,
                    })?;
                (PipelineArtifact::new(preprocessor_artifact, classifier), model)
            }
        };

        artifact.check().map_err(|reason| ArtifactError::Corrupt {
            path: origin.clone(),
            reason,
        })?;

        info!(
            artifact = %origin.display(),
            classes = ?artifact.classifier.classes(),
            features = artifact.classifier.n_features(),
            "model artifact loaded"
        );
        Ok(Arc::new(artifact))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => ArtifactError::Missing {
            path: path.to_path_buf(),
        },
        _ => ArtifactError::Corrupt {
            path: path.to_path_buf(),
            reason: err.to_string(),
        },
    })?;

    serde_json::from_slice(&bytes).map_err(|err| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Load-once result held by the service for the life of the process.
#[derive(Clone)]
pub enum ModelAvailability {
    Ready(Arc<dyn ModelArtifact>),
    Unavailable(ArtifactError),
}

impl ModelAvailability {
    /// Attempt the load, logging and retaining any failure instead of propagating it.
    pub fn load(source: &ArtifactSource) -> Self {
        match ArtifactLoader::load(source) {
            Ok(model) => Self::Ready(model),
            Err(err) => {
                error!(error = %err, "model artifact unavailable; predictions disabled");
                Self::Unavailable(err)
            }
        }
    }

    pub fn ready(model: Arc<dyn ModelArtifact>) -> Self {
        Self::Ready(model)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl std::fmt::Debug for ModelAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(_) => f.write_str("Ready(..)"),
            Self::Unavailable(err) => f.debug_tuple("Unavailable").field(err).finish(),
        }
    }
}
