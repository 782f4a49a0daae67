/// Scoring model abstraction
///
/// The recommendation pipeline treats the learned model as an opaque function
/// from a feature vector to a relevance score. Implementations live behind the
/// `ScoringModel` trait so the pipeline can be driven by the registered MLflow
/// model in production and by fakes in tests.
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::{
    config::ModelSettings,
    error::{AppError, AppResult},
    models::FeatureVector,
};

pub mod mlflow;

pub use mlflow::MlflowModel;

/// Failure of a single model invocation
#[derive(thiserror::Error, Debug)]
pub enum ScoringError {
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("model returned a non-finite score: {0}")]
    NonFinite(f64),
}

/// Trait for relevance models
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ScoringModel: Send + Sync {
    /// Scores one feature vector
    async fn predict(&self, features: &FeatureVector) -> Result<f64, ScoringError>;

    /// Model name for logging and debugging
    fn name(&self) -> &'static str;
}

enum ModelSource {
    Registry(ModelSettings),
    Unconfigured(String),
    Injected,
}

/// Process-wide handle to the scoring model.
///
/// Registry-backed handles load on first use. Concurrent first requests wait
/// on a single load; once set the model is never replaced. A failed load
/// leaves the handle empty so a later request can try again.
pub struct ModelHandle {
    model: OnceCell<Arc<dyn ScoringModel>>,
    source: ModelSource,
}

impl ModelHandle {
    /// Wraps an already-built model
    pub fn ready(model: Arc<dyn ScoringModel>) -> Self {
        Self {
            model: OnceCell::new_with(Some(model)),
            source: ModelSource::Injected,
        }
    }

    /// Defers loading until the first request needs the model
    pub fn lazy(settings: ModelSettings) -> Self {
        Self {
            model: OnceCell::new(),
            source: ModelSource::Registry(settings),
        }
    }

    /// A handle that can never load; `get` reports `reason`
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            model: OnceCell::new(),
            source: ModelSource::Unconfigured(reason.into()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    /// Returns the model, loading it if this is the first use
    pub async fn get(&self) -> AppResult<Arc<dyn ScoringModel>> {
        let model = self
            .model
            .get_or_try_init(|| async {
                match &self.source {
                    ModelSource::Registry(settings) => {
                        let model = MlflowModel::load(settings).await?;
                        Ok::<_, AppError>(Arc::new(model) as Arc<dyn ScoringModel>)
                    }
                    ModelSource::Unconfigured(reason) => {
                        Err(AppError::ModelUnavailable(reason.clone()))
                    }
                    ModelSource::Injected => Err(AppError::Internal(
                        "Injected model handle is empty".to_string(),
                    )),
                }
            })
            .await?;

        Ok(Arc::clone(model))
    }
}
