/// MLflow-backed scoring model
///
/// Loading resolves the configured experiment and registered model version
/// through the MLflow tracking server's REST API and refuses versions that are
/// not `READY`. Scoring posts a single-row dataframe to the model server's
/// `/invocations` endpoint.
///
/// API Flow:
/// 1. Experiment: /api/2.0/mlflow/experiments/get-by-name
/// 2. Model version: /api/2.0/mlflow/model-versions/get → status must be READY
/// 3. Scoring: POST /invocations {"dataframe_records": [features]}
use std::time::Duration;

use reqwest::{Client as HttpClient, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

use crate::{
    config::ModelSettings,
    error::{AppError, AppResult},
    models::FeatureVector,
    services::model::{ScoringError, ScoringModel},
};

const READY_STATUS: &str = "READY";

#[derive(Debug, Deserialize)]
struct ExperimentResponse {
    experiment: Experiment,
}

#[derive(Debug, Deserialize)]
struct Experiment {
    experiment_id: String,
    #[serde(default)]
    lifecycle_stage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelVersionResponse {
    model_version: ModelVersion,
}

#[derive(Debug, Deserialize)]
struct ModelVersion {
    version: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    run_id: Option<String>,
}

/// Scoring server output: `{"predictions": [...]}` or a bare list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictionPayload {
    Wrapped { predictions: Vec<Prediction> },
    Bare(Vec<Prediction>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Prediction {
    Scalar(f64),
    Row(Vec<f64>),
}

impl PredictionPayload {
    fn first_score(&self) -> Option<f64> {
        let predictions = match self {
            PredictionPayload::Wrapped { predictions } => predictions,
            PredictionPayload::Bare(predictions) => predictions,
        };

        match predictions.first()? {
            Prediction::Scalar(score) => Some(*score),
            Prediction::Row(row) => row.first().copied(),
        }
    }
}

#[derive(Clone)]
pub struct MlflowModel {
    http_client: HttpClient,
    invocations_url: String,
    model_uri: String,
    credentials: Option<(String, String)>,
}

impl MlflowModel {
    /// Resolves the registered model and prepares a client for its server
    pub async fn load(settings: &ModelSettings) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        let model_uri = format!("models:/{}/{}", settings.model_name, settings.model_version);

        tracing::info!(
            model_uri = %model_uri,
            experiment = %settings.experiment_name,
            "Loading MLflow model"
        );

        let experiment: ExperimentResponse = Self::registry_get(
            &http_client,
            settings,
            "/api/2.0/mlflow/experiments/get-by-name",
            &[("experiment_name", settings.experiment_name.as_str())],
        )
        .await?;

        if experiment.experiment.lifecycle_stage.as_deref() == Some("deleted") {
            return Err(AppError::ModelUnavailable(format!(
                "MLflow experiment {} is deleted",
                settings.experiment_name
            )));
        }

        let version: ModelVersionResponse = Self::registry_get(
            &http_client,
            settings,
            "/api/2.0/mlflow/model-versions/get",
            &[
                ("name", settings.model_name.as_str()),
                ("version", settings.model_version.as_str()),
            ],
        )
        .await?;

        let status = version.model_version.status.as_deref().unwrap_or(READY_STATUS);
        if status != READY_STATUS {
            return Err(AppError::ModelUnavailable(format!(
                "{} is not ready (status {})",
                model_uri, status
            )));
        }

        tracing::info!(
            model_uri = %model_uri,
            experiment_id = %experiment.experiment.experiment_id,
            version = %version.model_version.version,
            run_id = ?version.model_version.run_id,
            "ML model loaded successfully"
        );

        Ok(Self {
            http_client,
            invocations_url: format!("{}/invocations", settings.serving_url.trim_end_matches('/')),
            model_uri,
            credentials: settings.credentials.clone(),
        })
    }

    #[cfg(test)]
    pub fn model_uri(&self) -> &str {
        &self.model_uri
    }

    fn authorize(request: RequestBuilder, credentials: &Option<(String, String)>) -> RequestBuilder {
        match credentials {
            Some((user, password)) => request.basic_auth(user, Some(password)),
            None => request,
        }
    }

    async fn registry_get<T: DeserializeOwned>(
        http_client: &HttpClient,
        settings: &ModelSettings,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}{}", settings.tracking_uri.trim_end_matches('/'), path);

        let response = Self::authorize(http_client.get(&url).query(query), &settings.credentials)
            .send()
            .await
            .map_err(|e| AppError::ModelUnavailable(format!("MLflow registry unreachable: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                url = %url,
                status = %status,
                body = %body,
                "MLflow registry request failed"
            );
            return Err(AppError::ModelUnavailable(format!(
                "MLflow registry returned status {}: {}",
                status, body
            )));
        }

        response.json().await.map_err(|e| {
            AppError::ModelUnavailable(format!("Invalid MLflow registry response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl ScoringModel for MlflowModel {
    async fn predict(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        let body = json!({ "dataframe_records": [features] });

        let response = Self::authorize(
            self.http_client.post(&self.invocations_url).json(&body),
            &self.credentials,
        )
        .send()
        .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ScoringError::Status { status, body });
        }

        let payload: PredictionPayload = response
            .json()
            .await
            .map_err(|e| ScoringError::MalformedResponse(e.to_string()))?;

        payload
            .first_score()
            .ok_or_else(|| ScoringError::MalformedResponse("no predictions returned".to_string()))
    }

    fn name(&self) -> &'static str {
        "mlflow"
    }
}
