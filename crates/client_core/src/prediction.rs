use std::sync::Arc;

use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    domain::PredictionClass,
    error::FailureReport,
    protocol::{PredictResponse, PREDICT_FILE_FIELD, PREDICT_PATH},
};
use tracing::{error, info};
use url::Url;

use crate::{
    dispatch::endpoint_url,
    error::TransportError,
    selection::FileHandle,
    view::{PredictionDisplay, PredictionView},
};

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Error(FailureReport),
    Prediction(PredictionDisplay),
}

pub fn outcome_from_response(response: PredictResponse) -> PredictionOutcome {
    if let Some(message) = response.error.filter(|message| !message.is_empty()) {
        return PredictionOutcome::Error(FailureReport::server(message));
    }
    match (response.prediction, response.confidence) {
        (Some(label), Some(confidence)) => PredictionOutcome::Prediction(PredictionDisplay {
            class: PredictionClass::from_label(&label),
            confidence_text: format!("Confidence: {:.2}%", confidence * 100.0),
            label,
        }),
        _ => PredictionOutcome::Error(FailureReport::transport(
            "unexpected response from server",
        )),
    }
}

/// The single-file prediction form. Submit stays disabled until a file is chosen.
pub struct PredictionController {
    file: Option<FileHandle>,
    http: Client,
    endpoint: Url,
    view: Arc<dyn PredictionView>,
}

impl PredictionController {
    pub fn new(server_url: &str, view: Arc<dyn PredictionView>) -> Result<Self, TransportError> {
        let endpoint = endpoint_url(server_url, PREDICT_PATH)?;
        view.set_submit_enabled(false);
        Ok(Self {
            file: None,
            http: Client::new(),
            endpoint,
            view,
        })
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some()
    }

    pub fn on_file_change(&mut self, file: Option<FileHandle>) {
        self.file = file;
        self.view.set_submit_enabled(self.can_submit());
    }

    /// Returns `None` without sending anything when no file is selected.
    pub async fn submit(&self) -> Option<PredictionOutcome> {
        let file = self.file.clone()?;
        info!(file = %file.name, "submitting prediction request");
        let outcome = match self.request(file).await {
            Ok(response) => outcome_from_response(response),
            Err(err) => {
                error!("prediction request failed: {err}");
                PredictionOutcome::Error(FailureReport::transport(err))
            }
        };
        match &outcome {
            PredictionOutcome::Error(failure) => self.view.show_error(&failure.message),
            PredictionOutcome::Prediction(display) => self.view.show_prediction(display),
        }
        Some(outcome)
    }

    async fn request(&self, file: FileHandle) -> Result<PredictResponse, TransportError> {
        let part = Part::bytes(file.content.to_vec())
            .file_name(file.name)
            .mime_str(&file.mime_type)?;
        let body = self
            .http
            .post(self.endpoint.clone())
            .multipart(Form::new().part(PREDICT_FILE_FIELD, part))
            .send()
            .await?
            .bytes()
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
#[path = "tests/prediction_tests.rs"]
mod tests;
