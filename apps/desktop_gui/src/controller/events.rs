//! Events flowing from the backend worker to the UI.

use client_core::{DownloadLink, PredictionDisplay};

#[derive(Debug, Clone)]
pub enum UiEvent {
    Status(String),
    DropZoneLabel(String),
    DropZoneActive(bool),
    Progress(String),
    ResultCleared,
    /// The worker declined to start a conversion.
    ConversionSkipped,
    ConversionFailed(String),
    ConversionCompleted {
        message: String,
        link: Option<DownloadLink>,
    },
    PredictEnabled(bool),
    Prediction(PredictionDisplay),
    PredictionFailed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultArea {
    #[default]
    Empty,
    Error(String),
    Completed {
        message: String,
        link: Option<DownloadLink>,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PredictionArea {
    #[default]
    Empty,
    Error(String),
    Result(PredictionDisplay),
}

/// Everything the converter page shows, folded from `UiEvent`s.
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterScreen {
    pub drop_zone_label: String,
    pub drop_zone_active: bool,
    pub progress: String,
    pub result: ResultArea,
    pub converting: bool,
    pub predict_enabled: bool,
    pub prediction: PredictionArea,
    pub status: String,
}

impl Default for ConverterScreen {
    fn default() -> Self {
        Self {
            drop_zone_label: client_core::drop_zone::DROP_ZONE_PLACEHOLDER.to_string(),
            drop_zone_active: false,
            progress: String::new(),
            result: ResultArea::Empty,
            converting: false,
            predict_enabled: false,
            prediction: PredictionArea::Empty,
            status: String::new(),
        }
    }
}

impl ConverterScreen {
    /// Marks a conversion as requested; held until its result or a skip arrives.
    pub fn begin_conversion(&mut self) {
        self.converting = true;
    }

    pub fn can_convert(&self, has_selection: bool) -> bool {
        has_selection && !self.converting
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Status(text) => self.status = text,
            UiEvent::DropZoneLabel(text) => self.drop_zone_label = text,
            UiEvent::DropZoneActive(active) => self.drop_zone_active = active,
            UiEvent::Progress(text) => self.progress = text,
            UiEvent::ResultCleared => {
                self.result = ResultArea::Empty;
                self.converting = true;
            }
            UiEvent::ConversionSkipped => self.converting = false,
            UiEvent::ConversionFailed(message) => {
                self.result = ResultArea::Error(message);
                self.converting = false;
            }
            UiEvent::ConversionCompleted { message, link } => {
                self.result = ResultArea::Completed { message, link };
                self.converting = false;
            }
            UiEvent::PredictEnabled(enabled) => self.predict_enabled = enabled,
            UiEvent::Prediction(display) => self.prediction = PredictionArea::Result(display),
            UiEvent::PredictionFailed(message) => {
                self.prediction = PredictionArea::Error(message)
            }
        }
    }
}
