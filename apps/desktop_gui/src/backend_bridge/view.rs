//! Forwards controller view writes to the UI thread as events.

use client_core::{ConverterView, DownloadLink, PredictionDisplay, PredictionView};
use crossbeam_channel::Sender;

use crate::controller::events::UiEvent;

pub struct ChannelView {
    ui_tx: Sender<UiEvent>,
}

impl ChannelView {
    pub fn new(ui_tx: Sender<UiEvent>) -> Self {
        Self { ui_tx }
    }

    fn emit(&self, event: UiEvent) {
        if self.ui_tx.try_send(event).is_err() {
            tracing::warn!("ui event queue unavailable; dropping view update");
        }
    }
}

impl ConverterView for ChannelView {
    fn set_drop_zone_label(&self, text: &str) {
        self.emit(UiEvent::DropZoneLabel(text.to_string()));
    }

    fn set_drop_zone_active(&self, active: bool) {
        self.emit(UiEvent::DropZoneActive(active));
    }

    fn set_progress_text(&self, text: &str) {
        self.emit(UiEvent::Progress(text.to_string()));
    }

    fn clear_result(&self) {
        self.emit(UiEvent::ResultCleared);
    }

    fn show_error(&self, message: &str) {
        self.emit(UiEvent::ConversionFailed(message.to_string()));
    }

    fn show_completion(&self, message: &str, link: Option<&DownloadLink>) {
        self.emit(UiEvent::ConversionCompleted {
            message: message.to_string(),
            link: link.cloned(),
        });
    }
}

impl PredictionView for ChannelView {
    fn set_submit_enabled(&self, enabled: bool) {
        self.emit(UiEvent::PredictEnabled(enabled));
    }

    fn show_prediction(&self, display: &PredictionDisplay) {
        self.emit(UiEvent::Prediction(display.clone()));
    }

    fn show_error(&self, message: &str) {
        self.emit(UiEvent::PredictionFailed(message.to_string()));
    }
}
