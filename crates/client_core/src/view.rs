//! The surfaces a controller writes to. Front-ends implement these; tests record them.

use shared::domain::PredictionClass;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub href: String,
    pub label: String,
}

pub trait ConverterView: Send + Sync {
    fn set_drop_zone_label(&self, text: &str);
    fn set_drop_zone_active(&self, active: bool);
    fn set_progress_text(&self, text: &str);
    fn clear_result(&self);
    fn show_error(&self, message: &str);
    fn show_completion(&self, message: &str, link: Option<&DownloadLink>);
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionDisplay {
    pub label: String,
    pub class: PredictionClass,
    pub confidence_text: String,
}

pub trait PredictionView: Send + Sync {
    fn set_submit_enabled(&self, enabled: bool);
    fn show_prediction(&self, display: &PredictionDisplay);
    fn show_error(&self, message: &str);
}
