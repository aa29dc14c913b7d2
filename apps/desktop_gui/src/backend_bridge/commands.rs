//! Commands queued from UI to backend worker.

use std::path::PathBuf;

pub enum BackendCommand {
    SelectFiles { paths: Vec<PathBuf> },
    DropFiles { paths: Vec<PathBuf> },
    DragOver,
    DragLeave,
    SubmitConversion,
    SelectPredictionFile { path: Option<PathBuf> },
    SubmitPrediction,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectFiles { .. } => "select_files",
            Self::DropFiles { .. } => "drop_files",
            Self::DragOver => "drag_over",
            Self::DragLeave => "drag_leave",
            Self::SubmitConversion => "submit_conversion",
            Self::SelectPredictionFile { .. } => "select_prediction_file",
            Self::SubmitPrediction => "submit_prediction",
        }
    }
}
