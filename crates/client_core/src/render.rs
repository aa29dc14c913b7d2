use std::{sync::Arc, time::Duration};

use shared::{error::FailureReport, protocol::CONVERTED_ARCHIVE_NAME};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{
    dispatch::ConversionOutcome,
    downloads::{DownloadSink, ObjectUrlRegistry},
    progress::ProgressState,
    view::{ConverterView, DownloadLink},
};

pub const COMPLETION_MESSAGE: &str = "Conversion completed.";
pub const DOWNLOAD_STARTED_MESSAGE: &str = "Conversion completed. Download started.";
pub const DOWNLOAD_LINK_LABEL: &str = "Download Converted Images";
pub const ACKNOWLEDGED_PROGRESS: &str = "Conversion completed (100%)";

/// The outcome as displayed, plus the pending release of a blob's url.
pub struct Rendered {
    pub outcome: ConversionOutcome,
    pub release: Option<JoinHandle<bool>>,
}

impl Rendered {
    fn settled(outcome: ConversionOutcome) -> Self {
        Self {
            outcome,
            release: None,
        }
    }
}

pub struct ResultRenderer {
    view: Arc<dyn ConverterView>,
    registry: Arc<ObjectUrlRegistry>,
    sink: Arc<dyn DownloadSink>,
    revoke_delay: Duration,
}

impl ResultRenderer {
    pub fn new(
        view: Arc<dyn ConverterView>,
        registry: Arc<ObjectUrlRegistry>,
        sink: Arc<dyn DownloadSink>,
        revoke_delay: Duration,
    ) -> Self {
        Self {
            view,
            registry,
            sink,
            revoke_delay,
        }
    }

    pub fn registry(&self) -> &Arc<ObjectUrlRegistry> {
        &self.registry
    }

    /// Writes the outcome to the view and returns what the user was actually shown.
    /// A blob whose download cannot be saved comes back as an error.
    pub async fn render(
        &self,
        outcome: ConversionOutcome,
        known_total: Option<usize>,
    ) -> Rendered {
        match outcome {
            ConversionOutcome::Error(failure) => {
                self.show_failure(&failure);
                Rendered::settled(ConversionOutcome::Error(failure))
            }
            ConversionOutcome::LinkResult { download_url } => {
                let link = DownloadLink {
                    href: download_url.clone(),
                    label: DOWNLOAD_LINK_LABEL.to_string(),
                };
                self.view.show_completion(COMPLETION_MESSAGE, Some(&link));
                self.view
                    .set_progress_text(&completed_progress(known_total, COMPLETION_MESSAGE));
                Rendered::settled(ConversionOutcome::LinkResult { download_url })
            }
            ConversionOutcome::Acknowledged => {
                self.view.show_completion(COMPLETION_MESSAGE, None);
                self.view
                    .set_progress_text(&completed_progress(known_total, ACKNOWLEDGED_PROGRESS));
                Rendered::settled(ConversionOutcome::Acknowledged)
            }
            ConversionOutcome::BlobResult { payload } => {
                let url = self.registry.create(payload.clone());
                let shown = match self
                    .registry
                    .trigger_download(&url, CONVERTED_ARCHIVE_NAME, self.sink.as_ref())
                    .await
                {
                    Ok(path) => {
                        info!(path = %path.display(), "converted archive downloaded");
                        self.view.show_completion(DOWNLOAD_STARTED_MESSAGE, None);
                        self.view
                            .set_progress_text(&completed_progress(known_total, COMPLETION_MESSAGE));
                        ConversionOutcome::BlobResult { payload }
                    }
                    Err(err) => {
                        warn!("synthesized download failed: {err}");
                        let failure = FailureReport::transport(err);
                        self.show_failure(&failure);
                        ConversionOutcome::Error(failure)
                    }
                };
                Rendered {
                    outcome: shown,
                    release: Some(self.registry.revoke_after(url, self.revoke_delay)),
                }
            }
        }
    }

    fn show_failure(&self, failure: &FailureReport) {
        self.view.set_progress_text("");
        self.view.show_error(&failure.message);
    }
}

fn completed_progress(known_total: Option<usize>, fallback: &str) -> String {
    match known_total {
        Some(total) => ProgressState::finished(total).text(),
        None => fallback.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
