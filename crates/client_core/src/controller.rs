use std::{sync::Arc, time::Duration};

use shared::domain::{ProgressPolicy, SubmissionKind};
use tracing::{info, warn};

use crate::{
    dispatch::{
        ConversionOutcome, ConversionRequestDispatcher, ConversionTransport,
        HttpConversionTransport,
    },
    downloads::{DirectorySink, DownloadSink, ObjectUrlRegistry},
    drop_zone::DropZoneController,
    error::TransportError,
    progress::{ProgressHandle, ProgressMode, ProgressSimulator},
    render::ResultRenderer,
    request::{ConversionRequest, RequestBuilder},
    selection::{FileHandle, FileSelection},
    settings::ClientSettings,
    view::ConverterView,
};

#[derive(Debug, Clone, Copy)]
pub struct ConverterOptions {
    pub progress_interval: Duration,
    pub progress_policy: ProgressPolicy,
    pub revoke_delay: Duration,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        ClientSettings::default().converter_options()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReport {
    /// The selection was empty; nothing was sent.
    Skipped,
    Completed(ConversionOutcome),
}

/// One page's worth of converter state: the selection, the view it writes to,
/// and the collaborators a submission needs.
pub struct ConverterController {
    drop_zone: DropZoneController,
    builder: RequestBuilder,
    simulator: ProgressSimulator,
    policy: ProgressPolicy,
    dispatcher: Arc<ConversionRequestDispatcher>,
    renderer: Arc<ResultRenderer>,
    view: Arc<dyn ConverterView>,
}

impl ConverterController {
    pub fn new(
        view: Arc<dyn ConverterView>,
        transport: Arc<dyn ConversionTransport>,
        sink: Arc<dyn DownloadSink>,
        options: ConverterOptions,
    ) -> Self {
        let renderer = ResultRenderer::new(
            Arc::clone(&view),
            ObjectUrlRegistry::new(),
            sink,
            options.revoke_delay,
        );
        Self {
            drop_zone: DropZoneController::new(Arc::clone(&view)),
            builder: RequestBuilder,
            simulator: ProgressSimulator::new(options.progress_interval),
            policy: options.progress_policy,
            dispatcher: Arc::new(ConversionRequestDispatcher::new(transport)),
            renderer: Arc::new(renderer),
            view,
        }
    }

    pub fn from_settings(
        settings: &ClientSettings,
        view: Arc<dyn ConverterView>,
    ) -> Result<Self, TransportError> {
        let transport = HttpConversionTransport::new(&settings.server_url)?;
        info!(endpoint = %transport.endpoint(), "converter ready");
        Ok(Self::new(
            view,
            Arc::new(transport),
            Arc::new(DirectorySink::new(settings.output_dir.clone())),
            settings.converter_options(),
        ))
    }

    pub fn selection(&self) -> &FileSelection {
        self.drop_zone.selection()
    }

    pub fn renderer(&self) -> &Arc<ResultRenderer> {
        &self.renderer
    }

    pub fn on_dialog_change(&mut self, files: Vec<FileHandle>) {
        self.drop_zone.on_dialog_change(files);
    }

    pub fn on_drag_over(&mut self) {
        self.drop_zone.on_drag_over();
    }

    pub fn on_drag_leave(&mut self) {
        self.drop_zone.on_drag_leave();
    }

    pub fn on_drop(&mut self, files: Vec<FileHandle>) {
        self.drop_zone.on_drop(files);
    }

    /// Resets the result area and starts the progress readout. The returned
    /// submission no longer borrows the controller, so the selection may change
    /// while it is in flight. Must be called from within a tokio runtime.
    pub fn begin_submission(&self) -> Option<Submission> {
        let Some(request) = self.builder.build(self.drop_zone.selection()) else {
            warn!("submit ignored: no files selected");
            return None;
        };
        self.view.clear_result();
        self.view.set_progress_text("");

        let mode = ProgressMode::select(self.policy, request.kind, request.total_files);
        let progress = self.simulator.start(mode, Arc::clone(&self.view));
        Some(Submission {
            request,
            mode,
            progress,
            dispatcher: Arc::clone(&self.dispatcher),
            renderer: Arc::clone(&self.renderer),
        })
    }

    pub async fn submit(&self) -> SubmitReport {
        match self.begin_submission() {
            Some(submission) => SubmitReport::Completed(submission.run().await),
            None => SubmitReport::Skipped,
        }
    }
}

pub struct Submission {
    request: ConversionRequest,
    mode: ProgressMode,
    progress: ProgressHandle,
    dispatcher: Arc<ConversionRequestDispatcher>,
    renderer: Arc<ResultRenderer>,
}

impl Submission {
    pub fn kind(&self) -> SubmissionKind {
        self.request.kind
    }

    pub fn total_files(&self) -> usize {
        self.request.total_files
    }

    pub fn progress_mode(&self) -> ProgressMode {
        self.mode
    }

    pub async fn run(self) -> ConversionOutcome {
        let known_total = self.mode.known_total();
        let outcome = self
            .dispatcher
            .dispatch(self.request, self.progress, &self.renderer, known_total)
            .await;
        info!(error = outcome.is_error(), "conversion finished");
        outcome
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
