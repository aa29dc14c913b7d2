//! Runtime bridge between UI command queue and the controllers.

use std::{sync::Arc, thread};

use client_core::{
    load_files, ClientSettings, ConverterController, FileHandle, PredictionController,
};
use crossbeam_channel::{Receiver, Sender};

use crate::{
    backend_bridge::{commands::BackendCommand, view::ChannelView},
    controller::events::UiEvent,
};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Status(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let view = Arc::new(ChannelView::new(ui_tx.clone()));
            let mut converter = match ConverterController::from_settings(&settings, view.clone()) {
                Ok(controller) => controller,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Status(format!(
                        "backend worker startup failure: {err}"
                    )));
                    tracing::error!("failed to create converter: {err}");
                    return;
                }
            };
            let mut predictor = match PredictionController::new(&settings.server_url, view) {
                Ok(controller) => controller,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Status(format!(
                        "backend worker startup failure: {err}"
                    )));
                    tracing::error!("failed to create predictor: {err}");
                    return;
                }
            };
            let _ = ui_tx.try_send(UiEvent::Status(format!(
                "Connected to {}",
                settings.server_url
            )));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::SelectFiles { paths } => {
                        if let Some(files) = read_selection(&paths, &ui_tx).await {
                            converter.on_dialog_change(files);
                        }
                    }
                    BackendCommand::DropFiles { paths } => {
                        if let Some(files) = read_selection(&paths, &ui_tx).await {
                            converter.on_drop(files);
                        } else {
                            converter.on_drag_leave();
                        }
                    }
                    BackendCommand::DragOver => converter.on_drag_over(),
                    BackendCommand::DragLeave => converter.on_drag_leave(),
                    BackendCommand::SubmitConversion => {
                        match converter.begin_submission() {
                            Some(submission) => {
                                tokio::spawn(submission.run());
                            }
                            None => {
                                let _ = ui_tx.try_send(UiEvent::ConversionSkipped);
                            }
                        }
                    }
                    BackendCommand::SelectPredictionFile { path } => {
                        let file = match path {
                            Some(path) => match FileHandle::from_path(&path).await {
                                Ok(file) => Some(file),
                                Err(err) => {
                                    let _ = ui_tx.try_send(UiEvent::Status(err.to_string()));
                                    None
                                }
                            },
                            None => None,
                        };
                        predictor.on_file_change(file);
                    }
                    BackendCommand::SubmitPrediction => {
                        predictor.submit().await;
                    }
                }
            }
        });
    });
}

async fn read_selection(
    paths: &[std::path::PathBuf],
    ui_tx: &Sender<UiEvent>,
) -> Option<Vec<FileHandle>> {
    match load_files(paths).await {
        Ok(files) => Some(files),
        Err(err) => {
            tracing::warn!("could not read selection: {err}");
            let _ = ui_tx.try_send(UiEvent::Status(err.to_string()));
            None
        }
    }
}
