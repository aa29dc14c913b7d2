use std::path::PathBuf;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::PredictionClass;
use url::Url;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{ConverterScreen, PredictionArea, ResultArea, UiEvent},
        orchestration::dispatch_backend_command,
    },
};

const DICOM_EXTENSIONS: [&str; 3] = ["dcm", "dicom", "zip"];
const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(0xd9, 0x3a, 0x3a);
const HEALTHY_COLOR: egui::Color32 = egui::Color32::from_rgb(0x2e, 0x9e, 0x5b);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Converter,
    Prediction,
}

pub struct ConverterApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    server_url: Option<Url>,
    screen: ConverterScreen,
    page: Page,
    hovering: bool,
    has_selection: bool,
    prediction_file: Option<PathBuf>,
}

impl ConverterApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, server_url: &str) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            server_url: Url::parse(server_url).ok(),
            screen: ConverterScreen::default(),
            page: Page::Converter,
            hovering: false,
            has_selection: false,
            prediction_file: None,
        }
    }

    fn send(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.screen.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            if let UiEvent::DropZoneLabel(label) = &event {
                self.has_selection = label != client_core::drop_zone::DROP_ZONE_PLACEHOLDER;
            }
            self.screen.apply(event);
        }
    }

    fn resolve_link(&self, href: &str) -> String {
        self.server_url
            .as_ref()
            .and_then(|base| base.join(href).ok())
            .map(|url| url.to_string())
            .unwrap_or_else(|| href.to_string())
    }

    fn handle_os_drag(&mut self, ctx: &egui::Context) {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });

        if !dropped.is_empty() {
            self.hovering = false;
            self.send(BackendCommand::DropFiles { paths: dropped });
            return;
        }
        if hovering != self.hovering {
            self.hovering = hovering;
            self.send(if hovering {
                BackendCommand::DragOver
            } else {
                BackendCommand::DragLeave
            });
        }
    }

    fn show_converter(&mut self, ui: &mut egui::Ui) {
        let fill = if self.screen.drop_zone_active {
            ui.visuals().selection.bg_fill
        } else {
            ui.visuals().faint_bg_color
        };
        let zone = egui::Frame::group(ui.style()).fill(fill).show(ui, |ui| {
            ui.set_min_size(egui::vec2(ui.available_width(), 140.0));
            ui.centered_and_justified(|ui| {
                ui.label(&self.screen.drop_zone_label);
            });
        });
        if zone.response.interact(egui::Sense::click()).clicked() {
            if let Some(paths) = rfd::FileDialog::new()
                .add_filter("DICOM or ZIP", &DICOM_EXTENSIONS)
                .pick_files()
            {
                self.send(BackendCommand::SelectFiles { paths });
            }
        }

        ui.add_space(8.0);
        if ui
            .add_enabled(
                self.screen.can_convert(self.has_selection),
                egui::Button::new("Convert"),
            )
            .clicked()
        {
            self.screen.begin_conversion();
            self.send(BackendCommand::SubmitConversion);
        }

        ui.add_space(8.0);
        ui.label(&self.screen.progress);

        match self.screen.result.clone() {
            ResultArea::Empty => {}
            ResultArea::Error(message) => {
                ui.colored_label(ERROR_COLOR, message);
            }
            ResultArea::Completed { message, link } => {
                ui.label(message);
                if let Some(link) = link {
                    ui.hyperlink_to(link.label, self.resolve_link(&link.href));
                }
            }
        }
    }

    fn show_prediction(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Choose image...").clicked() {
                let picked = rfd::FileDialog::new()
                    .add_filter("Images", &IMAGE_EXTENSIONS)
                    .pick_file();
                self.prediction_file = picked.clone();
                self.send(BackendCommand::SelectPredictionFile { path: picked });
            }
            match &self.prediction_file {
                Some(path) => ui.label(path.display().to_string()),
                None => ui.label("No file selected"),
            };
        });

        if ui
            .add_enabled(self.screen.predict_enabled, egui::Button::new("Predict"))
            .clicked()
        {
            self.send(BackendCommand::SubmitPrediction);
        }

        ui.add_space(8.0);
        match &self.screen.prediction {
            PredictionArea::Empty => {}
            PredictionArea::Error(message) => {
                ui.colored_label(ERROR_COLOR, message);
            }
            PredictionArea::Result(display) => {
                let color = match display.class {
                    PredictionClass::Healthy => HEALTHY_COLOR,
                    PredictionClass::Unhealthy => ERROR_COLOR,
                };
                ui.colored_label(color, &display.label);
                ui.label(&display.confidence_text);
            }
        }
    }
}

impl eframe::App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        if self.page == Page::Converter {
            self.handle_os_drag(ctx);
        }

        egui::TopBottomPanel::top("pages").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.page, Page::Converter, "DICOM converter");
                ui.selectable_value(&mut self.page, Page::Prediction, "Prediction");
            });
        });
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.screen.status);
        });
        egui::CentralPanel::default().show(ctx, |ui| match self.page {
            Page::Converter => self.show_converter(ui),
            Page::Prediction => self.show_prediction(ui),
        });

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
