use std::sync::Arc;

use tracing::debug;

use crate::{
    selection::{FileHandle, FileSelection},
    view::ConverterView,
};

pub const DROP_ZONE_PLACEHOLDER: &str =
    "Drag and drop DICOM files or a ZIP file here, or click to select files.";

/// Label for the drop zone given the current selection.
pub fn drop_zone_label(selection: &FileSelection) -> String {
    if selection.is_empty() {
        return DROP_ZONE_PLACEHOLDER.to_string();
    }
    format!(
        "{} {} file(s) selected",
        selection.len(),
        selection.submission_kind().noun()
    )
}

/// Owns the selection and the drop zone's visible state. No network activity.
pub struct DropZoneController {
    selection: FileSelection,
    active: bool,
    view: Arc<dyn ConverterView>,
}

impl DropZoneController {
    pub fn new(view: Arc<dyn ConverterView>) -> Self {
        Self {
            selection: FileSelection::default(),
            active: false,
            view,
        }
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn on_dialog_change(&mut self, files: Vec<FileHandle>) {
        self.selection.replace(files);
        self.refresh_label();
    }

    pub fn on_drag_over(&mut self) {
        if !self.active {
            self.active = true;
            self.view.set_drop_zone_active(true);
        }
    }

    pub fn on_drag_leave(&mut self) {
        if self.active {
            self.active = false;
            self.view.set_drop_zone_active(false);
        }
    }

    /// The drop is consumed here; callers must not forward it anywhere else.
    pub fn on_drop(&mut self, files: Vec<FileHandle>) {
        self.on_drag_leave();
        self.selection.replace(files);
        self.refresh_label();
    }

    fn refresh_label(&self) {
        let label = drop_zone_label(&self.selection);
        debug!(files = self.selection.len(), "drop zone selection changed");
        self.view.set_drop_zone_label(&label);
    }
}
