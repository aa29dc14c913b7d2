use reqwest::multipart::{Form, Part};
use shared::{
    domain::SubmissionKind,
    protocol::{LOOSE_FILES_FIELD, ZIP_FILE_FIELD},
};

use crate::selection::{FileHandle, FileSelection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPart {
    pub field: &'static str,
    pub file: FileHandle,
}

/// A classified, ready-to-send conversion submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub kind: SubmissionKind,
    pub total_files: usize,
    pub parts: Vec<RequestPart>,
}

impl ConversionRequest {
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.parts.iter().map(|part| part.field)
    }

    pub fn into_form(self) -> Result<Form, reqwest::Error> {
        self.parts
            .into_iter()
            .try_fold(Form::new(), |form, part| -> Result<Form, reqwest::Error> {
                let body = Part::bytes(part.file.content.to_vec())
                    .file_name(part.file.name)
                    .mime_str(&part.file.mime_type)?;
                Ok(form.part(part.field, body))
            })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestBuilder;

impl RequestBuilder {
    /// Returns `None` for an empty selection. The kind is classified once here and
    /// carried on the request so progress reporting reads the same decision.
    pub fn build(&self, selection: &FileSelection) -> Option<ConversionRequest> {
        if selection.is_empty() {
            return None;
        }
        let kind = selection.submission_kind();
        let parts = selection
            .files()
            .iter()
            .map(|file| RequestPart {
                field: field_for(kind),
                file: file.clone(),
            })
            .collect();
        Some(ConversionRequest {
            kind,
            total_files: selection.len(),
            parts,
        })
    }
}

fn field_for(kind: SubmissionKind) -> &'static str {
    match kind {
        SubmissionKind::Zip => ZIP_FILE_FIELD,
        SubmissionKind::IndividualFiles => LOOSE_FILES_FIELD,
    }
}
