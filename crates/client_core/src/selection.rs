use std::path::Path;

use bytes::Bytes;
use shared::domain::{is_zip_mime, SubmissionKind, FALLBACK_MIME_TYPE};

use crate::error::SelectionError;

/// An opaque file as the user picked it: a name, a MIME type and its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub mime_type: String,
    pub content: Bytes,
}

impl FileHandle {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content: content.into(),
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, SelectionError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| SelectionError::MissingFileName(path.to_path_buf()))?;
        let content = tokio::fs::read(path)
            .await
            .map_err(|source| SelectionError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            name,
            mime_type: mime_type_for_path(path),
            content: Bytes::from(content),
        })
    }

    pub fn is_zip(&self) -> bool {
        is_zip_mime(&self.mime_type)
    }

    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }
}

pub fn mime_type_for_path(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_string()
}

/// Reads every path, failing on the first unreadable one.
pub async fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<FileHandle>, SelectionError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(FileHandle::from_path(path.as_ref()).await?);
    }
    Ok(files)
}

/// The files of the most recent selection event, in the order they arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    files: Vec<FileHandle>,
}

impl FileSelection {
    pub fn new(files: Vec<FileHandle>) -> Self {
        Self { files }
    }

    /// Selection events replace; they never append.
    pub fn replace(&mut self, files: Vec<FileHandle>) {
        self.files = files;
    }

    pub fn files(&self) -> &[FileHandle] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn submission_kind(&self) -> SubmissionKind {
        SubmissionKind::classify(self.files.iter().map(|file| file.mime_type.as_str()))
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(FileHandle::size_bytes).sum()
    }
}
