use serde::{Deserialize, Serialize};

pub const ZIP_MIME_TYPES: [&str; 2] = ["application/zip", "application/x-zip-compressed"];
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";
pub const UNHEALTHY_LABEL: &str = "Potentially unhealthy";

pub fn is_zip_mime(mime_type: &str) -> bool {
    let essence = mime_type.split(';').next().unwrap_or_default().trim();
    ZIP_MIME_TYPES
        .iter()
        .any(|zip| zip.eq_ignore_ascii_case(essence))
}

/// How a selection is shipped to the conversion endpoint. Derived from the
/// selection at submit time, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Zip,
    IndividualFiles,
}

impl SubmissionKind {
    pub fn classify<'a>(mime_types: impl IntoIterator<Item = &'a str>) -> Self {
        if mime_types.into_iter().any(is_zip_mime) {
            Self::Zip
        } else {
            Self::IndividualFiles
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            Self::Zip => "ZIP",
            Self::IndividualFiles => "DICOM",
        }
    }
}

/// Which progress readout a submission gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressPolicy {
    /// ZIP submissions show an indeterminate message, loose files are counted.
    #[default]
    DistinguishZip,
    /// Every submission is counted by selected file.
    CountedForAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionClass {
    Healthy,
    Unhealthy,
}

impl PredictionClass {
    pub fn from_label(label: &str) -> Self {
        if label == UNHEALTHY_LABEL {
            Self::Unhealthy
        } else {
            Self::Healthy
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
        }
    }
}
