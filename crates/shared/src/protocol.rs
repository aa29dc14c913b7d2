use serde::{Deserialize, Serialize};

pub const CONVERT_PATH: &str = "/convert_dicom";
pub const PREDICT_PATH: &str = "/predict";

pub const LOOSE_FILES_FIELD: &str = "files[]";
pub const ZIP_FILE_FIELD: &str = "zip_file";
pub const PREDICT_FILE_FIELD: &str = "file";

pub const CONVERTED_ARCHIVE_NAME: &str = "converted_images.zip";

/// JSON body of `POST /convert_dicom`. Binary answers never reach this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Single-file conversions answer with the converted image location instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ConvertResponse {
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    pub fn link(&self) -> Option<&str> {
        self.download_url
            .as_deref()
            .or(self.image_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

/// JSON body of `POST /predict`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_response_tolerates_missing_fields() {
        let parsed: ConvertResponse = serde_json::from_str("{}").expect("parse");
        assert_eq!(parsed, ConvertResponse::default());
        assert!(!parsed.is_success());
        assert_eq!(parsed.link(), None);
    }

    #[test]
    fn download_url_wins_over_image_url() {
        let parsed: ConvertResponse = serde_json::from_str(
            r#"{"success":true,"download_url":"/x.zip","image_url":"/static/a.png"}"#,
        )
        .expect("parse");
        assert_eq!(parsed.link(), Some("/x.zip"));

        let single: ConvertResponse =
            serde_json::from_str(r#"{"success":true,"image_url":"/static/a.png"}"#)
                .expect("parse");
        assert_eq!(single.link(), Some("/static/a.png"));
    }

    #[test]
    fn predict_response_reads_confidence() {
        let parsed: PredictResponse =
            serde_json::from_str(r#"{"prediction":"Healthy","confidence":0.875}"#)
                .expect("parse");
        assert_eq!(parsed.prediction.as_deref(), Some("Healthy"));
        assert_eq!(parsed.confidence, Some(0.875));
        assert!(parsed.error.is_none());
    }
}
