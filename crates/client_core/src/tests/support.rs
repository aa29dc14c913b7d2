use std::sync::Mutex;

use crate::view::{ConverterView, DownloadLink, PredictionDisplay, PredictionView};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewOp {
    Label(String),
    Active(bool),
    Progress(String),
    ClearResult,
    Error(String),
    Completion {
        message: String,
        link: Option<DownloadLink>,
    },
    SubmitEnabled(bool),
    Prediction(PredictionDisplay),
}

#[derive(Default)]
pub struct RecordingView {
    ops: Mutex<Vec<ViewOp>>,
}

impl RecordingView {
    fn push(&self, op: ViewOp) {
        self.ops.lock().expect("view lock").push(op);
    }

    pub fn ops(&self) -> Vec<ViewOp> {
        self.ops.lock().expect("view lock").clone()
    }

    pub fn op_count(&self) -> usize {
        self.ops.lock().expect("view lock").len()
    }

    pub fn labels(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                ViewOp::Label(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn progress_texts(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                ViewOp::Progress(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last_progress(&self) -> Option<String> {
        self.progress_texts().pop()
    }

    pub fn errors(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                ViewOp::Error(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn completions(&self) -> Vec<(String, Option<DownloadLink>)> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                ViewOp::Completion { message, link } => Some((message, link)),
                _ => None,
            })
            .collect()
    }
}

impl ConverterView for RecordingView {
    fn set_drop_zone_label(&self, text: &str) {
        self.push(ViewOp::Label(text.to_string()));
    }

    fn set_drop_zone_active(&self, active: bool) {
        self.push(ViewOp::Active(active));
    }

    fn set_progress_text(&self, text: &str) {
        self.push(ViewOp::Progress(text.to_string()));
    }

    fn clear_result(&self) {
        self.push(ViewOp::ClearResult);
    }

    fn show_error(&self, message: &str) {
        self.push(ViewOp::Error(message.to_string()));
    }

    fn show_completion(&self, message: &str, link: Option<&DownloadLink>) {
        self.push(ViewOp::Completion {
            message: message.to_string(),
            link: link.cloned(),
        });
    }
}

impl PredictionView for RecordingView {
    fn set_submit_enabled(&self, enabled: bool) {
        self.push(ViewOp::SubmitEnabled(enabled));
    }

    fn show_prediction(&self, display: &PredictionDisplay) {
        self.push(ViewOp::Prediction(display.clone()));
    }

    fn show_error(&self, message: &str) {
        self.push(ViewOp::Error(message.to_string()));
    }
}

#[derive(Default)]
pub struct MemorySink {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().expect("sink lock").clone()
    }
}

#[async_trait::async_trait]
impl crate::downloads::DownloadSink for MemorySink {
    async fn save(&self, filename: &str, payload: &[u8]) -> std::io::Result<std::path::PathBuf> {
        self.saved
            .lock()
            .expect("sink lock")
            .push((filename.to_string(), payload.to_vec()));
        Ok(std::path::PathBuf::from(filename))
    }
}

pub fn dicom(name: &str) -> crate::selection::FileHandle {
    crate::selection::FileHandle::new(name, "application/dicom", format!("DICM:{name}").into_bytes())
}

pub fn zip(name: &str) -> crate::selection::FileHandle {
    crate::selection::FileHandle::new(name, "application/zip", b"PK\x03\x04".to_vec())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedField {
    pub name: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub enum Reply {
    Json(serde_json::Value),
    Binary(Vec<u8>),
    Text(axum::http::StatusCode, &'static str),
}

#[derive(Clone)]
struct ServerState {
    captured: std::sync::Arc<tokio::sync::Mutex<Vec<CapturedField>>>,
    reply: Reply,
}

async fn handle_upload(
    axum::extract::State(state): axum::extract::State<ServerState>,
    mut multipart: axum::extract::Multipart,
) -> axum::response::Response {
    use axum::response::IntoResponse;

    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.expect("field bytes").to_vec();
        state.captured.lock().await.push(CapturedField {
            name,
            file_name,
            bytes,
        });
    }

    match state.reply {
        Reply::Json(value) => axum::Json(value).into_response(),
        Reply::Binary(bytes) => (
            [(axum::http::header::CONTENT_TYPE, "application/zip")],
            bytes,
        )
            .into_response(),
        Reply::Text(status, body) => (
            status,
            [(axum::http::header::CONTENT_TYPE, "text/html")],
            body,
        )
            .into_response(),
    }
}

/// Serves both endpoints with the same canned reply and records every multipart field.
pub async fn spawn_upload_server(
    reply: Reply,
) -> (
    String,
    std::sync::Arc<tokio::sync::Mutex<Vec<CapturedField>>>,
) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    let captured = std::sync::Arc::new(tokio::sync::Mutex::new(Vec::new()));
    let state = ServerState {
        captured: captured.clone(),
        reply,
    };
    let app = axum::Router::new()
        .route(
            shared::protocol::CONVERT_PATH,
            axum::routing::post(handle_upload),
        )
        .route(
            shared::protocol::PREDICT_PATH,
            axum::routing::post(handle_upload),
        )
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), captured)
}

/// An address nothing listens on.
pub async fn closed_server_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}
