use bytes::Bytes;

use super::*;
use crate::{
    downloads::DEFAULT_REVOKE_DELAY,
    test_support::{MemorySink, RecordingView, ViewOp},
};

fn renderer() -> (Arc<RecordingView>, Arc<MemorySink>, ResultRenderer) {
    let view = Arc::new(RecordingView::default());
    let sink = Arc::new(MemorySink::default());
    let renderer = ResultRenderer::new(
        view.clone(),
        ObjectUrlRegistry::new(),
        sink.clone(),
        DEFAULT_REVOKE_DELAY,
    );
    (view, sink, renderer)
}

#[tokio::test]
async fn error_clears_progress_and_shows_message() {
    let (view, _sink, renderer) = renderer();
    let rendered = renderer
        .render(
            ConversionOutcome::Error(FailureReport::server("bad file")),
            Some(3),
        )
        .await;
    assert!(rendered.outcome.is_error());
    assert!(rendered.release.is_none());
    assert_eq!(
        view.ops(),
        vec![
            ViewOp::Progress(String::new()),
            ViewOp::Error("bad file".to_string())
        ]
    );
}

#[tokio::test]
async fn link_renders_anchor_and_full_progress() {
    let (view, _sink, renderer) = renderer();
    renderer
        .render(
            ConversionOutcome::LinkResult {
                download_url: "/x.zip".to_string(),
            },
            Some(2),
        )
        .await;
    let completions = view.completions();
    assert_eq!(completions.len(), 1);
    let (message, link) = &completions[0];
    assert_eq!(message, COMPLETION_MESSAGE);
    let link = link.as_ref().expect("link");
    assert_eq!(link.href, "/x.zip");
    assert_eq!(link.label, DOWNLOAD_LINK_LABEL);
    assert_eq!(
        view.last_progress().as_deref(),
        Some("Converted 2/2 files (100%)")
    );
}

#[tokio::test]
async fn link_without_known_total_uses_generic_completion() {
    let (view, _sink, renderer) = renderer();
    renderer
        .render(
            ConversionOutcome::LinkResult {
                download_url: "/x.zip".to_string(),
            },
            None,
        )
        .await;
    assert_eq!(view.last_progress().as_deref(), Some(COMPLETION_MESSAGE));
}

#[tokio::test]
async fn acknowledged_reports_completion_without_link() {
    let (view, _sink, renderer) = renderer();
    let rendered = renderer.render(ConversionOutcome::Acknowledged, None).await;
    assert_eq!(rendered.outcome, ConversionOutcome::Acknowledged);
    assert_eq!(
        view.completions(),
        vec![(COMPLETION_MESSAGE.to_string(), None)]
    );
    assert_eq!(view.last_progress().as_deref(), Some(ACKNOWLEDGED_PROGRESS));
}

#[tokio::test(start_paused = true)]
async fn blob_is_downloaded_then_released_after_delay() {
    let (view, sink, renderer) = renderer();
    let rendered = renderer
        .render(
            ConversionOutcome::BlobResult {
                payload: Bytes::from_static(b"PK-archive"),
            },
            None,
        )
        .await;
    assert_eq!(
        rendered.outcome,
        ConversionOutcome::BlobResult {
            payload: Bytes::from_static(b"PK-archive"),
        }
    );
    let release = rendered.release.expect("release handle");

    assert_eq!(
        sink.saved(),
        vec![("converted_images.zip".to_string(), b"PK-archive".to_vec())]
    );
    assert_eq!(
        view.completions(),
        vec![(DOWNLOAD_STARTED_MESSAGE.to_string(), None)]
    );
    assert_eq!(renderer.registry().live_count(), 1, "still live right after the trigger");

    tokio::time::sleep(DEFAULT_REVOKE_DELAY / 2).await;
    assert_eq!(renderer.registry().live_count(), 1);

    assert!(release.await.expect("join"));
    assert_eq!(renderer.registry().live_count(), 0);
}

#[tokio::test]
async fn blob_save_failure_is_reported() {
    struct ReadOnly;
    #[async_trait::async_trait]
    impl DownloadSink for ReadOnly {
        async fn save(&self, _: &str, _: &[u8]) -> std::io::Result<std::path::PathBuf> {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            ))
        }
    }

    let view = Arc::new(RecordingView::default());
    let renderer = ResultRenderer::new(
        view.clone(),
        ObjectUrlRegistry::new(),
        Arc::new(ReadOnly),
        Duration::ZERO,
    );
    let rendered = renderer
        .render(
            ConversionOutcome::BlobResult {
                payload: Bytes::from_static(b"PK"),
            },
            None,
        )
        .await;
    let ConversionOutcome::Error(failure) = &rendered.outcome else {
        panic!("expected error outcome, got {:?}", rendered.outcome);
    };
    assert!(failure.message.contains("converted_images.zip"));
    rendered.release.expect("release handle").await.expect("join");

    let errors = view.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("converted_images.zip"));
    assert!(view.completions().is_empty());
    assert_eq!(renderer.registry().live_count(), 0);
}
