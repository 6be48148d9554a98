use std::time::Duration;

use dashboard_engine::{
    Backend, BackendError, BackendSettings, ConnectionReport, RemotePhase, ReqwestBackend,
    TemplateUpload, DEFAULT_DOWNLOAD_NAME,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> ReqwestBackend {
    ReqwestBackend::new(BackendSettings::with_base_url(server.uri())).expect("client")
}

#[test]
fn endpoint_uses_base_url_as_prefix() {
    let settings = BackendSettings::with_base_url("http://backend.internal:8000/");
    assert_eq!(
        settings.endpoint("/api/status"),
        "http://backend.internal:8000/api/status"
    );
    assert_eq!(
        BackendSettings::default().endpoint("/api/run"),
        "http://localhost:8000/api/run"
    );
}

#[test]
fn default_timeouts_favour_slow_generation() {
    let settings = BackendSettings::default();
    assert_eq!(settings.run_timeout, Duration::from_secs(300));
    assert_eq!(settings.request_timeout, Duration::from_secs(60));
    assert_eq!(settings.max_download_bytes, 50 * 1024 * 1024);
}

#[tokio::test]
async fn run_returns_body_and_suggested_filename() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/run"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=\"report.docx\"")
                .set_body_bytes(b"PK\x03\x04docx".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let download = backend_for(&server).run(None).await.expect("run ok");
    assert_eq!(download.filename, "report.docx");
    assert_eq!(download.bytes, b"PK\x03\x04docx".to_vec());
}

#[tokio::test]
async fn run_without_disposition_uses_default_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/run"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"doc".to_vec()))
        .mount(&server)
        .await;

    let download = backend_for(&server).run(None).await.expect("run ok");
    assert_eq!(download.filename, DEFAULT_DOWNLOAD_NAME);
    assert_eq!(download.filename, "newsletter.docx");
}

#[tokio::test]
async fn run_attaches_template_as_multipart_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/run"))
        .and(body_string_contains("name=\"template\""))
        .and(body_string_contains("filename=\"weekly.md\""))
        .and(body_string_contains("# Weekly intro"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"doc".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let upload = TemplateUpload {
        file_name: "weekly.md".to_string(),
        bytes: b"# Weekly intro".to_vec(),
    };
    backend_for(&server)
        .run(Some(upload))
        .await
        .expect("run ok");
}

#[tokio::test]
async fn run_failure_reads_detail_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/run"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "bad template"})))
        .mount(&server)
        .await;

    let err = backend_for(&server).run(None).await.unwrap_err();
    match &err {
        BackendError::Application { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "bad template");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "bad template");
}

#[tokio::test]
async fn run_failure_falls_back_to_message_then_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/run"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "quota"})))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/run"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .with_priority(2)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let first = backend.run(None).await.unwrap_err();
    assert_eq!(first.user_message(), "quota");
    let second = backend.run(None).await.unwrap_err();
    assert_eq!(second.user_message(), "Unknown error");
}

#[tokio::test]
async fn run_failure_with_non_json_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/run"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = backend_for(&server).run(None).await.unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn run_rejects_oversized_download() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/run"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
        .mount(&server)
        .await;

    let settings = BackendSettings {
        max_download_bytes: 16,
        ..BackendSettings::with_base_url(server.uri())
    };
    let err = ReqwestBackend::new(settings)
        .unwrap()
        .run(None)
        .await
        .unwrap_err();
    assert!(
        matches!(err, BackendError::TooLarge { max_bytes: 16, .. }),
        "{err:?}"
    );
}

#[tokio::test]
async fn run_unreachable_backend_is_network_error() {
    // Nothing listens on port 9 of localhost in test environments.
    let backend = ReqwestBackend::new(BackendSettings::with_base_url("http://127.0.0.1:9")).unwrap();

    let err = backend.run(None).await.unwrap_err();
    assert!(matches!(err, BackendError::Network(_)), "{err:?}");
    assert!(!err.user_message().is_empty());
}

#[tokio::test]
async fn status_parses_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "generating",
            "step": "Generating newsletter with Claude...",
            "error": null
        })))
        .mount(&server)
        .await;

    let snapshot = backend_for(&server).status().await.expect("status ok");
    assert_eq!(snapshot.status, RemotePhase::Generating);
    assert_eq!(snapshot.step, "Generating newsletter with Claude...");
    assert_eq!(snapshot.error, None);
}

#[tokio::test]
async fn status_with_unknown_phase_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "paused", "step": ""})))
        .mount(&server)
        .await;

    let err = backend_for(&server).status().await.unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn status_times_out_on_slow_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"status": "idle", "step": ""})),
        )
        .mount(&server)
        .await;

    let settings = BackendSettings {
        request_timeout: Duration::from_millis(50),
        ..BackendSettings::with_base_url(server.uri())
    };
    let err = ReqwestBackend::new(settings)
        .unwrap()
        .status()
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Timeout(_)), "{err:?}");
}

#[tokio::test]
async fn test_connection_sends_service_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/test-connection"))
        .and(body_string_contains("name=\"service\""))
        .and(body_string_contains("luma"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "message": "Connected"})))
        .expect(1)
        .mount(&server)
        .await;

    let report = backend_for(&server)
        .test_connection("luma")
        .await
        .expect("report");
    assert_eq!(
        report,
        ConnectionReport {
            ok: true,
            message: "Connected".to_string(),
        }
    );
}

#[tokio::test]
async fn test_connection_reads_failure_body_on_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/test-connection"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"ok": false, "message": "Invalid key"})),
        )
        .mount(&server)
        .await;

    let report = backend_for(&server)
        .test_connection("webflow")
        .await
        .expect("report");
    assert!(!report.ok);
    assert_eq!(report.message, "Invalid key");
}
