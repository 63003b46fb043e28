//! End-to-end tests for pdf-rule-check.
//!
//! Each test starts an in-process fake of the validation service (axum on an
//! ephemeral localhost port) and drives the real `HttpTransport` against it,
//! so the multipart body, status handling and JSON parsing are all exercised
//! over an actual HTTP connection. No external service is needed.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pdf_rule_check::{
    check_health, validate, ClientConfig, ErrorCategory, FormController, HttpTransport,
    RenderOptions, ResultsTable, RuleSet, ValidatorError, GENERIC_FAILURE,
};
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Fake validation service ──────────────────────────────────────────────────

/// One multipart field as the service received it.
#[derive(Debug, Clone)]
struct ReceivedField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

impl ReceivedField {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

/// What the fake answers to `POST /api/validate`.
#[derive(Clone)]
enum Reply {
    Json(StatusCode, Value),
    Raw(StatusCode, &'static str),
}

#[derive(Clone)]
struct FakeService {
    reply: Arc<Mutex<Reply>>,
    requests: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<Vec<ReceivedField>>>>,
}

impl FakeService {
    fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Vec<ReceivedField> {
        self.received
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("at least one request")
    }

    fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }
}

async fn handle_validate(State(svc): State<FakeService>, mut multipart: Multipart) -> Response {
    svc.requests.fetch_add(1, Ordering::SeqCst);

    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        fields.push(ReceivedField {
            name,
            file_name,
            content_type,
            data,
        });
    }
    svc.received.lock().unwrap().push(fields);

    let reply = svc.reply.lock().unwrap().clone();
    match reply {
        Reply::Json(status, body) => (status, Json(body)).into_response(),
        Reply::Raw(status, body) => (status, body).into_response(),
    }
}

async fn handle_health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "PDF Validator API",
        "llm_provider": "lmstudio"
    }))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Start the fake service; returns its base URL and a handle for assertions.
async fn spawn_service(reply: Reply) -> (String, FakeService) {
    init_tracing();
    let svc = FakeService {
        reply: Arc::new(Mutex::new(reply)),
        requests: Arc::new(AtomicUsize::new(0)),
        received: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/api/validate", post(handle_validate))
        .route("/health", get(handle_health))
        .with_state(svc.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake service");
    });
    (format!("http://{addr}"), svc)
}

// ── Test helpers ─────────────────────────────────────────────────────────────

const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\n%%EOF\n";

fn write_pdf(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).expect("create test pdf");
    f.write_all(bytes).expect("write test pdf");
    path
}

fn config_for(base_url: &str) -> ClientConfig {
    ClientConfig::builder()
        .base_url(base_url)
        .build()
        .expect("valid config")
}

fn three_results() -> Value {
    json!({
        "results": [
            {"rule": "The document must have a purpose section.", "status": "pass",
             "evidence": "Found in page 1: '1. Purpose'", "reasoning": "A purpose heading opens the policy.",
             "confidence": 95},
            {"rule": "The document must mention at least one date.", "status": "fail",
             "evidence": "No date found", "reasoning": "Neither absolute nor relative dates appear.",
             "confidence": 72},
            {"rule": "The document must define at least one term.", "status": "pass",
             "evidence": "Found in page 2: '\"Supplier\" means…'", "reasoning": "Definitions section present.",
             "confidence": 55}
        ],
        "pdf_pages": 3,
        "processing_time": 4.18
    })
}

fn sample_rules() -> RuleSet {
    RuleSet::new([
        "The document must have a purpose section.",
        "  The document must mention at least one date.  ",
        "The document must define at least one term.",
    ])
}

/// A form with a file on disk and three rules, ready to submit.
fn ready_form(config: &ClientConfig, dir: &tempfile::TempDir) -> FormController {
    let path = write_pdf(dir, "policy.pdf", PDF_BYTES);
    let mut form = FormController::new(config);
    form.select_file(&path).expect("small pdf is accepted");
    form.set_rules(sample_rules());
    form
}

// ── Request shape ────────────────────────────────────────────────────────────

#[tokio::test]
async fn request_carries_exactly_four_fields_in_order() {
    let (url, svc) = spawn_service(Reply::Json(StatusCode::OK, three_results())).await;
    let config = config_for(&url);
    let dir = tempfile::tempdir().unwrap();
    let mut form = ready_form(&config, &dir);
    let transport = HttpTransport::new(&config).unwrap();

    form.submit(&transport).await.expect("submission succeeds");
    assert_eq!(svc.request_count(), 1, "exactly one request per submission");

    let fields = svc.last_request();
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["file", "rule1", "rule2", "rule3"]);

    let file = &fields[0];
    assert_eq!(file.file_name.as_deref(), Some("policy.pdf"));
    assert_eq!(file.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(file.data, PDF_BYTES);

    // Rules arrive in order and untrimmed.
    assert_eq!(fields[1].text(), "The document must have a purpose section.");
    assert_eq!(
        fields[2].text(),
        "  The document must mention at least one date.  "
    );
    assert_eq!(fields[3].text(), "The document must define at least one term.");
}

// ── Preconditions ────────────────────────────────────────────────────────────

#[tokio::test]
async fn no_request_without_a_file() {
    let (url, svc) = spawn_service(Reply::Json(StatusCode::OK, three_results())).await;
    let config = config_for(&url);
    let transport = HttpTransport::new(&config).unwrap();
    let mut form = FormController::new(&config);
    form.set_rules(sample_rules());

    let err = form.submit(&transport).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Precondition);
    assert_eq!(form.error_message(), Some("Please upload a PDF file"));
    assert_eq!(svc.request_count(), 0);
}

#[tokio::test]
async fn no_request_with_a_whitespace_rule() {
    let (url, svc) = spawn_service(Reply::Json(StatusCode::OK, three_results())).await;
    let config = config_for(&url);
    let dir = tempfile::tempdir().unwrap();
    let mut form = ready_form(&config, &dir);
    form.edit_rule(1, " \n\t ").unwrap();
    let transport = HttpTransport::new(&config).unwrap();

    assert!(form.submit(&transport).await.is_err());
    assert_eq!(
        form.error_message(),
        Some("Please fill in all 3 validation rules")
    );
    assert_eq!(svc.request_count(), 0);
}

// ── Success path + rendering ─────────────────────────────────────────────────

#[tokio::test]
async fn success_renders_one_row_per_result() {
    let (url, _svc) = spawn_service(Reply::Json(StatusCode::OK, three_results())).await;
    let config = config_for(&url);
    let dir = tempfile::tempdir().unwrap();
    let mut form = ready_form(&config, &dir);
    let transport = HttpTransport::new(&config).unwrap();

    let response = form.submit(&transport).await.expect("success").clone();
    assert_eq!(response.pdf_pages, 3);

    let table = ResultsTable::from_response(&response);
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.summary, "3 pages • 4.18s");

    let badges: Vec<&str> = table.rows.iter().map(|r| r.badge).collect();
    assert_eq!(badges, ["PASS", "FAIL", "PASS"]);
    assert_eq!(table.rows[0].rule, "The document must have a purpose section.");
    for (row, expected) in table.rows.iter().zip([95u8, 72, 55]) {
        assert_eq!(row.bar_percent, expected);
        assert_eq!(row.confidence_label, format!("{expected}%"));
    }

    let text = table.to_text(&RenderOptions::default());
    assert!(text.contains("Validation Results"));
    assert!(text.contains("FAIL"));
}

#[tokio::test]
async fn empty_result_list_renders_an_empty_table() {
    let body = json!({"results": [], "pdf_pages": 1, "processing_time": 0.2});
    let (url, _svc) = spawn_service(Reply::Json(StatusCode::OK, body)).await;
    let config = config_for(&url);
    let dir = tempfile::tempdir().unwrap();
    let mut form = ready_form(&config, &dir);
    let transport = HttpTransport::new(&config).unwrap();

    let response = form.submit(&transport).await.expect("empty list is fine");
    assert!(ResultsTable::from_response(response).rows.is_empty());
}

// ── Error paths ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn server_detail_is_shown_verbatim() {
    let (url, _svc) = spawn_service(Reply::Json(
        StatusCode::BAD_REQUEST,
        json!({"detail": "bad file"}),
    ))
    .await;
    let config = config_for(&url);
    let dir = tempfile::tempdir().unwrap();
    let mut form = ready_form(&config, &dir);
    let transport = HttpTransport::new(&config).unwrap();

    let err = form.submit(&transport).await.unwrap_err();
    assert!(matches!(err, ValidatorError::Server { status: 400, .. }));
    assert_eq!(form.error_message(), Some("bad file"));
}

#[tokio::test]
async fn unstructured_error_body_gets_generic_message() {
    let (url, _svc) =
        spawn_service(Reply::Raw(StatusCode::BAD_GATEWAY, "<html>upstream down</html>")).await;
    let config = config_for(&url);
    let dir = tempfile::tempdir().unwrap();
    let mut form = ready_form(&config, &dir);
    let transport = HttpTransport::new(&config).unwrap();

    assert!(form.submit(&transport).await.is_err());
    assert_eq!(form.error_message(), Some(GENERIC_FAILURE));
}

#[tokio::test]
async fn unreachable_service_gets_generic_message() {
    // Grab a free port, then close it so the connection is refused.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = config_for(&format!("http://{addr}"));
    let dir = tempfile::tempdir().unwrap();
    let mut form = ready_form(&config, &dir);
    let transport = HttpTransport::new(&config).unwrap();

    let err = form.submit(&transport).await.unwrap_err();
    assert!(matches!(err, ValidatorError::Transport(_)));
    let message = form.error_message().expect("an error is displayed");
    assert!(!message.is_empty());
    assert_eq!(message, GENERIC_FAILURE);
}

#[tokio::test]
async fn malformed_success_body_is_its_own_error() {
    let body = json!({"results": [{"rule": "r", "status": "unknown"}], "pdf_pages": 1});
    let (url, _svc) = spawn_service(Reply::Json(StatusCode::OK, body)).await;
    let config = config_for(&url);
    let dir = tempfile::tempdir().unwrap();
    let mut form = ready_form(&config, &dir);
    let transport = HttpTransport::new(&config).unwrap();

    let err = form.submit(&transport).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::MalformedResponse);
    assert!(form.response().is_none());
}

#[tokio::test]
async fn resubmission_replaces_previous_results() {
    let (url, svc) = spawn_service(Reply::Json(StatusCode::OK, three_results())).await;
    let config = config_for(&url);
    let dir = tempfile::tempdir().unwrap();
    let mut form = ready_form(&config, &dir);
    let transport = HttpTransport::new(&config).unwrap();

    form.submit(&transport).await.expect("first submission");
    assert!(form.response().is_some());

    svc.set_reply(Reply::Json(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"detail": "LLM validation error: model unloaded"}),
    ));
    assert!(form.submit(&transport).await.is_err());

    // No stale results next to the new error.
    assert!(form.response().is_none());
    assert_eq!(
        form.error_message(),
        Some("LLM validation error: model unloaded")
    );
    assert_eq!(svc.request_count(), 2);
}

// ── Selector at the boundary ─────────────────────────────────────────────────

#[tokio::test]
async fn rejected_files_leave_selection_unchanged() {
    let config = ClientConfig::default();
    let dir = tempfile::tempdir().unwrap();
    let good = write_pdf(&dir, "good.pdf", PDF_BYTES);
    let big = write_pdf(&dir, "big.pdf", &vec![b'x'; 10 * 1024 * 1024 + 1]);
    let text = write_pdf(&dir, "notes.txt", b"not a pdf");

    let mut form = FormController::new(&config);
    assert!(form.select_file(&big).is_err());
    assert!(form.selector().selected().is_none());

    form.select_file(&good).unwrap();
    assert!(matches!(
        form.select_file(&text),
        Err(ValidatorError::NotAPdf { .. })
    ));
    assert!(matches!(
        form.select_file(&big),
        Err(ValidatorError::FileTooLarge { .. })
    ));
    assert_eq!(
        form.selector().selected().map(|f| f.name()),
        Some("good.pdf")
    );
}

// ── One-shot API and health ──────────────────────────────────────────────────

#[tokio::test]
async fn one_shot_validate_round_trip() {
    let (url, svc) = spawn_service(Reply::Json(StatusCode::OK, three_results())).await;
    let config = config_for(&url);
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(&dir, "contract.pdf", PDF_BYTES);

    let response = validate(&path, sample_rules(), &config)
        .await
        .expect("validate succeeds");
    assert_eq!(response.passed(), 2);
    assert_eq!(response.failed(), 1);
    assert_eq!(svc.request_count(), 1);
}

#[tokio::test]
async fn health_probe_reads_service_status() {
    let (url, _svc) = spawn_service(Reply::Json(StatusCode::OK, three_results())).await;
    let health = check_health(&config_for(&url)).await.expect("health");
    assert!(health.is_healthy());
    assert_eq!(health.llm_provider.as_deref(), Some("lmstudio"));
}
