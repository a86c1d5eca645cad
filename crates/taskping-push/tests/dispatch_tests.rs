//! End-to-end dispatch tests with an in-memory metadata store and stub
//! provider endpoints (token exchange + message send)

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
use rsa::RsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};

use taskping_auth::{MinterConfig, ServiceCredential, TokenMinter};
use taskping_push::dispatch::{TaskAssignmentEvent, dispatch_task_assignment};
use taskping_push::handler::post_task_assignment;
use taskping_push::{App, Locale, Notifier, PushConfig};
use taskping_types::meta_adapter::{MetaAdapter, NotificationLogEntry, TaskRow};
use taskping_types::{Error, TpResult};

#[derive(Debug, Default)]
struct InMemoryMeta {
	tasks: HashMap<u64, TaskRow>,
	device_tokens: HashMap<String, String>,
	profile_names: HashMap<String, String>,
	log: Mutex<Vec<NotificationLogEntry>>,
	fail_log: bool,
}

#[async_trait]
impl MetaAdapter for InMemoryMeta {
	async fn read_task(&self, task_id: u64) -> TpResult<TaskRow> {
		self.tasks.get(&task_id).cloned().ok_or(Error::NotFound)
	}

	async fn read_device_token(&self, user_id: &str) -> TpResult<Option<Box<str>>> {
		Ok(self.device_tokens.get(user_id).map(|t| t.clone().into()))
	}

	async fn read_profile_name(&self, user_id: &str) -> TpResult<Option<Box<str>>> {
		Ok(self.profile_names.get(user_id).map(|n| n.clone().into()))
	}

	async fn create_notification_log(&self, entry: &NotificationLogEntry) -> TpResult<()> {
		if self.fail_log {
			return Err(Error::DbError("log table unavailable".into()));
		}
		self.log.lock().unwrap().push(entry.clone());
		Ok(())
	}
}

fn test_key_pem() -> String {
	static PEM: OnceLock<String> = OnceLock::new();
	PEM.get_or_init(|| {
		let mut rng = rand::thread_rng();
		let key = RsaPrivateKey::new(&mut rng, 2048).unwrap();
		key.to_pkcs8_pem(LineEnding::LF).unwrap().to_string()
	})
	.clone()
}

async fn spawn_stub(router: Router) -> String {
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, router).await.unwrap();
	});
	format!("http://{}", addr)
}

async fn token_endpoint() -> Json<serde_json::Value> {
	Json(serde_json::json!({ "access_token": "abc123", "expires_in": 3600 }))
}

/// Accepts a message only when the minted bearer token is presented
async fn send_endpoint(
	headers: HeaderMap,
	Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
	let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).unwrap_or("");
	if auth != "Bearer abc123" {
		return Err((StatusCode::UNAUTHORIZED, "invalid bearer token".to_string()));
	}
	let device = body["message"]["token"].as_str().unwrap_or("");
	if device.is_empty() {
		return Err((StatusCode::BAD_REQUEST, "missing device token".to_string()));
	}
	Ok(Json(serde_json::json!({ "name": "projects/test/messages/0:100" })))
}

fn seeded_meta() -> InMemoryMeta {
	let mut meta = InMemoryMeta::default();
	meta.tasks.insert(
		1,
		TaskRow {
			task_id: 1,
			title: "مراجعة التقرير".into(),
			due_date: Some("2026-09-01".into()),
			priority: Some("high".into()),
		},
	);
	meta.device_tokens.insert("user-1".to_string(), "device-token-1".to_string());
	meta.profile_names.insert("user-2".to_string(), "سارة".to_string());
	meta
}

fn test_minter(provider_base: &str) -> TokenMinter {
	TokenMinter::new(MinterConfig::new(
		ServiceCredential {
			issuer: "svc@example.iam".into(),
			private_key_pem: test_key_pem().into(),
		},
		format!("{}/token", provider_base).into(),
		"messaging.send".into(),
	))
}

fn build_app_with(meta: Arc<InMemoryMeta>, provider_base: &str, locale: Locale) -> App {
	let mut config = PushConfig::new(format!("{}/v1/messages:send", provider_base).into());
	config.locale = locale;
	Arc::new(Notifier::new(meta, test_minter(provider_base), config))
}

fn build_app(meta: InMemoryMeta, provider_base: &str, locale: Locale) -> App {
	build_app_with(Arc::new(meta), provider_base, locale)
}

fn event() -> TaskAssignmentEvent {
	TaskAssignmentEvent {
		task_id: 1,
		user_id: "user-1".into(),
		assigned_by_id: "user-2".into(),
		typ: None,
		task_title: None,
	}
}

fn provider_router() -> Router {
	Router::new()
		.route("/token", post(token_endpoint))
		.route("/v1/messages:send", post(send_endpoint))
}

#[tokio::test]
async fn test_dispatch_happy_path() {
	let base = spawn_stub(provider_router()).await;
	let app = build_app(seeded_meta(), &base, Locale::Ar);

	let receipt = dispatch_task_assignment(&app, &event()).await.unwrap();
	assert_eq!(receipt.message_id.as_deref(), Some("projects/test/messages/0:100"));
}

#[tokio::test]
async fn test_dispatch_writes_audit_log() {
	let base = spawn_stub(provider_router()).await;
	let meta = Arc::new(seeded_meta());
	let app = build_app_with(meta.clone(), &base, Locale::Ar);

	dispatch_task_assignment(&app, &event()).await.unwrap();

	let log = meta.log.lock().unwrap();
	assert_eq!(log.len(), 1);
	let entry = &log[0];
	assert_eq!(&*entry.user_id, "user-1");
	assert_eq!(entry.task_id, 1);
	assert_eq!(&*entry.typ, "task_assignment");
	assert_eq!(&*entry.title, "مهمة جديدة مُسندة إليك");
	assert!(entry.body.contains("مراجعة التقرير"));
	assert!(entry.body.contains("سارة"));
}

#[tokio::test]
async fn test_dispatch_unknown_task() {
	let base = spawn_stub(provider_router()).await;
	let app = build_app(seeded_meta(), &base, Locale::Ar);

	let mut ev = event();
	ev.task_id = 999;
	assert!(matches!(dispatch_task_assignment(&app, &ev).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_dispatch_no_device_token() {
	let base = spawn_stub(provider_router()).await;
	let app = build_app(seeded_meta(), &base, Locale::Ar);

	let mut ev = event();
	ev.user_id = "user-without-device".into();
	assert!(matches!(
		dispatch_task_assignment(&app, &ev).await,
		Err(Error::ValidationError(_))
	));
}

#[tokio::test]
async fn test_dispatch_unknown_assigner_falls_back() {
	let base = spawn_stub(provider_router()).await;
	let meta = Arc::new(seeded_meta());
	let app = build_app_with(meta.clone(), &base, Locale::Ar);

	let mut ev = event();
	ev.assigned_by_id = "nobody".into();
	dispatch_task_assignment(&app, &ev).await.unwrap();

	let log = meta.log.lock().unwrap();
	assert!(log[0].body.contains("المدير"));
}

#[tokio::test]
async fn test_dispatch_provider_rejects_token() {
	// The token endpoint issues a token the send endpoint does not accept
	let router = Router::new()
		.route(
			"/token",
			post(|| async { Json(serde_json::json!({ "access_token": "stale", "expires_in": 3600 })) }),
		)
		.route("/v1/messages:send", post(send_endpoint));
	let base = spawn_stub(router).await;
	let meta = Arc::new(seeded_meta());
	let app = build_app_with(meta.clone(), &base, Locale::Ar);

	assert!(matches!(
		dispatch_task_assignment(&app, &event()).await,
		Err(Error::NetworkError(_))
	));
	// Nothing was sent, so nothing gets logged
	assert!(meta.log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_dispatch_stale_device_token() {
	let router = Router::new().route("/token", post(token_endpoint)).route(
		"/v1/messages:send",
		post(|| async { (StatusCode::NOT_FOUND, "UNREGISTERED") }),
	);
	let base = spawn_stub(router).await;
	let app = build_app(seeded_meta(), &base, Locale::Ar);

	assert!(matches!(
		dispatch_task_assignment(&app, &event()).await,
		Err(Error::ValidationError(_))
	));
}

#[tokio::test]
async fn test_dispatch_survives_audit_log_failure() {
	let base = spawn_stub(provider_router()).await;
	let mut meta = seeded_meta();
	meta.fail_log = true;
	let app = build_app(meta, &base, Locale::Ar);

	let receipt = dispatch_task_assignment(&app, &event()).await.unwrap();
	assert!(receipt.message_id.is_some());
}

#[tokio::test]
async fn test_dispatch_english_locale() {
	let base = spawn_stub(provider_router()).await;
	let meta = Arc::new(seeded_meta());
	let app = build_app_with(meta.clone(), &base, Locale::En);

	dispatch_task_assignment(&app, &event()).await.unwrap();

	let log = meta.log.lock().unwrap();
	assert_eq!(&*log[0].title, "New task assigned to you");
}

#[tokio::test]
async fn test_handler_success() {
	let base = spawn_stub(provider_router()).await;
	let app = build_app(seeded_meta(), &base, Locale::Ar);

	let response =
		post_task_assignment(axum::extract::State(app), Json(event())).await.unwrap();
	assert!(response.0.success);
	assert_eq!(response.0.message_id.as_deref(), Some("projects/test/messages/0:100"));
}

#[tokio::test]
async fn test_handler_propagates_not_found() {
	let base = spawn_stub(provider_router()).await;
	let app = build_app(seeded_meta(), &base, Locale::Ar);

	let mut ev = event();
	ev.task_id = 404;
	let result = post_task_assignment(axum::extract::State(app), Json(ev)).await;
	assert!(matches!(result, Err(Error::NotFound)));
}
