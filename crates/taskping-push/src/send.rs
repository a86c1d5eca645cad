//! Push message delivery to the provider's send endpoint
//!
//! One bearer-authenticated JSON POST per message. Classification of the
//! provider's response is the caller's input for deciding what a failure
//! means; this module never retries.

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::Serialize;

use taskping_auth::BearerToken;

use crate::message::NotificationMessage;
use crate::prelude::*;

/// Client-side action hint carried in the data map
const CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";

/// Structured data attached to the notification.
///
/// The provider requires every data value to be a string.
#[derive(Debug, Clone, Serialize)]
pub struct PushData {
	pub task_id: String,
	pub task_title: String,
	pub assigned_by: String,
	pub due_date: String,
	pub priority: String,
	pub click_action: &'static str,
}

impl PushData {
	pub fn new(
		task_id: u64,
		task_title: &str,
		assigned_by: &str,
		due_date: Option<&str>,
		priority: Option<&str>,
	) -> Self {
		Self {
			task_id: task_id.to_string(),
			task_title: task_title.to_string(),
			assigned_by: assigned_by.to_string(),
			due_date: due_date.unwrap_or("").to_string(),
			priority: priority.unwrap_or("medium").to_string(),
			click_action: CLICK_ACTION,
		}
	}
}

/// Result of one delivery attempt
#[derive(Debug)]
pub enum SendOutcome {
	/// Accepted by the provider
	Sent {
		/// Provider-assigned message id, when the response carries one
		message_id: Option<Box<str>>,
	},
	/// The device credential is no longer valid (404/410)
	DeviceGone,
	/// Rejected with a non-retryable status (other 4xx)
	PermanentError(String),
	/// Transport failure or 5xx
	TemporaryError(String),
}

/// Build the send-request body for a device credential and message
pub fn build_send_body(
	device_token: &str,
	message: &NotificationMessage,
	data: &PushData,
) -> serde_json::Value {
	serde_json::json!({
		"message": {
			"token": device_token,
			"notification": {
				"title": message.title,
				"body": message.body,
			},
			"data": data,
			"android": {
				"notification": {
					"icon": "ic_notification",
					"sound": "default",
				},
			},
		},
	})
}

/// Deliver one push message
pub async fn send_push(
	send_url: &str,
	bearer: &BearerToken,
	device_token: &str,
	message: &NotificationMessage,
	data: &PushData,
) -> SendOutcome {
	let body = build_send_body(device_token, message, data);
	let body_bytes = match serde_json::to_vec(&body) {
		Ok(bytes) => bytes,
		Err(e) => return SendOutcome::PermanentError(format!("payload serialization: {}", e)),
	};

	let connector = match HttpsConnectorBuilder::new().with_native_roots() {
		Ok(builder) => builder.https_or_http().enable_http1().build(),
		Err(e) => return SendOutcome::TemporaryError(format!("TLS setup failed: {}", e)),
	};
	let client: Client<_, Full<Bytes>> = Client::builder(TokioExecutor::new()).build(connector);

	let request = match hyper::Request::builder()
		.method(hyper::Method::POST)
		.uri(send_url)
		.header("Content-Type", "application/json")
		.header("Authorization", format!("Bearer {}", bearer.as_str()))
		.body(Full::new(Bytes::from(body_bytes)))
	{
		Ok(req) => req,
		Err(e) => return SendOutcome::PermanentError(format!("request build error: {}", e)),
	};

	let response = match client.request(request).await {
		Ok(response) => response,
		Err(e) => return SendOutcome::TemporaryError(format!("transport error: {}", e)),
	};

	let status = response.status();
	let response_body = response.into_body().collect().await.ok().map(http_body_util::Collected::to_bytes);
	let body_str = response_body.as_ref().and_then(|b| std::str::from_utf8(b).ok()).unwrap_or("");

	if status.is_success() {
		// The provider names accepted messages ("projects/<p>/messages/<id>")
		let message_id = serde_json::from_str::<serde_json::Value>(body_str)
			.ok()
			.and_then(|v| v.get("name").and_then(|n| n.as_str()).map(Box::from));
		debug!(status = status.as_u16(), "push message accepted");
		SendOutcome::Sent { message_id }
	} else if status == hyper::StatusCode::NOT_FOUND || status == hyper::StatusCode::GONE {
		SendOutcome::DeviceGone
	} else if status.is_client_error() {
		SendOutcome::PermanentError(format!("HTTP {}: {}", status, body_str))
	} else {
		SendOutcome::TemporaryError(format!("HTTP {}: {}", status, body_str))
	}
}


// vim: ts=4
