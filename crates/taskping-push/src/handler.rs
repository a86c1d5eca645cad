//! HTTP trigger for the dispatcher
//!
//! A single handler function; routing, CORS, and caller authentication are
//! the embedding application's concern.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::dispatch::{TaskAssignmentEvent, dispatch_task_assignment};
use crate::prelude::*;

/// Response for a delivered notification
#[derive(Debug, Serialize)]
pub struct NotifyResponse {
	pub success: bool,
	pub message: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message_id: Option<Box<str>>,
}

/// POST handler for task-assignment events.
///
/// Error mapping comes from the shared `Error` type: unknown task is 404,
/// bad payload or unreachable recipient is 400, provider failure is 502.
pub async fn post_task_assignment(
	State(app): State<App>,
	Json(event): Json<TaskAssignmentEvent>,
) -> Result<Json<NotifyResponse>, Error> {
	debug!(task_id = event.task_id, user_id = %event.user_id, "task assignment event received");

	let receipt = dispatch_task_assignment(&app, &event).await?;

	Ok(Json(NotifyResponse {
		success: true,
		message: "notification sent",
		message_id: receipt.message_id,
	}))
}

// vim: ts=4
