//! Task-assignment dispatch flow
//!
//! Sequential orchestration: validate the event, look up the task, the
//! assignee's device credential and the assigner's name, mint a bearer token,
//! deliver the push message, and best-effort record the attempt. Any step
//! before delivery that fails aborts the dispatch with a typed error; a
//! failed audit write never does.

use serde::{Deserialize, Serialize};

use taskping_types::meta_adapter::NotificationLogEntry;

use crate::message::{fallback_assigner_name, task_assigned_message};
use crate::prelude::*;
use crate::send::{PushData, SendOutcome, send_push};

/// Incoming task-assignment event
#[derive(Debug, Clone, Deserialize)]
pub struct TaskAssignmentEvent {
	pub task_id: u64,
	pub user_id: Box<str>,
	pub assigned_by_id: Box<str>,
	/// Notification kind; defaults to "task_assignment"
	#[serde(rename = "type", default)]
	pub typ: Option<Box<str>>,
	/// Title hint used when the stored task row has an empty title
	#[serde(default)]
	pub task_title: Option<Box<str>>,
}

/// Outcome of a successful dispatch
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReceipt {
	/// Provider-assigned message id, when the provider reported one
	pub message_id: Option<Box<str>>,
}

fn validate(event: &TaskAssignmentEvent) -> TpResult<()> {
	if event.task_id == 0 {
		return Err(Error::ValidationError("task_id must be non-zero".into()));
	}
	if event.user_id.trim().is_empty() {
		return Err(Error::ValidationError("user_id must not be empty".into()));
	}
	if event.assigned_by_id.trim().is_empty() {
		return Err(Error::ValidationError("assigned_by_id must not be empty".into()));
	}
	Ok(())
}

/// Dispatch one task-assignment notification.
///
/// Task existence is always validated; an event referencing an unknown task
/// fails with `Error::NotFound` before any provider traffic.
pub async fn dispatch_task_assignment(
	app: &App,
	event: &TaskAssignmentEvent,
) -> TpResult<DispatchReceipt> {
	validate(event)?;

	let task = app.meta_adapter.read_task(event.task_id).await?;

	let device_token = app
		.meta_adapter
		.read_device_token(&event.user_id)
		.await?
		.filter(|token| !token.is_empty())
		.ok_or_else(|| {
			Error::ValidationError(format!("no device token registered for user {}", event.user_id))
		})?;

	let locale = app.config.locale;
	let assigned_by = match app.meta_adapter.read_profile_name(&event.assigned_by_id).await {
		Ok(Some(name)) if !name.is_empty() => name,
		Ok(_) => fallback_assigner_name(locale).into(),
		Err(e) => {
			warn!(user_id = %event.assigned_by_id, error = %e, "assigner profile lookup failed");
			fallback_assigner_name(locale).into()
		}
	};

	let task_title = if task.title.is_empty() {
		event.task_title.clone().unwrap_or_default()
	} else {
		task.title.clone()
	};

	let message = task_assigned_message(locale, &task_title, &assigned_by);
	let data = PushData::new(
		task.task_id,
		&task_title,
		&assigned_by,
		task.due_date.as_deref(),
		task.priority.as_deref(),
	);

	// Fresh token per dispatch; the minter does not cache
	let bearer = app.minter.mint_bearer_token().await?;

	let outcome = send_push(&app.config.send_url, &bearer, &device_token, &message, &data).await;

	let message_id = match outcome {
		SendOutcome::Sent { message_id } => {
			info!(task_id = event.task_id, user_id = %event.user_id, "push notification sent");
			message_id
		}
		SendOutcome::DeviceGone => {
			warn!(user_id = %event.user_id, "device token no longer valid");
			return Err(Error::ValidationError(format!(
				"device token for user {} is no longer registered with the provider",
				event.user_id
			)));
		}
		SendOutcome::PermanentError(msg) | SendOutcome::TemporaryError(msg) => {
			error!(task_id = event.task_id, error = %msg, "push delivery failed");
			return Err(Error::NetworkError(msg));
		}
	};

	if app.config.log_notifications {
		let entry = NotificationLogEntry {
			user_id: event.user_id.clone(),
			task_id: event.task_id,
			title: message.title,
			body: message.body,
			typ: event.typ.clone().unwrap_or_else(|| "task_assignment".into()),
			sent_at: chrono::Utc::now().to_rfc3339().into(),
		};
		// Best effort; a missing audit row must not undo a delivered message
		if let Err(e) = app.meta_adapter.create_notification_log(&entry).await {
			warn!(task_id = event.task_id, error = %e, "notification log write failed");
		}
	}

	Ok(DispatchReceipt { message_id })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn event() -> TaskAssignmentEvent {
		TaskAssignmentEvent {
			task_id: 1,
			user_id: "user-1".into(),
			assigned_by_id: "user-2".into(),
			typ: None,
			task_title: None,
		}
	}

	#[test]
	fn test_validate_accepts_well_formed_event() {
		assert!(validate(&event()).is_ok());
	}

	#[test]
	fn test_validate_rejects_zero_task_id() {
		let mut ev = event();
		ev.task_id = 0;
		assert!(matches!(validate(&ev), Err(Error::ValidationError(_))));
	}

	#[test]
	fn test_validate_rejects_blank_ids() {
		let mut ev = event();
		ev.user_id = "  ".into();
		assert!(matches!(validate(&ev), Err(Error::ValidationError(_))));

		let mut ev = event();
		ev.assigned_by_id = "".into();
		assert!(matches!(validate(&ev), Err(Error::ValidationError(_))));
	}

	#[test]
	fn test_event_deserializes_with_optional_fields_absent() {
		let ev: TaskAssignmentEvent = serde_json::from_str(
			r#"{"task_id": 3, "user_id": "u", "assigned_by_id": "a"}"#,
		)
		.unwrap();
		assert_eq!(ev.task_id, 3);
		assert!(ev.typ.is_none());
		assert!(ev.task_title.is_none());
	}

	#[test]
	fn test_event_type_field_rename() {
		let ev: TaskAssignmentEvent = serde_json::from_str(
			r#"{"task_id": 3, "user_id": "u", "assigned_by_id": "a", "type": "task_assignment", "task_title": "T"}"#,
		)
		.unwrap();
		assert_eq!(ev.typ.as_deref(), Some("task_assignment"));
		assert_eq!(ev.task_title.as_deref(), Some("T"));
	}
}

// vim: ts=4
