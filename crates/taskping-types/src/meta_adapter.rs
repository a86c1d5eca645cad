//! Adapter trait for the metadata store backing the dispatcher.
//!
//! The dispatcher needs four narrow operations against whatever store the
//! embedding application uses: the task row, the assignee's device
//! credential, the assigner's display name, and an append-only notification
//! log. Schema and storage engine are the adapter implementation's business.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::prelude::*;

/// A task row, as far as notification building is concerned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRow {
	pub task_id: u64,
	pub title: Box<str>,
	#[serde(default)]
	pub due_date: Option<Box<str>>,
	/// Free-form priority label ("low", "medium", "high")
	#[serde(default)]
	pub priority: Option<Box<str>>,
}

/// One row of the append-only notification audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationLogEntry {
	pub user_id: Box<str>,
	pub task_id: u64,
	pub title: Box<str>,
	pub body: Box<str>,
	/// Notification kind ("task_assignment")
	pub typ: Box<str>,
	/// ISO 8601 timestamp of the send attempt
	pub sent_at: Box<str>,
}

/// Metadata store operations required by the dispatcher
#[async_trait]
pub trait MetaAdapter: Debug + Send + Sync {
	/// Read a task row. `Error::NotFound` if the task does not exist.
	async fn read_task(&self, task_id: u64) -> TpResult<TaskRow>;

	/// Read the push device credential registered for a user.
	///
	/// `Ok(None)` means the user has no usable device registration; it is not
	/// a store failure.
	async fn read_device_token(&self, user_id: &str) -> TpResult<Option<Box<str>>>;

	/// Read a user's display name. `Ok(None)` if the profile is missing.
	async fn read_profile_name(&self, user_id: &str) -> TpResult<Option<Box<str>>>;

	/// Append a notification log row.
	async fn create_notification_log(&self, entry: &NotificationLogEntry) -> TpResult<()>;
}

// vim: ts=4
