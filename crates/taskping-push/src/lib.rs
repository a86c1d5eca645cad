//! Task-assignment push notification dispatch.
//!
//! Given a task-assignment event, this crate looks up the task and the
//! assignee's device credential through a [`MetaAdapter`], mints a
//! short-lived bearer token with `taskping-auth`, delivers a localized push
//! message to the provider's send endpoint, and records the attempt in the
//! notification log (best effort).
//!
//! There is deliberately no retry, no token caching, and no scheduling:
//! one event in, one delivery attempt out.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod handler;
pub mod message;
pub mod send;

mod prelude;

pub use config::PushConfig;
pub use dispatch::{DispatchReceipt, TaskAssignmentEvent, dispatch_task_assignment};
pub use message::{Locale, NotificationMessage};
pub use send::SendOutcome;

use std::sync::Arc;

use taskping_auth::TokenMinter;
use taskping_types::meta_adapter::MetaAdapter;

/// Dispatcher state: the metadata store, the token minter, and settings.
///
/// Owns nothing mutable; concurrent dispatches share it freely.
#[derive(Debug)]
pub struct Notifier {
	pub meta_adapter: Arc<dyn MetaAdapter>,
	pub minter: TokenMinter,
	pub config: PushConfig,
}

impl Notifier {
	pub fn new(meta_adapter: Arc<dyn MetaAdapter>, minter: TokenMinter, config: PushConfig) -> Self {
		Self { meta_adapter, minter, config }
	}
}

pub type App = Arc<Notifier>;

// vim: ts=4
