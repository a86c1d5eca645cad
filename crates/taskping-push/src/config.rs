//! Dispatcher configuration
//!
//! All configuration is passed in explicitly by the embedding application;
//! nothing here reads environment variables or other ambient state.

use crate::message::Locale;

/// Token-exchange endpoint of the push provider's identity service
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Permission scope for the provider's message send capability
pub const DEFAULT_MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Dispatcher settings
#[derive(Debug, Clone)]
pub struct PushConfig {
	/// Provider send endpoint, e.g.
	/// `https://fcm.googleapis.com/v1/projects/<project>/messages:send`
	pub send_url: Box<str>,
	/// Locale for notification title/body
	pub locale: Locale,
	/// Whether to record attempts in the notification log
	pub log_notifications: bool,
}

impl PushConfig {
	pub fn new(send_url: Box<str>) -> Self {
		Self { send_url, locale: Locale::Ar, log_notifications: true }
	}
}

// vim: ts=4
