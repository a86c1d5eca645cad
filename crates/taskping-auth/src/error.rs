//! Error types for token minting

use std::fmt;

/// Minting failures, one variant per failure point.
///
/// The set is closed on purpose: callers branch on these instead of parsing
/// provider error strings. The minter never recovers internally; retry policy
/// belongs to the caller.
#[derive(Debug)]
pub enum Error {
	/// The credential's key material is not valid base64 after normalization,
	/// or decodes to nothing
	KeyFormat(String),

	/// The decoded bytes are not an importable PKCS#8 RSA key for
	/// RSASSA-PKCS1-v1.5 / SHA-256
	KeyImport(String),

	/// The identity provider rejected the assertion, or the exchange failed
	/// at the transport level. `status` is 0 when no HTTP response was
	/// received. May be transient (5xx, transport) or permanent (4xx); the
	/// minter does not distinguish.
	TokenExchange { status: u16, body: String },
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::KeyFormat(msg) => write!(f, "key format error: {}", msg),
			Error::KeyImport(msg) => write!(f, "key import error: {}", msg),
			Error::TokenExchange { status, body } => {
				write!(f, "token exchange failed (status {}): {}", status, body)
			}
		}
	}
}

impl std::error::Error for Error {}

impl From<Error> for taskping_types::Error {
	fn from(err: Error) -> Self {
		match err {
			Error::KeyFormat(msg) | Error::KeyImport(msg) => taskping_types::Error::ConfigError(msg),
			Error::TokenExchange { status, body } => taskping_types::Error::NetworkError(format!(
				"token exchange failed (status {}): {}",
				status, body
			)),
		}
	}
}

// vim: ts=4
