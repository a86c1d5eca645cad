//! Service-credential token minting
//!
//! Converts a long-lived service credential (issuer identity + RSA signing
//! key) into a short-lived bearer token by building a signed RS256 assertion
//! and exchanging it at the identity provider's token endpoint
//! (`urn:ietf:params:oauth:grant-type:jwt-bearer`).
//!
//! Each mint is single-shot and stateless: a fresh issued-at/expiry pair, no
//! key or token caching, no retries. Concurrent mints share nothing.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use rsa::signature::{SignatureEncoding, Signer};
use serde::{Deserialize, Serialize};

use taskping_types::types::unix_now;

use crate::error::Error;
use crate::key::{import_signing_key, normalize_pem};

/// Assertion lifetime mandated for the exchange. The expiry always equals
/// issued-at plus exactly this many seconds.
pub const ASSERTION_LIFETIME: i64 = 3600;

/// Grant type for the signed-assertion exchange (RFC 7523)
pub const GRANT_TYPE_JWT_BEARER: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// A long-lived service credential
#[derive(Clone)]
pub struct ServiceCredential {
	/// Identity of the calling service principal (also used as `sub`)
	pub issuer: Box<str>,
	/// RSA private key, PEM or PEM-like (escaped newlines tolerated)
	pub private_key_pem: Box<str>,
}

impl std::fmt::Debug for ServiceCredential {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		// Never put key material in logs
		f.debug_struct("ServiceCredential")
			.field("issuer", &self.issuer)
			.field("private_key_pem", &"..")
			.finish()
	}
}

/// Everything the minter needs, passed in explicitly at construction.
/// The minter never reads ambient process state.
#[derive(Debug, Clone)]
pub struct MinterConfig {
	pub credential: ServiceCredential,
	/// Token-exchange endpoint of the identity provider; doubles as the
	/// assertion's audience claim
	pub audience_url: Box<str>,
	/// Permission scope requested for the bearer token
	pub scope: Box<str>,
	pub lifetime_secs: i64,
}

impl MinterConfig {
	pub fn new(credential: ServiceCredential, audience_url: Box<str>, scope: Box<str>) -> Self {
		Self { credential, audience_url, scope, lifetime_secs: ASSERTION_LIFETIME }
	}
}

/// An opaque short-lived bearer token returned by the provider.
///
/// Owned exclusively by the calling request and discarded after use; the
/// accompanying expiry is not tracked because every call mints afresh.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(pub Box<str>);

impl BearerToken {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Debug for BearerToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		// Tokens grant send capability; keep them out of debug logs
		write!(f, "BearerToken(..)")
	}
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
	iss: &'a str,
	sub: &'a str,
	aud: &'a str,
	scope: &'a str,
	iat: i64,
	exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
	access_token: String,
}

/// Mints bearer tokens for the push provider's send API
#[derive(Debug, Clone)]
pub struct TokenMinter {
	config: MinterConfig,
}

impl TokenMinter {
	pub fn new(config: MinterConfig) -> Self {
		Self { config }
	}

	/// Build the signed assertion `header.claims.signature` for the given
	/// issued-at timestamp.
	///
	/// Deterministic for a fixed key and timestamp; callers pass a fresh
	/// `iat` per mint so assertions are never reused.
	pub fn build_assertion(&self, iat: i64) -> Result<String, Error> {
		let der = normalize_pem(&self.config.credential.private_key_pem)?;
		let signing_key = import_signing_key(&der)?;

		let header = serde_json::json!({ "alg": "RS256", "typ": "JWT" });
		let claims = AssertionClaims {
			iss: &self.config.credential.issuer,
			sub: &self.config.credential.issuer,
			aud: &self.config.audience_url,
			scope: &self.config.scope,
			iat,
			exp: iat + self.config.lifetime_secs,
		};

		let header_json = serde_json::to_string(&header)
			.map_err(|e| Error::KeyImport(format!("header serialization: {}", e)))?;
		let claims_json = serde_json::to_string(&claims)
			.map_err(|e| Error::KeyImport(format!("claims serialization: {}", e)))?;

		let signing_input = format!(
			"{}.{}",
			URL_SAFE_NO_PAD.encode(header_json.as_bytes()),
			URL_SAFE_NO_PAD.encode(claims_json.as_bytes())
		);

		let signature = signing_key
			.try_sign(signing_input.as_bytes())
			.map_err(|e| Error::KeyImport(format!("key unusable for signing: {}", e)))?;

		Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature.to_bytes())))
	}

	/// Mint a fresh bearer token: sign an assertion, exchange it at the
	/// audience URL, return the provider's `access_token`.
	pub async fn mint_bearer_token(&self) -> Result<BearerToken, Error> {
		let assertion = self.build_assertion(unix_now())?;
		self.exchange(&assertion).await
	}

	/// Exchange a signed assertion for a bearer token.
	async fn exchange(&self, assertion: &str) -> Result<BearerToken, Error> {
		let form =
			serde_urlencoded::to_string([("grant_type", GRANT_TYPE_JWT_BEARER), ("assertion", assertion)])
				.map_err(|e| Error::TokenExchange {
					status: 0,
					body: format!("request encoding failed: {}", e),
				})?;

		let connector = HttpsConnectorBuilder::new()
			.with_native_roots()
			.map_err(|e| Error::TokenExchange { status: 0, body: format!("TLS setup failed: {}", e) })?
			.https_or_http()
			.enable_http1()
			.build();
		let client: Client<_, Full<Bytes>> = Client::builder(TokioExecutor::new()).build(connector);

		let request = hyper::Request::builder()
			.method(hyper::Method::POST)
			.uri(&*self.config.audience_url)
			.header("Content-Type", "application/x-www-form-urlencoded")
			.body(Full::new(Bytes::from(form)))
			.map_err(|e| Error::TokenExchange { status: 0, body: format!("request build failed: {}", e) })?;

		let response = client.request(request).await.map_err(|e| Error::TokenExchange {
			status: 0,
			body: format!("transport error: {}", e),
		})?;

		let status = response.status();
		let body = response
			.into_body()
			.collect()
			.await
			.map_err(|e| Error::TokenExchange {
				status: status.as_u16(),
				body: format!("failed to read response body: {}", e),
			})?
			.to_bytes();

		if !status.is_success() {
			tracing::warn!(status = status.as_u16(), "token exchange rejected");
			return Err(Error::TokenExchange {
				status: status.as_u16(),
				body: String::from_utf8_lossy(&body).into_owned(),
			});
		}

		let parsed: TokenResponse = serde_json::from_slice(&body).map_err(|e| Error::TokenExchange {
			status: status.as_u16(),
			body: format!("unparseable token response: {}", e),
		})?;

		tracing::debug!(issuer = %self.config.credential.issuer, "bearer token minted");
		Ok(BearerToken(parsed.access_token.into()))
	}
}


// vim: ts=4
