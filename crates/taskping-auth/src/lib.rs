//! Service-credential token minting for the taskping dispatcher.
//!
//! The push provider's send API requires a short-lived OAuth2 bearer token.
//! This crate turns a long-lived service credential (issuer identity + RSA
//! private key) into such a token via the standard signed-assertion exchange:
//!
//! 1. normalize the transported key material ([`key::normalize_pem`]),
//! 2. import it as a PKCS#8 RSA key for RSASSA-PKCS1-v1.5 / SHA-256,
//! 3. sign an RS256 assertion with `iss`/`sub`/`aud`/`scope`/`iat`/`exp`,
//! 4. POST it to the token endpoint with the `jwt-bearer` grant type.
//!
//! Every failure is a value of the closed [`Error`] set; there is no fallback
//! signing path, no retry, and no caching of keys or tokens.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod error;
pub mod key;
pub mod minter;

pub use error::Error;
pub use key::normalize_pem;
pub use minter::{
	ASSERTION_LIFETIME, BearerToken, GRANT_TYPE_JWT_BEARER, MinterConfig, ServiceCredential,
	TokenMinter,
};

// vim: ts=4
