// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication configuration.
//!
//! Controls the identity-token signing secret and token lifetime. When no
//! secret is configured the server generates an ephemeral one at startup,
//! which invalidates all outstanding tokens on restart.

use serde::Deserialize;

/// Default identity token lifetime: 1 day.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// Authentication configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct AuthConfig {
	/// HMAC secret used to sign identity tokens. None means "generate at startup".
	pub token_secret: Option<String>,
	/// Seconds until an issued token expires.
	pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			token_secret: None,
			token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
		}
	}
}

/// Authentication configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub token_secret: Option<String>,
	#[serde(default)]
	pub token_ttl_secs: Option<u64>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.token_secret.is_some() {
			self.token_secret = other.token_secret;
		}
		if other.token_ttl_secs.is_some() {
			self.token_ttl_secs = other.token_ttl_secs;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			token_secret: self.token_secret,
			token_ttl_secs: self.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_ttl_is_one_day() {
		let config = AuthConfigLayer::default().finalize();
		assert!(config.token_secret.is_none());
		assert_eq!(config.token_ttl_secs, 86_400);
	}

	#[test]
	fn test_merge_keeps_existing_when_other_empty() {
		let mut base = AuthConfigLayer {
			token_secret: Some("s3cret".to_string()),
			token_ttl_secs: Some(3600),
		};
		base.merge(AuthConfigLayer::default());
		let config = base.finalize();
		assert_eq!(config.token_secret.as_deref(), Some("s3cret"));
		assert_eq!(config.token_ttl_secs, 3600);
	}
}
