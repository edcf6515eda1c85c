// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication middleware primitives for extracting and carrying identity.
//!
//! This module provides:
//! - [`AuthContext`] - auth state for request processing
//! - [`extract_bearer_token`] - pulls the bearer credential from request headers
//!
//! # Authentication Flow
//!
//! ```text
//! Request → Extract Bearer Token → Verify → AuthContext → (handler / role layer)
//! ```
//!
//! The context itself never rejects a request; rejection happens at the
//! authorization seam (extractor or role layer), which is what keeps the
//! 401/403 distinction in one place.
//!
//! # Security Notes
//!
//! - Bearer tokens are extracted from the Authorization header
//! - Token values are never logged

use http::header::AUTHORIZATION;
use http::HeaderMap;
use tracing::instrument;

use crate::error::AuthError;
use crate::types::Identity;

/// Authentication context for request processing.
///
/// This struct is used to pass authentication state through the request pipeline.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	/// Whether the request is authenticated.
	pub is_authenticated: bool,
	/// The verified identity, if authenticated.
	pub identity: Option<Identity>,
}

impl AuthContext {
	/// Create a new unauthenticated context.
	pub fn unauthenticated() -> Self {
		Self {
			is_authenticated: false,
			identity: None,
		}
	}

	/// Create a new authenticated context.
	pub fn authenticated(identity: Identity) -> Self {
		Self {
			is_authenticated: true,
			identity: Some(identity),
		}
	}

	/// Get the verified identity, if authenticated.
	pub fn identity(&self) -> Option<&Identity> {
		self.identity.as_ref()
	}

	/// Require authentication, returning the identity or an error.
	pub fn require_identity(&self) -> Result<&Identity, AuthError> {
		self.identity.as_ref().ok_or(AuthError::MissingCredential)
	}
}

/// Extract bearer token from the Authorization header.
///
/// Expects the format: `Authorization: Bearer <token>`
///
/// # Returns
///
/// The bearer token value if found, or `None` if not present or malformed.
#[instrument(level = "trace", skip_all)]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(|token| token.to_string())
}
