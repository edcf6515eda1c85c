// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::roles::RoleApi;

/// Request to log in with email and password.
///
/// Fields are optional so missing values surface as a 400 with a stable
/// error body rather than a deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LoginRequest {
	pub email: Option<String>,
	pub password: Option<String>,
}

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RegisterRequest {
	pub email: Option<String>,
	pub password: Option<String>,
}

/// A user as returned by auth endpoints (never includes the password hash).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuthUserResponse {
	pub id: String,
	pub email: String,
	pub role: RoleApi,
}

/// Successful login: a signed identity token plus the user it represents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LoginResponse {
	pub token: String,
	pub user: AuthUserResponse,
}

/// Error response for auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuthErrorResponse {
	pub error: String,
}
