// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Authentication failures.
///
/// `MissingCredential`, `InvalidToken` and `Expired` all surface externally
/// as the same 401 response; the distinction exists for logging only.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
	#[error("missing credential")]
	MissingCredential,

	#[error("invalid token")]
	InvalidToken,

	#[error("token expired")]
	Expired,

	#[error("password hashing failed: {0}")]
	Hashing(String),
}
