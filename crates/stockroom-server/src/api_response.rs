// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! API response helpers and macros.
//!
//! This module provides common response patterns for HTTP handlers:
//! - Error response helpers (bad_request, conflict, not_found, internal_error)
//! - Trait implementation macro for error response types (impl_api_error_response!)
//!
//! Every error body is `{"error": "<human readable message>"}`; internals,
//! stack traces and store identifiers never leak to the caller.

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Trait for API error response types carrying a single `error` field.
pub trait ApiErrorResponse: Serialize + Send {
	fn new(message: impl Into<String>) -> Self;
}

/// Implement `ApiErrorResponse` for a struct with an `error` field.
///
/// # Example
///
/// ```ignore
/// impl_api_error_response!(ProductErrorResponse);
/// ```
#[macro_export]
macro_rules! impl_api_error_response {
	($ty:ty) => {
		impl $crate::api_response::ApiErrorResponse for $ty {
			fn new(message: impl Into<String>) -> Self {
				Self {
					error: message.into(),
				}
			}
		}
	};
}

/// Create a 400 Bad Request response.
pub fn bad_request<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(StatusCode::BAD_REQUEST, Json(T::new(message)))
}

/// Create a 401 Unauthorized response.
pub fn unauthorized<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(StatusCode::UNAUTHORIZED, Json(T::new(message)))
}

/// Create a 403 Forbidden response.
pub fn forbidden<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(StatusCode::FORBIDDEN, Json(T::new(message)))
}

/// Create a 404 Not Found response.
pub fn not_found<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(StatusCode::NOT_FOUND, Json(T::new(message)))
}

/// Create a 409 Conflict response.
pub fn conflict<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(StatusCode::CONFLICT, Json(T::new(message)))
}

/// Create a 500 Internal Server Error response.
pub fn internal_error<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(StatusCode::INTERNAL_SERVER_ERROR, Json(T::new(message)))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Serialize)]
	struct TestErrorResponse {
		error: String,
	}

	impl_api_error_response!(TestErrorResponse);

	#[test]
	fn helpers_pair_status_with_body() {
		let (status, Json(body)) = not_found::<TestErrorResponse>("User not found");
		assert_eq!(status, StatusCode::NOT_FOUND);
		assert_eq!(body.error, "User not found");

		let (status, _) = conflict::<TestErrorResponse>("Email already exists");
		assert_eq!(status, StatusCode::CONFLICT);

		let (status, _) = internal_error::<TestErrorResponse>("Server error");
		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[test]
	fn body_serializes_to_single_error_field() {
		let (_, Json(body)) = bad_request::<TestErrorResponse>("Missing fields");
		let json = serde_json::to_string(&body).unwrap();
		assert_eq!(json, r#"{"error":"Missing fields"}"#);
	}
}
