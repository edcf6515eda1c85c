// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A product in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ProductResponse {
	pub id: String,
	pub referencia: Option<String>,
	pub cor: Option<String>,
	pub x: Option<i64>,
	pub y: Option<i64>,
	pub rack: Option<String>,
	pub acab: Option<String>,
	pub obs: Option<String>,
	pub marked: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Request body for creating or replacing a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ProductPayload {
	#[serde(default)]
	pub referencia: Option<String>,
	#[serde(default)]
	pub cor: Option<String>,
	#[serde(default)]
	pub x: Option<i64>,
	#[serde(default)]
	pub y: Option<i64>,
	#[serde(default)]
	pub rack: Option<String>,
	#[serde(default)]
	pub acab: Option<String>,
	#[serde(default)]
	pub obs: Option<String>,
	#[serde(default)]
	pub marked: Option<bool>,
}

/// Request body for the CSV bulk import.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ImportRequest {
	pub csv: Option<String>,
}

/// Result of a CSV bulk import.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ImportResponse {
	pub message: String,
	pub rows: u64,
}

/// Success response for product operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ProductSuccessResponse {
	pub message: String,
}

/// Error response for product endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ProductErrorResponse {
	pub error: String,
}
