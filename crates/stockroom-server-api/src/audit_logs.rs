// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::roles::RoleApi;

/// One audit trail entry as returned to admins.
///
/// The actor fields are the snapshot taken when the mutation happened, not
/// a join against the current user table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuditLogEntryResponse {
	pub id: String,
	pub actor_id: String,
	pub actor_email: String,
	pub actor_role: RoleApi,
	pub action: String,
	pub entity_type: String,
	pub entity_id: String,
	#[cfg_attr(feature = "openapi", schema(value_type = Object))]
	pub before_state: Option<Value>,
	#[cfg_attr(feature = "openapi", schema(value_type = Object))]
	pub after_state: Option<Value>,
	pub created_at: DateTime<Utc>,
}

/// Error response for audit log endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuditLogErrorResponse {
	pub error: String,
}
