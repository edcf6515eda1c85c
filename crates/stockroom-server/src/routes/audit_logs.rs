// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Audit log read handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use stockroom_server_api::{AuditLogEntryResponse, AuditLogErrorResponse};
use stockroom_server_audit::AuditLogEntry;
use stockroom_server_db::AUDIT_LOG_DISPLAY_CAP;

use crate::api::AppState;
use crate::api_response::internal_error;
use crate::auth_middleware::RequireAuth;

fn entry_response(entry: AuditLogEntry) -> AuditLogEntryResponse {
	AuditLogEntryResponse {
		id: entry.id.to_string(),
		actor_id: entry.actor.id.to_string(),
		actor_email: entry.actor.email,
		actor_role: entry.actor.role.into(),
		action: entry.action.to_string(),
		entity_type: entry.entity_type,
		entity_id: entry.entity_id,
		before_state: entry.before_state,
		after_state: entry.after_state,
		created_at: entry.created_at,
	}
}

/// The most recent audit entries, newest first, capped at 200 (admin only).
#[utoipa::path(
    get,
    path = "/audit-logs",
    responses(
        (status = 200, description = "Most recent audit entries", body = [AuditLogEntryResponse]),
        (status = 401, description = "Not authenticated", body = AuditLogErrorResponse),
        (status = 403, description = "Not authorized (admin required)", body = AuditLogErrorResponse)
    ),
    tag = "audit-logs"
)]
#[tracing::instrument(skip(state), fields(actor_id = %identity.id))]
pub async fn list_audit_logs(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
) -> impl IntoResponse {
	match state.audit_log_repo.list_recent(AUDIT_LOG_DISPLAY_CAP).await {
		Ok(entries) => {
			let entries: Vec<AuditLogEntryResponse> =
				entries.into_iter().map(entry_response).collect();
			(StatusCode::OK, Json(entries)).into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to list audit logs");
			internal_error::<AuditLogErrorResponse>("Failed to fetch audit logs").into_response()
		}
	}
}
