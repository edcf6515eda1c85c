// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Admin user management handlers.
//!
//! All routes in this group sit behind `RequireRole::admin()`. Two
//! invariants guard the mutations here:
//!
//! - an admin can never change or delete their own account through this
//!   path (checked before any store access)
//! - the last remaining admin can never be demoted or deleted (enforced
//!   atomically inside the storage layer's conditional mutation)
//!
//! Neither check has side effects on failure, and a refused mutation
//! produces no audit entry because it never reaches the mutation step.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use uuid::Uuid;

use stockroom_server_api::{
	CreateUserRequest, UpdateRoleRequest, UserErrorResponse, UserResponse, UserSuccessResponse,
};
use stockroom_server_auth::{hash_password, Identity, UserId};
use stockroom_server_db::{DbError, GuardedDelete, GuardedUpdate, User};

use crate::api::AppState;
use crate::api_response::{bad_request, conflict, forbidden, internal_error, not_found};
use crate::auth_middleware::RequireAuth;

fn user_response(user: &User) -> UserResponse {
	UserResponse {
		id: user.id.to_string(),
		email: user.email.clone(),
		role: user.role.into(),
		created_at: user.created_at,
	}
}

fn parse_user_id(id: &str) -> Result<UserId, (StatusCode, Json<UserErrorResponse>)> {
	Uuid::parse_str(id)
		.map(UserId::new)
		.map_err(|_| bad_request("Invalid user id"))
}

/// List all users (admin only). Password hashes never leave the store layer.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 401, description = "Not authenticated", body = UserErrorResponse),
        (status = 403, description = "Not authorized (admin required)", body = UserErrorResponse)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(state), fields(actor_id = %identity.id))]
pub async fn list_users(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
) -> impl IntoResponse {
	match state.user_repo.list_users().await {
		Ok(users) => {
			let users: Vec<UserResponse> = users.iter().map(user_response).collect();
			(StatusCode::OK, Json(users)).into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to list users");
			internal_error::<UserErrorResponse>("Failed to fetch users").into_response()
		}
	}
}

/// Create a user with an explicit role (admin only).
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Missing fields", body = UserErrorResponse),
        (status = 401, description = "Not authenticated", body = UserErrorResponse),
        (status = 403, description = "Not authorized (admin required)", body = UserErrorResponse),
        (status = 409, description = "Email already exists", body = UserErrorResponse)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(state, payload), fields(actor_id = %identity.id))]
pub async fn create_user(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
	let (Some(email), Some(password), Some(role)) = (
		payload.email.filter(|e| !e.is_empty()),
		payload.password.filter(|p| !p.is_empty()),
		payload.role,
	) else {
		return bad_request::<UserErrorResponse>("Missing fields").into_response();
	};

	let password_hash = match hash_password(&password) {
		Ok(hash) => hash,
		Err(e) => {
			tracing::error!(error = %e, "failed to hash password");
			return internal_error::<UserErrorResponse>("Failed to create user").into_response();
		}
	};

	match state
		.user_repo
		.create_user(&email, &password_hash, role.into())
		.await
	{
		Ok(user) => {
			tracing::info!(actor_id = %identity.id, user_id = %user.id, role = %user.role, "admin created user");
			(StatusCode::CREATED, Json(user_response(&user))).into_response()
		}
		Err(DbError::Conflict(_)) => {
			conflict::<UserErrorResponse>("Email already exists").into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to create user");
			internal_error::<UserErrorResponse>("Failed to create user").into_response()
		}
	}
}

/// Change a user's role (admin only).
#[utoipa::path(
    put,
    path = "/users/{id}/role",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = UserErrorResponse),
        (status = 401, description = "Not authenticated", body = UserErrorResponse),
        (status = 403, description = "Self-change or last admin", body = UserErrorResponse),
        (status = 404, description = "User not found", body = UserErrorResponse)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(state, payload), fields(actor_id = %identity.id, target_id = %id))]
pub async fn update_user_role(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<UpdateRoleRequest>,
) -> impl IntoResponse {
	let target_id = match parse_user_id(&id) {
		Ok(id) => id,
		Err(e) => return e.into_response(),
	};

	let Some(role) = payload.role else {
		return bad_request::<UserErrorResponse>("Role is required").into_response();
	};

	if let Some(denied) = ensure_not_self(&identity, &target_id, "You cannot change your own role")
	{
		return denied;
	}

	match state.user_repo.update_role_guarded(&target_id, role.into()).await {
		Ok(GuardedUpdate::Updated(user)) => {
			tracing::info!(
				actor_id = %identity.id,
				target_id = %target_id,
				new_role = %user.role,
				"admin changed user role"
			);
			(StatusCode::OK, Json(user_response(&user))).into_response()
		}
		Ok(GuardedUpdate::LastAdmin) => {
			tracing::warn!(
				actor_id = %identity.id,
				target_id = %target_id,
				"refused to demote the last admin"
			);
			forbidden::<UserErrorResponse>("Cannot remove the last admin").into_response()
		}
		Ok(GuardedUpdate::NotFound) => {
			not_found::<UserErrorResponse>("User not found").into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to update role");
			internal_error::<UserErrorResponse>("Failed to update role").into_response()
		}
	}
}

/// Delete a user (admin only).
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = UserSuccessResponse),
        (status = 400, description = "Invalid user id", body = UserErrorResponse),
        (status = 401, description = "Not authenticated", body = UserErrorResponse),
        (status = 403, description = "Self-delete or last admin", body = UserErrorResponse),
        (status = 404, description = "User not found", body = UserErrorResponse)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(state), fields(actor_id = %identity.id, target_id = %id))]
pub async fn delete_user(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let target_id = match parse_user_id(&id) {
		Ok(id) => id,
		Err(e) => return e.into_response(),
	};

	if let Some(denied) =
		ensure_not_self(&identity, &target_id, "You cannot delete your own account")
	{
		return denied;
	}

	match state.user_repo.delete_guarded(&target_id).await {
		Ok(GuardedDelete::Deleted) => {
			tracing::info!(actor_id = %identity.id, target_id = %target_id, "admin deleted user");
			(
				StatusCode::OK,
				Json(UserSuccessResponse {
					message: "User deleted".to_string(),
				}),
			)
				.into_response()
		}
		Ok(GuardedDelete::LastAdmin) => {
			tracing::warn!(
				actor_id = %identity.id,
				target_id = %target_id,
				"refused to delete the last admin"
			);
			forbidden::<UserErrorResponse>("Cannot delete the last admin").into_response()
		}
		Ok(GuardedDelete::NotFound) => {
			not_found::<UserErrorResponse>("User not found").into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to delete user");
			internal_error::<UserErrorResponse>("Failed to delete user").into_response()
		}
	}
}

/// Self-protection: role management never applies to the acting identity,
/// even when the actor is the only admin. Runs before any store access.
fn ensure_not_self(identity: &Identity, target_id: &UserId, message: &str) -> Option<Response> {
	if identity.id == *target_id {
		tracing::warn!(actor_id = %identity.id, "refused self-targeted user mutation");
		return Some(forbidden::<UserErrorResponse>(message).into_response());
	}
	None
}
