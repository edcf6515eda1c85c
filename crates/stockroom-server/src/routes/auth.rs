// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Login and registration handlers.
//!
//! Both endpoints are public. Login failures return the same body for an
//! unknown email and a wrong password so the endpoint cannot be used to
//! enumerate accounts.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use stockroom_server_api::{
	AuthErrorResponse, AuthUserResponse, LoginRequest, LoginResponse, RegisterRequest,
};
use stockroom_server_auth::{hash_password, verify_password, Role};
use stockroom_server_db::{DbError, User};

use crate::api::AppState;
use crate::api_response::{bad_request, conflict, internal_error, unauthorized};

fn auth_user_response(user: &User) -> AuthUserResponse {
	AuthUserResponse {
		id: user.id.to_string(),
		email: user.email.clone(),
		role: user.role.into(),
	}
}

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = AuthErrorResponse),
        (status = 401, description = "Invalid credentials", body = AuthErrorResponse)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn login(
	State(state): State<AppState>,
	Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
	let (Some(email), Some(password)) = (
		payload.email.filter(|e| !e.is_empty()),
		payload.password.filter(|p| !p.is_empty()),
	) else {
		return bad_request::<AuthErrorResponse>("Email and password required").into_response();
	};

	let user = match state.user_repo.get_by_email(&email).await {
		Ok(Some(user)) => user,
		Ok(None) => {
			tracing::debug!("login failed: unknown email");
			return unauthorized::<AuthErrorResponse>("Invalid credentials").into_response();
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to load user for login");
			return internal_error::<AuthErrorResponse>("Server error").into_response();
		}
	};

	if !verify_password(&password, &user.password_hash) {
		tracing::warn!(user_id = %user.id, "login failed: wrong password");
		return unauthorized::<AuthErrorResponse>("Invalid credentials").into_response();
	}

	let token = match state.token_service.issue(&user.identity()) {
		Ok(token) => token,
		Err(e) => {
			tracing::error!(error = %e, user_id = %user.id, "failed to issue token");
			return internal_error::<AuthErrorResponse>("Server error").into_response();
		}
	};

	tracing::info!(user_id = %user.id, role = %user.role, "user logged in");

	(
		StatusCode::OK,
		Json(LoginResponse {
			token,
			user: auth_user_response(&user),
		}),
	)
		.into_response()
}

/// Register a new account.
///
/// The very first account in an empty store becomes the admin so the
/// at-least-one-admin invariant holds from the first write; every later
/// registration is a viewer. Elevated roles are granted through the
/// admin-only user management endpoints.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthUserResponse),
        (status = 400, description = "Missing email or password", body = AuthErrorResponse),
        (status = 409, description = "Email already exists", body = AuthErrorResponse)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn register(
	State(state): State<AppState>,
	Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
	let (Some(email), Some(password)) = (
		payload.email.filter(|e| !e.is_empty()),
		payload.password.filter(|p| !p.is_empty()),
	) else {
		return bad_request::<AuthErrorResponse>("Email and password required").into_response();
	};

	let role = match state.user_repo.count_users().await {
		Ok(0) => Role::Admin,
		Ok(_) => Role::Viewer,
		Err(e) => {
			tracing::error!(error = %e, "failed to count users for registration");
			return internal_error::<AuthErrorResponse>("Server error").into_response();
		}
	};

	let password_hash = match hash_password(&password) {
		Ok(hash) => hash,
		Err(e) => {
			tracing::error!(error = %e, "failed to hash password");
			return internal_error::<AuthErrorResponse>("Server error").into_response();
		}
	};

	match state.user_repo.create_user(&email, &password_hash, role).await {
		Ok(user) => {
			tracing::info!(user_id = %user.id, role = %user.role, "user registered");
			(StatusCode::CREATED, Json(auth_user_response(&user))).into_response()
		}
		Err(DbError::Conflict(_)) => {
			conflict::<AuthErrorResponse>("Email already exists").into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to create user");
			internal_error::<AuthErrorResponse>("Server error").into_response()
		}
	}
}
