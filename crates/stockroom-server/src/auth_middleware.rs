// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request authentication and route-level role authorization.
//!
//! # Architecture
//!
//! Each request passes through a fixed state machine:
//!
//! ```text
//! Unauthenticated → Authenticated → Authorized | Forbidden
//! ```
//!
//! - [`authenticate`] runs on every request: it extracts the bearer
//!   credential, verifies it, and stores an [`AuthContext`] in request
//!   extensions. It never rejects by itself, so public routes share the
//!   same pipeline.
//! - [`RequireAuth`] is the handler-level extractor: 401 when the context
//!   carries no verified identity.
//! - [`RequireRole`] is a Tower route layer holding the explicit allowed-role
//!   set for a route group: 401 when unauthenticated, 403 when the role is
//!   not in the set. The two statuses are deliberately distinct.
//!
//! # Security Properties
//!
//! - Authorization decisions are logged with the actor id, never the token
//! - Error responses do not leak which roles would have been sufficient

use axum::{
	body::Body,
	extract::{FromRequestParts, Request, State},
	http::{request::Parts, StatusCode},
	middleware::Next,
	response::{IntoResponse, Response},
	Json,
};
use pin_project_lite::pin_project;
use std::{
	future::Future,
	pin::Pin,
	task::{Context, Poll},
};
use tower::{Layer, Service};

use stockroom_server_api::AuthErrorResponse;
use stockroom_server_auth::{extract_bearer_token, AuthContext, Identity, Role};

use crate::api::AppState;

/// Verify the bearer credential (if any) and attach an [`AuthContext`].
///
/// Both a missing credential and a failed verification produce an
/// unauthenticated context; the distinction is logged but externally both
/// surface as 401 at the authorization seam.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
	let ctx = match extract_bearer_token(req.headers()) {
		None => AuthContext::unauthenticated(),
		Some(token) => match state.token_service.verify(&token) {
			Ok(identity) => AuthContext::authenticated(identity),
			Err(e) => {
				tracing::debug!(error = %e, "rejected bearer credential");
				AuthContext::unauthenticated()
			}
		},
	};

	req.extensions_mut().insert(ctx);
	next.run(req).await
}

fn unauthorized_response() -> Response {
	(
		StatusCode::UNAUTHORIZED,
		Json(AuthErrorResponse {
			error: "Authentication required".to_string(),
		}),
	)
		.into_response()
}

fn forbidden_response() -> Response {
	(
		StatusCode::FORBIDDEN,
		Json(AuthErrorResponse {
			error: "Insufficient permissions".to_string(),
		}),
	)
		.into_response()
}

/// Extractor yielding the verified identity, or 401.
pub struct RequireAuth(pub Identity);

impl<S> FromRequestParts<S> for RequireAuth
where
	S: Send + Sync,
{
	type Rejection = Response;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		parts
			.extensions
			.get::<AuthContext>()
			.and_then(|ctx| ctx.identity().cloned())
			.map(RequireAuth)
			.ok_or_else(unauthorized_response)
	}
}

/// Route layer that checks the actor's role against an explicit allowed set.
///
/// # Example
///
/// ```ignore
/// Router::new()
///     .route("/users", get(list_users))
///     .route_layer(RequireRole::admin());
/// ```
#[derive(Clone)]
pub struct RequireRole {
	allowed: &'static [Role],
}

impl RequireRole {
	/// Admin only: user management and the audit log.
	pub fn admin() -> Self {
		Self {
			allowed: &[Role::Admin],
		}
	}

	/// Any authenticated role.
	pub fn authenticated() -> Self {
		Self {
			allowed: Role::all(),
		}
	}
}

impl<S> Layer<S> for RequireRole {
	type Service = RequireRoleService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RequireRoleService {
			inner,
			allowed: self.allowed,
		}
	}
}

/// Service wrapper for [`RequireRole`] layer.
#[derive(Clone)]
pub struct RequireRoleService<S> {
	inner: S,
	allowed: &'static [Role],
}

impl<S> Service<Request<Body>> for RequireRoleService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send,
{
	type Response = Response;
	type Error = S::Error;
	type Future = RequireRoleFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let auth_ctx = req
			.extensions()
			.get::<AuthContext>()
			.cloned()
			.unwrap_or_else(AuthContext::unauthenticated);

		let Some(identity) = auth_ctx.identity else {
			tracing::debug!(allowed = ?self.allowed, "authorization denied: not authenticated");
			return RequireRoleFuture::Rejected {
				resp: Some(unauthorized_response()),
			};
		};

		if !self.allowed.contains(&identity.role) {
			tracing::info!(
				actor_id = %identity.id,
				role = %identity.role,
				allowed = ?self.allowed,
				"authorization denied: role not in allowed set"
			);
			return RequireRoleFuture::Rejected {
				resp: Some(forbidden_response()),
			};
		}

		RequireRoleFuture::Inner {
			fut: self.inner.call(req),
		}
	}
}

pin_project! {
	/// Future for [`RequireRoleService`].
	#[project = RequireRoleFutureProj]
	pub enum RequireRoleFuture<F> {
		Inner { #[pin] fut: F },
		Rejected { resp: Option<Response> },
	}
}

impl<F, E> Future for RequireRoleFuture<F>
where
	F: Future<Output = Result<Response, E>>,
{
	type Output = Result<Response, E>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match self.project() {
			RequireRoleFutureProj::Inner { fut } => fut.poll(cx),
			RequireRoleFutureProj::Rejected { resp } => {
				let resp = resp.take().expect("rejection polled after completion");
				Poll::Ready(Ok(resp))
			}
		}
	}
}
