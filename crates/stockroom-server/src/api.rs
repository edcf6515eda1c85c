// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::sync::Arc;

use axum::{
	middleware,
	routing::{delete, get, post, put},
	Router,
};
use rand::RngCore;
use sqlx::SqlitePool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use stockroom_server_api::{
	AuditLogErrorResponse, AuthErrorResponse, ProductErrorResponse, UserErrorResponse,
};
use stockroom_server_audit::AuditRecorder;
use stockroom_server_auth::TokenService;
use stockroom_server_config::ServerConfig;
use stockroom_server_db::{AuditRepository, ProductRepository, UserRepository};

use crate::auth_middleware::{authenticate, RequireRole};
use crate::impl_api_error_response;
use crate::routes;

impl_api_error_response!(AuthErrorResponse);
impl_api_error_response!(ProductErrorResponse);
impl_api_error_response!(UserErrorResponse);
impl_api_error_response!(AuditLogErrorResponse);

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
	pub user_repo: Arc<UserRepository>,
	pub product_repo: Arc<ProductRepository>,
	pub audit_log_repo: Arc<AuditRepository>,
	pub audit: Arc<AuditRecorder>,
	pub token_service: Arc<TokenService>,
}

/// Build the application state from a database pool and configuration.
pub async fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	let secret = match &config.auth.token_secret {
		Some(secret) => secret.as_bytes().to_vec(),
		None => {
			tracing::warn!(
				"no token secret configured; generating an ephemeral one \
				 (issued tokens will not survive a restart)"
			);
			let mut bytes = [0u8; 32];
			rand::thread_rng().fill_bytes(&mut bytes);
			bytes.to_vec()
		}
	};

	AppState {
		user_repo: Arc::new(UserRepository::new(pool.clone())),
		product_repo: Arc::new(ProductRepository::new(pool.clone())),
		audit_log_repo: Arc::new(AuditRepository::new(pool.clone())),
		audit: Arc::new(AuditRecorder::new(pool)),
		token_service: Arc::new(TokenService::new(&secret, config.auth.token_ttl_secs)),
	}
}

/// Build the full router.
///
/// Route groups carry their allowed-role set as a route layer; the
/// authentication middleware wraps the whole router so the context is in
/// place before any role check runs.
pub fn create_router(state: AppState) -> Router {
	let public = Router::new()
		.route("/", get(routes::health::health))
		.route("/auth/login", post(routes::auth::login))
		.route("/auth/register", post(routes::auth::register));

	let products = Router::new()
		.route(
			"/products",
			get(routes::products::list_products).post(routes::products::create_product),
		)
		.route("/products/import", post(routes::products::import_products))
		.route(
			"/products/{id}",
			put(routes::products::update_product).delete(routes::products::delete_product),
		)
		.route_layer(RequireRole::authenticated());

	let admin = Router::new()
		.route(
			"/users",
			get(routes::users::list_users).post(routes::users::create_user),
		)
		.route("/users/{id}/role", put(routes::users::update_user_role))
		.route("/users/{id}", delete(routes::users::delete_user))
		.route("/audit-logs", get(routes::audit_logs::list_audit_logs))
		.route_layer(RequireRole::admin());

	Router::new()
		.merge(public)
		.merge(products)
		.merge(admin)
		.merge(
			SwaggerUi::new("/swagger-ui")
				.url("/api-docs/openapi.json", crate::api_docs::ApiDoc::openapi()),
		)
		.layer(middleware::from_fn_with_state(state.clone(), authenticate))
		.with_state(state)
}
