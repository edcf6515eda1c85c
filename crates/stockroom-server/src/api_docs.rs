// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OpenAPI documentation assembly.

use utoipa::OpenApi;

use stockroom_server_api::{
	AuditLogEntryResponse, AuditLogErrorResponse, AuthErrorResponse, AuthUserResponse,
	CreateUserRequest, ImportRequest, ImportResponse, LoginRequest, LoginResponse,
	ProductErrorResponse, ProductPayload, ProductResponse, ProductSuccessResponse, RegisterRequest,
	RoleApi, UpdateRoleRequest, UserErrorResponse, UserResponse, UserSuccessResponse,
};

use crate::routes::health::HealthResponse;

#[derive(OpenApi)]
#[openapi(
	paths(
		crate::routes::health::health,
		crate::routes::auth::login,
		crate::routes::auth::register,
		crate::routes::products::list_products,
		crate::routes::products::create_product,
		crate::routes::products::update_product,
		crate::routes::products::delete_product,
		crate::routes::products::import_products,
		crate::routes::users::list_users,
		crate::routes::users::create_user,
		crate::routes::users::update_user_role,
		crate::routes::users::delete_user,
		crate::routes::audit_logs::list_audit_logs,
	),
	components(schemas(
		HealthResponse,
		LoginRequest,
		RegisterRequest,
		LoginResponse,
		AuthUserResponse,
		AuthErrorResponse,
		ProductResponse,
		ProductPayload,
		ImportRequest,
		ImportResponse,
		ProductSuccessResponse,
		ProductErrorResponse,
		UserResponse,
		CreateUserRequest,
		UpdateRoleRequest,
		UserSuccessResponse,
		UserErrorResponse,
		AuditLogEntryResponse,
		AuditLogErrorResponse,
		RoleApi,
	)),
	tags(
		(name = "health", description = "Liveness"),
		(name = "auth", description = "Login and registration"),
		(name = "products", description = "Inventory CRUD and bulk import"),
		(name = "users", description = "Admin user management"),
		(name = "audit-logs", description = "Mutation audit trail"),
	)
)]
pub struct ApiDoc;
