// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod audit_logs;
pub mod auth;
pub mod products;
pub mod roles;
pub mod users;

pub use audit_logs::{AuditLogEntryResponse, AuditLogErrorResponse};
pub use auth::{AuthErrorResponse, AuthUserResponse, LoginRequest, LoginResponse, RegisterRequest};
pub use products::{
	ImportRequest, ImportResponse, ProductErrorResponse, ProductPayload, ProductResponse,
	ProductSuccessResponse,
};
pub use roles::RoleApi;
pub use users::{
	CreateUserRequest, UpdateRoleRequest, UserErrorResponse, UserResponse, UserSuccessResponse,
};
