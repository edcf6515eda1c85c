// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

use stockroom_server_auth::Role;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Role as exposed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum RoleApi {
	Viewer,
	Editor,
	Admin,
}

impl From<Role> for RoleApi {
	fn from(role: Role) -> Self {
		match role {
			Role::Viewer => RoleApi::Viewer,
			Role::Editor => RoleApi::Editor,
			Role::Admin => RoleApi::Admin,
		}
	}
}

impl From<RoleApi> for Role {
	fn from(role: RoleApi) -> Self {
		match role {
			RoleApi::Viewer => Role::Viewer,
			RoleApi::Editor => Role::Editor,
			RoleApi::Admin => Role::Admin,
		}
	}
}
