// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for authentication and authorization.
//!
//! This module defines the foundational types used throughout the auth system:
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs ([`UserId`]) preventing
//!   accidental mixing with other identifiers
//! - **[`Role`]**: the fixed set of access levels (viewer, editor, admin)
//! - **[`Identity`]**: the authenticated actor as carried inside a verified token
//!
//! All ID types implement transparent serde serialization (as UUID strings) and
//! provide conversion to/from [`uuid::Uuid`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");

// =============================================================================
// Roles
// =============================================================================

/// Access roles governing what an authenticated user may do.
///
/// This is a fixed enumerated set, not a policy language. Every operation
/// declares an explicit slice of allowed roles and membership is the entire
/// authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	/// Read-only access to the product catalogue.
	Viewer,
	/// Can create, update, delete and import products.
	Editor,
	/// Full access, including user management and the audit log.
	Admin,
}

impl Role {
	/// Returns all available roles.
	pub fn all() -> &'static [Role] {
		&[Role::Viewer, Role::Editor, Role::Admin]
	}

	/// Stable string form, matching the persisted representation.
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::Viewer => "viewer",
			Role::Editor => "editor",
			Role::Admin => "admin",
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
	type Err = ParseRoleError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"viewer" => Ok(Role::Viewer),
			"editor" => Ok(Role::Editor),
			"admin" => Ok(Role::Admin),
			other => Err(ParseRoleError(other.to_string())),
		}
	}
}

// =============================================================================
// Identity
// =============================================================================

/// The authenticated actor, as embedded in a verified token.
///
/// An identity is a snapshot taken at token issue time. A role change made
/// mid-session does not retroactively affect tokens already issued; the
/// staleness window is bounded by the token lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	pub id: UserId,
	pub email: String,
	pub role: Role,
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	mod id_types {
		use super::*;

		#[test]
		fn user_id_roundtrips() {
			let uuid = Uuid::new_v4();
			let user_id = UserId::new(uuid);
			assert_eq!(user_id.into_inner(), uuid);
		}

		#[test]
		fn user_id_generates_unique() {
			let id1 = UserId::generate();
			let id2 = UserId::generate();
			assert_ne!(id1, id2);
		}

		#[test]
		fn user_id_serializes_as_uuid() {
			let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
			let user_id = UserId::new(uuid);
			let json = serde_json::to_string(&user_id).unwrap();
			assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");
		}

		proptest! {
				#[test]
				fn user_id_roundtrip_any_uuid(
						a: u128
				) {
						let uuid = Uuid::from_u128(a);
						let user_id = UserId::new(uuid);
						prop_assert_eq!(user_id.into_inner(), uuid);
						prop_assert_eq!(Uuid::from(user_id), uuid);
				}

				#[test]
				fn user_id_display_matches_uuid(
						a: u128
				) {
						let uuid = Uuid::from_u128(a);
						let user_id = UserId::new(uuid);
						prop_assert_eq!(user_id.to_string(), uuid.to_string());
				}
		}
	}

	mod roles {
		use super::*;

		#[test]
		fn all_lists_every_role() {
			assert_eq!(Role::all().len(), 3);
		}

		#[test]
		fn serializes_snake_case() {
			assert_eq!(serde_json::to_string(&Role::Viewer).unwrap(), "\"viewer\"");
			assert_eq!(serde_json::to_string(&Role::Editor).unwrap(), "\"editor\"");
			assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
		}

		#[test]
		fn display_matches_persisted_form() {
			for role in Role::all() {
				assert_eq!(role.to_string(), role.as_str());
			}
		}

		#[test]
		fn parses_known_roles() {
			assert_eq!("viewer".parse::<Role>().unwrap(), Role::Viewer);
			assert_eq!("editor".parse::<Role>().unwrap(), Role::Editor);
			assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
		}

		#[test]
		fn rejects_unknown_role() {
			let err = "superuser".parse::<Role>().unwrap_err();
			assert_eq!(err, ParseRoleError("superuser".to_string()));
		}

		#[test]
		fn parse_is_case_sensitive() {
			assert!("Admin".parse::<Role>().is_err());
		}
	}

	mod identity {
		use super::*;

		#[test]
		fn serde_roundtrip() {
			let identity = Identity {
				id: UserId::generate(),
				email: "user@example.com".to_string(),
				role: Role::Editor,
			};
			let json = serde_json::to_string(&identity).unwrap();
			let decoded: Identity = serde_json::from_str(&json).unwrap();
			assert_eq!(identity, decoded);
		}

		#[test]
		fn role_serialized_as_snake_case_field() {
			let identity = Identity {
				id: UserId::generate(),
				email: "user@example.com".to_string(),
				role: Role::Admin,
			};
			let json = serde_json::to_string(&identity).unwrap();
			assert!(json.contains("\"role\":\"admin\""), "got: {json}");
		}
	}
}
