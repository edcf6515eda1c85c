// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core event types for audit logging.
//!
//! This module provides the foundational types for the audit system:
//!
//! - [`AuditAction`]: the kinds of mutation the trail records
//! - [`ActorSnapshot`]: who performed the mutation, frozen at write time
//! - [`AuditLogEntry`]: complete audit record
//! - [`AuditLogBuilder`]: fluent API for constructing entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use stockroom_server_auth::{Identity, Role, UserId};

/// The kinds of mutation recorded in the audit trail.
///
/// Stored and serialized in SCREAMING_SNAKE form (`CREATE`, `UPDATE`,
/// `DELETE`) to match the historical wire data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
	Create,
	Update,
	Delete,
}

impl fmt::Display for AuditAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			AuditAction::Create => "CREATE",
			AuditAction::Update => "UPDATE",
			AuditAction::Delete => "DELETE",
		};
		write!(f, "{s}")
	}
}

impl AuditAction {
	/// Parse the stored string form.
	pub fn parse(s: &str) -> Option<AuditAction> {
		match s {
			"CREATE" => Some(AuditAction::Create),
			"UPDATE" => Some(AuditAction::Update),
			"DELETE" => Some(AuditAction::Delete),
			_ => None,
		}
	}
}

/// The acting identity as captured at the moment of the mutation.
///
/// This is a copy, not a live reference: the trail must stay accurate after
/// the actor's role changes or the actor is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSnapshot {
	pub id: UserId,
	pub email: String,
	pub role: Role,
}

impl From<&Identity> for ActorSnapshot {
	fn from(identity: &Identity) -> Self {
		Self {
			id: identity.id,
			email: identity.email.clone(),
			role: identity.role,
		}
	}
}

/// One append-only audit record.
///
/// Entries are created exactly once, at the moment of a successful mutation,
/// and are never updated or deleted by the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
	pub id: Uuid,
	pub actor: ActorSnapshot,
	pub action: AuditAction,
	pub entity_type: String,
	pub entity_id: String,
	/// Entity state before the mutation; None for CREATE.
	pub before_state: Option<Value>,
	/// Entity state after the mutation; None for DELETE.
	pub after_state: Option<Value>,
	pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
	/// Start building an entry for the given action.
	pub fn builder(action: AuditAction) -> AuditLogBuilder {
		AuditLogBuilder::new(action)
	}
}

/// Fluent builder for [`AuditLogEntry`].
pub struct AuditLogBuilder {
	action: AuditAction,
	actor: Option<ActorSnapshot>,
	entity_type: String,
	entity_id: String,
	before_state: Option<Value>,
	after_state: Option<Value>,
}

impl AuditLogBuilder {
	pub fn new(action: AuditAction) -> Self {
		Self {
			action,
			actor: None,
			entity_type: String::new(),
			entity_id: String::new(),
			before_state: None,
			after_state: None,
		}
	}

	pub fn actor(mut self, actor: ActorSnapshot) -> Self {
		self.actor = Some(actor);
		self
	}

	pub fn entity(mut self, entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
		self.entity_type = entity_type.into();
		self.entity_id = entity_id.into();
		self
	}

	pub fn before(mut self, state: Option<Value>) -> Self {
		self.before_state = state;
		self
	}

	pub fn after(mut self, state: Option<Value>) -> Self {
		self.after_state = state;
		self
	}

	/// Build the entry, stamping id and creation time.
	///
	/// # Panics
	///
	/// Panics if no actor was set; every mutation has an authenticated actor
	/// by the time it reaches the audit pipeline.
	pub fn build(self) -> AuditLogEntry {
		AuditLogEntry {
			id: Uuid::new_v4(),
			actor: self.actor.expect("audit entry requires an actor"),
			action: self.action,
			entity_type: self.entity_type,
			entity_id: self.entity_id,
			before_state: self.before_state,
			after_state: self.after_state,
			created_at: Utc::now(),
		}
	}
}
