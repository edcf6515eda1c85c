// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit write path.
//!
//! [`AuditRecorder::record`] is invoked by mutation handlers after the
//! primary write has committed. The insert runs in the same request task so
//! mutation and audit entry are attempted together, but a failed insert is
//! logged and swallowed: the mutation is already authoritative and must not
//! be failed retroactively for the sake of the trail.

use serde_json::Value;
use sqlx::SqlitePool;
use tracing::instrument;

use crate::diff::states_differ;
use crate::error::AuditResult;
use crate::event::{ActorSnapshot, AuditAction, AuditLogEntry};

pub struct AuditRecorder {
	pool: SqlitePool,
}

impl AuditRecorder {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Record one mutation in the audit trail.
	///
	/// For [`AuditAction::Update`], the entry is skipped entirely when no
	/// tracked field differs between the before and after snapshots —
	/// no-op saves do not clutter the log. CREATE and DELETE entries are
	/// always persisted.
	///
	/// Returns `true` when an entry was persisted.
	#[instrument(
		skip(self, actor, before, after, tracked_fields),
		fields(action = %action, entity_type, entity_id, actor_id = %actor.id)
	)]
	pub async fn record(
		&self,
		actor: &ActorSnapshot,
		action: AuditAction,
		entity_type: &str,
		entity_id: &str,
		before: Option<Value>,
		after: Option<Value>,
		tracked_fields: &[&str],
	) -> bool {
		if action == AuditAction::Update
			&& !states_differ(before.as_ref(), after.as_ref(), tracked_fields)
		{
			tracing::debug!("skipping audit entry for no-op update");
			return false;
		}

		let entry = AuditLogEntry::builder(action)
			.actor(actor.clone())
			.entity(entity_type, entity_id)
			.before(before)
			.after(after)
			.build();

		match self.insert(&entry).await {
			Ok(()) => true,
			Err(e) => {
				// Best-effort policy: the mutation already committed.
				tracing::warn!(error = %e, entry_id = %entry.id, "audit entry not persisted");
				false
			}
		}
	}

	async fn insert(&self, entry: &AuditLogEntry) -> AuditResult<()> {
		let before_json = entry
			.before_state
			.as_ref()
			.map(serde_json::to_string)
			.transpose()?;
		let after_json = entry
			.after_state
			.as_ref()
			.map(serde_json::to_string)
			.transpose()?;

		sqlx::query(
			r#"
			INSERT INTO audit_logs (
				id, actor_id, actor_email, actor_role, action,
				entity_type, entity_id, before_state, after_state, created_at
			) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(entry.id.to_string())
		.bind(entry.actor.id.to_string())
		.bind(&entry.actor.email)
		.bind(entry.actor.role.to_string())
		.bind(entry.action.to_string())
		.bind(&entry.entity_type)
		.bind(&entry.entity_id)
		.bind(&before_json)
		.bind(&after_json)
		.bind(entry.created_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		Ok(())
	}
}
