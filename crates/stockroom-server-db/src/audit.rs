// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit trail read path.
//!
//! The write path lives in `stockroom-server-audit`; this repository only
//! serves the admin-facing listing. Rows that fail to parse (hand-edited
//! databases, partial writes) are skipped rather than failing the whole
//! listing.

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use stockroom_server_audit::{ActorSnapshot, AuditAction, AuditLogEntry};
use stockroom_server_auth::{Role, UserId};

use crate::error::Result;
use crate::types::parse_timestamp;

/// Hard cap on entries returned to the admin UI.
pub const AUDIT_LOG_DISPLAY_CAP: i64 = 200;

pub struct AuditRepository {
	pool: SqlitePool,
}

impl AuditRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// The most recent entries, newest first, clamped to the display cap.
	#[tracing::instrument(skip(self))]
	pub async fn list_recent(&self, limit: i64) -> Result<Vec<AuditLogEntry>> {
		let limit = limit.clamp(1, AUDIT_LOG_DISPLAY_CAP);

		let rows = sqlx::query(
			r#"
			SELECT id, actor_id, actor_email, actor_role, action,
			       entity_type, entity_id, before_state, after_state, created_at
			FROM audit_logs
			ORDER BY created_at DESC
			LIMIT ?
			"#,
		)
		.bind(limit)
		.fetch_all(&self.pool)
		.await?;

		let entries = rows
			.into_iter()
			.filter_map(|row| {
				let id_str: String = row.get("id");
				let id = Uuid::parse_str(&id_str).ok()?;

				let actor_id_str: String = row.get("actor_id");
				let actor_id = Uuid::parse_str(&actor_id_str).ok()?;

				let actor_role_str: String = row.get("actor_role");
				let actor_role = actor_role_str.parse::<Role>().ok()?;

				let action_str: String = row.get("action");
				let action = AuditAction::parse(&action_str)?;

				let created_at_str: String = row.get("created_at");
				let created_at = parse_timestamp(&created_at_str).ok()?;

				let before_state: Option<String> = row.get("before_state");
				let after_state: Option<String> = row.get("after_state");

				Some(AuditLogEntry {
					id,
					actor: ActorSnapshot {
						id: UserId::new(actor_id),
						email: row.get("actor_email"),
						role: actor_role,
					},
					action,
					entity_type: row.get("entity_type"),
					entity_id: row.get("entity_id"),
					before_state: before_state.and_then(|s| serde_json::from_str(&s).ok()),
					after_state: after_state.and_then(|s| serde_json::from_str(&s).ok()),
					created_at,
				})
			})
			.collect();

		Ok(entries)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_migrated_test_pool;
	use chrono::{Duration, Utc};
	use serde_json::json;

	async fn insert_entry(
		pool: &SqlitePool,
		action: &str,
		entity_id: &str,
		created_at: chrono::DateTime<Utc>,
	) {
		sqlx::query(
			r#"
			INSERT INTO audit_logs (
				id, actor_id, actor_email, actor_role, action,
				entity_type, entity_id, before_state, after_state, created_at
			) VALUES (?, ?, 'editor@example.com', 'editor', ?, 'product', ?, NULL, ?, ?)
			"#,
		)
		.bind(Uuid::new_v4().to_string())
		.bind(Uuid::new_v4().to_string())
		.bind(action)
		.bind(entity_id)
		.bind(json!({"referencia": "A1"}).to_string())
		.bind(created_at.to_rfc3339())
		.execute(pool)
		.await
		.unwrap();
	}

	#[tokio::test]
	async fn empty_log_lists_nothing() {
		let pool = create_migrated_test_pool().await;
		let repo = AuditRepository::new(pool);
		assert!(repo.list_recent(200).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn lists_newest_first() {
		let pool = create_migrated_test_pool().await;
		let repo = AuditRepository::new(pool.clone());
		let now = Utc::now();

		insert_entry(&pool, "CREATE", "older", now - Duration::minutes(5)).await;
		insert_entry(&pool, "DELETE", "newer", now).await;

		let entries = repo.list_recent(200).await.unwrap();
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0].entity_id, "newer");
		assert_eq!(entries[0].action, AuditAction::Delete);
		assert_eq!(entries[1].entity_id, "older");
	}

	#[tokio::test]
	async fn respects_limit_and_cap() {
		let pool = create_migrated_test_pool().await;
		let repo = AuditRepository::new(pool.clone());
		let now = Utc::now();

		for i in 0..5 {
			insert_entry(&pool, "CREATE", &format!("p-{i}"), now - Duration::minutes(i)).await;
		}

		assert_eq!(repo.list_recent(2).await.unwrap().len(), 2);
		assert_eq!(repo.list_recent(9999).await.unwrap().len(), 5);
	}

	#[tokio::test]
	async fn unparseable_rows_are_skipped() {
		let pool = create_migrated_test_pool().await;
		let repo = AuditRepository::new(pool.clone());
		let now = Utc::now();

		insert_entry(&pool, "CREATE", "good", now).await;
		// Unknown action value.
		sqlx::query(
			r#"
			INSERT INTO audit_logs (
				id, actor_id, actor_email, actor_role, action,
				entity_type, entity_id, before_state, after_state, created_at
			) VALUES (?, ?, 'x@example.com', 'editor', 'TRUNCATE', 'product', 'bad', NULL, NULL, ?)
			"#,
		)
		.bind(Uuid::new_v4().to_string())
		.bind(Uuid::new_v4().to_string())
		.bind(now.to_rfc3339())
		.execute(&pool)
		.await
		.unwrap();

		let entries = repo.list_recent(200).await.unwrap();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].entity_id, "good");
	}

	#[tokio::test]
	async fn deserializes_state_snapshots() {
		let pool = create_migrated_test_pool().await;
		let repo = AuditRepository::new(pool.clone());

		insert_entry(&pool, "CREATE", "p-1", Utc::now()).await;

		let entries = repo.list_recent(1).await.unwrap();
		assert!(entries[0].before_state.is_none());
		assert_eq!(
			entries[0].after_state,
			Some(json!({"referencia": "A1"}))
		);
	}
}
