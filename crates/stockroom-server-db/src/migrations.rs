// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema setup.
//!
//! Idempotent `CREATE TABLE IF NOT EXISTS` statements run at startup.
//! UUIDs and RFC 3339 timestamps are stored as TEXT.

use sqlx::SqlitePool;

use crate::error::DbError;

/// Create all tables and indexes if they do not exist yet.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS users (
			id TEXT PRIMARY KEY,
			email TEXT NOT NULL UNIQUE,
			password_hash TEXT NOT NULL,
			role TEXT NOT NULL CHECK (role IN ('viewer', 'editor', 'admin')),
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS products (
			id TEXT PRIMARY KEY,
			referencia TEXT,
			cor TEXT,
			x INTEGER,
			y INTEGER,
			rack TEXT,
			acab TEXT,
			obs TEXT,
			marked INTEGER NOT NULL DEFAULT 0,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS audit_logs (
			id TEXT PRIMARY KEY,
			actor_id TEXT NOT NULL,
			actor_email TEXT NOT NULL,
			actor_role TEXT NOT NULL,
			action TEXT NOT NULL,
			entity_type TEXT NOT NULL,
			entity_id TEXT NOT NULL,
			before_state TEXT,
			after_state TEXT,
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)")
		.execute(pool)
		.await?;

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_products_created_at ON products(created_at)")
		.execute(pool)
		.await?;

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_logs_created_at ON audit_logs(created_at)")
		.execute(pool)
		.await?;

	tracing::debug!("database migrations applied");
	Ok(())
}
