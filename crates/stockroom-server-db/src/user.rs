// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User persistence and the role-invariant guards.
//!
//! The two invariants protecting user management — an actor may not modify
//! its own account, and the last admin may never be demoted or deleted —
//! are enforced at different layers. The self check is a pure comparison
//! and lives in the handler. The last-admin check races against concurrent
//! writers, so it is folded into the mutation itself: a single conditional
//! UPDATE/DELETE whose WHERE clause re-counts admins atomically. Two
//! concurrent demotions can no longer both observe "2 admins" and proceed.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use stockroom_server_auth::{Identity, Role, UserId};

use crate::error::{DbError, Result};
use crate::types::{parse_timestamp, parse_uuid};

/// A stored user account.
#[derive(Debug, Clone)]
pub struct User {
	pub id: UserId,
	pub email: String,
	pub password_hash: String,
	pub role: Role,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl User {
	/// The identity this account authenticates as.
	pub fn identity(&self) -> Identity {
		Identity {
			id: self.id,
			email: self.email.clone(),
			role: self.role,
		}
	}
}

/// Outcome of a guarded role change.
#[derive(Debug)]
pub enum GuardedUpdate {
	Updated(User),
	/// Refused: the target is the last remaining admin.
	LastAdmin,
	NotFound,
}

/// Outcome of a guarded deletion.
#[derive(Debug, PartialEq, Eq)]
pub enum GuardedDelete {
	Deleted,
	/// Refused: the target is the last remaining admin.
	LastAdmin,
	NotFound,
}

pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, password_hash))]
	pub async fn create_user(&self, email: &str, password_hash: &str, role: Role) -> Result<User> {
		let now = Utc::now();
		let user = User {
			id: UserId::generate(),
			email: email.to_string(),
			password_hash: password_hash.to_string(),
			role,
			created_at: now,
			updated_at: now,
		};

		sqlx::query(
			r#"
			INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(&user.email)
		.bind(&user.password_hash)
		.bind(user.role.to_string())
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(map_unique_violation)?;

		Ok(user)
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
		let row = sqlx::query("SELECT * FROM users WHERE email = ?")
			.bind(email)
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(row_to_user).transpose()
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_by_id(&self, id: &UserId) -> Result<Option<User>> {
		let row = sqlx::query("SELECT * FROM users WHERE id = ?")
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(row_to_user).transpose()
	}

	/// All users, newest first.
	#[tracing::instrument(skip(self))]
	pub async fn list_users(&self) -> Result<Vec<User>> {
		let rows = sqlx::query("SELECT * FROM users ORDER BY created_at DESC")
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(row_to_user).collect()
	}

	#[tracing::instrument(skip(self))]
	pub async fn count_users(&self) -> Result<i64> {
		let row = sqlx::query("SELECT COUNT(*) AS cnt FROM users")
			.fetch_one(&self.pool)
			.await?;
		Ok(row.get("cnt"))
	}

	#[tracing::instrument(skip(self))]
	pub async fn count_admins(&self) -> Result<i64> {
		let row = sqlx::query("SELECT COUNT(*) AS cnt FROM users WHERE role = 'admin'")
			.fetch_one(&self.pool)
			.await?;
		Ok(row.get("cnt"))
	}

	/// Change a user's role unless doing so would leave the system without
	/// an admin.
	///
	/// The admin count is evaluated inside the UPDATE's WHERE clause, so the
	/// guard and the write are a single atomic statement.
	#[tracing::instrument(skip(self))]
	pub async fn update_role_guarded(&self, id: &UserId, new_role: Role) -> Result<GuardedUpdate> {
		let result = sqlx::query(
			r#"
			UPDATE users SET role = ?1, updated_at = ?2
			WHERE id = ?3
				AND NOT (
					role = 'admin'
					AND ?1 <> 'admin'
					AND (SELECT COUNT(*) FROM users WHERE role = 'admin') = 1
				)
			"#,
		)
		.bind(new_role.to_string())
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 1 {
			return match self.get_by_id(id).await? {
				Some(user) => Ok(GuardedUpdate::Updated(user)),
				None => Err(DbError::Internal(format!("user {id} vanished mid-update"))),
			};
		}

		// Nothing updated: either the row is absent or the guard refused.
		match self.get_by_id(id).await? {
			Some(_) => Ok(GuardedUpdate::LastAdmin),
			None => Ok(GuardedUpdate::NotFound),
		}
	}

	/// Delete a user unless they are the last remaining admin.
	#[tracing::instrument(skip(self))]
	pub async fn delete_guarded(&self, id: &UserId) -> Result<GuardedDelete> {
		let result = sqlx::query(
			r#"
			DELETE FROM users
			WHERE id = ?1
				AND NOT (
					role = 'admin'
					AND (SELECT COUNT(*) FROM users WHERE role = 'admin') = 1
				)
			"#,
		)
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 1 {
			return Ok(GuardedDelete::Deleted);
		}

		match self.get_by_id(id).await? {
			Some(_) => Ok(GuardedDelete::LastAdmin),
			None => Ok(GuardedDelete::NotFound),
		}
	}
}

fn map_unique_violation(e: sqlx::Error) -> DbError {
	if e.as_database_error()
		.is_some_and(|d| d.is_unique_violation())
	{
		DbError::Conflict("email already exists".to_string())
	} else {
		DbError::Sqlx(e)
	}
}

fn row_to_user(row: &SqliteRow) -> Result<User> {
	let id_str: String = row.get("id");
	let role_str: String = row.get("role");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(User {
		id: UserId::new(parse_uuid(&id_str)?),
		email: row.get("email"),
		password_hash: row.get("password_hash"),
		role: role_str
			.parse::<Role>()
			.map_err(|e| DbError::Internal(e.to_string()))?,
		created_at: parse_timestamp(&created_at)?,
		updated_at: parse_timestamp(&updated_at)?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_migrated_test_pool;

	async fn repo() -> UserRepository {
		UserRepository::new(create_migrated_test_pool().await)
	}

	#[tokio::test]
	async fn create_and_fetch_roundtrips() {
		let repo = repo().await;
		let created = repo
			.create_user("admin@example.com", "hash", Role::Admin)
			.await
			.unwrap();

		let by_email = repo
			.get_by_email("admin@example.com")
			.await
			.unwrap()
			.unwrap();
		assert_eq!(by_email.id, created.id);
		assert_eq!(by_email.role, Role::Admin);

		let by_id = repo.get_by_id(&created.id).await.unwrap().unwrap();
		assert_eq!(by_id.email, "admin@example.com");
	}

	#[tokio::test]
	async fn duplicate_email_is_conflict() {
		let repo = repo().await;
		repo.create_user("dup@example.com", "hash", Role::Viewer)
			.await
			.unwrap();

		let err = repo
			.create_user("dup@example.com", "hash2", Role::Editor)
			.await
			.unwrap_err();

		assert!(matches!(err, DbError::Conflict(_)));
	}

	#[tokio::test]
	async fn list_is_newest_first() {
		let repo = repo().await;
		repo.create_user("first@example.com", "hash", Role::Viewer)
			.await
			.unwrap();
		tokio::time::sleep(std::time::Duration::from_millis(5)).await;
		repo.create_user("second@example.com", "hash", Role::Viewer)
			.await
			.unwrap();

		let users = repo.list_users().await.unwrap();
		assert_eq!(users.len(), 2);
		assert_eq!(users[0].email, "second@example.com");
	}

	#[tokio::test]
	async fn count_admins_counts_only_admins() {
		let repo = repo().await;
		repo.create_user("a@example.com", "hash", Role::Admin)
			.await
			.unwrap();
		repo.create_user("e@example.com", "hash", Role::Editor)
			.await
			.unwrap();

		assert_eq!(repo.count_admins().await.unwrap(), 1);
		assert_eq!(repo.count_users().await.unwrap(), 2);
	}

	#[tokio::test]
	async fn demoting_sole_admin_is_refused_and_store_unchanged() {
		let repo = repo().await;
		let admin = repo
			.create_user("a@example.com", "hash", Role::Admin)
			.await
			.unwrap();

		let outcome = repo
			.update_role_guarded(&admin.id, Role::Viewer)
			.await
			.unwrap();
		assert!(matches!(outcome, GuardedUpdate::LastAdmin));

		let unchanged = repo.get_by_id(&admin.id).await.unwrap().unwrap();
		assert_eq!(unchanged.role, Role::Admin);
	}

	#[tokio::test]
	async fn demoting_one_of_two_admins_succeeds() {
		let repo = repo().await;
		let first = repo
			.create_user("a@example.com", "hash", Role::Admin)
			.await
			.unwrap();
		repo.create_user("b@example.com", "hash", Role::Admin)
			.await
			.unwrap();

		let outcome = repo
			.update_role_guarded(&first.id, Role::Editor)
			.await
			.unwrap();
		match outcome {
			GuardedUpdate::Updated(user) => assert_eq!(user.role, Role::Editor),
			other => panic!("expected Updated, got {other:?}"),
		}
		assert_eq!(repo.count_admins().await.unwrap(), 1);
	}

	#[tokio::test]
	async fn admin_to_admin_role_change_is_allowed_for_sole_admin() {
		// Re-asserting the same role is not a demotion.
		let repo = repo().await;
		let admin = repo
			.create_user("a@example.com", "hash", Role::Admin)
			.await
			.unwrap();

		let outcome = repo
			.update_role_guarded(&admin.id, Role::Admin)
			.await
			.unwrap();
		assert!(matches!(outcome, GuardedUpdate::Updated(_)));
	}

	#[tokio::test]
	async fn role_update_of_missing_user_is_not_found() {
		let repo = repo().await;
		repo.create_user("a@example.com", "hash", Role::Admin)
			.await
			.unwrap();

		let outcome = repo
			.update_role_guarded(&UserId::generate(), Role::Viewer)
			.await
			.unwrap();
		assert!(matches!(outcome, GuardedUpdate::NotFound));
	}

	#[tokio::test]
	async fn deleting_sole_admin_is_refused() {
		let repo = repo().await;
		let admin = repo
			.create_user("a@example.com", "hash", Role::Admin)
			.await
			.unwrap();

		assert_eq!(
			repo.delete_guarded(&admin.id).await.unwrap(),
			GuardedDelete::LastAdmin
		);
		assert!(repo.get_by_id(&admin.id).await.unwrap().is_some());
	}

	#[tokio::test]
	async fn deleting_non_admin_succeeds() {
		let repo = repo().await;
		repo.create_user("a@example.com", "hash", Role::Admin)
			.await
			.unwrap();
		let viewer = repo
			.create_user("v@example.com", "hash", Role::Viewer)
			.await
			.unwrap();

		assert_eq!(
			repo.delete_guarded(&viewer.id).await.unwrap(),
			GuardedDelete::Deleted
		);
		assert!(repo.get_by_id(&viewer.id).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn deleting_one_of_two_admins_succeeds() {
		let repo = repo().await;
		let first = repo
			.create_user("a@example.com", "hash", Role::Admin)
			.await
			.unwrap();
		repo.create_user("b@example.com", "hash", Role::Admin)
			.await
			.unwrap();

		assert_eq!(
			repo.delete_guarded(&first.id).await.unwrap(),
			GuardedDelete::Deleted
		);
		assert_eq!(repo.count_admins().await.unwrap(), 1);
	}

	#[tokio::test]
	async fn delete_of_missing_user_is_not_found() {
		let repo = repo().await;
		assert_eq!(
			repo.delete_guarded(&UserId::generate()).await.unwrap(),
			GuardedDelete::NotFound
		);
	}
}
