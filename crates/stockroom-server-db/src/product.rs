// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Product persistence.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::error::Result;
use crate::types::{parse_timestamp, parse_uuid};

/// The product fields considered by the audit UPDATE diff.
///
/// Kept as an explicit list so the comparison is deterministic; `id` and the
/// timestamps are deliberately excluded.
pub const PRODUCT_TRACKED_FIELDS: &[&str] = &[
	"referencia",
	"cor",
	"x",
	"y",
	"rack",
	"acab",
	"obs",
	"marked",
];

/// A stored inventory item.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
	pub id: Uuid,
	pub referencia: Option<String>,
	pub cor: Option<String>,
	pub x: Option<i64>,
	pub y: Option<i64>,
	pub rack: Option<String>,
	pub acab: Option<String>,
	pub obs: Option<String>,
	pub marked: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Product {
	/// Snapshot of the tracked fields, as recorded in audit entries.
	pub fn audit_snapshot(&self) -> Value {
		json!({
			"referencia": self.referencia,
			"cor": self.cor,
			"x": self.x,
			"y": self.y,
			"rack": self.rack,
			"acab": self.acab,
			"obs": self.obs,
			"marked": self.marked,
		})
	}
}

/// Field values for creating or replacing a product.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
	pub referencia: Option<String>,
	pub cor: Option<String>,
	pub x: Option<i64>,
	pub y: Option<i64>,
	pub rack: Option<String>,
	pub acab: Option<String>,
	pub obs: Option<String>,
	pub marked: bool,
}

pub struct ProductRepository {
	pool: SqlitePool,
}

impl ProductRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// All products, newest first.
	#[tracing::instrument(skip(self))]
	pub async fn list_products(&self) -> Result<Vec<Product>> {
		let rows = sqlx::query("SELECT * FROM products ORDER BY created_at DESC")
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(row_to_product).collect()
	}

	#[tracing::instrument(skip(self, fields))]
	pub async fn create_product(&self, fields: &NewProduct) -> Result<Product> {
		let now = Utc::now();
		let product = Product {
			id: Uuid::new_v4(),
			referencia: fields.referencia.clone(),
			cor: fields.cor.clone(),
			x: fields.x,
			y: fields.y,
			rack: fields.rack.clone(),
			acab: fields.acab.clone(),
			obs: fields.obs.clone(),
			marked: fields.marked,
			created_at: now,
			updated_at: now,
		};

		sqlx::query(
			r#"
			INSERT INTO products (
				id, referencia, cor, x, y, rack, acab, obs, marked, created_at, updated_at
			) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(product.id.to_string())
		.bind(&product.referencia)
		.bind(&product.cor)
		.bind(product.x)
		.bind(product.y)
		.bind(&product.rack)
		.bind(&product.acab)
		.bind(&product.obs)
		.bind(product.marked as i64)
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await?;

		Ok(product)
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<Product>> {
		let row = sqlx::query("SELECT * FROM products WHERE id = ?")
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(row_to_product).transpose()
	}

	/// Full-row replace, PUT semantics. Returns None when the product is absent.
	#[tracing::instrument(skip(self, fields))]
	pub async fn update_product(&self, id: &Uuid, fields: &NewProduct) -> Result<Option<Product>> {
		let result = sqlx::query(
			r#"
			UPDATE products SET
				referencia = ?, cor = ?, x = ?, y = ?, rack = ?, acab = ?, obs = ?,
				marked = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&fields.referencia)
		.bind(&fields.cor)
		.bind(fields.x)
		.bind(fields.y)
		.bind(&fields.rack)
		.bind(&fields.acab)
		.bind(&fields.obs)
		.bind(fields.marked as i64)
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Ok(None);
		}

		self.get_by_id(id).await
	}

	/// Returns true when a row was deleted.
	#[tracing::instrument(skip(self))]
	pub async fn delete_product(&self, id: &Uuid) -> Result<bool> {
		let result = sqlx::query("DELETE FROM products WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}

fn row_to_product(row: &SqliteRow) -> Result<Product> {
	let id_str: String = row.get("id");
	let marked: i64 = row.get("marked");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(Product {
		id: parse_uuid(&id_str)?,
		referencia: row.get("referencia"),
		cor: row.get("cor"),
		x: row.get("x"),
		y: row.get("y"),
		rack: row.get("rack"),
		acab: row.get("acab"),
		obs: row.get("obs"),
		marked: marked != 0,
		created_at: parse_timestamp(&created_at)?,
		updated_at: parse_timestamp(&updated_at)?,
	})
}
