// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Product CRUD and bulk import handlers.
//!
//! # Authorization Matrix
//!
//! | Endpoint          | Required Role     |
//! |-------------------|-------------------|
//! | `list_products`   | any authenticated |
//! | `create_product`  | editor, admin     |
//! | `update_product`  | editor, admin     |
//! | `delete_product`  | editor, admin     |
//! | `import_products` | editor, admin     |
//!
//! The route group carries the authentication gate; the write handlers
//! enforce the editor/admin set themselves.
//!
//! Every successful mutation is followed by an audit record in the same
//! request task. UPDATE records are skipped when nothing tracked changed.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use uuid::Uuid;

use stockroom_server_api::{
	ImportRequest, ImportResponse, ProductErrorResponse, ProductPayload, ProductResponse,
	ProductSuccessResponse,
};
use stockroom_server_audit::{ActorSnapshot, AuditAction};
use stockroom_server_auth::Role;
use stockroom_server_db::{NewProduct, Product, PRODUCT_TRACKED_FIELDS};

use crate::api::AppState;
use crate::api_response::{bad_request, forbidden, internal_error, not_found};
use crate::auth_middleware::RequireAuth;
use crate::csv_import::parse_rows;

const PRODUCT_WRITE_ROLES: &[Role] = &[Role::Editor, Role::Admin];

const ENTITY_TYPE: &str = "product";

fn product_response(product: Product) -> ProductResponse {
	ProductResponse {
		id: product.id.to_string(),
		referencia: product.referencia,
		cor: product.cor,
		x: product.x,
		y: product.y,
		rack: product.rack,
		acab: product.acab,
		obs: product.obs,
		marked: product.marked,
		created_at: product.created_at,
		updated_at: product.updated_at,
	}
}

fn payload_to_fields(payload: ProductPayload) -> NewProduct {
	NewProduct {
		referencia: payload.referencia,
		cor: payload.cor,
		x: payload.x,
		y: payload.y,
		rack: payload.rack,
		acab: payload.acab,
		obs: payload.obs,
		marked: payload.marked.unwrap_or(false),
	}
}

fn parse_product_id(id: &str) -> Result<Uuid, (StatusCode, Json<ProductErrorResponse>)> {
	Uuid::parse_str(id).map_err(|_| bad_request("Invalid product id"))
}

/// List all products, newest first.
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products", body = [ProductResponse]),
        (status = 401, description = "Not authenticated", body = ProductErrorResponse)
    ),
    tag = "products"
)]
#[tracing::instrument(skip(state), fields(actor_id = %identity.id))]
pub async fn list_products(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
) -> impl IntoResponse {
	match state.product_repo.list_products().await {
		Ok(products) => {
			let products: Vec<ProductResponse> =
				products.into_iter().map(product_response).collect();
			(StatusCode::OK, Json(products)).into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to list products");
			internal_error::<ProductErrorResponse>("Failed to fetch products").into_response()
		}
	}
}

/// Create a single product.
#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 401, description = "Not authenticated", body = ProductErrorResponse),
        (status = 403, description = "Not authorized (editor required)", body = ProductErrorResponse)
    ),
    tag = "products"
)]
#[tracing::instrument(skip(state, payload), fields(actor_id = %identity.id))]
pub async fn create_product(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<ProductPayload>,
) -> impl IntoResponse {
	if !PRODUCT_WRITE_ROLES.contains(&identity.role) {
		tracing::warn!(actor_id = %identity.id, role = %identity.role, "unauthorized product create attempt");
		return forbidden::<ProductErrorResponse>("Insufficient permissions").into_response();
	}

	let fields = payload_to_fields(payload);
	let product = match state.product_repo.create_product(&fields).await {
		Ok(product) => product,
		Err(e) => {
			tracing::error!(error = %e, "failed to create product");
			return internal_error::<ProductErrorResponse>("Failed to create product")
				.into_response();
		}
	};

	state
		.audit
		.record(
			&ActorSnapshot::from(&identity),
			AuditAction::Create,
			ENTITY_TYPE,
			&product.id.to_string(),
			None,
			Some(product.audit_snapshot()),
			PRODUCT_TRACKED_FIELDS,
		)
		.await;

	(StatusCode::CREATED, Json(product_response(product))).into_response()
}

/// Replace a product's fields.
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = String, Path, description = "Product ID")),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 401, description = "Not authenticated", body = ProductErrorResponse),
        (status = 403, description = "Not authorized (editor required)", body = ProductErrorResponse),
        (status = 404, description = "Product not found", body = ProductErrorResponse)
    ),
    tag = "products"
)]
#[tracing::instrument(skip(state, payload), fields(actor_id = %identity.id, product_id = %id))]
pub async fn update_product(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<ProductPayload>,
) -> impl IntoResponse {
	if !PRODUCT_WRITE_ROLES.contains(&identity.role) {
		tracing::warn!(actor_id = %identity.id, role = %identity.role, "unauthorized product update attempt");
		return forbidden::<ProductErrorResponse>("Insufficient permissions").into_response();
	}

	let product_id = match parse_product_id(&id) {
		Ok(id) => id,
		Err(e) => return e.into_response(),
	};

	let before = match state.product_repo.get_by_id(&product_id).await {
		Ok(Some(product)) => product,
		Ok(None) => {
			return not_found::<ProductErrorResponse>("Product not found").into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to load product for update");
			return internal_error::<ProductErrorResponse>("Failed to update product")
				.into_response();
		}
	};

	let fields = payload_to_fields(payload);
	let after = match state.product_repo.update_product(&product_id, &fields).await {
		Ok(Some(product)) => product,
		Ok(None) => {
			return not_found::<ProductErrorResponse>("Product not found").into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to update product");
			return internal_error::<ProductErrorResponse>("Failed to update product")
				.into_response();
		}
	};

	state
		.audit
		.record(
			&ActorSnapshot::from(&identity),
			AuditAction::Update,
			ENTITY_TYPE,
			&product_id.to_string(),
			Some(before.audit_snapshot()),
			Some(after.audit_snapshot()),
			PRODUCT_TRACKED_FIELDS,
		)
		.await;

	(StatusCode::OK, Json(product_response(after))).into_response()
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = ProductSuccessResponse),
        (status = 401, description = "Not authenticated", body = ProductErrorResponse),
        (status = 403, description = "Not authorized (editor required)", body = ProductErrorResponse),
        (status = 404, description = "Product not found", body = ProductErrorResponse)
    ),
    tag = "products"
)]
#[tracing::instrument(skip(state), fields(actor_id = %identity.id, product_id = %id))]
pub async fn delete_product(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> impl IntoResponse {
	if !PRODUCT_WRITE_ROLES.contains(&identity.role) {
		tracing::warn!(actor_id = %identity.id, role = %identity.role, "unauthorized product delete attempt");
		return forbidden::<ProductErrorResponse>("Insufficient permissions").into_response();
	}

	let product_id = match parse_product_id(&id) {
		Ok(id) => id,
		Err(e) => return e.into_response(),
	};

	let before = match state.product_repo.get_by_id(&product_id).await {
		Ok(Some(product)) => product,
		Ok(None) => {
			return not_found::<ProductErrorResponse>("Product not found").into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to load product for delete");
			return internal_error::<ProductErrorResponse>("Failed to delete product")
				.into_response();
		}
	};

	match state.product_repo.delete_product(&product_id).await {
		Ok(true) => {}
		Ok(false) => {
			return not_found::<ProductErrorResponse>("Product not found").into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to delete product");
			return internal_error::<ProductErrorResponse>("Failed to delete product")
				.into_response();
		}
	}

	state
		.audit
		.record(
			&ActorSnapshot::from(&identity),
			AuditAction::Delete,
			ENTITY_TYPE,
			&product_id.to_string(),
			Some(before.audit_snapshot()),
			None,
			PRODUCT_TRACKED_FIELDS,
		)
		.await;

	(
		StatusCode::OK,
		Json(ProductSuccessResponse {
			message: "Product deleted".to_string(),
		}),
	)
		.into_response()
}

/// Bulk import products from a semicolon-delimited payload.
///
/// Rows are inserted sequentially through the same create-and-audit
/// primitive as the single-create path. Malformed cells degrade to NULL
/// per-cell; a store failure aborts the remaining rows but leaves prior
/// inserts committed.
#[utoipa::path(
    post,
    path = "/products/import",
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Rows imported", body = ImportResponse),
        (status = 400, description = "CSV data missing", body = ProductErrorResponse),
        (status = 401, description = "Not authenticated", body = ProductErrorResponse),
        (status = 403, description = "Not authorized (editor required)", body = ProductErrorResponse)
    ),
    tag = "products"
)]
#[tracing::instrument(skip(state, payload), fields(actor_id = %identity.id))]
pub async fn import_products(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<ImportRequest>,
) -> impl IntoResponse {
	if !PRODUCT_WRITE_ROLES.contains(&identity.role) {
		tracing::warn!(actor_id = %identity.id, role = %identity.role, "unauthorized product import attempt");
		return forbidden::<ProductErrorResponse>("Insufficient permissions").into_response();
	}

	let Some(csv) = payload.csv.filter(|c| !c.is_empty()) else {
		return bad_request::<ProductErrorResponse>("CSV data missing").into_response();
	};

	let rows = parse_rows(&csv);
	let actor = ActorSnapshot::from(&identity);
	let mut inserted: u64 = 0;

	for row in rows {
		let fields = row.into_fields();
		let product = match state.product_repo.create_product(&fields).await {
			Ok(product) => product,
			Err(e) => {
				tracing::error!(error = %e, inserted, "import aborted mid-batch");
				return internal_error::<ProductErrorResponse>("Failed to import CSV")
					.into_response();
			}
		};

		state
			.audit
			.record(
				&actor,
				AuditAction::Create,
				ENTITY_TYPE,
				&product.id.to_string(),
				None,
				Some(product.audit_snapshot()),
				PRODUCT_TRACKED_FIELDS,
			)
			.await;

		inserted += 1;
	}

	tracing::info!(actor_id = %identity.id, rows = inserted, "csv import completed");

	(
		StatusCode::OK,
		Json(ImportResponse {
			message: "CSV imported successfully".to_string(),
			rows: inserted,
		}),
	)
		.into_response()
}
