// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Stockroom inventory server.
//!
//! This crate provides the HTTP server for the Stockroom inventory system:
//! role-gated product CRUD, admin user management, a bulk CSV import path
//! and an append-only audit trail over a SQLite database.

pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod auth_middleware;
pub mod csv_import;
pub mod routes;
pub mod version;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use stockroom_server_config::ServerConfig;
pub use stockroom_server_db::{create_pool, run_migrations};
