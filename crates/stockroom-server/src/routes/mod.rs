// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

pub mod audit_logs;
pub mod auth;
pub mod health;
pub mod products;
pub mod users;
