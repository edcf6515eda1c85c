// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DbError;

/// Parse a stored RFC 3339 timestamp column.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(raw)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("invalid stored timestamp '{raw}': {e}")))
}

/// Parse a stored UUID column.
pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid, DbError> {
	Uuid::parse_str(raw).map_err(|e| DbError::Internal(format!("invalid stored uuid '{raw}': {e}")))
}
