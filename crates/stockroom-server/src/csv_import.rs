// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Semicolon-delimited bulk import parsing.
//!
//! The payload comes from spreadsheet exports: a header row (possibly
//! carrying a UTF-8 byte-order mark), `;`-separated cells, no quoting.
//! Parsing is deliberately forgiving — ragged rows, unknown columns and
//! unparseable numerics must degrade per-cell, never abort the batch.
//!
//! Coercion rules per cell:
//! - numeric columns (`x`, `y`): trimmed value must be exactly a base-10
//!   integer, anything else (empty, alpha, fractional) becomes NULL
//! - text columns: trimmed; empty becomes NULL

use stockroom_server_db::NewProduct;

/// One parsed import row, field-coerced but not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportRow {
	pub referencia: Option<String>,
	pub cor: Option<String>,
	pub x: Option<i64>,
	pub y: Option<i64>,
	pub rack: Option<String>,
	pub acab: Option<String>,
	pub obs: Option<String>,
}

impl ImportRow {
	/// Imported rows are never pre-marked.
	pub fn into_fields(self) -> NewProduct {
		NewProduct {
			referencia: self.referencia,
			cor: self.cor,
			x: self.x,
			y: self.y,
			rack: self.rack,
			acab: self.acab,
			obs: self.obs,
			marked: false,
		}
	}
}

/// Coerce a raw cell to an integer.
///
/// Returns Some only when the trimmed value is a base-10 integer exactly;
/// empty, non-numeric and fractional values all coerce to None.
pub fn coerce_int(raw: &str) -> Option<i64> {
	let trimmed = raw.trim();
	if trimmed.is_empty() {
		return None;
	}
	trimmed.parse::<i64>().ok()
}

fn coerce_text(raw: &str) -> Option<String> {
	let trimmed = raw.trim();
	if trimmed.is_empty() {
		None
	} else {
		Some(trimmed.to_string())
	}
}

/// Parse a whole payload into rows.
///
/// The first non-empty line is the header; header names are BOM-stripped,
/// trimmed and lowercased before matching. Rows with fewer cells than the
/// header simply yield NULLs for the missing columns; extra cells are
/// ignored.
pub fn parse_rows(input: &str) -> Vec<ImportRow> {
	let mut lines = input.lines().filter(|line| !line.trim().is_empty());

	let Some(header_line) = lines.next() else {
		return Vec::new();
	};

	let headers: Vec<String> = header_line
		.trim_start_matches('\u{feff}')
		.split(';')
		.map(|h| h.trim().to_lowercase())
		.collect();

	let column = |name: &str| headers.iter().position(|h| h == name);
	let col_referencia = column("referencia");
	let col_cor = column("cor");
	let col_x = column("x");
	let col_y = column("y");
	let col_rack = column("rack");
	let col_acab = column("acab");
	let col_obs = column("obs");

	lines
		.map(|line| {
			let cells: Vec<&str> = line.split(';').collect();
			let text = |col: Option<usize>| {
				col.and_then(|i| cells.get(i)).and_then(|raw| coerce_text(raw))
			};
			let int =
				|col: Option<usize>| col.and_then(|i| cells.get(i)).and_then(|raw| coerce_int(raw));

			ImportRow {
				referencia: text(col_referencia),
				cor: text(col_cor),
				x: int(col_x),
				y: int(col_y),
				rack: text(col_rack),
				acab: text(col_acab),
				obs: text(col_obs),
			}
		})
		.collect()
}
