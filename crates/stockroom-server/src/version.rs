// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Version reporting for the `version` subcommand.

/// Human-readable version string.
pub fn format_version_info() -> String {
	format!(
		"{} {}",
		env!("CARGO_PKG_NAME"),
		env!("CARGO_PKG_VERSION")
	)
}
