// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Argon2 parameter selection for password hashing.
//!
//! A single construction point so every hash and verification in the crate
//! agrees on parameters. Release builds use the Argon2id defaults
//! (19 MiB memory, 2 iterations); test builds drop to minimal cost so
//! suites that hash per-test stay fast.
//!
//! The test parameters are intentionally weak and MUST NOT be used in
//! production.

use argon2::Argon2;
#[cfg(test)]
use argon2::{Algorithm, Params, Version};

#[cfg(test)]
const TEST_MEMORY_KIB: u32 = 1024;
#[cfg(test)]
const TEST_ITERATIONS: u32 = 1;
#[cfg(test)]
const TEST_PARALLELISM: u32 = 1;

/// Returns the Argon2 instance for the current build context.
#[inline]
pub(crate) fn argon2_instance() -> Argon2<'static> {
	#[cfg(test)]
	{
		let params = Params::new(TEST_MEMORY_KIB, TEST_ITERATIONS, TEST_PARALLELISM, None)
			.expect("valid Argon2 params for tests");
		Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
	}

	#[cfg(not(test))]
	{
		Argon2::default()
	}
}
