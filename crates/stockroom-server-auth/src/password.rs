// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password hashing and verification.
//!
//! Hashes are stored in PHC string format so parameters travel with the
//! hash; verification works across parameter upgrades.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::argon2_config::argon2_instance;
use crate::error::AuthError;

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
	let salt = SaltString::generate(&mut OsRng);
	argon2_instance()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify a password against a stored PHC-format hash.
///
/// An unparseable stored hash verifies as false rather than erroring; a
/// corrupt credential row must never authenticate.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
	let Ok(parsed) = PasswordHash::new(stored_hash) else {
		return false;
	};
	argon2_instance()
		.verify_password(password.as_bytes(), &parsed)
		.is_ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hash_then_verify_roundtrips() {
		let hash = hash_password("correct horse battery staple").unwrap();
		assert!(verify_password("correct horse battery staple", &hash));
	}

	#[test]
	fn wrong_password_fails_verification() {
		let hash = hash_password("correct horse battery staple").unwrap();
		assert!(!verify_password("Tr0ub4dor&3", &hash));
	}

	#[test]
	fn hashes_are_salted() {
		let a = hash_password("same password").unwrap();
		let b = hash_password("same password").unwrap();
		assert_ne!(a, b);
	}

	#[test]
	fn garbage_stored_hash_never_verifies() {
		assert!(!verify_password("anything", "not-a-phc-string"));
		assert!(!verify_password("anything", ""));
	}
}
