// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Signed identity tokens.
//!
//! Tokens are HS256 JWTs embedding the actor's id, email and role together
//! with an expiry (1 day by default). The embedded identity is a snapshot:
//! role changes made after issuance do not invalidate outstanding tokens.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;
use crate::types::{Identity, Role, UserId};

/// Default token lifetime: 1 day.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// Claims carried inside an identity token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
	/// Subject (user id).
	sub: String,
	/// Actor email at issue time.
	email: String,
	/// Actor role at issue time.
	role: Role,
	/// Issued at timestamp (seconds since epoch).
	iat: u64,
	/// Expiration timestamp (seconds since epoch).
	exp: u64,
}

/// Issues and verifies signed identity tokens.
pub struct TokenService {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	ttl_secs: u64,
}

impl TokenService {
	/// Create a token service from an HMAC secret and a token lifetime.
	pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
		Self {
			encoding_key: EncodingKey::from_secret(secret),
			decoding_key: DecodingKey::from_secret(secret),
			ttl_secs,
		}
	}

	/// Create a token service with the default 1-day lifetime.
	pub fn with_default_ttl(secret: &[u8]) -> Self {
		Self::new(secret, DEFAULT_TOKEN_TTL_SECS)
	}

	/// Issue a signed token embedding the given identity.
	pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
		let now = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_err(|_| AuthError::InvalidToken)?
			.as_secs();

		let claims = Claims {
			sub: identity.id.to_string(),
			email: identity.email.clone(),
			role: identity.role,
			iat: now,
			exp: now + self.ttl_secs,
		};

		encode(&Header::default(), &claims, &self.encoding_key).map_err(|_| AuthError::InvalidToken)
	}

	/// Validate signature and expiry, returning the embedded identity.
	///
	/// # Errors
	///
	/// - [`AuthError::Expired`] when the token is past its expiry
	/// - [`AuthError::InvalidToken`] for any signature or payload problem
	pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
		let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(
			|e| match e.kind() {
				ErrorKind::ExpiredSignature => AuthError::Expired,
				_ => AuthError::InvalidToken,
			},
		)?;

		let id = Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::InvalidToken)?;

		Ok(Identity {
			id: UserId::new(id),
			email: data.claims.email,
			role: data.claims.role,
		})
	}

	/// Seconds until an issued token expires.
	pub fn ttl_secs(&self) -> u64 {
		self.ttl_secs
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn test_identity(role: Role) -> Identity {
		Identity {
			id: UserId::generate(),
			email: "user@example.com".to_string(),
			role,
		}
	}

	fn epoch_secs() -> u64 {
		SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.unwrap()
			.as_secs()
	}

	#[test]
	fn issue_then_verify_roundtrips_identity() {
		let service = TokenService::with_default_ttl(b"test-secret");
		let identity = test_identity(Role::Editor);

		let token = service.issue(&identity).unwrap();
		let verified = service.verify(&token).unwrap();

		assert_eq!(verified, identity);
	}

	#[test]
	fn expiry_is_one_day_from_issuance() {
		let service = TokenService::with_default_ttl(b"test-secret");
		let token = service.issue(&test_identity(Role::Viewer)).unwrap();

		// Decode without verification to inspect the raw claims.
		let mut validation = Validation::default();
		validation.insecure_disable_signature_validation();
		let data =
			decode::<Claims>(&token, &DecodingKey::from_secret(b""), &validation).unwrap();

		let now = epoch_secs();
		let lifetime = data.claims.exp - data.claims.iat;
		assert_eq!(lifetime, DEFAULT_TOKEN_TTL_SECS);
		assert!(data.claims.iat <= now + 5);
	}

	#[test]
	fn expired_token_is_rejected_as_expired() {
		let secret = b"test-secret";
		let service = TokenService::with_default_ttl(secret);
		let now = epoch_secs();

		// Expired two hours ago, well past the default validation leeway.
		let claims = Claims {
			sub: Uuid::new_v4().to_string(),
			email: "user@example.com".to_string(),
			role: Role::Admin,
			iat: now - 7200,
			exp: now - 7200 + 60,
		};
		let token = encode(
			&Header::default(),
			&claims,
			&EncodingKey::from_secret(secret),
		)
		.unwrap();

		assert!(matches!(service.verify(&token), Err(AuthError::Expired)));
	}

	#[test]
	fn token_signed_with_other_secret_is_invalid() {
		let service = TokenService::with_default_ttl(b"test-secret");
		let other = TokenService::with_default_ttl(b"other-secret");

		let token = other.issue(&test_identity(Role::Admin)).unwrap();

		assert!(matches!(
			service.verify(&token),
			Err(AuthError::InvalidToken)
		));
	}

	#[test]
	fn tampered_token_is_invalid() {
		let service = TokenService::with_default_ttl(b"test-secret");
		let token = service.issue(&test_identity(Role::Viewer)).unwrap();

		// Flip a character in the payload segment.
		let mut parts: Vec<String> = token.split('.').map(String::from).collect();
		let payload = parts[1].clone();
		let swapped = if payload.starts_with('A') { "B" } else { "A" };
		parts[1] = format!("{swapped}{}", &payload[1..]);
		let tampered = parts.join(".");

		assert!(matches!(
			service.verify(&tampered),
			Err(AuthError::InvalidToken)
		));
	}

	#[test]
	fn garbage_token_is_invalid() {
		let service = TokenService::with_default_ttl(b"test-secret");
		assert!(matches!(
			service.verify("not-a-jwt"),
			Err(AuthError::InvalidToken)
		));
		assert!(matches!(service.verify(""), Err(AuthError::InvalidToken)));
	}

	#[test]
	fn bad_subject_uuid_is_invalid() {
		let secret = b"test-secret";
		let service = TokenService::with_default_ttl(secret);
		let now = epoch_secs();

		let claims = Claims {
			sub: "not-a-uuid".to_string(),
			email: "user@example.com".to_string(),
			role: Role::Viewer,
			iat: now,
			exp: now + 600,
		};
		let token = encode(
			&Header::default(),
			&claims,
			&EncodingKey::from_secret(secret),
		)
		.unwrap();

		assert!(matches!(
			service.verify(&token),
			Err(AuthError::InvalidToken)
		));
	}

	proptest! {
		#[test]
		fn roundtrip_preserves_arbitrary_emails(
			email in "[a-z0-9.+-]{1,32}@[a-z0-9-]{1,16}\\.[a-z]{2,6}"
		) {
			let service = TokenService::with_default_ttl(b"test-secret");
			let identity = Identity {
				id: UserId::generate(),
				email,
				role: Role::Editor,
			};
			let token = service.issue(&identity).unwrap();
			prop_assert_eq!(service.verify(&token).unwrap(), identity);
		}
	}
}
