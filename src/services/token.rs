// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token signing and verification.
//!
//! Tokens are JWTs binding a user ID to an access-level tag. They carry no
//! expiry; a token stays valid until it is removed from the user's stored
//! token list, so verification here is only half the check — callers must
//! also confirm the token is still present in the store.

use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Access-level tag ("auth" is the only level in use)
    pub access: String,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Sign a session token for a user.
///
/// Pure function of the signing key and inputs; persisting the token into
/// the user's token list is the caller's job.
pub fn issue(user_id: &str, access: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        access: access.to_string(),
        iat: now,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Verify a token's signature and decode its claims.
///
/// Does NOT check the store; a revoked token still passes this function.
pub fn verify(token: &str, signing_key: &[u8]) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(signing_key);

    // Tokens have no exp claim; they are revoked server-side instead.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

    #[test]
    fn test_issue_verify_roundtrip() {
        let token = issue("user-123", "auth", KEY).unwrap();
        let claims = verify(&token, KEY).unwrap();

        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.access, "auth");
        assert!(claims.iat > 0);
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let token = issue("user-123", "auth", KEY).unwrap();
        assert!(verify(&token, b"a_different_key_32_bytes_long!!!").is_err());
    }

    #[test]
    fn test_verify_rejects_tampered_token() {
        let token = issue("user-123", "auth", KEY).unwrap();

        // Flip a character in the payload segment
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        let tampered = parts.join(".");

        assert!(verify(&tampered, KEY).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(verify("not-a-jwt", KEY).is_err());
        assert!(verify("", KEY).is_err());
    }
}
