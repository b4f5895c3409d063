// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token compatibility tests.
//!
//! These tests verify that tokens issued by the token service decode the
//! way the auth middleware expects, catching claim-shape drift early.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use todo_api::services::token;

const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

/// Claims structure that must match what the middleware expects.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    access: String,
    iat: usize,
}

#[test]
fn test_token_roundtrip() {
    let issued = token::issue("user-42", "auth", SIGNING_KEY).unwrap();
    let claims = token::verify(&issued, SIGNING_KEY).unwrap();

    assert_eq!(claims.sub, "user-42");
    assert_eq!(claims.access, "auth");
    assert!(claims.iat > 0);
}

#[test]
fn test_token_has_no_expiry_claim() {
    // Tokens are revoked server-side by removing them from the user's
    // token list; they carry no exp claim. Default jsonwebtoken validation
    // requires exp, so decoding with it must fail...
    let issued = token::issue("user-42", "auth", SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let strict = Validation::new(Algorithm::HS256);
    assert!(decode::<Claims>(&issued, &key, &strict).is_err());

    // ...while the service's own verify, which drops the exp requirement,
    // accepts the same token.
    assert!(token::verify(&issued, SIGNING_KEY).is_ok());
}

#[test]
fn test_verify_rejects_foreign_signature() {
    let issued = token::issue("user-42", "auth", b"some_other_signing_key_32_bytes!").unwrap();
    assert!(token::verify(&issued, SIGNING_KEY).is_err());
}

#[test]
fn test_access_level_is_bound_into_token() {
    let issued = token::issue("user-42", "admin", SIGNING_KEY).unwrap();
    let claims = token::verify(&issued, SIGNING_KEY).unwrap();

    // The tag survives the roundtrip; the middleware refuses anything
    // other than "auth".
    assert_eq!(claims.access, "admin");
}
