//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// Access level tag carried by session tokens. Only one level exists.
pub const ACCESS_AUTH: &str = "auth";

/// User record stored in Firestore.
///
/// The document ID is `id`. The plaintext password is hashed before this
/// struct is ever constructed and never appears anywhere in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// UUID v4, assigned at creation (also the document ID)
    pub id: String,
    /// Unique email address (trimmed)
    pub email: String,
    /// Argon2id hash of the password, PHC string format
    pub password_hash: String,
    /// Currently valid session tokens
    pub tokens: Vec<SessionToken>,
}

/// One live session: an access-level tag plus the exact signed token string.
///
/// A signed token is only honored while its entry is still present here,
/// which is what makes logout a real server-side revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub access: String,
    pub token: String,
}

impl User {
    /// Create a new user with a fresh UUID and no sessions.
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            password_hash,
            tokens: Vec::new(),
        }
    }

    /// Whether `token` is a currently valid "auth" session for this user.
    pub fn has_auth_token(&self, token: &str) -> bool {
        self.tokens
            .iter()
            .any(|t| t.access == ACCESS_AUTH && t.token == token)
    }

    /// Remove the session matching `token`. Removing an absent token is a no-op.
    pub fn remove_token(&mut self, token: &str) {
        self.tokens.retain(|t| t.token != token);
    }
}

/// Sanitized user representation returned by the API.
///
/// Never includes the password hash or the token list.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
        }
    }
}
