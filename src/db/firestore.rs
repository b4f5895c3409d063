// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (credentials + session token list)
//! - Todos (per-user todo records)
//!
//! Every operation is a single-document read or write; concurrent updates
//! of the same document are last-write-wins per Firestore semantics.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Todo, TodoPatch, User};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look up a user by email.
    ///
    /// Email uniqueness is enforced at registration, so at most one
    /// document matches.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let mut users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.pop())
    }

    /// Create or update a user document (single atomic write).
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Todo Operations ─────────────────────────────────────────

    /// Store a new todo.
    pub async fn create_todo(&self, todo: &Todo) -> Result<(), AppError> {
        self.set_todo(todo).await
    }

    /// List all todos owned by `owner_id`. No ordering guarantee.
    pub async fn list_todos(&self, owner_id: &str) -> Result<Vec<Todo>, AppError> {
        let owner_id = owner_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::TODOS)
            .filter(move |q| q.field("owner_id").eq(owner_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a todo by ID, scoped to its owner.
    ///
    /// A todo owned by someone else resolves to `None`, exactly like a
    /// missing document — callers cannot probe for other users' records.
    pub async fn get_todo_for_owner(
        &self,
        todo_id: &str,
        owner_id: &str,
    ) -> Result<Option<Todo>, AppError> {
        let todo: Option<Todo> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TODOS)
            .obj()
            .one(todo_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(todo.filter(|t| t.owner_id == owner_id))
    }

    /// Delete a todo by ID, scoped to its owner.
    ///
    /// Returns the removed todo, or `None` under the same ownership rule
    /// as [`get_todo_for_owner`](Self::get_todo_for_owner).
    pub async fn delete_todo_for_owner(
        &self,
        todo_id: &str,
        owner_id: &str,
    ) -> Result<Option<Todo>, AppError> {
        let todo = match self.get_todo_for_owner(todo_id, owner_id).await? {
            Some(todo) => todo,
            None => return Ok(None),
        };

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::TODOS)
            .document_id(&todo.id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Some(todo))
    }

    /// Patch a todo by ID, scoped to its owner.
    ///
    /// The `completed_at` derivation happens here on every update: patching
    /// `completed: true` stamps the current time, anything else clears it.
    pub async fn update_todo_for_owner(
        &self,
        todo_id: &str,
        owner_id: &str,
        patch: &TodoPatch,
    ) -> Result<Option<Todo>, AppError> {
        let mut todo = match self.get_todo_for_owner(todo_id, owner_id).await? {
            Some(todo) => todo,
            None => return Ok(None),
        };

        todo.apply_patch(patch, chrono::Utc::now().timestamp_millis());
        self.set_todo(&todo).await?;

        Ok(Some(todo))
    }

    /// Write a todo document (single atomic write).
    async fn set_todo(&self, todo: &Todo) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::TODOS)
            .document_id(&todo.id)
            .object(todo)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
