// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Todo model and the allow-listed update patch.

use serde::{Deserialize, Serialize};

/// Todo record stored in Firestore. The document ID is `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    /// UUID v4 (also the document ID)
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// Completion timestamp in Unix milliseconds. Set iff `completed`.
    pub completed_at: Option<i64>,
    /// ID of the owning user, immutable after creation
    pub owner_id: String,
}

/// Allow-listed fields a client may patch. Unknown JSON keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl Todo {
    /// Create a new, not-yet-completed todo owned by `owner_id`.
    pub fn new(owner_id: String, text: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            completed: false,
            completed_at: None,
            owner_id,
        }
    }

    /// Apply a client patch.
    ///
    /// `completed_at` is always derived server-side: `completed == true`
    /// stamps `now_ms`, anything else (false or absent) resets the todo to
    /// not-completed. The derivation runs on every patch, so a text-only
    /// patch also clears completion.
    pub fn apply_patch(&mut self, patch: &TodoPatch, now_ms: i64) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }

        if patch.completed == Some(true) {
            self.completed = true;
            self.completed_at = Some(now_ms);
        } else {
            self.completed = false;
            self.completed_at = None;
        }
    }
}
