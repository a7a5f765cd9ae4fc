// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the document store layout.

use std::path::{Path, PathBuf};

use uuid::Uuid;

pub const USERS: &str = "users";
pub const CLASSES: &str = "classes";
pub const CARTS: &str = "carts";
pub const PAYMENTS: &str = "payments";

/// Every collection the store manages.
pub const COLLECTIONS: [&str; 4] = [USERS, CLASSES, CARTS, PAYMENTS];

/// Storage path utilities for the document store.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all documents.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one collection.
    pub fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    /// Path to a single document file.
    ///
    /// Returns `None` when `id` is not a well-formed document id, so a
    /// caller-supplied id can never escape the collection directory.
    pub fn document(&self, collection: &str, id: &str) -> Option<PathBuf> {
        let id = Uuid::try_parse(id).ok()?;
        Some(
            self.collection_dir(collection)
                .join(format!("{}.json", id.hyphenated())),
        )
    }

    /// Scratch file used by the storage health check.
    pub fn health_probe(&self) -> PathBuf {
        self.root.join(".health_check")
    }
}
