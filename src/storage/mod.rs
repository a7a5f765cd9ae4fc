// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage as a file-backed JSON document store. There is no
//! external database: every document is one file, written atomically.
//!
//! ## Storage Layout
//!
//! ```text
//! <DATA_DIR>/
//!   users/{_id}.json
//!   classes/{_id}.json
//!   carts/{_id}.json
//!   payments/{_id}.json
//! ```
//!
//! Document ids are UUID v7, so sorting file names yields creation order.

pub mod collection;
pub mod document_store;
pub mod paths;
pub mod repository;

pub use collection::{Collection, DeleteResult, Document, InsertOneResult, UpdateResult};
pub use document_store::{DocumentStore, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{
    CartItem, CartRepository, Class, ClassRepository, NewCartItem, NewUser, Payment,
    PaymentRepository, RoleChange, User, UserFilter, UserRepository,
};
