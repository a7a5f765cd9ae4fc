// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cart repository.
//!
//! A cart item is one class a user intends to buy. Items are added and
//! removed, never edited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::storage::collection::{
    new_document_id, Collection, DeleteResult, Document, InsertOneResult,
};
use crate::storage::{paths, DocumentStore, StorageResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Owner email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Class reference, price and whatever else the client sent.
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl Document for CartItem {
    const COLLECTION: &'static str = paths::CARTS;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Body of an add-to-cart request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCartItem {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl NewCartItem {
    pub fn into_item(mut self) -> CartItem {
        self.details.remove("_id");
        CartItem {
            id: new_document_id(),
            email: self.email,
            details: self.details,
        }
    }
}

pub struct CartRepository<'a> {
    carts: Collection<'a, CartItem>,
}

impl<'a> CartRepository<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self {
            carts: Collection::new(store),
        }
    }

    pub fn list_by_email(&self, email: &str) -> StorageResult<Vec<CartItem>> {
        self.carts
            .find(|item| item.email.as_deref() == Some(email))
    }

    pub fn get(&self, id: &str) -> StorageResult<Option<CartItem>> {
        self.carts.get(id)
    }

    pub fn add(&self, item: NewCartItem) -> StorageResult<InsertOneResult> {
        self.carts.insert_one(&item.into_item())
    }

    pub fn remove(&self, id: &str) -> StorageResult<DeleteResult> {
        self.carts.delete_one(id)
    }
}
