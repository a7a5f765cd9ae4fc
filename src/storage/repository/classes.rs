// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Class repository.
//!
//! Class documents are mostly opaque: whatever the instructor submits is
//! stored as-is. Only `status` (set by admins) and `feedback` (set by any
//! signed-in user) are written by the server afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::storage::collection::{
    new_document_id, Collection, Document, InsertOneResult, UpdateResult,
};
use crate::storage::{paths, DocumentStore, StorageResult};

pub const STATUS_FIELD: &str = "status";
pub const FEEDBACK_FIELD: &str = "feedback";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Class {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl Document for Class {
    const COLLECTION: &'static str = paths::CLASSES;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Class {
    pub fn new(mut fields: BTreeMap<String, Value>) -> Self {
        fields.remove("_id");
        Self {
            id: new_document_id(),
            fields,
        }
    }

    /// Set a top-level field. Returns whether the value changed.
    pub fn set_field(&mut self, name: &str, value: Value) -> bool {
        if self.fields.get(name) == Some(&value) {
            return false;
        }
        self.fields.insert(name.to_string(), value);
        true
    }

    /// String equality on every filter entry. `_id` matches the id.
    pub fn matches(&self, filter: &BTreeMap<String, String>) -> bool {
        filter.iter().all(|(key, expected)| {
            if key == "_id" {
                return self.id.hyphenated().to_string() == *expected;
            }
            matches!(self.fields.get(key), Some(Value::String(actual)) if actual == expected)
        })
    }
}

pub struct ClassRepository<'a> {
    classes: Collection<'a, Class>,
}

impl<'a> ClassRepository<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self {
            classes: Collection::new(store),
        }
    }

    pub fn list(&self, filter: &BTreeMap<String, String>) -> StorageResult<Vec<Class>> {
        self.classes.find(|class| class.matches(filter))
    }

    pub fn create(&self, fields: BTreeMap<String, Value>) -> StorageResult<InsertOneResult> {
        self.classes.insert_one(&Class::new(fields))
    }

    pub fn set_status(&self, id: &str, status: String) -> StorageResult<UpdateResult> {
        self.classes
            .update_one(id, |class| class.set_field(STATUS_FIELD, Value::String(status)))
    }

    pub fn set_feedback(&self, id: &str, feedback: String) -> StorageResult<UpdateResult> {
        self.classes.update_one(id, |class| {
            class.set_field(FEEDBACK_FIELD, Value::String(feedback))
        })
    }
}
