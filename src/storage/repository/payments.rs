// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Payment repository. Append-only record of completed payments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::storage::collection::{new_document_id, Collection, Document, InsertOneResult};
use crate::storage::{paths, DocumentStore, StorageResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Amount, transaction id and client metadata as submitted.
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl Document for Payment {
    const COLLECTION: &'static str = paths::PAYMENTS;

    fn id(&self) -> Uuid {
        self.id
    }
}

pub struct PaymentRepository<'a> {
    payments: Collection<'a, Payment>,
}

impl<'a> PaymentRepository<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self {
            payments: Collection::new(store),
        }
    }

    pub fn record(&self, mut details: BTreeMap<String, Value>) -> StorageResult<InsertOneResult> {
        details.remove("_id");
        self.payments.insert_one(&Payment {
            id: new_document_id(),
            details,
        })
    }

    pub fn list_all(&self) -> StorageResult<Vec<Payment>> {
        self.payments.find_all()
    }
}
