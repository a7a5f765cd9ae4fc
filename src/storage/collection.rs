// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed view over one collection of the document store.
//!
//! Operation results mirror the acknowledgement shapes clients of the
//! booking API already consume (`insertedId`, `matchedCount`, ...).

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::document_store::{DocumentStore, StorageError, StorageResult, DOCUMENT_EXT};

/// A record persisted as one JSON file.
pub trait Document: Serialize + DeserializeOwned {
    /// Directory name of the collection under the data root.
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
}

/// Generate a new time-ordered document id.
pub fn new_document_id() -> Uuid {
    Uuid::now_v7()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    /// Always `null`: updates never upsert.
    pub upserted_id: Option<Uuid>,
    pub upserted_count: u64,
}

impl UpdateResult {
    fn new(matched: bool, modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: matched as u64,
            modified_count: modified as u64,
            upserted_id: None,
            upserted_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

pub struct Collection<'a, T> {
    store: &'a DocumentStore,
    _doc: PhantomData<T>,
}

impl<'a, T: Document> Collection<'a, T> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self {
            store,
            _doc: PhantomData,
        }
    }

    /// Read one document by id. Malformed ids and missing files are `None`.
    pub fn get(&self, id: &str) -> StorageResult<Option<T>> {
        let Some(path) = self.store.paths().document(T::COLLECTION, id) else {
            return Ok(None);
        };
        match self.store.read_json(&path) {
            Ok(doc) => Ok(Some(doc)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Full scan in id order (which is creation order for v7 ids).
    pub fn find(&self, filter: impl Fn(&T) -> bool) -> StorageResult<Vec<T>> {
        let dir = self.store.paths().collection_dir(T::COLLECTION);
        let mut ids = self.store.list_files(&dir, DOCUMENT_EXT)?;
        ids.sort();

        let mut docs = Vec::with_capacity(ids.len());
        for id in ids {
            // A document deleted between listing and reading is skipped.
            if let Some(doc) = self.get(&id)? {
                if filter(&doc) {
                    docs.push(doc);
                }
            }
        }
        Ok(docs)
    }

    pub fn find_all(&self) -> StorageResult<Vec<T>> {
        self.find(|_| true)
    }

    pub fn find_one(&self, filter: impl Fn(&T) -> bool) -> StorageResult<Option<T>> {
        Ok(self.find(filter)?.into_iter().next())
    }

    pub fn insert_one(&self, doc: &T) -> StorageResult<InsertOneResult> {
        let _guard = self.store.write_lock();
        self.write(doc)
    }

    /// Insert `doc` unless an existing document satisfies `conflicts`.
    ///
    /// The scan and the insert run under the write lock, so two racing
    /// callers cannot both pass the check.
    pub fn insert_one_unless(
        &self,
        doc: &T,
        conflicts: impl Fn(&T) -> bool,
    ) -> StorageResult<Option<InsertOneResult>> {
        let _guard = self.store.write_lock();
        if self.find_one(conflicts)?.is_some() {
            return Ok(None);
        }
        self.write(doc).map(Some)
    }

    /// Apply `mutate` to the document with `id` and persist it.
    ///
    /// `mutate` returns whether it changed anything; an unchanged document
    /// is not rewritten and reports `modifiedCount: 0`.
    pub fn update_one(
        &self,
        id: &str,
        mutate: impl FnOnce(&mut T) -> bool,
    ) -> StorageResult<UpdateResult> {
        let _guard = self.store.write_lock();
        let Some(mut doc) = self.get(id)? else {
            return Ok(UpdateResult::new(false, false));
        };
        if !mutate(&mut doc) {
            return Ok(UpdateResult::new(true, false));
        }
        self.write(&doc)?;
        Ok(UpdateResult::new(true, true))
    }

    pub fn delete_one(&self, id: &str) -> StorageResult<DeleteResult> {
        let Some(path) = self.store.paths().document(T::COLLECTION, id) else {
            return Ok(DeleteResult {
                acknowledged: true,
                deleted_count: 0,
            });
        };
        let _guard = self.store.write_lock();
        let deleted = self.store.delete(&path)?;
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: deleted as u64,
        })
    }

    fn write(&self, doc: &T) -> StorageResult<InsertOneResult> {
        let id = doc.id();
        let path = self
            .store
            .paths()
            .collection_dir(T::COLLECTION)
            .join(format!("{}.{DOCUMENT_EXT}", id.hyphenated()));
        self.store.write_json(&path, doc)?;
        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }
}
