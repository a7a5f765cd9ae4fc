// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users are keyed by `_id` on disk but looked up by email, which is unique
//! and compared case-sensitively. Each user is stored as a separate JSON file
//! under `<DATA_DIR>/users/`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::auth::Role;
use crate::storage::collection::{
    new_document_id, Collection, Document, InsertOneResult, UpdateResult,
};
use crate::storage::{paths, DocumentStore, StorageResult};

/// A user record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Remaining signup fields (name, photo, ...), stored as sent.
    #[serde(flatten)]
    pub profile: BTreeMap<String, Value>,
}

impl Document for User {
    const COLLECTION: &'static str = paths::USERS;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Signup payload.
///
/// `role` and `_id` are dropped from the profile: ids are generated here
/// and roles are only granted through promotion.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    #[serde(flatten)]
    pub profile: BTreeMap<String, Value>,
}

impl NewUser {
    pub fn into_user(mut self) -> User {
        self.profile.remove("_id");
        self.profile.remove("role");
        User {
            id: new_document_id(),
            email: self.email,
            role: None,
            profile: self.profile,
        }
    }
}

/// Optional equality filters for listing users.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    /// `admin` or `instructor`
    pub role: Option<Role>,
    pub email: Option<String>,
}

impl UserFilter {
    fn matches(&self, user: &User) -> bool {
        self.role.is_none_or(|role| user.role == Some(role))
            && self.email.as_ref().is_none_or(|email| &user.email == email)
    }
}

/// Outcome of a role promotion.
#[derive(Debug, Clone)]
pub struct RoleChange {
    pub result: UpdateResult,
    /// Email of the matched user, if any.
    pub email: Option<String>,
}

pub struct UserRepository<'a> {
    users: Collection<'a, User>,
}

impl<'a> UserRepository<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self {
            users: Collection::new(store),
        }
    }

    pub fn list(&self, filter: &UserFilter) -> StorageResult<Vec<User>> {
        self.users.find(|user| filter.matches(user))
    }

    pub fn list_by_role(&self, role: Role) -> StorageResult<Vec<User>> {
        self.list(&UserFilter {
            role: Some(role),
            email: None,
        })
    }

    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        self.users.find_one(|user| user.email == email)
    }

    /// Insert the user unless one with the same email exists.
    ///
    /// Returns `None` when the email is taken.
    pub fn create_if_absent(&self, new_user: NewUser) -> StorageResult<Option<InsertOneResult>> {
        let user = new_user.into_user();
        self.users
            .insert_one_unless(&user, |existing| existing.email == user.email)
    }

    pub fn set_role(&self, id: &str, role: Role) -> StorageResult<RoleChange> {
        let mut email = None;
        let result = self.users.update_one(id, |user| {
            email = Some(user.email.clone());
            let changed = user.role != Some(role);
            user.role = Some(role);
            changed
        })?;
        Ok(RoleChange { result, email })
    }
}
