// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use crate::auth::{IdentityClaims, Role, TokenService};
use crate::payments::{GatewayFuture, PaymentGateway, PaymentIntent};
use crate::state::AppState;
use crate::storage::{DocumentStore, NewUser, StoragePaths, User, UserRepository};

pub const TEST_SECRET: &str = "test-access-token-secret";

/// Gateway fake that records every call and always succeeds.
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<(i64, String)>>,
}

impl RecordingGateway {
    pub fn calls(&self) -> Vec<(i64, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl PaymentGateway for RecordingGateway {
    fn create_intent<'a>(&'a self, amount: i64, currency: &'a str) -> GatewayFuture<'a> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((amount, currency.to_string()));
        let n = calls.len();
        Box::pin(async move {
            Ok(PaymentIntent {
                id: Some(format!("pi_test_{n}")),
                client_secret: format!("pi_test_secret_{n}"),
            })
        })
    }
}

pub fn test_state_with_gateway(gateway: Arc<dyn PaymentGateway>) -> (TempDir, AppState) {
    let dir = TempDir::new().unwrap();
    let mut store = DocumentStore::new(StoragePaths::new(dir.path()));
    store.initialize().unwrap();
    let state = AppState::new(store, TokenService::new(TEST_SECRET), gateway);
    (dir, state)
}

pub fn test_state() -> (TempDir, AppState) {
    test_state_with_gateway(Arc::new(RecordingGateway::default()))
}

/// Insert a user with `email` and optionally promote them.
pub fn seed_user(state: &AppState, email: &str, role: Option<Role>) -> User {
    let repo = UserRepository::new(&state.storage);
    let new_user: NewUser = serde_json::from_value(serde_json::json!({ "email": email })).unwrap();
    let inserted = repo.create_if_absent(new_user).unwrap().unwrap();
    if let Some(role) = role {
        repo.set_role(&inserted.inserted_id.to_string(), role)
            .unwrap();
    }
    repo.find_by_email(email).unwrap().unwrap()
}

pub fn bearer_for(state: &AppState, email: &str) -> String {
    let token = state
        .tokens
        .issue(IdentityClaims::with_email(email))
        .unwrap();
    format!("Bearer {token}")
}
