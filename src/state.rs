// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AuthError, Role, RoleCache, TokenService};
use crate::config::{AppConfig, DEFAULT_PAYMENT_CURRENCY};
use crate::payments::PaymentGateway;
use crate::storage::{DocumentStore, UserRepository};

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<DocumentStore>,
    pub tokens: TokenService,
    pub gateway: Arc<dyn PaymentGateway>,
    pub role_cache: Arc<RoleCache>,
    /// Currency for new payment intents.
    pub currency: Arc<str>,
    /// Require an admin token for role promotion.
    pub lock_role_promotion: bool,
}

impl AppState {
    pub fn new(
        storage: DocumentStore,
        tokens: TokenService,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            storage: Arc::new(storage),
            tokens,
            gateway,
            role_cache: Arc::new(RoleCache::disabled()),
            currency: Arc::from(DEFAULT_PAYMENT_CURRENCY),
            lock_role_promotion: false,
        }
    }

    /// Apply the cache, currency and promotion settings from `config`.
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.role_cache = Arc::new(RoleCache::from_config(config.role_cache));
        self.currency = Arc::from(config.gateway.currency.as_str());
        self.lock_role_promotion = config.lock_role_promotion;
        self
    }

    /// Current role of the user with `email`, through the role cache.
    pub fn role_of(&self, email: &str) -> Result<Option<Role>, AuthError> {
        if let Some(role) = self.role_cache.get(email) {
            return Ok(role);
        }
        let generation = self.role_cache.generation();

        let role = UserRepository::new(&self.storage)
            .find_by_email(email)
            .map_err(|e| {
                tracing::error!(error = %e, "role lookup failed");
                AuthError::StorageUnavailable
            })?
            .and_then(|user| user.role);

        self.role_cache.put(email, role, generation);
        Ok(role)
    }
}
