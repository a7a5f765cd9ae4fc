// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Short-lived LRU cache for role lookups.
//!
//! Every admin or instructor check reads the user store. With a non-zero TTL
//! the result (including "no such user") is kept per email for that long.
//! Role promotions invalidate the affected email.
//!
//! Lookups that overlap an invalidation must not repopulate the entry with the
//! role read before the promotion. Callers take [`RoleCache::generation`]
//! before reading the store and hand it back to [`RoleCache::put`], which
//! drops the value if any invalidation happened in between.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use super::Role;
use crate::config::RoleCacheConfig;

struct CacheEntry {
    role: Option<Role>,
    inserted_at: Instant,
}

pub struct RoleCache {
    cache: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
    /// Bumped by every invalidation, under the cache lock.
    generation: AtomicU64,
}

impl RoleCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl,
            generation: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: RoleCacheConfig) -> Self {
        Self::new(config.capacity, config.ttl)
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::from_config(RoleCacheConfig::disabled())
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Cached role for `email`.
    ///
    /// The outer `None` means "not cached"; `Some(None)` means the user was
    /// looked up and has no role (or does not exist).
    pub fn get(&self, email: &str) -> Option<Option<Role>> {
        if !self.is_enabled() {
            return None;
        }
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(email) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.role);
            }
            cache.pop(email);
        }
        None
    }

    /// Current invalidation generation; take it before reading the store.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Cache `role` for `email` unless an invalidation ran since `seen`.
    ///
    /// Returns whether the entry was stored.
    pub fn put(&self, email: &str, role: Option<Role>, seen: u64) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let Ok(mut cache) = self.cache.lock() else {
            return false;
        };
        if self.generation.load(Ordering::Acquire) != seen {
            return false;
        }
        cache.put(
            email.to_string(),
            CacheEntry {
                role,
                inserted_at: Instant::now(),
            },
        );
        true
    }

    pub fn invalidate(&self, email: &str) {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.pop(email);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}
