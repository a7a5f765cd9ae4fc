// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document store.
//!
//! Each repository wraps one [`Collection`](super::collection::Collection)
//! and exposes the operations the HTTP layer needs for that entity.

pub mod carts;
pub mod classes;
pub mod payments;
pub mod users;

pub use carts::{CartItem, CartRepository, NewCartItem};
pub use classes::{Class, ClassRepository};
pub use payments::{Payment, PaymentRepository};
pub use users::{NewUser, RoleChange, User, UserFilter, UserRepository};
