// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fun Trek - Course Booking Backend
//!
//! HTTP backend for an outdoor course marketplace: students sign up and fill
//! a cart, instructors publish classes, admins review them, and checkout goes
//! through a card payment gateway.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Access tokens and role checks (HS256 JWT)
//! - `payments` - Payment gateway client (Stripe)
//! - `storage` - File-backed JSON document store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod payments;
pub mod state;
pub mod storage;

#[cfg(test)]
mod test_support;
