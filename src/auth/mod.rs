// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer tokens and role checks for the booking API.
//!
//! ## Auth Flow
//!
//! 1. After signing in, the frontend posts the user's identity to `POST /jwt`
//! 2. The server signs it (HS256, shared secret, one hour expiry)
//! 3. The frontend sends `Authorization: Bearer <token>` on protected calls
//! 4. The server:
//!    - Verifies signature and expiry (no clock skew tolerance)
//!    - For admin or instructor routes, looks up the caller's email in the
//!      user store and checks the stored role
//!
//! ## Rejections
//!
//! - Missing or invalid token: 401 `unauthorized access`
//! - Not an admin: 403 `forbidden message`
//! - Not an instructor: 401 `Unauthorized access`

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod role_cache;
pub mod roles;
pub mod token;

pub use claims::{IdentityClaims, TokenClaims};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, InstructorOnly};
pub use middleware::require_admin;
pub use role_cache::RoleCache;
pub use roles::Role;
pub use token::{TokenService, TOKEN_TTL_SECS};
