// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Extractors cover per-handler checks. This middleware applies the admin
//! check to a whole router subtree, which is how the role promotion routes
//! are locked when `LOCK_ROLE_PROMOTION` is set.
//!
//! ```rust,ignore
//! let promotions = Router::new()
//!     .route("/users/admin/{user_ref}", patch(make_admin))
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), require_admin));
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::AdminOnly;
use crate::state::AppState;

/// Reject non-admin callers; on success the verified claims are stored in
/// request extensions, where the [`Auth`](super::Auth) extractor finds them.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    match AdminOnly::from_request_parts(&mut parts, &state).await {
        Ok(AdminOnly(claims)) => {
            parts.extensions.insert(claims);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(e) => e.into_response(),
    }
}
