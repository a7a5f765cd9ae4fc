// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the access-control chain.
//!
//! Use the extractors in handlers to require authentication or a role:
//!
//! ```rust,ignore
//! async fn approve(AdminOnly(claims): AdminOnly) -> impl IntoResponse {
//!     // claims.email() is a user whose stored role is admin
//! }
//! ```
//!
//! Roles are never read from the token. Each role check looks the caller's
//! email up in the user store (through the role cache).

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, Role, TokenClaims};
use crate::state::AppState;

/// Extractor for any caller holding a valid token.
pub struct Auth(pub TokenClaims);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if middleware already verified the token
        if let Some(claims) = parts.extensions.get::<TokenClaims>().cloned() {
            return Ok(Auth(claims));
        }

        let token = bearer_token(parts)?;
        let claims = state.tokens.verify(token)?;
        Ok(Auth(claims))
    }
}

/// Extractor that requires the caller's stored role to be admin.
///
/// Rejects with 403 when the role does not match.
pub struct AdminOnly(pub TokenClaims);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(claims) = Auth::from_request_parts(parts, state).await?;
        require_role(state, &claims, Role::Admin, AuthError::Forbidden)?;
        Ok(AdminOnly(claims))
    }
}

/// Extractor that requires the caller's stored role to be instructor.
///
/// Rejects with 401 (not 403) when the role does not match.
pub struct InstructorOnly(pub TokenClaims);

impl FromRequestParts<AppState> for InstructorOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(claims) = Auth::from_request_parts(parts, state).await?;
        require_role(state, &claims, Role::Instructor, AuthError::NotInstructor)?;
        Ok(InstructorOnly(claims))
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub(crate) fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidAuthHeader)
}

fn require_role(
    state: &AppState,
    claims: &TokenClaims,
    required: Role,
    denied: AuthError,
) -> Result<(), AuthError> {
    let Some(email) = claims.email() else {
        return Err(denied);
    };
    match state.role_of(email)? {
        Some(role) if role == required => Ok(()),
        _ => {
            tracing::debug!(%email, %required, "role check failed");
            Err(denied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::IdentityClaims;
    use crate::test_support::{seed_user, test_state};
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(v) = value {
            builder = builder.header(AUTHORIZATION, v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_extracts_valid_token() {
        let (_dir, state) = test_state();
        let token = state
            .tokens
            .issue(IdentityClaims::with_email("a@example.com"))
            .unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));

        let Auth(claims) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(claims.email(), Some("a@example.com"));
    }

    #[tokio::test]
    async fn auth_rejects_missing_and_malformed_headers() {
        let (_dir, state) = test_state();

        let mut parts = parts_with_auth(None);
        let err = Auth::from_request_parts(&mut parts, &state).await.err();
        assert_eq!(err, Some(AuthError::MissingAuthHeader));

        let mut parts = parts_with_auth(Some("Basic abc"));
        let err = Auth::from_request_parts(&mut parts, &state).await.err();
        assert_eq!(err, Some(AuthError::InvalidAuthHeader));

        let mut parts = parts_with_auth(Some("Bearer "));
        let err = Auth::from_request_parts(&mut parts, &state).await.err();
        assert_eq!(err, Some(AuthError::InvalidAuthHeader));

        let mut parts = parts_with_auth(Some("Bearer garbage"));
        let err = Auth::from_request_parts(&mut parts, &state).await.err();
        assert_eq!(err, Some(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn auth_prefers_claims_set_by_middleware() {
        let (_dir, state) = test_state();
        let claims = IdentityClaims::with_email("mw@example.com").into_claims(0, 1);
        let mut parts = parts_with_auth(None);
        parts.extensions.insert(claims.clone());

        let Auth(found) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(found, claims);
    }

    #[tokio::test]
    async fn admin_only_checks_stored_role() {
        let (_dir, state) = test_state();
        seed_user(&state, "admin@example.com", Some(Role::Admin));
        seed_user(&state, "teach@example.com", Some(Role::Instructor));

        for (email, allowed) in [
            ("admin@example.com", true),
            ("teach@example.com", false),
            ("nobody@example.com", false),
        ] {
            let token = state.tokens.issue(IdentityClaims::with_email(email)).unwrap();
            let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
            let result = AdminOnly::from_request_parts(&mut parts, &state).await;
            match allowed {
                true => assert!(result.is_ok(), "{email} should pass"),
                false => assert_eq!(result.err(), Some(AuthError::Forbidden)),
            }
        }
    }

    #[tokio::test]
    async fn instructor_only_rejects_with_401_variant() {
        let (_dir, state) = test_state();
        seed_user(&state, "teach@example.com", Some(Role::Instructor));
        seed_user(&state, "admin@example.com", Some(Role::Admin));

        let token = state
            .tokens
            .issue(IdentityClaims::with_email("teach@example.com"))
            .unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        assert!(InstructorOnly::from_request_parts(&mut parts, &state)
            .await
            .is_ok());

        let token = state
            .tokens
            .issue(IdentityClaims::with_email("admin@example.com"))
            .unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        assert_eq!(
            InstructorOnly::from_request_parts(&mut parts, &state)
                .await
                .err(),
            Some(AuthError::NotInstructor)
        );
    }

    #[tokio::test]
    async fn token_without_email_fails_role_checks() {
        let (_dir, state) = test_state();
        let token = state.tokens.issue(IdentityClaims::default()).unwrap();

        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        assert!(Auth::from_request_parts(&mut parts, &state).await.is_ok());
        assert_eq!(
            AdminOnly::from_request_parts(&mut parts, &state).await.err(),
            Some(AuthError::Forbidden)
        );
        assert_eq!(
            InstructorOnly::from_request_parts(&mut parts, &state)
                .await
                .err(),
            Some(AuthError::NotInstructor)
        );
    }
}
