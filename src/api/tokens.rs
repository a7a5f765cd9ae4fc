// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::extract::JsonBody;
use crate::{auth::IdentityClaims, error::ApiError, state::AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Issue an access token for the posted identity.
///
/// No credentials are checked here: the frontend calls this right after its
/// own sign-in flow. The token is only as trustworthy as that flow.
#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Auth",
    request_body = serde_json::Value,
    responses(
        (status = 200, body = TokenResponse),
        (status = 400, description = "Body is not an object or email is not a string")
    )
)]
pub async fn issue_token(
    State(state): State<AppState>,
    JsonBody(identity): JsonBody<IdentityClaims>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.tokens.issue(identity)?;
    Ok(Json(TokenResponse { token }))
}
