// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::extract::{JsonBody, QueryParams};
use crate::{
    auth::{AdminOnly, Auth, InstructorOnly},
    error::ApiError,
    state::AppState,
    storage::{Class, ClassRepository, InsertOneResult, UpdateResult},
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StatusUpdate {
    /// New review status, e.g. `approved` or `denied`.
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FeedbackUpdate {
    pub feedback: String,
}

/// List classes. Every query parameter is an equality filter on a top-level
/// string field, e.g. `?status=approved&instructorEmail=a@example.com`.
#[utoipa::path(
    get,
    path = "/classes",
    tag = "Classes",
    responses((status = 200, body = [serde_json::Value]))
)]
pub async fn list_classes(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<BTreeMap<String, String>>,
) -> Result<Json<Vec<Class>>, ApiError> {
    let classes = ClassRepository::new(&state.storage).list(&filter)?;
    Ok(Json(classes))
}

#[utoipa::path(
    post,
    path = "/classes",
    request_body = serde_json::Value,
    tag = "Classes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = InsertOneResult),
        (status = 401, description = "Missing token or caller is not an instructor"),
        (status = 500, description = "Failed to create class")
    )
)]
pub async fn create_class(
    InstructorOnly(claims): InstructorOnly,
    State(state): State<AppState>,
    JsonBody(fields): JsonBody<BTreeMap<String, Value>>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let result = ClassRepository::new(&state.storage)
        .create(fields)
        .map_err(|e| ApiError::storage("Failed to create class", e))?;
    tracing::info!(class_id = %result.inserted_id, instructor = ?claims.email(), "class created");
    Ok(Json(result))
}

#[utoipa::path(
    patch,
    path = "/classes/{id}/status",
    params(("id" = String, Path, description = "Class `_id`")),
    request_body = StatusUpdate,
    tag = "Classes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = UpdateResult),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin"),
        (status = 500, description = "Failed to update class status")
    )
)]
pub async fn set_class_status(
    AdminOnly(_claims): AdminOnly,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<StatusUpdate>,
) -> Result<Json<UpdateResult>, ApiError> {
    let result = ClassRepository::new(&state.storage)
        .set_status(&id, update.status)
        .map_err(|e| ApiError::storage("Failed to update class status", e))?;
    Ok(Json(result))
}

/// Leave feedback on a class. Any signed-in caller may do this.
#[utoipa::path(
    post,
    path = "/classes/{id}/feedback",
    params(("id" = String, Path, description = "Class `_id`")),
    request_body = FeedbackUpdate,
    tag = "Classes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = UpdateResult),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn set_class_feedback(
    Auth(_claims): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<FeedbackUpdate>,
) -> Result<Json<UpdateResult>, ApiError> {
    let result = ClassRepository::new(&state.storage)
        .set_feedback(&id, update.feedback)
        .map_err(|e| ApiError::storage("Failed to update class feedback", e))?;
    Ok(Json(result))
}
