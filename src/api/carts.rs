// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::extract::{JsonBody, QueryParams};
use crate::{
    error::ApiError,
    state::AppState,
    storage::{CartItem, CartRepository, DeleteResult, InsertOneResult, NewCartItem},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CartQuery {
    /// Owner email. Without it the cart is empty.
    pub email: Option<String>,
}

#[utoipa::path(
    get,
    path = "/carts",
    params(CartQuery),
    tag = "Carts",
    responses((status = 200, body = [serde_json::Value]))
)]
pub async fn list_cart(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<CartQuery>,
) -> Result<Json<Vec<CartItem>>, ApiError> {
    let Some(email) = query.email else {
        return Ok(Json(Vec::new()));
    };
    let items = CartRepository::new(&state.storage).list_by_email(&email)?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/carts",
    request_body = serde_json::Value,
    tag = "Carts",
    responses((status = 200, body = InsertOneResult))
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    JsonBody(item): JsonBody<NewCartItem>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let result = CartRepository::new(&state.storage).add(item)?;
    Ok(Json(result))
}

#[utoipa::path(
    delete,
    path = "/carts/{id}",
    params(("id" = String, Path, description = "Cart item `_id`")),
    tag = "Carts",
    responses((status = 200, body = DeleteResult))
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let result = CartRepository::new(&state.storage).remove(&id)?;
    Ok(Json(result))
}

/// Fetch one cart item; `null` when it does not exist.
#[utoipa::path(
    get,
    path = "/carts/{id}",
    params(("id" = String, Path, description = "Cart item `_id`")),
    tag = "Carts",
    responses((status = 200, description = "The item, or `null`", body = serde_json::Value))
)]
pub async fn get_cart_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<CartItem>>, ApiError> {
    let item = CartRepository::new(&state.storage).get(&id)?;
    Ok(Json(item))
}
