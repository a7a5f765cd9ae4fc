// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Body and query extractors that reject with the API's JSON error shape
//! (400 `{error: true, message}`) instead of axum's plain-text rejections.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Price {
        price: f64,
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"price": "#))
            .unwrap();
        let err = JsonBody::<Price>::from_request(request, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn wrong_field_type_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"price": "ten"}"#))
            .unwrap();
        let err = JsonBody::<Price>::from_request(request, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn valid_json_is_extracted() {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"price": 10}"#))
            .unwrap();
        let JsonBody(body) = JsonBody::<Price>::from_request(request, &()).await.unwrap();
        assert_eq!(body.price, 10.0);
    }

    #[tokio::test]
    async fn bad_query_is_bad_request() {
        let mut parts = Request::builder()
            .uri("/?price=abc")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let err = QueryParams::<Price>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
