// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::extract::JsonBody;
use crate::{
    auth::Auth,
    error::ApiError,
    payments::to_minor_units,
    state::AppState,
    storage::{InsertOneResult, PaymentRepository},
};

pub const INTENT_FAILED_MESSAGE: &str = "Failed to create payment intent";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PaymentIntentRequest {
    /// Cart total in major currency units, e.g. `10` or `24.99`.
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

#[utoipa::path(
    post,
    path = "/create-payment-intent",
    request_body = PaymentIntentRequest,
    tag = "Payments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = PaymentIntentResponse),
        (status = 400, description = "Price missing, non-numeric or not positive"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Failed to create payment intent")
    )
)]
pub async fn create_payment_intent(
    Auth(claims): Auth,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let amount = to_minor_units(request.price)
        .ok_or_else(|| ApiError::bad_request("price must be a positive number"))?;

    let intent = state
        .gateway
        .create_intent(amount, &state.currency)
        .await
        .map_err(|e| ApiError::gateway(INTENT_FAILED_MESSAGE, e))?;

    tracing::debug!(email = ?claims.email(), amount, "payment intent issued");
    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

/// Record a completed payment. The body is stored as sent.
#[utoipa::path(
    post,
    path = "/payments",
    request_body = serde_json::Value,
    tag = "Payments",
    responses((status = 200, body = InsertOneResult))
)]
pub async fn record_payment(
    State(state): State<AppState>,
    JsonBody(details): JsonBody<BTreeMap<String, Value>>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let result = PaymentRepository::new(&state.storage).record(details)?;
    tracing::info!(payment_id = %result.inserted_id, "payment recorded");
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::IdentityClaims;
    use crate::payments::UnconfiguredGateway;
    use crate::test_support::{test_state, test_state_with_gateway, RecordingGateway};
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    fn caller() -> Auth {
        Auth(IdentityClaims::with_email("a@example.com").into_claims(0, 1))
    }

    #[tokio::test]
    async fn intent_is_created_in_minor_units() {
        let gateway = Arc::new(RecordingGateway::default());
        let (_dir, state) = test_state_with_gateway(gateway.clone());

        let Json(response) = create_payment_intent(
            caller(),
            State(state),
            JsonBody(PaymentIntentRequest { price: 10.0 }),
        )
        .await
        .unwrap();

        assert_eq!(gateway.calls(), vec![(1000, "usd".to_string())]);
        assert!(response.client_secret.starts_with("pi_test_secret"));
        assert_eq!(
            serde_json::to_value(&response).unwrap()["clientSecret"],
            json!(response.client_secret)
        );
    }

    #[tokio::test]
    async fn non_positive_price_is_rejected_before_gateway() {
        let gateway = Arc::new(RecordingGateway::default());
        let (_dir, state) = test_state_with_gateway(gateway.clone());

        let err = create_payment_intent(
            caller(),
            State(state),
            JsonBody(PaymentIntentRequest { price: 0.0 }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn gateway_failure_is_500() {
        let (_dir, state) = test_state_with_gateway(Arc::new(UnconfiguredGateway));

        let err = create_payment_intent(
            caller(),
            State(state),
            JsonBody(PaymentIntentRequest { price: 5.0 }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, INTENT_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn payments_are_appended() {
        let (_dir, state) = test_state();
        let details: BTreeMap<String, Value> = serde_json::from_value(json!({
            "email": "a@example.com",
            "price": 10,
            "transactionId": "pi_1"
        }))
        .unwrap();

        record_payment(State(state.clone()), JsonBody(details.clone()))
            .await
            .unwrap();
        record_payment(State(state.clone()), JsonBody(details))
            .await
            .unwrap();

        let payments = PaymentRepository::new(&state.storage).list_all().unwrap();
        assert_eq!(payments.len(), 2);
    }
}
