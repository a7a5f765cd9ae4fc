// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stripe payment intents over the REST API.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::info;

use super::{GatewayError, GatewayFuture, PaymentGateway, PaymentIntent};

const PAYMENT_INTENTS_PATH: &str = "/v1/payment_intents";
const CARD_METHOD: &str = "card";

#[derive(Debug, Clone)]
pub struct StripeClient {
    api_base_url: String,
    secret_key: String,
    http: Client,
}

impl StripeClient {
    pub fn new(secret_key: &str, api_base_url: &str) -> Result<Self, GatewayError> {
        if secret_key.trim().is_empty() {
            return Err(GatewayError::MissingConfig(
                crate::config::STRIPE_SECRET_KEY_ENV.to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| GatewayError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
            http,
        })
    }

    async fn post_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        let form = intent_form(amount, currency);
        let response = self
            .http
            .post(format!("{}{PAYMENT_INTENTS_PATH}", self.api_base_url))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| GatewayError::Request(format!("POST {PAYMENT_INTENTS_PATH} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Request(format!(
                "POST {PAYMENT_INTENTS_PATH} returned {status}: {body}"
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            GatewayError::InvalidResponse(format!("POST {PAYMENT_INTENTS_PATH} invalid JSON: {e}"))
        })?;
        let intent = parse_intent(&body)?;
        info!(intent_id = ?intent.id, amount, currency, "payment intent created");
        Ok(intent)
    }
}

impl PaymentGateway for StripeClient {
    fn create_intent<'a>(&'a self, amount: i64, currency: &'a str) -> GatewayFuture<'a> {
        Box::pin(self.post_payment_intent(amount, currency))
    }
}

fn intent_form(amount: i64, currency: &str) -> Vec<(&'static str, String)> {
    vec![
        ("amount", amount.to_string()),
        ("currency", currency.to_string()),
        ("payment_method_types[]", CARD_METHOD.to_string()),
    ]
}

fn parse_intent(body: &Value) -> Result<PaymentIntent, GatewayError> {
    let client_secret = body
        .get("client_secret")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            GatewayError::InvalidResponse("missing client_secret in response".to_string())
        })?;

    Ok(PaymentIntent {
        id: body.get("id").and_then(Value::as_str).map(str::to_string),
        client_secret: client_secret.to_string(),
    })
}
