// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Payment Intents
//!
//! Checkout is settled by an external card gateway. The server's only job is
//! to open a payment intent for the cart total and hand the intent's client
//! secret back to the browser, which completes the charge directly with the
//! gateway and then records the payment through `POST /payments`.
//!
//! The gateway sits behind [`PaymentGateway`] so it can be swapped (or faked
//! in tests) without touching the HTTP layer.

pub mod stripe;

use std::future::Future;
use std::pin::Pin;

pub use stripe::StripeClient;

use crate::config::GatewayConfig;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("payment gateway configuration missing: {0}")]
    MissingConfig(String),

    #[error("payment gateway request failed: {0}")]
    Request(String),

    #[error("payment gateway response was invalid: {0}")]
    InvalidResponse(String),
}

/// An intent opened with the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub id: Option<String>,
    pub client_secret: String,
}

pub type GatewayFuture<'a> =
    Pin<Box<dyn Future<Output = Result<PaymentIntent, GatewayError>> + Send + 'a>>;

pub trait PaymentGateway: Send + Sync {
    /// Open an intent for `amount` minor units of `currency`.
    fn create_intent<'a>(&'a self, amount: i64, currency: &'a str) -> GatewayFuture<'a>;
}

/// Gateway used when no secret key is configured. Always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredGateway;

impl PaymentGateway for UnconfiguredGateway {
    fn create_intent<'a>(&'a self, _amount: i64, _currency: &'a str) -> GatewayFuture<'a> {
        Box::pin(async {
            Err(GatewayError::MissingConfig(
                crate::config::STRIPE_SECRET_KEY_ENV.to_string(),
            ))
        })
    }
}

/// Pick the gateway implementation for the given configuration.
pub fn gateway_from_config(
    config: &GatewayConfig,
) -> Result<Box<dyn PaymentGateway>, GatewayError> {
    match &config.secret_key {
        Some(key) => Ok(Box::new(StripeClient::new(key, &config.api_base_url)?)),
        None => {
            tracing::warn!("no payment gateway key configured; payment intents will fail");
            Ok(Box::new(UnconfiguredGateway))
        }
    }
}

/// Convert a decimal price to integer minor units, rounding to the nearest
/// unit. Non-finite, non-positive and out-of-range prices have no amount.
pub fn to_minor_units(price: f64) -> Option<i64> {
    if !price.is_finite() || price <= 0.0 {
        return None;
    }
    let minor = (price * 100.0).round();
    if minor < 1.0 || minor > i64::MAX as f64 {
        return None;
    }
    Some(minor as i64)
}
