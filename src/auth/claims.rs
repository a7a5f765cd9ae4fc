// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claims carried by an access token.
///
/// Only `email` is interpreted by the server; any other identity fields the
/// client supplied when requesting the token ride along in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl TokenClaims {
    /// Email the caller authenticated as, if the token carries one.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// Identity submitted to `POST /jwt`.
///
/// Client-supplied `iat`/`exp` are discarded when the token is issued.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityClaims {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl IdentityClaims {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            extra: BTreeMap::new(),
        }
    }

    pub(crate) fn into_claims(mut self, iat: i64, exp: i64) -> TokenClaims {
        self.extra.remove("iat");
        self.extra.remove("exp");
        TokenClaims {
            email: self.email,
            iat,
            exp,
            extra: self.extra,
        }
    }
}
