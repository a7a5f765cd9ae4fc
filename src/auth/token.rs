// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 access tokens signed with a shared secret.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::{IdentityClaims, TokenClaims};
use super::AuthError;

/// Token lifetime in seconds.
pub const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
        }
    }

    /// Sign `identity` with `iat = now` and a one hour expiry.
    pub fn issue(&self, identity: IdentityClaims) -> Result<String, AuthError> {
        self.issue_at(identity, Utc::now().timestamp())
    }

    pub(crate) fn issue_at(&self, identity: IdentityClaims, iat: i64) -> Result<String, AuthError> {
        let claims = identity.into_claims(iat, iat + TOKEN_TTL_SECS);
        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| AuthError::InternalError(e.to_string()))
    }

    /// Check signature and expiry. Every failure is [`AuthError::InvalidToken`].
    ///
    /// Other registered claims (`aud`, `iss`, `sub`) are carried as opaque
    /// identity fields and never checked.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        decode::<TokenClaims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                AuthError::InvalidToken
            })
    }
}
