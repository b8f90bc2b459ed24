//! Bearer credential → active account → `Identity`.
//!
//! Built once at startup from the signing secret and the account store and
//! shared by every request through `AppState`.

use std::{sync::Arc, time::Duration};

use axum::http::{HeaderMap, header};

use crate::api::v1::extractors::Identity;
use crate::error::AppError;
use crate::repos::account_repo::AccountStore;
use crate::services::auth::access_jwt::TokenVerifier;

pub const TOKEN_REQUIRED: &str = "authentication token required";
pub const ACCOUNT_UNAVAILABLE: &str = "user not found or inactive";

#[derive(Clone)]
pub struct Authenticator {
    tokens: TokenVerifier,
    accounts: Arc<dyn AccountStore>,
    lookup_timeout: Duration,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("tokens", &self.tokens)
            .field("lookup_timeout", &self.lookup_timeout)
            .finish()
    }
}

impl Authenticator {
    pub fn new(
        tokens: TokenVerifier,
        accounts: Arc<dyn AccountStore>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            tokens,
            accounts,
            lookup_timeout,
        }
    }

    /// Resolves the request's credential to the identity of an active account.
    ///
    /// The account store is read at most once, and only after the token has
    /// been verified.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AppError> {
        let token =
            bearer_token(headers).ok_or_else(|| AppError::unauthenticated(TOKEN_REQUIRED))?;

        let verified = match self.tokens.verify(token) {
            Ok(verified) => verified,
            Err(err) => {
                tracing::warn!(error = ?err, "access token verification failed");
                return Err(err.into());
            }
        };

        let lookup = self.accounts.find_active_account_by_id(verified.account_id);
        let account = tokio::time::timeout(self.lookup_timeout, lookup)
            .await
            .map_err(|_| {
                tracing::error!(
                    account_id = %verified.account_id,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "account lookup timed out"
                );
                AppError::internal("account lookup timed out")
            })??;

        // Unknown and disabled accounts must be indistinguishable to the caller.
        let Some(account) = account.filter(|a| a.is_active) else {
            tracing::warn!(
                account_id = %verified.account_id,
                "token subject not found or inactive"
            );
            return Err(AppError::unauthenticated(ACCOUNT_UNAVAILABLE));
        };

        Ok(Identity {
            id: account.id,
            email: account.email,
            role: account.role,
        })
    }
}

/// `Authorization: Bearer <token>` → `<token>`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = raw.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
