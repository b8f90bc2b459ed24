/// Factory: build `Authenticator` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::repos::account_repo::AccountStore;
use crate::services::auth::{Authenticator, TokenVerifier};

pub fn build_authenticator(config: &Config, accounts: Arc<dyn AccountStore>) -> Arc<Authenticator> {
    let tokens = TokenVerifier::new(&config.jwt_secret, config.access_token_leeway_seconds);

    Arc::new(Authenticator::new(
        tokens,
        accounts,
        config.account_lookup_timeout,
    ))
}
