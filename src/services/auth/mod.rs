pub mod access_jwt;
pub mod authenticator;
pub mod factory;

pub use access_jwt::{TokenError, TokenVerifier};
pub use authenticator::Authenticator;
pub use factory::build_authenticator;
