//! Role gate (Authorizer).
//!
//! Built from the set of roles allowed on a group of routes and applied
//! inside the access middleware, so the `Identity` is already present.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::Identity;
use crate::error::AppError;
use crate::state::AppState;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";

#[derive(Debug, Clone)]
pub struct RoleGate {
    allowed: Arc<[String]>,
}

impl RoleGate {
    /// An empty set is accepted but forbids every identity.
    pub fn new<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        let allowed: Arc<[String]> = roles.into_iter().map(Into::into).collect();
        if allowed.is_empty() {
            tracing::warn!(
                "role gate built with no permitted roles; every request will be forbidden"
            );
        }
        Self { allowed }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn check(&self, identity: Option<&Identity>) -> Result<(), AppError> {
        let identity =
            identity.ok_or_else(|| AppError::unauthenticated("authentication required"))?;

        if self.allowed.iter().any(|role| *role == identity.role) {
            Ok(())
        } else {
            tracing::warn!(
                account_id = %identity.id,
                role = %identity.role,
                allowed = ?self.allowed,
                "role not permitted"
            );
            Err(AppError::forbidden("insufficient permissions"))
        }
    }
}

pub fn apply(router: Router<AppState>, gate: RoleGate) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(gate, authorize))
}

async fn authorize(
    State(gate): State<RoleGate>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    gate.check(req.extensions().get::<Identity>())?;
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn identity(role: &str) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: format!("{role}@clinic.test"),
            role: role.to_string(),
        }
    }

    fn status(result: Result<(), AppError>) -> Option<u16> {
        result.err().map(|e| e.normalize().status.as_u16())
    }

    #[test]
    fn admin_gate_rejects_staff() {
        let gate = RoleGate::new([ROLE_ADMIN]);
        assert_eq!(status(gate.check(Some(&identity(ROLE_STAFF)))), Some(403));
        assert_eq!(status(gate.check(Some(&identity(ROLE_ADMIN)))), None);
    }

    #[test]
    fn any_listed_role_passes() {
        let gate = RoleGate::new([ROLE_ADMIN, ROLE_STAFF]);
        assert!(gate.check(Some(&identity(ROLE_STAFF))).is_ok());
        assert_eq!(status(gate.check(Some(&identity("patient")))), Some(403));
    }

    #[test]
    fn missing_identity_is_unauthenticated() {
        let gate = RoleGate::new([ROLE_ADMIN]);
        assert_eq!(status(gate.check(None)), Some(401));
    }

    #[test]
    fn empty_gate_forbids_everyone() {
        let gate = RoleGate::new(Vec::<String>::new());
        assert!(gate.allowed().is_empty());
        assert_eq!(status(gate.check(Some(&identity(ROLE_ADMIN)))), Some(403));
    }

    #[test]
    fn role_match_is_exact() {
        let gate = RoleGate::new([ROLE_ADMIN]);
        assert_eq!(status(gate.check(Some(&identity("Admin")))), Some(403));
    }
}
