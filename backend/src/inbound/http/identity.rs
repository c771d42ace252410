//! Caller identity supplied by the upstream authentication gateway.
//!
//! Token validation happens before requests reach this service. The gateway
//! forwards the authenticated contributor name in [`CONTRIBUTOR_HEADER`] and
//! the token's role claims, comma separated, in [`ROLES_HEADER`]. Handlers
//! extract [`Contributor`] and get a `401` when the name is missing or blank.
//! Curation routes additionally call [`Contributor::require_role`], which
//! answers `403` when the role is absent.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use serde_json::json;

use crate::domain::DomainError;

/// Header carrying the authenticated contributor name.
pub const CONTRIBUTOR_HEADER: &str = "x-forwarded-user";

/// Header carrying the contributor's role claims as a comma-separated list.
pub const ROLES_HEADER: &str = "x-forwarded-roles";

/// Role allowing a contributor to add films and curate their reviews.
pub const FILM_ADD_ROLE: &str = "film.add";

/// Authenticated contributor name and role claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contributor {
    name: String,
    roles: Vec<String>,
}

impl Contributor {
    /// Build a contributor from an already authenticated name and roles.
    #[must_use]
    pub fn new(name: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            name: name.into(),
            roles,
        }
    }

    /// Contributor name as forwarded by the gateway.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Role claims forwarded with the request.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Whether the contributor holds `role`.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|held| held == role)
    }

    /// Fail with [`crate::domain::ErrorCode::Forbidden`] unless the
    /// contributor holds `role`.
    ///
    /// # Errors
    /// Returns a forbidden error naming the missing role.
    pub fn require_role(&self, role: &str) -> Result<(), DomainError> {
        if self.has_role(role) {
            return Ok(());
        }
        Err(
            DomainError::forbidden(format!("role {role} required"))
                .with_details(json!({ "role": role, "code": "missing_role" })),
        )
    }

    /// Consume the wrapper, keeping the name.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.name
    }

    fn from_headers(req: &HttpRequest) -> Result<Self, DomainError> {
        let raw_name = req
            .headers()
            .get(CONTRIBUTOR_HEADER)
            .ok_or_else(|| DomainError::unauthorized("login required"))?;
        let name = raw_name
            .to_str()
            .map_err(|_| DomainError::unauthorized("contributor header must be visible ASCII"))?
            .trim();
        if name.is_empty() {
            return Err(DomainError::unauthorized("login required"));
        }

        let roles = req
            .headers()
            .get_all(ROLES_HEADER)
            .filter_map(|value| value.to_str().ok())
            .flat_map(|list| list.split(','))
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(Self::new(name, roles))
    }
}

impl FromRequest for Contributor {
    type Error = DomainError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req))
    }
}
