//! Authentication extractor.
//!
//! Verifies bearer tokens issued by the external identity service. Only
//! verification happens here; there is no token issuance endpoint in this
//! API.

use crate::{error::ApiError, state::AppState};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use pyrostage_application::services::ServiceContext;
use pyrostage_domain::user::UserRole;
use serde::{Deserialize, Serialize};

/// Claims stored in the JWT
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the principal's email address
    pub sub: String,

    /// Principal role
    pub role: UserRole,

    /// Expiration time (UTC timestamp)
    pub exp: usize,

    /// Issued at (UTC timestamp)
    pub iat: usize,
}

/// Authenticated principal extracted from the bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Principal email
    pub email: String,

    /// Principal role
    pub role: UserRole,

    /// Original claims
    pub claims: Claims,
}

impl AuthenticatedUser {
    /// Staff and admins manage booking lifecycles and moderate content.
    pub fn is_staff(&self) -> bool {
        self.role.can_manage_bookings()
    }

    /// Only full admins mutate the catalog.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Build the service-layer context for this principal.
    pub fn service_context(&self, correlation_id: &str) -> ServiceContext {
        let ctx = ServiceContext::authenticated(self.email.clone(), correlation_id);
        if self.is_staff() {
            ctx.with_admin()
        } else {
            ctx
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::InvalidToken("Invalid authorization header format".to_string())
        })?;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.jwt_secret().as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| ApiError::InvalidToken(format!("Token validation failed: {}", e)))?;

        let claims = token_data.claims;

        Ok(Self {
            email: claims.sub.to_lowercase(),
            role: claims.role,
            claims,
        })
    }
}

/// Optional authenticated user (allows anonymous access)
#[derive(Debug, Clone)]
pub struct MaybeAuthenticatedUser(pub Option<AuthenticatedUser>);

impl MaybeAuthenticatedUser {
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.0.as_ref()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthenticatedUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(Self(Some(user))),
            Err(_) => Ok(Self(None)),
        }
    }
}
