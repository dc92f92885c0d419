//! Authenticated operator extracted from the request.
//!
//! The external auth service issues an HS256 JWT signed with the shared
//! `secret`. It reaches us either as the session identity (cookie) or as a
//! `Bearer` token in the `Authorization` header.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::config::ServerConfig;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Verifies the token signature and expiry and returns its claims.
    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<AuthenticatedUser>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }

    /// Signs the claims with HS256.
    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

fn unauthorized(message: &'static str) -> actix_web::Error {
    InternalError::from_response(
        message,
        HttpResponse::Unauthorized().json(json!({ "error": message })),
    )
    .into()
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
        log::error!("ServerConfig is not registered as app data");
        return Err(actix_web::error::ErrorInternalServerError(
            "server misconfigured",
        ));
    };

    let token = bearer_token(req)
        .or_else(|| req.get_identity().ok().and_then(|identity| identity.id().ok()))
        .ok_or_else(|| unauthorized("authentication required"))?;

    AuthenticatedUser::from_jwt(&token, &config.secret).map_err(|err| {
        log::warn!("Rejected identity token: {err}");
        unauthorized("invalid or expired credentials")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-test-secret-test-secret-test-secret-test-secret-0000";

    fn user(exp: usize) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".into(),
            email: "ops@enoteca.test".into(),
            name: "Ops".into(),
            roles: vec!["enoteca".into()],
            exp,
        }
    }

    fn far_future() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn token_round_trip() {
        let claims = user(far_future());
        let token = claims.to_jwt(SECRET).unwrap();
        assert_eq!(AuthenticatedUser::from_jwt(&token, SECRET).unwrap(), claims);
    }

    #[test]
    fn wrong_secret_or_expired_token_is_rejected() {
        let token = user(far_future()).to_jwt(SECRET).unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, "another-secret").is_err());

        let expired = user(1).to_jwt(SECRET).unwrap();
        assert!(AuthenticatedUser::from_jwt(&expired, SECRET).is_err());
    }

    #[test]
    fn role_lookup() {
        let claims = user(0);
        assert!(claims.has_role("enoteca"));
        assert!(!claims.has_role("enoteca_admin"));
    }
}
