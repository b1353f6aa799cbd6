//! Authenticated user extracted from the identity cookie or a bearer token.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::types::{AgencyId, TypeConstraintError, UserEmail, UserName};
use crate::domain::user::NewUser;
use crate::models::config::ServerConfig;

/// JWT claims issued by the authentication service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub agency_id: i32,
    pub name: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Decodes and validates an HS256 token.
    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn extract_user(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let config = req
        .app_data::<web::Data<ServerConfig>>()
        .ok_or_else(|| ErrorUnauthorized("server configuration missing"))?;

    let token = match bearer_token(req) {
        Some(token) => token,
        None => req
            .get_identity()
            .ok()
            .and_then(|identity| identity.id().ok())
            .ok_or_else(|| ErrorUnauthorized("not authenticated"))?,
    };

    AuthenticatedUser::from_jwt(&token, &config.secret).map_err(|err| {
        log::warn!("Rejected token: {err}");
        ErrorUnauthorized("invalid token")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

impl TryFrom<&AuthenticatedUser> for NewUser {
    type Error = TypeConstraintError;

    fn try_from(user: &AuthenticatedUser) -> Result<Self, Self::Error> {
        Ok(NewUser::new(
            AgencyId::new(user.agency_id)?,
            UserName::new(user.name.as_str())?,
            UserEmail::new(user.email.as_str())?,
        ))
    }
}
