use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{entities::token::Claims, errors::AuthError, AppState};

/// Extractor for admin claims, gating the mutating project routes.
/// Returns 401 when credentials are missing or invalid, 403 when the
/// token belongs to a non-admin.
/// Usage: add `claims: AdminClaims` as a parameter to a handler function.
#[derive(Debug)]
pub struct AdminClaims(pub Claims);

impl FromRequest for AdminClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(admin_claims_from_request(req).map(AdminClaims))
    }
}

fn admin_claims_from_request(req: &HttpRequest) -> Result<Claims, actix_web::Error> {
    let state = req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| {
            tracing::error!("AppState missing while extracting claims");
            AuthError::MissingTokenService
        })?;

    let token = extract_token(req)
        .ok_or_else(|| {
            tracing::warn!("Missing or malformed Authorization header");
            AuthError::MissingCredentials
        })?;

    let claims = state.auth_handler.token_service.decode_jwt(&token)?.claims;

    if !claims.admin {
        tracing::warn!("Non-admin token on admin route");
        return Err(AuthError::Forbidden("Admin access required".into()).into());
    }

    Ok(claims)
}

fn extract_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}
