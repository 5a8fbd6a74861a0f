use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{entities::admin::SessionClaims, errors::AuthError, AppState};

pub const SESSION_COOKIE: &str = "admin_session";

/// Extractor for a live admin session, read from the session cookie or a
/// bearer token. Returns 401 when absent, expired or revoked.
#[derive(Debug)]
pub struct AdminSession(pub SessionClaims);

impl FromRequest for AdminSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req).map(AdminSession).map_err(Into::into))
    }
}

fn authenticate(req: &HttpRequest) -> Result<SessionClaims, AuthError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| {
            tracing::error!("AppState missing in admin extractor");
            AuthError::MissingCredentials
        })?;

    let token = extract_token(req).ok_or(AuthError::MissingCredentials)?;
    let claims = state.admin_handler.sessions.decode_session(&token)?.claims;
    Ok(claims)
}

fn extract_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        });

    bearer.or_else(|| req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()))
}
