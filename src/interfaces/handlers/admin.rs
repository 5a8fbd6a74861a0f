use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    get, post, web, HttpResponse,
};
use chrono::Local;

use crate::{
    entities::admin::AdminLogin,
    errors::AppError,
    use_cases::extractors::{AdminSession, SESSION_COOKIE},
    AppState,
};

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    credentials: web::Json<AdminLogin>,
) -> Result<HttpResponse, AppError> {
    let session = state.admin_handler.login(credentials.into_inner()).await?;

    let cookie = Cookie::build(SESSION_COOKIE, session.token.clone())
        .path("/admin")
        .http_only(true)
        .secure(state.secure_cookies)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(session.expires_in))
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(session))
}

#[post("/logout")]
pub async fn logout(
    admin: AdminSession,
    state: web::Data<AppState>,
) -> HttpResponse {
    state.admin_handler.logout(&admin.0);

    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/admin").finish();
    removal.make_removal();

    HttpResponse::Ok()
        .cookie(removal)
        .json(serde_json::json!({"message": "Logged out successfully"}))
}

#[get("/submissions")]
pub async fn submissions(
    _admin: AdminSession,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let listing = state
        .admin_handler
        .list_submissions(Local::now().date_naive())
        .await?;

    Ok(HttpResponse::Ok().json(listing))
}
