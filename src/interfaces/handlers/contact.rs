use actix_web::{http::header, web, HttpRequest, HttpResponse};
use chrono::Local;

use crate::{
    entities::contact::RequestMeta,
    errors::AppError,
    utils::{form_fields::FormFields, get_client_ip::get_client_ip},
    AppState,
};

pub async fn submit_contact_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: FormFields,
) -> Result<HttpResponse, AppError> {
    let meta = RequestMeta {
        client_ip: get_client_ip(&req, state.trust_forwarded_headers),
        user_agent: header_value(&req, header::USER_AGENT),
        referrer: header_value(&req, header::REFERER),
        received_at: Local::now().naive_local(),
    };

    let response = state.contact_handler.submit(form.0, meta).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed)
}

fn header_value(req: &HttpRequest, name: header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
