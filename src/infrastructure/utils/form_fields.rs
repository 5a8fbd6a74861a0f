use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::{dev::Payload, http::header::CONTENT_TYPE, web, FromRequest, HttpRequest};
use futures_util::{future::LocalBoxFuture, StreamExt, TryStreamExt};

use crate::{entities::contact::ContactFields, errors::AppError};

/// Upper bound on the summed size of all multipart text fields.
pub const MAX_FORM_BYTES: usize = 64 * 1024;

/// Extracts contact form fields from either a urlencoded or a multipart body.
/// The site's script posts `FormData`, which browsers send as multipart.
pub struct FormFields(pub ContactFields);

impl FromRequest for FormFields {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::new(req.headers(), payload.take());
            Box::pin(async move {
                collect_multipart(multipart)
                    .await
                    .map(|fields| FormFields(ContactFields(fields)))
                    .map_err(Into::into)
            })
        } else {
            let form = web::Form::<HashMap<String, String>>::from_request(req, payload);
            Box::pin(async move {
                let form = form.await?;
                Ok(FormFields(ContactFields(form.into_inner())))
            })
        }
    }
}

async fn collect_multipart(mut multipart: Multipart) -> Result<HashMap<String, String>, AppError> {
    let mut fields = HashMap::new();
    let mut total = 0usize;

    while let Some(mut field) = multipart
        .try_next()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed form data: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        let is_file = field
            .content_disposition()
            .is_some_and(|cd| cd.get_filename().is_some());

        let mut value = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::BadRequest(format!("Malformed form data: {}", e)))?;
            total += chunk.len();
            if total > MAX_FORM_BYTES {
                return Err(AppError::PayloadTooLarge);
            }
            if !is_file {
                value.extend_from_slice(&chunk);
            }
        }

        if let (Some(name), false) = (name, is_file) {
            fields.insert(name, String::from_utf8_lossy(&value).into_owned());
        }
    }

    Ok(fields)
}
