use actix_web::{
    web,
    error::{JsonPayloadError, UrlencodedError},
};

use crate::errors::AppError;

/// Maps body extraction failures onto the contact response shape.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::from(err).into()
    }));
    cfg.app_data(web::FormConfig::default().error_handler(|err, _req| {
        AppError::from(err).into()
    }));
}

impl From<JsonPayloadError> for AppError {
    fn from(err: JsonPayloadError) -> Self {
        match err {
            JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
                AppError::PayloadTooLarge
            }
            JsonPayloadError::ContentType => {
                AppError::BadRequest("Expected a JSON request body".to_string())
            }
            other => AppError::BadRequest(format!("JSON payload error: {}", other)),
        }
    }
}

impl From<UrlencodedError> for AppError {
    fn from(err: UrlencodedError) -> Self {
        match err {
            UrlencodedError::Overflow { .. } => AppError::PayloadTooLarge,
            other => AppError::BadRequest(format!("Form payload error: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, ResponseError};

    #[test]
    fn oversized_bodies_map_to_413() {
        let err: AppError = JsonPayloadError::Overflow { limit: 10 }.into();
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

        let err: AppError = UrlencodedError::Overflow { size: 20, limit: 10 }.into();
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn wrong_content_type_is_bad_request() {
        let err: AppError = JsonPayloadError::ContentType.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
