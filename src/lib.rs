use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod telemetry;

pub use domain::{entities, layout, sanitize, use_cases, validation};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{auth, limiter, mail, storage, utils};

use auth::session::SessionService;
use limiter::{JsonFileRateLimiter, MemoryRateLimiter};
use repositories::{rate_limit::RateLimitStore, submission_log::SubmissionLog};
use settings::{AppConfig, RateLimitBackend};
use storage::FileSubmissionLog;
use use_cases::{admin::AdminHandler, contact::{ContactHandler, ContactSettings}};

pub struct AppState {
    pub contact_handler: ContactHandler,
    pub admin_handler: AdminHandler,
    pub trust_forwarded_headers: bool,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let rate_limiter: Arc<dyn RateLimitStore> = match config.rate_limit_backend {
            RateLimitBackend::File => Arc::new(JsonFileRateLimiter::new(
                config.rate_limit_file.clone(),
                config.rate_limit,
                config.rate_limit_window_secs,
            )),
            RateLimitBackend::Memory => Arc::new(MemoryRateLimiter::new(
                config.rate_limit,
                config.rate_limit_window_secs,
            )),
        };

        let submission_log: Arc<dyn SubmissionLog> =
            Arc::new(FileSubmissionLog::new(config.log_file.clone()));

        let contact_handler = ContactHandler::new(
            ContactSettings::from(config),
            mail::build_mailer(config),
            rate_limiter,
            submission_log.clone(),
        );

        let admin_handler = AdminHandler::new(
            config.admin_password_hash.clone(),
            SessionService::new(config),
            submission_log,
        );

        AppState {
            contact_handler,
            admin_handler,
            trust_forwarded_headers: config.trust_forwarded_headers,
            secure_cookies: config.is_production(),
        }
    }
}
