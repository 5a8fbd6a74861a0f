use std::sync::Arc;

use chrono::NaiveDate;
use validator::Validate;
use zeroize::Zeroizing;

use crate::{
    auth::{password::verify_password, session::SessionService},
    entities::{
        admin::{AdminLogin, SessionClaims, SessionResponse},
        submission::{SubmissionListResponse, SubmissionStats},
    },
    errors::{AppError, AuthError},
    repositories::submission_log::SubmissionLog,
};

pub struct AdminHandler {
    password_hash: Option<Zeroizing<String>>,
    pub sessions: SessionService,
    pub submission_log: Arc<dyn SubmissionLog>,
}

impl AdminHandler {
    pub fn new(
        password_hash: Option<String>,
        sessions: SessionService,
        submission_log: Arc<dyn SubmissionLog>,
    ) -> Self {
        AdminHandler {
            password_hash: password_hash
                .filter(|h| !h.trim().is_empty())
                .map(Zeroizing::new),
            sessions,
            submission_log,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Verifies the admin password and opens a session.
    pub async fn login(&self, request: AdminLogin) -> Result<SessionResponse, AppError> {
        request.validate()?;

        let hash = self.password_hash.as_ref().ok_or(AuthError::AdminDisabled)?;
        let password = Zeroizing::new(request.password);
        let hash = hash.clone();

        let verified = actix_web::web::block(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?
            .map_err(AuthError::from)?;

        if !verified {
            tracing::warn!("Admin login failed");
            return Err(AuthError::WrongCredentials.into());
        }

        let token = self.sessions.create_session()?;
        tracing::info!("Admin session opened");

        Ok(SessionResponse {
            message: "Logged in".to_string(),
            token,
            expires_in: self.sessions.expiration().num_seconds(),
        })
    }

    pub fn logout(&self, claims: &SessionClaims) {
        self.sessions.revoke(claims);
        tracing::info!("Admin session closed");
    }

    pub async fn list_submissions(&self, today: NaiveDate) -> Result<SubmissionListResponse, AppError> {
        let submissions = self.submission_log.read_all().await?;
        let stats = SubmissionStats::compute(&submissions, today);

        Ok(SubmissionListResponse { stats, submissions })
    }
}
