#![allow(dead_code)]

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use akrotopi_backend::{
    auth::password::hash_password,
    entities::admin::SessionResponse,
    middlewares::{cors, security_headers},
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment, MailTransport, RateLimitBackend},
    AppState,
};
use reqwest::Client;
use std::{net::TcpListener, path::PathBuf, sync::Arc, time::Duration};
use tempfile::TempDir;

pub const ADMIN_PASSWORD: &str = "olive-grove-sunset-42";

pub struct TestApp {
    pub state: Arc<AppState>,
    pub address: String,
    pub client: Client,
    pub config: AppConfig,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut config = test_config(&dir);
        customize(&mut config);

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state = Arc::new(AppState::new(&config));

        let state_clone = state.clone();
        let cors_origins = config.cors_origins();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::from(state_clone.clone()))
                .wrap(cors(&cors_origins))
                .wrap(security_headers())
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(config.worker_count)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(&format!("{}/", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            state,
            address,
            client,
            config,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_contact(&self, fields: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url("/contact"))
            .form(fields)
            .send()
            .await
            .expect("Failed to post contact form")
    }

    pub async fn login(&self, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/admin/login"))
            .json(&serde_json::json!({ "password": password }))
            .send()
            .await
            .expect("Failed to post admin login")
    }

    pub async fn admin_token(&self) -> String {
        let response = self.login(ADMIN_PASSWORD).await;
        assert!(response.status().is_success(), "admin login failed: {}", response.status());
        response.json::<SessionResponse>().await.unwrap().token
    }

    pub fn spooled_emails(&self) -> Vec<String> {
        match std::fs::read_dir(&self.config.spool_dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|e| std::fs::read_to_string(e.path()).unwrap())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn log_contents(&self) -> String {
        std::fs::read_to_string(&self.config.log_file).unwrap_or_default()
    }
}

pub fn valid_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Maria Papadopoulou"),
        ("email", "maria@example.com"),
        ("phone", "+30 694 123 4567"),
        ("message", "We would like to book the comfort apartment for a week in June."),
        ("website", ""),
    ]
}

fn test_config(dir: &TempDir) -> AppConfig {
    let root: PathBuf = dir.path().to_path_buf();

    AppConfig {
        cors_allowed_origins: vec!["*".to_string()],
        name: "Akrotopi Backend Test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        worker_count: 1,
        mail_transport: MailTransport::Spool,
        spool_dir: root.join("spool"),
        rate_limit: 5,
        rate_limit_backend: RateLimitBackend::File,
        rate_limit_file: root.join("rate_limit.json"),
        log_file: root.join("contact_log.txt"),
        admin_password_hash: Some(hash_password(ADMIN_PASSWORD).unwrap()),
        session_secret: "test_session_secret_that_is_long_enough_for_hs512".into(),
        session_expiration_minutes: 5,
        ..AppConfig::defaults(AppEnvironment::Testing)
    }
}
