use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::{env, fmt, path::PathBuf, str::FromStr};
use zeroize::Zeroizing;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

/// How outgoing contact e-mails leave the process.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    /// Pipe the message to a local `sendmail -t` binary.
    Sendmail,
    /// Write the message to a file in `spool_dir` instead of sending it.
    Spool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitBackend {
    File,
    Memory,
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_site_name")]
    pub site_name: String,

    #[serde(default = "default_email_to")]
    pub email_to: String,

    #[serde(default = "default_email_from")]
    pub email_from: String,

    #[serde(default = "default_subject_prefix")]
    pub email_subject_prefix: String,

    #[serde(default = "default_true")]
    pub include_ip_in_email: bool,

    #[serde(default = "default_true")]
    pub include_user_agent: bool,

    #[serde(default = "default_mail_transport")]
    pub mail_transport: MailTransport,

    #[serde(default = "default_sendmail_path")]
    pub sendmail_path: String,

    #[serde(default = "default_spool_dir")]
    pub spool_dir: PathBuf,

    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,

    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,

    #[serde(default = "default_honeypot_field")]
    pub honeypot_field: String,

    #[serde(default = "default_rate_limit")]
    pub rate_limit: usize,

    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_secs: i64,

    #[serde(default = "default_rate_limit_backend")]
    pub rate_limit_backend: RateLimitBackend,

    #[serde(default = "default_rate_limit_file")]
    pub rate_limit_file: PathBuf,

    #[serde(default = "default_true")]
    pub log_submissions: bool,

    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Honour proxy headers for the client address. Only safe behind a proxy
    /// that overwrites them.
    #[serde(default)]
    pub trust_forwarded_headers: bool,

    #[serde(default)]
    pub local_testing: bool,

    #[serde(default)]
    pub debug_mode: bool,

    #[serde(default)]
    pub admin_password_hash: Option<String>,

    #[serde(default)]
    pub session_secret: String,

    #[serde(default = "default_session_expiration")]
    pub session_expiration_minutes: i64,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Akrotopi-Backend".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_site_name() -> String {
    "Akrotopi Apartments".to_string()
}
fn default_email_to() -> String {
    "info@akrotopi.gr".to_string()
}
fn default_email_from() -> String {
    "noreply@akrotopi.gr".to_string()
}
fn default_subject_prefix() -> String {
    "Akrotopi Contact Form: ".to_string()
}
fn default_true() -> bool {
    true
}
fn default_mail_transport() -> MailTransport {
    MailTransport::Sendmail
}
fn default_sendmail_path() -> String {
    "/usr/sbin/sendmail".to_string()
}
fn default_spool_dir() -> PathBuf {
    PathBuf::from("mail_spool")
}
fn default_max_name_length() -> usize {
    100
}
fn default_max_message_length() -> usize {
    2000
}
fn default_honeypot_field() -> String {
    "website".to_string()
}
fn default_rate_limit() -> usize {
    5
}
fn default_rate_limit_window() -> i64 {
    3600
}
fn default_rate_limit_backend() -> RateLimitBackend {
    RateLimitBackend::File
}
fn default_rate_limit_file() -> PathBuf {
    env::temp_dir().join("akrotopi_rate_limit.json")
}
fn default_log_file() -> PathBuf {
    PathBuf::from("contact_log.txt")
}
fn default_session_expiration() -> i64 {
    60
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        if config.admin_password_hash.is_none() {
            config.admin_password_hash = env::var("APP_ADMIN_PASSWORD_HASH").ok();
        }
        if config.session_secret.trim().is_empty() {
            config.session_secret = env::var("APP_SESSION_SECRET").unwrap_or_default();
        }

        config.validate()?;
        Ok(config)
    }

    /// Baseline configuration with no file or environment sources applied.
    pub fn defaults(env: AppEnvironment) -> Self {
        AppConfig {
            env,
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: 1,
            cors_allowed_origins: default_cors_origins(),
            site_name: default_site_name(),
            email_to: default_email_to(),
            email_from: default_email_from(),
            email_subject_prefix: default_subject_prefix(),
            include_ip_in_email: true,
            include_user_agent: true,
            mail_transport: default_mail_transport(),
            sendmail_path: default_sendmail_path(),
            spool_dir: default_spool_dir(),
            max_name_length: default_max_name_length(),
            max_message_length: default_max_message_length(),
            honeypot_field: default_honeypot_field(),
            rate_limit: default_rate_limit(),
            rate_limit_window_secs: default_rate_limit_window(),
            rate_limit_backend: default_rate_limit_backend(),
            rate_limit_file: default_rate_limit_file(),
            log_submissions: true,
            log_file: default_log_file(),
            trust_forwarded_headers: false,
            local_testing: false,
            debug_mode: false,
            admin_password_hash: None,
            session_secret: String::new(),
            session_expiration_minutes: default_session_expiration(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.email_to.trim().is_empty() {
            errors.push("EMAIL_TO cannot be empty");
        }
        if self.email_from.trim().is_empty() {
            errors.push("EMAIL_FROM cannot be empty");
        }
        if self.honeypot_field.trim().is_empty() {
            errors.push("HONEYPOT_FIELD cannot be empty");
        }
        if self.rate_limit == 0 {
            errors.push("RATE_LIMIT must be at least 1");
        }
        if self.rate_limit_window_secs <= 0 {
            errors.push("RATE_LIMIT_WINDOW_SECS must be positive");
        }
        if self.admin_enabled() && self.session_secret.len() < 32 {
            errors.push("SESSION_SECRET must be at least 32 characters when admin access is enabled");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }
        if self.is_production() && self.local_testing {
            errors.push("LOCAL_TESTING cannot be enabled in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn admin_enabled(&self) -> bool {
        self.admin_password_hash
            .as_deref()
            .is_some_and(|h| !h.trim().is_empty())
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else if self.len() < 32 {
            "[TOO_SHORT]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("email_to", &self.email_to)
            .field("email_from", &self.email_from)
            .field("mail_transport", &self.mail_transport)
            .field("rate_limit", &self.rate_limit)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("rate_limit_backend", &self.rate_limit_backend)
            .field("log_file", &self.log_file)
            .field("local_testing", &self.local_testing)
            .field("debug_mode", &self.debug_mode)
            .field("admin_password_hash", &self.admin_password_hash.as_deref().map(|_| "[REDACTED]"))
            .field("session_secret", &self.session_secret.redact())
            .field("session_expiration_minutes", &self.session_expiration_minutes)
            .finish()
    }
}

#[derive(Clone)]
pub struct SessionKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl From<&AppConfig> for SessionKeys {
    fn from(config: &AppConfig) -> Self {
        let secret = Zeroizing::new(config.session_secret.clone());

        SessionKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("encoding", &"[REDACTED]")
            .field("decoding", &"[REDACTED]")
            .finish()
    }
}
