use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};

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

/// Where content lives: the hosted gateway or a direct Postgres connection.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Rest,
    Postgres,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Rest => write!(f, "rest"),
            StoreBackend::Postgres => write!(f, "postgres"),
        }
    }
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

    #[serde(default = "default_store_backend")]
    pub store_backend: StoreBackend,

    #[serde(default)]
    pub supabase_url: String,

    #[serde(default)]
    pub supabase_key: String,

    #[serde(default)]
    pub database_url: String,

    #[serde(default)]
    pub run_migrations: bool,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default)]
    pub jwt_audience: Option<String>,

    #[serde(default)]
    pub admin_emails: Vec<String>,

    #[serde(default = "default_contact_rate_limit")]
    pub contact_rate_limit: u64,

    #[serde(default = "default_contact_rate_window")]
    pub contact_rate_window_secs: u64,

    #[serde(default)]
    pub trust_forwarded_for: bool,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-CMS".to_string()
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
fn default_store_backend() -> StoreBackend {
    StoreBackend::Rest
}
fn default_request_timeout() -> u64 {
    10
}
fn default_contact_rate_limit() -> u64 {
    3
}
fn default_contact_rate_window() -> u64 {
    3600
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name.to_string().to_lowercase())).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .with_list_parse_key("admin_emails")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;
        config.validate()?;
        Ok(config)
    }

    /// Collects every problem into one message instead of failing on the
    /// first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        match self.store_backend {
            StoreBackend::Rest => {
                if url::Url::parse(&self.supabase_url).is_err() {
                    errors.push("SUPABASE_URL must be a valid URL");
                }
                if self.supabase_key.trim().is_empty() {
                    errors.push("SUPABASE_KEY cannot be empty");
                }
            }
            StoreBackend::Postgres => {
                if self.database_url.trim().is_empty() {
                    errors.push("DATABASE_URL cannot be empty");
                }
            }
        }
        if self.jwt_secret.len() < 32 {
            errors.push("JWT_SECRET must be at least 32 characters");
        }
        if self.admin_list().is_empty() {
            errors.push("ADMIN_EMAILS must list at least one address");
        }
        if self.contact_rate_limit == 0 || self.contact_rate_window_secs == 0 {
            errors.push("Contact rate limit and window must be positive");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
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

    pub fn cors_origins(&self) -> Vec<String> {
        split_list(&self.cors_allowed_origins)
    }

    pub fn admin_list(&self) -> Vec<String> {
        split_list(&self.admin_emails)
            .into_iter()
            .map(|e| e.to_lowercase())
            .collect()
    }
}

fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
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
            .field("store_backend", &self.store_backend)
            .field("supabase_url", &self.supabase_url)
            .field("supabase_key", &self.supabase_key.redact())
            .field("database_url", &self.database_url.redact())
            .field("run_migrations", &self.run_migrations)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("jwt_secret", &self.jwt_secret.redact())
            .field("jwt_audience", &self.jwt_audience)
            .field("admin_emails", &self.admin_emails.len())
            .field("contact_rate_limit", &self.contact_rate_limit)
            .field("contact_rate_window_secs", &self.contact_rate_window_secs)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .finish()
    }
}
