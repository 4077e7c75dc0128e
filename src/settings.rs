use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer};
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};
use url::Url;

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

/// Which key-value store backs rate limiting and archival.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KvBackend {
    None,
    Memory,
    Redis,
}

impl FromStr for KvBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(KvBackend::None),
            "memory" => Ok(KvBackend::Memory),
            "redis" => Ok(KvBackend::Redis),
            _ => Err(ConfigError::Message(format!("Invalid KV backend: {}", s))),
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

    #[serde(default = "default_kv_backend")]
    pub kv_backend: KvBackend,

    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default = "default_client_ip_headers", deserialize_with = "comma_list")]
    pub client_ip_headers: Vec<String>,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    #[serde(default = "default_to_email")]
    pub to_email: String,

    #[serde(default = "default_to_name")]
    pub to_name: String,

    #[serde(default = "default_site_name")]
    pub site_name: String,

    #[serde(default = "default_email_api_url")]
    pub email_api_url: String,

    #[serde(default)]
    pub email_api_key: Option<String>,

    #[serde(default = "default_email_timeout")]
    pub email_timeout_secs: u64,

    #[serde(default = "default_cooldown")]
    pub rate_limit_cooldown_secs: u64,

    #[serde(default = "default_rate_limit_ttl")]
    pub rate_limit_ttl_secs: u64,

    #[serde(default = "default_archive_ttl")]
    pub archive_ttl_secs: u64,

    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,

    #[serde(default = "default_max_email_len")]
    pub max_email_len: usize,

    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Contact".to_string()
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
fn default_kv_backend() -> KvBackend {
    KvBackend::None
}
fn default_client_ip_headers() -> Vec<String> {
    vec!["cf-connecting-ip".to_string(), "x-forwarded-for".to_string()]
}
fn default_from_email() -> String {
    "noreply@example.com".to_string()
}
fn default_from_name() -> String {
    "Portfolio Contact Form".to_string()
}
fn default_to_email() -> String {
    "owner@example.com".to_string()
}
fn default_to_name() -> String {
    "Portfolio Owner".to_string()
}
fn default_site_name() -> String {
    "portfolio".to_string()
}
fn default_email_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}
fn default_email_timeout() -> u64 {
    10
}
fn default_cooldown() -> u64 {
    60
}
fn default_rate_limit_ttl() -> u64 {
    300
}
fn default_archive_ttl() -> u64 {
    60 * 60 * 24 * 30
}
fn default_max_name_len() -> usize {
    100
}
fn default_max_email_len() -> usize {
    254
}
fn default_max_message_len() -> usize {
    2000
}
fn default_max_body_bytes() -> usize {
    16 * 1024
}

/// Accepts either a sequence or a single comma-separated string, since
/// environment variables can only carry the latter.
fn comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    let items = match Raw::deserialize(deserializer)? {
        Raw::One(s) => vec![s],
        Raw::Many(v) => v,
    };

    Ok(items
        .iter()
        .flat_map(|item| item.split(','))
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect())
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: default_worker_count(),
            kv_backend: default_kv_backend(),
            redis_url: None,
            client_ip_headers: default_client_ip_headers(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            to_email: default_to_email(),
            to_name: default_to_name(),
            site_name: default_site_name(),
            email_api_url: default_email_api_url(),
            email_api_key: None,
            email_timeout_secs: default_email_timeout(),
            rate_limit_cooldown_secs: default_cooldown(),
            rate_limit_ttl_secs: default_rate_limit_ttl(),
            archive_ttl_secs: default_archive_ttl(),
            max_name_len: default_max_name_len(),
            max_email_len: default_max_email_len(),
            max_message_len: default_max_message_len(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
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
            .add_source(Environment::with_prefix("APP").prefix_separator("_").ignore_empty(true));

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        if config.redis_url.is_none() {
            config.redis_url = env::var("APP_REDIS_URL").ok();
        }
        if config.email_api_key.is_none() {
            config.email_api_key = env::var("APP_EMAIL_API_KEY").ok();
        }
        config.email_api_key = config.email_api_key.filter(|k| !k.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if Url::parse(&self.email_api_url).is_err() {
            errors.push("EMAIL_API_URL must be a valid URL");
        }
        if self.kv_backend == KvBackend::Redis
            && self.redis_url.as_deref().is_none_or(|u| u.trim().is_empty())
        {
            errors.push("REDIS_URL must be set when KV_BACKEND is redis");
        }
        if self.email_timeout_secs == 0 {
            errors.push("EMAIL_TIMEOUT_SECS must be greater than zero");
        }
        if self.max_name_len == 0 || self.max_email_len == 0 || self.max_message_len == 0 {
            errors.push("Field length limits must be greater than zero");
        }
        if self.rate_limit_ttl_secs < self.rate_limit_cooldown_secs {
            errors.push("RATE_LIMIT_TTL_SECS must not be shorter than the cooldown");
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

    pub fn email_timeout(&self) -> Duration {
        Duration::from_secs(self.email_timeout_secs)
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

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        match self.as_deref() {
            None | Some("") => "[MISSING]",
            Some(_) => "[REDACTED]",
        }
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
            .field("kv_backend", &self.kv_backend)
            .field("redis_url", &self.redis_url.redact())
            .field("client_ip_headers", &self.client_ip_headers)
            .field("from_email", &self.from_email)
            .field("to_email", &self.to_email)
            .field("site_name", &self.site_name)
            .field("email_api_url", &self.email_api_url)
            .field("email_api_key", &self.email_api_key.redact())
            .field("email_timeout_secs", &self.email_timeout_secs)
            .field("rate_limit_cooldown_secs", &self.rate_limit_cooldown_secs)
            .field("rate_limit_ttl_secs", &self.rate_limit_ttl_secs)
            .field("archive_ttl_secs", &self.archive_ttl_secs)
            .finish()
    }
}
