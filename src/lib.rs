use std::sync::Arc;

use url::Url;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{email, kv, utils};

use email::resend::ResendClient;
use entities::email::{Mailbox, MailSettings};
use kv::{memory_store::MemoryStore, redis_store::RedisStore};
use repositories::{email_sender::EmailSender, kv_store::KeyValueStore};
use settings::{AppConfig, KvBackend};
use use_cases::{contact::{ContactHandler, RetentionPolicy}, validation::FieldLimits};

pub struct AppState {
    pub contact_handler: ContactHandler,
    pub client_ip_headers: Vec<String>,
    pub memory_store: Option<MemoryStore>,
}

impl AppState {
    /// Wires the optional collaborators from configuration. A missing or
    /// unusable backend disables its feature instead of failing startup.
    pub fn new(config: &AppConfig) -> Self {
        let mut memory_store = None;

        let store: Option<Arc<dyn KeyValueStore>> = match config.kv_backend {
            KvBackend::None => None,
            KvBackend::Memory => {
                let store = MemoryStore::new();
                memory_store = Some(store.clone());
                Some(Arc::new(store))
            }
            KvBackend::Redis => config.redis_url.as_deref().and_then(|url| {
                RedisStore::from_url(url)
                    .map_err(|e| tracing::error!("Redis pool creation error: {}", e))
                    .ok()
                    .map(|store| Arc::new(store) as Arc<dyn KeyValueStore>)
            }),
        };

        let mailer = config.email_api_key.as_deref().and_then(|key| {
            let endpoint = Url::parse(&config.email_api_url)
                .map_err(|e| tracing::error!("Invalid email API URL: {}", e))
                .ok()?;
            ResendClient::new(endpoint, key, config.email_timeout())
                .map_err(|e| tracing::error!("Email client creation error: {}", e))
                .ok()
                .map(|client| Arc::new(client) as Arc<dyn EmailSender>)
        });

        Self::with_collaborators(config, store, mailer, memory_store)
    }

    /// Builds the state around already-constructed collaborators.
    pub fn with_collaborators(
        config: &AppConfig,
        store: Option<Arc<dyn KeyValueStore>>,
        mailer: Option<Arc<dyn EmailSender>>,
        memory_store: Option<MemoryStore>,
    ) -> Self {
        if store.is_none() {
            tracing::info!("No KV store configured; rate limiting and archival disabled");
        }
        if mailer.is_none() {
            tracing::info!("No email API key configured; email dispatch disabled");
        }

        let contact_handler = ContactHandler::new(
            FieldLimits {
                name: config.max_name_len,
                email: config.max_email_len,
                message: config.max_message_len,
            },
            RetentionPolicy {
                cooldown_secs: config.rate_limit_cooldown_secs,
                rate_limit_ttl_secs: config.rate_limit_ttl_secs,
                archive_ttl_secs: config.archive_ttl_secs,
            },
            MailSettings {
                from: Mailbox { email: config.from_email.clone(), name: config.from_name.clone() },
                to: Mailbox { email: config.to_email.clone(), name: config.to_name.clone() },
                site_name: config.site_name.clone(),
            },
            store,
            mailer,
        );

        AppState {
            contact_handler,
            client_ip_headers: config.client_ip_headers.clone(),
            memory_store,
        }
    }
}
