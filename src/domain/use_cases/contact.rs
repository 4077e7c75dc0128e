use std::sync::Arc;

use crate::{
    entities::{
        contact::{ContactForm, ContactResponse, RequestContext, Submission},
        email::{MailSettings, OutboundEmail},
    },
    errors::ContactError,
    repositories::{email_sender::EmailSender, kv_store::KeyValueStore},
    use_cases::validation::{validate_contact_form, FieldLimits},
};

/// Timing knobs for the KV-backed records.
#[derive(Debug, Clone, Copy)]
pub struct RetentionPolicy {
    pub cooldown_secs: u64,
    pub rate_limit_ttl_secs: u64,
    pub archive_ttl_secs: u64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        RetentionPolicy {
            cooldown_secs: 60,
            rate_limit_ttl_secs: 300,
            archive_ttl_secs: 60 * 60 * 24 * 30,
        }
    }
}

pub struct ContactHandler {
    pub limits: FieldLimits,
    pub retention: RetentionPolicy,
    pub mail: MailSettings,
    pub store: Option<Arc<dyn KeyValueStore>>,
    pub mailer: Option<Arc<dyn EmailSender>>,
}

impl ContactHandler {
    pub fn new(
        limits: FieldLimits,
        retention: RetentionPolicy,
        mail: MailSettings,
        store: Option<Arc<dyn KeyValueStore>>,
        mailer: Option<Arc<dyn EmailSender>>,
    ) -> Self {
        ContactHandler {
            limits,
            retention,
            mail,
            store,
            mailer,
        }
    }

    /// Runs one submission through validate, rate limit, dispatch and archive.
    pub async fn submit(
        &self,
        form: ContactForm,
        ctx: RequestContext,
    ) -> Result<ContactResponse, ContactError> {
        validate_contact_form(&form, &self.limits)?;

        let submission = Submission::new(form, ctx);

        if let Some(store) = &self.store {
            self.enforce_rate_limit(store.as_ref(), &submission).await?;
        }

        if let Some(mailer) = &self.mailer {
            let email = OutboundEmail::for_submission(&submission, &self.mail);
            mailer.send(&email).await.map_err(|e| {
                tracing::error!(client = %submission.client_id, "Email sending failed: {}", e);
                e
            })?;
        }

        if let Some(store) = &self.store {
            self.archive(store.as_ref(), &submission).await;
        }

        tracing::info!(client = %submission.client_id, "Contact submission accepted");
        Ok(ContactResponse::sent())
    }

    async fn enforce_rate_limit(
        &self,
        store: &dyn KeyValueStore,
        submission: &Submission,
    ) -> Result<(), ContactError> {
        let key = rate_limit_key(&submission.client_id);
        let now = submission.submitted_at.timestamp_millis();
        let cooldown_ms = (self.retention.cooldown_secs as i64).saturating_mul(1000);

        let last = store.get(&key).await?.and_then(|raw| match raw.trim().parse::<i64>() {
            Ok(ts) => Some(ts),
            Err(_) => {
                tracing::warn!(key = %key, "Ignoring unparseable rate-limit record");
                None
            }
        });

        if let Some(last) = last {
            if now.saturating_sub(last) < cooldown_ms {
                tracing::info!(client = %submission.client_id, "Contact submission rate limited");
                return Err(ContactError::RateLimited);
            }
        }

        store
            .put(&key, &now.to_string(), self.retention.rate_limit_ttl_secs)
            .await?;

        Ok(())
    }

    /// Best-effort: the mail is already out, so a failed archive write is
    /// logged and does not fail the request.
    async fn archive(&self, store: &dyn KeyValueStore, submission: &Submission) {
        let key = submission.archive_key();
        let record = match serde_json::to_string(&submission.archive_record()) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Failed to serialize submission archive: {}", e);
                return;
            }
        };

        if let Err(e) = store.put(&key, &record, self.retention.archive_ttl_secs).await {
            tracing::warn!(key = %key, "Failed to archive submission: {}", e);
        }
    }
}

pub fn rate_limit_key(client_id: &str) -> String {
    format!("rate_limit:{}", urlencoding::encode(client_id))
}
