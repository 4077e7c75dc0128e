use actix_multipart::form::{text::Text, MultipartForm};
use chrono::{DateTime, SecondsFormat, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

/// Raw form fields as posted by the site. Absent fields read as empty so that
/// presence is judged by validation, not by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    /// Builds the form from decoded `key=value` pairs. The first occurrence
    /// of a field wins; unknown fields are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut form = ContactForm::default();
        let (mut name, mut email, mut message) = (false, false, false);

        for (key, value) in pairs {
            match key.as_str() {
                "name" if !name => {
                    form.name = value;
                    name = true;
                }
                "email" if !email => {
                    form.email = value;
                    email = true;
                }
                "message" if !message => {
                    form.message = value;
                    message = true;
                }
                _ => {}
            }
        }

        form
    }
}

/// The same fields sent as `multipart/form-data`, which is what a browser
/// `FormData` body produces. Repeated parts keep the first value.
#[derive(Debug, MultipartForm)]
pub struct ContactUpload {
    pub name: Option<Text<String>>,
    pub email: Option<Text<String>>,
    pub message: Option<Text<String>>,
}

impl From<ContactUpload> for ContactForm {
    fn from(upload: ContactUpload) -> Self {
        ContactForm {
            name: upload.name.map(|t| t.0).unwrap_or_default(),
            email: upload.email.map(|t| t.0).unwrap_or_default(),
            message: upload.message.map(|t| t.0).unwrap_or_default(),
        }
    }
}

/// Per-request facts the handler needs but cannot read from the form.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub client_id: String,
    pub received_at: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(client_id: impl Into<String>, received_at: DateTime<Utc>) -> Self {
        RequestContext {
            client_id: client_id.into(),
            received_at,
        }
    }
}

/// A submission that passed validation.
#[derive(Debug, Clone)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub client_id: String,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(form: ContactForm, ctx: RequestContext) -> Self {
        Submission {
            name: form.name,
            email: form.email,
            message: form.message,
            client_id: ctx.client_id,
            submitted_at: ctx.received_at,
        }
    }

    /// Unique archive key: capture time in millis plus a random suffix.
    pub fn archive_key(&self) -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(|c| char::from(c).to_ascii_lowercase())
            .collect();

        format!("submission_{}_{}", self.submitted_at.timestamp_millis(), suffix)
    }

    pub fn archive_record(&self) -> ArchiveRecord<'_> {
        ArchiveRecord {
            name: &self.name,
            email: &self.email,
            message: &self.message,
            timestamp: self.submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            ip: &self.client_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArchiveRecord<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub message: &'a str,
    pub timestamp: String,
    pub ip: &'a str,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ContactResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactResponse {
    pub fn sent() -> Self {
        ContactResponse {
            success: true,
            message: Some("Message sent successfully".to_string()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ContactResponse {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}
