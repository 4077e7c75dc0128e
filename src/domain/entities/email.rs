use serde::Serialize;

use crate::entities::contact::Submission;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Mailbox {
    pub email: String,
    pub name: String,
}

/// Fixed addressing for the notification mail, taken from configuration.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub from: Mailbox,
    pub to: Mailbox,
    pub site_name: String,
}

/// Payload posted to the transactional email API.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutboundEmail {
    pub from: Mailbox,
    pub to: Vec<Mailbox>,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl OutboundEmail {
    pub fn for_submission(submission: &Submission, settings: &MailSettings) -> Self {
        let submitted_on = submission.submitted_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();

        OutboundEmail {
            from: settings.from.clone(),
            to: vec![settings.to.clone()],
            subject: format!("Portfolio Contact: {}", submission.name),
            html: render_html(submission, &settings.site_name, &submitted_on),
            text: render_text(submission, &settings.site_name, &submitted_on),
        }
    }
}

fn render_html(submission: &Submission, site_name: &str, submitted_on: &str) -> String {
    let name = escape_html(&submission.name);
    let email = escape_html(&submission.email);
    let message = escape_html(&submission.message).replace('\n', "<br>");
    let site = escape_html(site_name);
    let client = escape_html(&submission.client_id);

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <div style="background: #1e293b; color: white; padding: 20px; border-radius: 8px 8px 0 0;">
    <h2 style="margin: 0; color: #38bdf8;">New Contact Form Submission</h2>
    <p style="margin: 5px 0 0 0; opacity: 0.8;">from {site}</p>
  </div>
  <div style="background: #f8fafc; padding: 20px; border-radius: 0 0 8px 8px;">
    <div style="margin-bottom: 15px;">
      <strong style="color: #1e293b;">Name:</strong><br>
      <span style="color: #374151;">{name}</span>
    </div>
    <div style="margin-bottom: 15px;">
      <strong style="color: #1e293b;">Email:</strong><br>
      <a href="mailto:{email}" style="color: #38bdf8;">{email}</a>
    </div>
    <div style="margin-bottom: 15px;">
      <strong style="color: #1e293b;">Message:</strong><br>
      <div style="background: white; padding: 15px; border-left: 4px solid #38bdf8; margin-top: 8px;">{message}</div>
    </div>
    <div style="margin-top: 20px; padding-top: 15px; border-top: 1px solid #e5e7eb; font-size: 12px; color: #6b7280;">
      <p>Submitted on: {submitted_on}</p>
      <p>IP Address: {client}</p>
    </div>
  </div>
</div>"#
    )
}

fn render_text(submission: &Submission, site_name: &str, submitted_on: &str) -> String {
    format!(
        "New contact form submission from {site_name}\n\n\
         Name: {}\n\
         Email: {}\n\
         Message: {}\n\n\
         Submitted on: {submitted_on}\n\
         IP Address: {}",
        submission.name, submission.email, submission.message, submission.client_id
    )
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::contact::{ContactForm, RequestContext};
    use chrono::{TimeZone, Utc};

    fn settings() -> MailSettings {
        MailSettings {
            from: Mailbox { email: "noreply@example.com".into(), name: "Portfolio Contact Form".into() },
            to: Mailbox { email: "owner@example.com".into(), name: "Owner".into() },
            site_name: "example.dev".into(),
        }
    }

    fn submission(name: &str, message: &str) -> Submission {
        let form = ContactForm {
            name: name.into(),
            email: "visitor@example.com".into(),
            message: message.into(),
        };
        let at = Utc.with_ymd_and_hms(2024, 5, 4, 9, 30, 0).unwrap();
        Submission::new(form, RequestContext::new("198.51.100.7", at))
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn script_tags_never_reach_html_body_raw() {
        let email = OutboundEmail::for_submission(
            &submission("<b>Eve</b>", "<script>alert(1)</script>"),
            &settings(),
        );

        assert!(email.html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("&lt;b&gt;Eve&lt;/b&gt;"));
    }

    #[test]
    fn message_newlines_become_line_breaks() {
        let email = OutboundEmail::for_submission(&submission("Ada", "line one\nline two"), &settings());

        assert!(email.html.contains("line one<br>line two"));
        assert!(email.text.contains("Message: line one\nline two"));
    }

    #[test]
    fn addressing_and_subject_come_from_settings() {
        let email = OutboundEmail::for_submission(&submission("Ada", "Hi"), &settings());

        assert_eq!(email.subject, "Portfolio Contact: Ada");
        assert_eq!(email.from.email, "noreply@example.com");
        assert_eq!(email.to.len(), 1);
        assert_eq!(email.to[0].email, "owner@example.com");
        assert!(email.text.starts_with("New contact form submission from example.dev"));
        assert!(email.text.contains("Submitted on: 2024-05-04 09:30:00 UTC"));
        assert!(email.text.ends_with("IP Address: 198.51.100.7"));
    }

    #[test]
    fn payload_has_nested_addresses() {
        let email = OutboundEmail::for_submission(&submission("Ada", "Hi"), &settings());
        let json = serde_json::to_value(&email).unwrap();

        assert_eq!(json["from"]["name"], "Portfolio Contact Form");
        assert_eq!(json["to"][0]["email"], "owner@example.com");
        assert!(json["html"].is_string());
        assert!(json["text"].is_string());
    }
}
