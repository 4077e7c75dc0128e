mod test_utils;

use std::time::Duration;

use portfolio_contact::{
    email::resend::ResendClient,
    entities::email::{Mailbox, OutboundEmail},
    errors::DispatchError,
    repositories::email_sender::EmailSender,
};
use test_utils::*;
use url::Url;

fn outbound() -> OutboundEmail {
    OutboundEmail {
        from: Mailbox { email: "noreply@test.dev".into(), name: "Contact".into() },
        to: vec![Mailbox { email: "owner@test.dev".into(), name: "Owner".into() }],
        subject: "Portfolio Contact: Ada".into(),
        html: "<p>Hi</p>".into(),
        text: "Hi".into(),
    }
}

#[actix_rt::test]
async fn slow_api_yields_timeout() {
    let api = FakeEmailApi::new(200, Some(Duration::from_secs(3)));
    let address = spawn_fake_email_api(api);
    let endpoint = Url::parse(&format!("{}/emails", address)).unwrap();
    let client = ResendClient::new(endpoint, "test-api-key", Duration::from_secs(1)).unwrap();

    let err = client.send(&outbound()).await.unwrap_err();

    assert!(matches!(err, DispatchError::Timeout), "got {}", err);
}

#[actix_rt::test]
async fn error_status_is_rejected_with_body() {
    let api = FakeEmailApi::new(422, None);
    let address = spawn_fake_email_api(api.clone());
    let endpoint = Url::parse(&format!("{}/emails", address)).unwrap();
    let client = ResendClient::new(endpoint, "test-api-key", Duration::from_secs(5)).unwrap();

    let err = client.send(&outbound()).await.unwrap_err();

    match err {
        DispatchError::Rejected { status, body } => {
            assert_eq!(status, 422);
            assert!(body.contains("fake-email-id"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(api.received.lock().unwrap().len(), 1);
}
