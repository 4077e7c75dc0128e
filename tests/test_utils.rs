use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use portfolio_contact::{
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment, KvBackend},
    AppState,
};
use reqwest::{multipart::Form, Client};
use serde_json::Value;
use std::{net::TcpListener, sync::Mutex, time::Duration};

pub const CONTACT_URL: &str = "/api/contact";

/// Stand-in for the transactional email API. Records every request and
/// answers with a fixed status, optionally after a delay.
pub struct FakeEmailApi {
    pub received: Mutex<Vec<ReceivedEmail>>,
    pub status: u16,
    pub delay: Option<Duration>,
}

impl FakeEmailApi {
    pub fn new(status: u16, delay: Option<Duration>) -> web::Data<Self> {
        web::Data::new(FakeEmailApi {
            received: Mutex::new(Vec::new()),
            status,
            delay,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReceivedEmail {
    pub authorization: Option<String>,
    pub payload: Value,
}

async fn accept_email(
    request: HttpRequest,
    api: web::Data<FakeEmailApi>,
    payload: web::Json<Value>,
) -> HttpResponse {
    let authorization = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    api.received.lock().unwrap().push(ReceivedEmail {
        authorization,
        payload: payload.into_inner(),
    });

    if let Some(delay) = api.delay {
        tokio::time::sleep(delay).await;
    }

    let status = actix_web::http::StatusCode::from_u16(api.status).unwrap();
    HttpResponse::build(status).json(serde_json::json!({"id": "fake-email-id"}))
}

#[derive(Debug, Clone)]
pub struct TestOptions {
    pub kv_backend: KvBackend,
    pub email_enabled: bool,
    pub email_status: u16,
    pub email_delay: Option<Duration>,
    pub email_timeout_secs: u64,
}

impl Default for TestOptions {
    fn default() -> Self {
        TestOptions {
            kv_backend: KvBackend::Memory,
            email_enabled: true,
            email_status: 200,
            email_delay: None,
            email_timeout_secs: 5,
        }
    }
}

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub address: String,
    pub client: Client,
    pub email_api: web::Data<FakeEmailApi>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(TestOptions::default()).await
    }

    pub async fn spawn_with(options: TestOptions) -> Self {
        let email_api = FakeEmailApi::new(options.email_status, options.email_delay);
        let email_address = spawn_fake_email_api(email_api.clone());

        let mut config = test_config();
        config.kv_backend = options.kv_backend;
        config.email_api_url = format!("{}/emails", email_address);
        config.email_api_key = options.email_enabled.then(|| "test-api-key".to_string());
        config.email_timeout_secs = options.email_timeout_secs;

        let state = web::Data::new(AppState::new(&config));

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state_clone = state.clone();
        let max_body_bytes = config.max_body_bytes;
        let server = HttpServer::new(move || {
            App::new()
                .app_data(state_clone.clone())
                .configure(|cfg| configure_routes(cfg, max_body_bytes))
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(config.worker_count)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client
            .request(reqwest::Method::OPTIONS, format!("{}{}", address, CONTACT_URL))
            .send()
            .await
            .is_err()
        {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            state,
            address,
            client,
            email_api,
        }
    }

    pub async fn post_contact_multipart(&self, client_ip: &str, fields: &[(&str, &str)]) -> reqwest::Response {
        let form = fields.iter().fold(Form::new(), |form, (key, value)| {
            form.text(key.to_string(), value.to_string())
        });

        self.client
            .post(format!("{}{}", self.address, CONTACT_URL))
            .header("x-forwarded-for", client_ip)
            .multipart(form)
            .send()
            .await
            .expect("Failed to post multipart contact form")
    }

    pub async fn post_contact(&self, client_ip: &str, fields: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, CONTACT_URL))
            .header("x-forwarded-for", client_ip)
            .form(fields)
            .send()
            .await
            .expect("Failed to post contact form")
    }

    pub fn sent_emails(&self) -> Vec<ReceivedEmail> {
        self.email_api.received.lock().unwrap().clone()
    }
}

pub fn spawn_fake_email_api(api: web::Data<FakeEmailApi>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(api.clone())
            .route("/emails", web::post().to(accept_email))
    })
    .listen(listener)
    .expect("Failed to bind fake email API")
    .workers(1)
    .run();

    tokio::spawn(server);
    format!("http://127.0.0.1:{}", port)
}

fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio Contact Test".to_string(),
        port: 0,
        worker_count: 1,
        from_email: "noreply@test.dev".to_string(),
        to_email: "owner@test.dev".to_string(),
        site_name: "test.dev".to_string(),
        ..AppConfig::default()
    }
}

pub fn valid_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Ada Lovelace"),
        ("email", "ada@example.com"),
        ("message", "I enjoyed your portfolio."),
    ]
}
