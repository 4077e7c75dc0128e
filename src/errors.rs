use actix_web::{
    error::{ResponseError, UrlencodedError},
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;

use crate::entities::contact::ContactResponse;
use crate::handlers::cors::with_cors;

/// Why a submission was rejected before any side effect happened.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    #[display("All fields are required")]
    MissingFields,

    #[display("Invalid email address")]
    InvalidEmail,

    #[display("Field content too long")]
    ContentTooLong,
}

#[derive(Debug, Display)]
pub enum ContactError {
    #[display("Not Found")]
    RouteNotFound,

    #[display("{_0}")]
    Validation(ValidationFailure),

    #[display("Please wait before submitting another message")]
    RateLimited,

    #[display("Internal server error: {_0}")]
    Internal(String),
}

impl ResponseError for ContactError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ContactError::RouteNotFound => HttpResponse::build(self.status_code())
                .insert_header(ContentType::plaintext())
                .body(self.to_string()),
            ContactError::Internal(detail) => {
                tracing::error!("Contact form error: {}", detail);
                with_cors(HttpResponse::build(self.status_code()))
                    .json(ContactResponse::failure("Internal server error"))
            }
            _ => with_cors(HttpResponse::build(self.status_code()))
                .json(ContactResponse::failure(self.to_string())),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::RouteNotFound => StatusCode::NOT_FOUND,
            ContactError::Validation(_) => StatusCode::BAD_REQUEST,
            ContactError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ContactError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ContactError {
    pub fn to_http_response(&self) -> HttpResponse {
        self.error_response()
    }
}

impl From<ValidationFailure> for ContactError {
    fn from(failure: ValidationFailure) -> Self {
        ContactError::Validation(failure)
    }
}

impl From<StoreError> for ContactError {
    fn from(err: StoreError) -> Self {
        ContactError::Internal(err.to_string())
    }
}

impl From<DispatchError> for ContactError {
    fn from(err: DispatchError) -> Self {
        ContactError::Internal(err.to_string())
    }
}

impl From<UrlencodedError> for ContactError {
    fn from(err: UrlencodedError) -> Self {
        ContactError::Internal(format!("Form payload error: {}", err))
    }
}

impl From<actix_multipart::MultipartError> for ContactError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        ContactError::Internal(format!("Multipart payload error: {}", err))
    }
}

#[derive(Debug, Display)]
pub enum StoreError {
    #[display("KV connection failed: {_0}")]
    Connection(String),

    #[display("KV operation failed: {_0}")]
    Operation(String),
}

impl From<deadpool_redis::PoolError> for StoreError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        StoreError::Connection(err.to_string())
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Operation(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum DispatchError {
    #[display("Email request timed out")]
    Timeout,

    #[display("Email transport failed: {_0}")]
    Transport(String),

    #[display("Email API rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DispatchError::Timeout
        } else {
            DispatchError::Transport(err.to_string())
        }
    }
}
