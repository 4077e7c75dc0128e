use actix_multipart::{form::MultipartFormConfig, MultipartError};
use actix_web::{error::UrlencodedError, web, Error};

use crate::errors::ContactError;

/// Form extraction failures (wrong content type, bad encoding, oversized
/// body) surface as internal errors with the usual JSON + CORS shape.
pub fn form_config(max_body_bytes: usize) -> web::FormConfig {
    web::FormConfig::default()
        .limit(max_body_bytes)
        .error_handler(|err: UrlencodedError, _req| -> Error {
            ContactError::from(err).into()
        })
}

pub fn multipart_config(max_body_bytes: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(max_body_bytes)
        .memory_limit(max_body_bytes)
        .error_handler(|err: MultipartError, _req| -> Error {
            ContactError::from(err).into()
        })
}

/// Either buffers the body before trying each encoding.
pub fn payload_config(max_body_bytes: usize) -> web::PayloadConfig {
    web::PayloadConfig::new(max_body_bytes)
}
