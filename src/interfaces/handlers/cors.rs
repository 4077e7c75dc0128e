use actix_web::{http::header, HttpResponseBuilder};

pub const ALLOWED_METHODS: &str = "POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Accept";
pub const PREFLIGHT_MAX_AGE: &str = "86400";

/// Adds the permissive CORS headers every contact response carries.
pub fn with_cors(mut builder: HttpResponseBuilder) -> HttpResponseBuilder {
    builder
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS));
    builder
}
