use actix_web::{http::Method, web};

use crate::handlers::contact::{contact_preflight, not_found, submit_contact};

mod form_error;

pub const CONTACT_PATH: &str = "/api/contact";

pub fn configure_routes(cfg: &mut web::ServiceConfig, max_body_bytes: usize) {
    cfg.service(
        web::resource(CONTACT_PATH)
            .app_data(form_error::payload_config(max_body_bytes))
            .app_data(form_error::form_config(max_body_bytes))
            .app_data(form_error::multipart_config(max_body_bytes))
            .route(web::post().to(submit_contact))
            .route(web::method(Method::OPTIONS).to(contact_preflight))
            .default_service(web::to(not_found))
    );

    cfg.default_service(web::to(not_found));
}
