use actix_multipart::form::MultipartForm;
use actix_web::{http::header, web, Either, HttpRequest, HttpResponse, Responder};
use chrono::Utc;

use crate::{
    entities::contact::{ContactForm, ContactUpload, RequestContext},
    errors::ContactError,
    handlers::cors::{with_cors, PREFLIGHT_MAX_AGE},
    utils::get_client_ip::client_identifier,
    AppState,
};

/// Accepts the fields either urlencoded or as `multipart/form-data`.
pub type ContactPayload = Either<web::Form<Vec<(String, String)>>, MultipartForm<ContactUpload>>;

pub async fn submit_contact(
    request: HttpRequest,
    state: web::Data<AppState>,
    payload: Result<ContactPayload, actix_web::Error>,
) -> impl Responder {
    let form = match payload {
        Ok(Either::Left(pairs)) => ContactForm::from_pairs(pairs.into_inner()),
        Ok(Either::Right(upload)) => ContactForm::from(upload.into_inner()),
        Err(e) => {
            return ContactError::Internal(format!("Form payload error: {}", e)).to_http_response();
        }
    };

    let ctx = RequestContext::new(
        client_identifier(request.headers(), &state.client_ip_headers),
        Utc::now(),
    );

    match state.contact_handler.submit(form, ctx).await {
        Ok(response) => with_cors(HttpResponse::Ok()).json(response),
        Err(e) => e.to_http_response(),
    }
}

pub async fn contact_preflight() -> impl Responder {
    with_cors(HttpResponse::NoContent())
        .insert_header((header::ACCESS_CONTROL_MAX_AGE, PREFLIGHT_MAX_AGE))
        .finish()
}

pub async fn not_found() -> impl Responder {
    ContactError::RouteNotFound.to_http_response()
}
