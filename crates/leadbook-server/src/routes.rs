//! HTTP routes
//!
//! - `GET /leads`: every lead, most recent first
//! - `POST /leads`: replace the stored set with the JSON array in the body
//! - `POST /generate-message`: draft a follow-up for `{name, company, notes, status?}`
//!
//! Errors are plain-text bodies; success bodies are JSON.

use crate::state::AppState;
use leadbook_compose::{MessageGenerator, MessageRequest};
use leadbook_core::Lead;
use leadbook_store::{LeadStore, StoreErrorKind};
use serde::Serialize;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Body of a successful `POST /leads`
pub const SAVED_MESSAGE: &str = "Leads saved successfully";

#[derive(Debug, Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

/// All routes, with rejection handling and request tracing
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let limit = state.body_limit();
    let leads = warp::path("leads").and(warp::path::end());

    let list = leads
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(list_leads);

    let save = leads
        .and(warp::post())
        .and(warp::body::content_length_limit(limit))
        .and(warp::body::bytes())
        .and(with_state(state.clone()))
        .and_then(save_leads);

    let generate = warp::path("generate-message")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(limit))
        .and(warp::body::bytes())
        .and(with_state(state))
        .and_then(generate_message);

    list.or(save)
        .or(generate)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn text(status: StatusCode, body: impl Into<String>) -> Response {
    warp::reply::with_status(body.into(), status).into_response()
}

fn message(body: &str) -> Response {
    warp::reply::json(&MessageBody { message: body }).into_response()
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

async fn list_leads(state: AppState) -> Result<Response, Infallible> {
    match state.store().fetch_all().await {
        Ok(leads) => {
            tracing::debug!(count = leads.len(), "leads fetched");
            Ok(warp::reply::json(&leads).into_response())
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to fetch leads");
            Ok(text(StatusCode::INTERNAL_SERVER_ERROR, format!("Server error: {err}")))
        }
    }
}

async fn save_leads(body: Bytes, state: AppState) -> Result<Response, Infallible> {
    if is_blank(&body) {
        return Ok(text(StatusCode::BAD_REQUEST, "Missing request body"));
    }
    let leads: Vec<Lead> = match serde_json::from_slice(&body) {
        Ok(leads) => leads,
        Err(err) => {
            tracing::warn!(error = %err, "rejected lead payload");
            return Ok(text(StatusCode::BAD_REQUEST, format!("Malformed payload: {err}")));
        }
    };

    match state.store().replace_all(&leads).await {
        Ok(()) => {
            tracing::info!(count = leads.len(), "leads saved");
            Ok(message(SAVED_MESSAGE))
        }
        Err(err) if err.kind() == StoreErrorKind::Malformed => {
            tracing::warn!(error = %err, "rejected lead payload");
            Ok(text(StatusCode::BAD_REQUEST, format!("Malformed payload: {err}")))
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to save leads");
            Ok(text(StatusCode::INTERNAL_SERVER_ERROR, format!("Server error: {err}")))
        }
    }
}

async fn generate_message(body: Bytes, state: AppState) -> Result<Response, Infallible> {
    if is_blank(&body) {
        return Ok(text(StatusCode::BAD_REQUEST, "Missing request body"));
    }
    let request: MessageRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            return Ok(text(StatusCode::BAD_REQUEST, format!("Malformed payload: {err}")));
        }
    };
    if request.validate().is_err() {
        return Ok(text(StatusCode::BAD_REQUEST, "Missing lead information"));
    }

    match state.generator().generate(&request).await {
        Ok(body) => Ok(message(&body)),
        Err(err) => {
            tracing::error!(error = %err, company = %request.company, "message generation failed");
            Ok(text(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate message: {err}"),
            ))
        }
    }
}

// `find` searches every branch of an `or`, so body rejections are checked
// before the method mismatch the sibling routes always produce.
async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let response = if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        text(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large")
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        text(StatusCode::BAD_REQUEST, "Missing request body")
    } else if err.is_not_found() {
        text(StatusCode::NOT_FOUND, "Not Found")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        text(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    } else {
        tracing::error!(rejection = ?err, "unhandled rejection");
        text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    };
    Ok(response)
}
