pub mod exercises;
pub mod login;
pub mod users;
pub mod workouts;

use axum::http::{header, HeaderMap};
use serde::Deserialize;

use crate::error::AppError;

/// `?cursor=` on listing endpoints.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub cursor: Option<String>,
}

/// `PUT`/`DELETE` on a collection root. No auth required.
pub async fn collection_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Listing and get-by-id endpoints demand this exact `Accept` value; a
/// missing or broader header is not accepted.
pub fn accepts_json_exactly(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        == Some("application/json")
}

/// Absolute URL for `path` on the requested host, for `Location` headers
/// and pagination links.
pub fn request_base(headers: &HeaderMap, path: &str) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}{path}")
}
