use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Exercise, Workout};
use crate::store::{Datastore, EXERCISES, WORKOUTS};

#[derive(Clone)]
pub struct UsersState {
    pub store: Datastore,
}

/// `GET /users/{id}/exercises` — every exercise owned by the caller.
/// Full scan, no pagination; the path id must match the token subject.
pub async fn exercises(
    State(state): State<UsersState>,
    auth: AuthUser,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    if auth.subject != id {
        return Err(AppError::Forbidden);
    }

    let owned: Vec<Exercise> = state
        .store
        .scan::<Exercise>(EXERCISES)
        .await?
        .into_iter()
        .filter(|record| record.user == auth.name)
        .collect();

    respond_negotiated(&headers, owned)
}

/// `GET /users/{id}/workouts` — every workout owned by the caller.
pub async fn workouts(
    State(state): State<UsersState>,
    auth: AuthUser,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    if auth.subject != id {
        return Err(AppError::Forbidden);
    }

    let owned: Vec<Workout> = state
        .store
        .scan::<Workout>(WORKOUTS)
        .await?
        .into_iter()
        .filter(|record| record.user == auth.name)
        .collect();

    respond_negotiated(&headers, owned)
}

fn respond_negotiated<T: serde::Serialize>(headers: &HeaderMap, body: Vec<T>) -> Result<Response> {
    match negotiate(headers) {
        None => Err(AppError::NotAcceptable),
        Some("application/json") => Ok(Json(body).into_response()),
        Some(other) => {
            tracing::error!("Negotiated unexpected content type: {}", other);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Content type got messed up!",
            )
                .into_response())
        }
    }
}

/// Pick a representation from the single offered type. A missing `Accept`
/// header accepts anything.
fn negotiate(headers: &HeaderMap) -> Option<&'static str> {
    let accept = match headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) {
        None => return Some("application/json"),
        Some(value) => value,
    };

    for part in accept.split(',') {
        let mime = part.split(';').next().unwrap_or("").trim();
        if mime == "application/json" || mime == "application/*" || mime == "*/*" {
            return Some("application/json");
        }
    }
    None
}
