use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{accepts_json_exactly, request_base, ListQuery};
use crate::error::{AppError, Result};
use crate::links;
use crate::middleware::AuthUser;
use crate::models::{CreateExercise, Exercise, UpdateExercise};
use crate::pagination::paginate;
use crate::store::{Datastore, EXERCISES};

#[derive(Clone)]
pub struct ExercisesState {
    pub store: Datastore,
    /// Canonical prefix for the `self` URI written into each record.
    pub base_url: String,
}

// The accept check runs before the auth result is inspected, so a caller
// who does not accept JSON gets 406 whatever their token looks like.
pub async fn list(
    State(state): State<ExercisesState>,
    headers: HeaderMap,
    auth: std::result::Result<AuthUser, AppError>,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    if !accepts_json_exactly(&headers) {
        return Err(AppError::NotAcceptable);
    }
    let _user = auth?;

    let base = request_base(&headers, "/exercises");
    let page = paginate::<Exercise>(&state.store, EXERCISES, &base, query.cursor.as_deref())
        .await?;

    Ok(Json(page).into_response())
}

pub async fn show(
    State(state): State<ExercisesState>,
    headers: HeaderMap,
    auth: std::result::Result<AuthUser, AppError>,
    Path(id): Path<i64>,
) -> Result<Response> {
    if !accepts_json_exactly(&headers) {
        return Err(AppError::NotAcceptable);
    }
    let _user = auth?;

    // Any authenticated caller may read any record by id.
    let exercise: Exercise = state
        .store
        .get(EXERCISES, id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(exercise).into_response())
}

pub async fn create(
    State(state): State<ExercisesState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(form): Json<CreateExercise>,
) -> Result<Response> {
    let record = Exercise::new(form.name, form.category, form.equipment, auth.name);
    let id = state.store.create(EXERCISES, &record).await?;

    // Second write: the canonical URI needs the store-assigned id.
    let mut created: Exercise = state
        .store
        .get(EXERCISES, id)
        .await?
        .ok_or(AppError::NotFound)?;
    created.self_uri = Some(format!("{}/exercises/{}", state.base_url, id));
    state.store.put(EXERCISES, id, &created).await?;

    let location = format!("{}/{}", request_base(&headers, "/exercises"), id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(serde_json::json!({ "id": id })),
    )
        .into_response())
}

pub async fn update(
    State(state): State<ExercisesState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(form): Json<UpdateExercise>,
) -> Result<Response> {
    let mut exercise: Exercise = state
        .store
        .get(EXERCISES, id)
        .await?
        .ok_or(AppError::NotFound)?;

    if exercise.user != auth.name {
        return Err(AppError::Forbidden);
    }

    // Owner, link, and self URI survive the replace.
    exercise.name = form.name;
    exercise.category = form.category;
    exercise.equipment = form.equipment;
    state.store.put(EXERCISES, id, &exercise).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn delete(
    State(state): State<ExercisesState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response> {
    let exercise: Exercise = state
        .store
        .get(EXERCISES, id)
        .await?
        .ok_or(AppError::NotFound)?;

    if exercise.user != auth.name {
        return Err(AppError::Forbidden);
    }

    if let Some(wid) = exercise.workout {
        // A failed detach does not block the delete; the workout keeps a
        // dangling id until it is next written.
        if let Err(e) = links::detach_exercise_from_workout(&state.store, id, wid).await {
            tracing::warn!("Detach from workout {} failed while deleting exercise {}: {}", wid, id, e);
        }
    }

    state.store.delete(EXERCISES, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
