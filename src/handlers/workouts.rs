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
use crate::models::{CreateWorkout, Exercise, UpdateWorkout, Workout};
use crate::pagination::paginate;
use crate::store::{Datastore, EXERCISES, WORKOUTS};

#[derive(Clone)]
pub struct WorkoutsState {
    pub store: Datastore,
    pub base_url: String,
}

pub async fn list(
    State(state): State<WorkoutsState>,
    headers: HeaderMap,
    auth: std::result::Result<AuthUser, AppError>,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    if !accepts_json_exactly(&headers) {
        return Err(AppError::NotAcceptable);
    }
    let _user = auth?;

    let base = request_base(&headers, "/workouts");
    let page = paginate::<Workout>(&state.store, WORKOUTS, &base, query.cursor.as_deref()).await?;

    Ok(Json(page).into_response())
}

pub async fn show(
    State(state): State<WorkoutsState>,
    headers: HeaderMap,
    auth: std::result::Result<AuthUser, AppError>,
    Path(id): Path<i64>,
) -> Result<Response> {
    if !accepts_json_exactly(&headers) {
        return Err(AppError::NotAcceptable);
    }
    let _user = auth?;

    let workout: Workout = state
        .store
        .get(WORKOUTS, id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(workout).into_response())
}

pub async fn create(
    State(state): State<WorkoutsState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(form): Json<CreateWorkout>,
) -> Result<Response> {
    let record = Workout::new(form.name, form.category, form.date, auth.name);
    let id = state.store.create(WORKOUTS, &record).await?;

    let mut created: Workout = state
        .store
        .get(WORKOUTS, id)
        .await?
        .ok_or(AppError::NotFound)?;
    created.self_uri = Some(format!("{}/workouts/{}", state.base_url, id));
    state.store.put(WORKOUTS, id, &created).await?;

    let location = format!("{}/{}", request_base(&headers, "/workouts"), id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(serde_json::json!({ "id": id })),
    )
        .into_response())
}

pub async fn update(
    State(state): State<WorkoutsState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(form): Json<UpdateWorkout>,
) -> Result<Response> {
    let mut workout: Workout = state
        .store
        .get(WORKOUTS, id)
        .await?
        .ok_or(AppError::NotFound)?;

    if workout.user != auth.name {
        return Err(AppError::Forbidden);
    }

    workout.name = form.name;
    workout.category = form.category;
    workout.date = form.date;
    state.store.put(WORKOUTS, id, &workout).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn delete(
    State(state): State<WorkoutsState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response> {
    let workout: Workout = state
        .store
        .get(WORKOUTS, id)
        .await?
        .ok_or(AppError::NotFound)?;

    if workout.user != auth.name {
        return Err(AppError::Forbidden);
    }

    if !workout.exercises.is_empty() {
        // Unlike the exercise-delete path, a failed detach aborts the
        // deletion.
        links::detach_first_exercise(&state.store, &workout)
            .await
            .map_err(|_| AppError::NotFound)?;
    }

    state.store.delete(WORKOUTS, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `PUT /workouts/{wid}/exercises/{eid}` — link an exercise into a
/// workout. The caller must own both records.
pub async fn assign_exercise(
    State(state): State<WorkoutsState>,
    auth: AuthUser,
    Path((wid, eid)): Path<(i64, i64)>,
) -> Result<Response> {
    let workout: Workout = state
        .store
        .get(WORKOUTS, wid)
        .await?
        .ok_or(AppError::NotFound)?;
    if workout.user != auth.name {
        return Err(AppError::Forbidden);
    }

    let exercise: Exercise = state
        .store
        .get(EXERCISES, eid)
        .await?
        .ok_or(AppError::NotFound)?;
    if exercise.user != auth.name {
        return Err(AppError::Forbidden);
    }

    links::attach_exercise(&state.store, workout, exercise).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
