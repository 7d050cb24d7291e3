use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Extension, Router,
};

use crate::auth::TokenVerifier;
use crate::handlers::{collection_not_allowed, exercises, login, users, workouts};

pub fn create_router(
    exercises_state: exercises::ExercisesState,
    workouts_state: workouts::WorkoutsState,
    users_state: users::UsersState,
    login_state: login::LoginState,
    verifier: Arc<dyn TokenVerifier>,
) -> Router {
    Router::new()
        // Exercise routes
        .route(
            "/exercises",
            get(exercises::list)
                .post(exercises::create)
                .put(collection_not_allowed)
                .delete(collection_not_allowed),
        )
        .route(
            "/exercises/{id}",
            get(exercises::show)
                .put(exercises::update)
                .delete(exercises::delete),
        )
        .with_state(exercises_state)
        // Workout routes
        .route(
            "/workouts",
            get(workouts::list)
                .post(workouts::create)
                .put(collection_not_allowed)
                .delete(collection_not_allowed),
        )
        .route(
            "/workouts/{id}",
            get(workouts::show)
                .put(workouts::update)
                .delete(workouts::delete),
        )
        .route(
            "/workouts/{wid}/exercises/{eid}",
            put(workouts::assign_exercise),
        )
        .with_state(workouts_state)
        // User-scoped listings
        .route("/users/{id}/exercises", get(users::exercises))
        .route("/users/{id}/workouts", get(users::workouts))
        .with_state(users_state)
        // Login passthrough
        .route("/login", post(login::login))
        .with_state(login_state)
        // Token verifier via Extension layer
        .layer(Extension(verifier))
}
