mod common;

use axum::http::{header, StatusCode};

use common::{ALICE_TOKEN, BOB_TOKEN};

#[tokio::test]
async fn test_create_workout_starts_without_exercises() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = common::request(
        &app,
        "POST",
        "/workouts",
        Some(ALICE_TOKEN),
        Some(serde_json::json!({
            "name": "Leg day",
            "category": "strength",
            "date": "2024-05-01",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().contains_key(header::LOCATION));
    let id = common::body_json(response).await["id"].as_i64().unwrap();

    let response = common::request(
        &app,
        "GET",
        &format!("/workouts/{id}"),
        Some(ALICE_TOKEN),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let workout = common::body_json(response).await;
    assert_eq!(workout["exercises"], serde_json::json!([]));
    assert_eq!(workout["user"], "alice");
    assert_eq!(workout["date"], "2024-05-01");
    assert!(workout["self"]
        .as_str()
        .unwrap()
        .ends_with(&format!("/workouts/{id}")));
}

#[tokio::test]
async fn test_collection_root_put_and_delete_are_405_allow_get() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    for method in ["PUT", "DELETE"] {
        let response = common::request(&app, method, "/workouts", None, None).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET");
    }
}

#[tokio::test]
async fn test_update_cross_user_is_403_and_unmodified() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let id = common::create_workout(&app, ALICE_TOKEN, "Leg day").await;

    let response = common::request(
        &app,
        "PUT",
        &format!("/workouts/{id}"),
        Some(BOB_TOKEN),
        Some(serde_json::json!({
            "name": "Hacked",
            "category": "none",
            "date": "2024-06-01",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = common::request(
        &app,
        "GET",
        &format!("/workouts/{id}"),
        Some(ALICE_TOKEN),
        None,
    )
    .await;
    let workout = common::body_json(response).await;
    assert_eq!(workout["name"], "Leg day");
}

#[tokio::test]
async fn test_update_preserves_links_and_self() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let wid = common::create_workout(&app, ALICE_TOKEN, "Leg day").await;
    let eid = common::create_exercise(&app, ALICE_TOKEN, "Squat").await;
    common::assign(&app, ALICE_TOKEN, wid, eid).await;

    let response = common::request(
        &app,
        "PUT",
        &format!("/workouts/{wid}"),
        Some(ALICE_TOKEN),
        Some(serde_json::json!({
            "name": "Heavy leg day",
            "category": "strength",
            "date": "2024-05-02",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = common::request(
        &app,
        "GET",
        &format!("/workouts/{wid}"),
        Some(ALICE_TOKEN),
        None,
    )
    .await;
    let workout = common::body_json(response).await;
    assert_eq!(workout["name"], "Heavy leg day");
    assert_eq!(workout["exercises"], serde_json::json!([eid]));
    assert!(workout["self"].is_string());
}

#[tokio::test]
async fn test_delete_nulls_only_first_linked_exercise() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let wid = common::create_workout(&app, ALICE_TOKEN, "Leg day").await;
    let e1 = common::create_exercise(&app, ALICE_TOKEN, "Squat").await;
    let e2 = common::create_exercise(&app, ALICE_TOKEN, "Lunge").await;
    common::assign(&app, ALICE_TOKEN, wid, e1).await;
    common::assign(&app, ALICE_TOKEN, wid, e2).await;

    let response = common::request(
        &app,
        "DELETE",
        &format!("/workouts/{wid}"),
        Some(ALICE_TOKEN),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Only the first listed exercise loses its back-reference.
    let response = common::request(
        &app,
        "GET",
        &format!("/exercises/{e1}"),
        Some(ALICE_TOKEN),
        None,
    )
    .await;
    let first = common::body_json(response).await;
    assert_eq!(first["workout"], serde_json::Value::Null);

    let response = common::request(
        &app,
        "GET",
        &format!("/exercises/{e2}"),
        Some(ALICE_TOKEN),
        None,
    )
    .await;
    let second = common::body_json(response).await;
    assert_eq!(second["workout"], serde_json::json!(wid));

    let response = common::request(
        &app,
        "GET",
        &format!("/workouts/{wid}"),
        Some(ALICE_TOKEN),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_empty_workout() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let wid = common::create_workout(&app, ALICE_TOKEN, "Rest day").await;

    let response = common::request(
        &app,
        "DELETE",
        &format!("/workouts/{wid}"),
        Some(ALICE_TOKEN),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
