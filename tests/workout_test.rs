mod common;

use axum::{http::StatusCode, Router};
use serde_json::{json, Value};

use common::{send, send_ok, TestRequest};

async fn create_workout(app: &Router, cookie: &str, date: &str, name: &str) -> Value {
    send_ok(
        app,
        TestRequest::post("/workouts")
            .cookie(cookie)
            .local_date(date)
            .json(json!({ "name": name })),
    )
    .await
}

async fn add_exercise(app: &Router, cookie: &str, workout_id: &str, name: &str, order: i32) -> Value {
    send_ok(
        app,
        TestRequest::post(format!("/workouts/{}/exercises", workout_id))
            .cookie(cookie)
            .json(json!({ "exercise_name": name, "sort_order": order })),
    )
    .await
}

async fn add_set(app: &Router, cookie: &str, exercise_id: &str, reps: i32, weight: f64) -> Value {
    send_ok(
        app,
        TestRequest::post(format!("/exercises/{}/sets", exercise_id))
            .cookie(cookie)
            .json(json!({ "reps": reps, "weight": weight })),
    )
    .await
}

fn id(value: &Value) -> &str {
    value["id"].as_str().unwrap()
}

#[tokio::test]
async fn test_leg_day_set_numbering() {
    let app = common::create_test_app(common::setup_test_db());
    let cookie = common::login(&app, "idp|legs").await;

    let workout = create_workout(&app, &cookie, "2024-05-06", "Leg Day").await;
    assert_eq!(workout["workout_date"], "2024-05-06");
    assert!(workout["duration_seconds"].is_null());

    let squat = add_exercise(&app, &cookie, id(&workout), "Squat", 0).await;

    let first = add_set(&app, &cookie, id(&squat), 5, 100.0).await;
    let second = add_set(&app, &cookie, id(&squat), 5, 100.0).await;
    let third = add_set(&app, &cookie, id(&squat), 5, 100.0).await;
    assert_eq!(first["set_number"], 1);
    assert_eq!(second["set_number"], 2);
    assert_eq!(third["set_number"], 3);
    assert_eq!(first["weight_unit"], "lb");
    assert_eq!(first["completed"], false);

    send_ok(
        &app,
        TestRequest::new("DELETE", format!("/sets/{}", id(&second))).cookie(&cookie),
    )
    .await;

    let sets = send_ok(
        &app,
        TestRequest::get(format!("/exercises/{}/sets", id(&squat))).cookie(&cookie),
    )
    .await;
    let numbers: Vec<i64> = sets
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["set_number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2]);

    let fourth = add_set(&app, &cookie, id(&squat), 3, 110.0).await;
    assert_eq!(fourth["set_number"], 3);
}

#[tokio::test]
async fn test_update_and_complete_set() {
    let app = common::create_test_app(common::setup_test_db());
    let cookie = common::login(&app, "idp|sets").await;

    let workout = create_workout(&app, &cookie, "2024-05-06", "Push").await;
    let bench = add_exercise(&app, &cookie, id(&workout), "Bench", 0).await;
    let set = add_set(&app, &cookie, id(&bench), 8, 60.0).await;

    let updated = send_ok(
        &app,
        TestRequest::new("PUT", format!("/sets/{}", id(&set)))
            .cookie(&cookie)
            .json(json!({ "reps": 10, "weight": 62.5 })),
    )
    .await;
    assert_eq!(updated["reps"], 10);
    assert_eq!(updated["weight"], 62.5);
    assert_eq!(updated["set_number"], 1);

    let completed = send_ok(
        &app,
        TestRequest::post(format!("/sets/{}/completed", id(&set)))
            .cookie(&cookie)
            .json(json!({ "completed": true })),
    )
    .await;
    assert_eq!(completed["completed"], true);

    let detail = send_ok(
        &app,
        TestRequest::get(format!("/workouts/{}", id(&workout))).cookie(&cookie),
    )
    .await;
    assert_eq!(detail["totals"]["total_sets"], 1);
    assert_eq!(detail["totals"]["completed_sets"], 1);
}

#[tokio::test]
async fn test_list_today_partitions_by_local_date() {
    let app = common::create_test_app(common::setup_test_db());
    let cookie = common::login(&app, "idp|today").await;

    let morning = create_workout(&app, &cookie, "2024-05-07", "Morning").await;
    create_workout(&app, &cookie, "2024-05-07", "Evening").await;
    create_workout(&app, &cookie, "2024-05-06", "Yesterday").await;

    let squat = add_exercise(&app, &cookie, id(&morning), "Squat", 0).await;
    add_exercise(&app, &cookie, id(&morning), "Lunge", 1).await;
    add_set(&app, &cookie, id(&squat), 5, 100.0).await;
    add_set(&app, &cookie, id(&squat), 5, 100.0).await;

    let today = send_ok(
        &app,
        TestRequest::get("/workouts/today")
            .cookie(&cookie)
            .local_date("2024-05-07"),
    )
    .await;
    let today = today.as_array().unwrap();
    assert_eq!(today.len(), 2);

    let names: Vec<&str> = today.iter().map(|w| w["name"].as_str().unwrap()).collect();
    assert!(names.contains(&"Morning"));
    assert!(names.contains(&"Evening"));

    let morning = today.iter().find(|w| w["name"] == "Morning").unwrap();
    let exercises = morning["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 2);
    assert_eq!(exercises[0]["exercise_name"], "Squat");
    assert_eq!(exercises[0]["sets"].as_array().unwrap().len(), 2);
    assert_eq!(exercises[1]["exercise_name"], "Lunge");
    assert!(exercises[1]["sets"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_history_is_newest_first_with_counts() {
    let app = common::create_test_app(common::setup_test_db());
    let cookie = common::login(&app, "idp|history").await;

    create_workout(&app, &cookie, "2024-05-01", "Oldest").await;
    let middle = create_workout(&app, &cookie, "2024-05-03", "Middle").await;
    create_workout(&app, &cookie, "2024-05-05", "Newest").await;

    let row = add_exercise(&app, &cookie, id(&middle), "Row", 0).await;
    add_set(&app, &cookie, id(&row), 8, 50.0).await;
    add_set(&app, &cookie, id(&row), 8, 50.0).await;

    let history = send_ok(&app, TestRequest::get("/workouts/history").cookie(&cookie)).await;
    let names: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Newest", "Middle", "Oldest"]);
    assert_eq!(history[1]["exercise_count"], 1);
    assert_eq!(history[1]["total_sets"], 2);

    let limited = send_ok(
        &app,
        TestRequest::get("/workouts/history?limit=2").cookie(&cookie),
    )
    .await;
    assert_eq!(limited.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_workout_fields() {
    let app = common::create_test_app(common::setup_test_db());
    let cookie = common::login(&app, "idp|update").await;

    let workout = create_workout(&app, &cookie, "2024-05-06", "Draft").await;

    let updated = send_ok(
        &app,
        TestRequest::new("PATCH", format!("/workouts/{}", id(&workout)))
            .cookie(&cookie)
            .json(json!({ "name": "Upper", "notes": "felt strong", "duration_seconds": 3600 })),
    )
    .await;

    assert_eq!(updated["name"], "Upper");
    assert_eq!(updated["notes"], "felt strong");
    assert_eq!(updated["duration_seconds"], 3600);
    assert_eq!(updated["workout_date"], "2024-05-06");
}

#[tokio::test]
async fn test_delete_workout_cascades() {
    let app = common::create_test_app(common::setup_test_db());
    let cookie = common::login(&app, "idp|cascade").await;

    let workout = create_workout(&app, &cookie, "2024-05-06", "Doomed").await;
    let deadlift = add_exercise(&app, &cookie, id(&workout), "Deadlift", 0).await;
    let set = add_set(&app, &cookie, id(&deadlift), 3, 140.0).await;

    let deleted = send_ok(
        &app,
        TestRequest::new("DELETE", format!("/workouts/{}", id(&workout))).cookie(&cookie),
    )
    .await;
    assert_eq!(deleted["id"], id(&workout));

    let (status, _) = send(
        &app,
        TestRequest::get(format!("/workouts/{}", id(&workout))).cookie(&cookie),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        TestRequest::get(format!("/exercises/{}/sets", id(&deadlift))).cookie(&cookie),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        TestRequest::new("DELETE", format!("/sets/{}", id(&set))).cookie(&cookie),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rename_and_delete_exercise() {
    let app = common::create_test_app(common::setup_test_db());
    let cookie = common::login(&app, "idp|exercise").await;

    let workout = create_workout(&app, &cookie, "2024-05-06", "Arms").await;
    let curl = add_exercise(&app, &cookie, id(&workout), "Curl", 0).await;
    add_set(&app, &cookie, id(&curl), 12, 15.0).await;

    let renamed = send_ok(
        &app,
        TestRequest::new("PATCH", format!("/exercises/{}", id(&curl)))
            .cookie(&cookie)
            .json(json!({ "exercise_name": "Hammer Curl" })),
    )
    .await;
    assert_eq!(renamed["exercise_name"], "Hammer Curl");

    send_ok(
        &app,
        TestRequest::new("DELETE", format!("/exercises/{}", id(&curl))).cookie(&cookie),
    )
    .await;

    let detail = send_ok(
        &app,
        TestRequest::get(format!("/workouts/{}", id(&workout))).cookie(&cookie),
    )
    .await;
    assert!(detail["exercises"].as_array().unwrap().is_empty());
    assert_eq!(detail["totals"]["total_sets"], 0);
}
