mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::*;
use serde_json::{json, Value};

fn venue(name: &str, city: &str, state: &str) -> Value {
    json!({
        "name": name,
        "city": city,
        "state": state,
        "address": "1015 Folsom Street",
        "genres": ["Jazz", "Reggae"],
        "seeking_talent": true
    })
}

fn artist(name: &str) -> Value {
    json!({
        "name": name,
        "city": "San Francisco",
        "state": "CA",
        "genres": ["Rock n Roll"]
    })
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app().await;
    let (status, body) = get(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn venue_lifecycle() {
    let app = test_app().await;

    let (status, body) = post(&app, "/api/venues", venue("The Musical Hop", "San Francisco", "CA")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["action"], "created");
    let venue_id = body["id"].as_i64().unwrap();

    let (_, body) = post(&app, "/api/artists", artist("Guns N Petals")).await;
    let artist_id = body["id"].as_i64().unwrap();

    let tomorrow = (Utc::now() + Duration::days(1)).to_rfc3339();
    let (status, _) = post(
        &app,
        "/api/shows",
        json!({"venue_id": venue_id, "artist_id": artist_id, "start_time": tomorrow}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = get(&app, &format!("/api/venues/{venue_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["venue"]["genres"], json!(["Jazz", "Reggae"]));
    assert_eq!(body["venue"]["upcoming_shows_count"], 1);
    assert_eq!(body["venue"]["past_shows_count"], 0);

    let (_, body) = get(&app, "/api/venues").await;
    assert_eq!(body["areas"][0]["city"], "San Francisco");
    assert_eq!(body["areas"][0]["venues"][0]["num_upcoming_shows"], 1);

    let (_, body) = get(&app, &format!("/api/venues/{venue_id}/edit")).await;
    assert_eq!(body["venue"]["name"], "The Musical Hop");

    let (status, body) = delete(&app, &format!("/api/venues/{venue_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"], 2);

    let (status, body) = get(&app, &format!("/api/venues/{venue_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 404);

    let (_, body) = get(&app, "/api/shows").await;
    assert_eq!(body["shows"], json!([]));
}

#[tokio::test]
async fn venue_search_counts_matches() {
    let app = test_app().await;
    post(&app, "/api/venues", venue("The Musical Hop", "San Francisco", "CA")).await;
    post(&app, "/api/venues", venue("Park Square Live Music & Coffee", "San Francisco", "CA")).await;

    let (status, body) = get(&app, "/api/venues/search?search_term=MUSIC").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (_, body) = get(&app, "/api/venues/search?search_term=hop").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "The Musical Hop");

    let (_, body) = get(&app, "/api/venues/search").await;
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn invalid_venue_is_422() {
    let app = test_app().await;
    let (status, body) = post(&app, "/api/venues", json!({"name": ""})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], 422);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = test_app().await;
    let (status, body) = send(&app, "POST", "/api/venues", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn artist_update_and_listing() {
    let app = test_app().await;
    let (_, body) = post(&app, "/api/artists", artist("Matt Quevedo")).await;
    let id = body["id"].as_i64().unwrap();

    let mut changed = artist("Matt Quevedo Trio");
    changed["seeking_venue"] = json!(true);
    let (status, body) = send(&app, "PUT", &format!("/api/artists/{id}"), Some(changed)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "updated");

    let (_, body) = get(&app, "/api/artists").await;
    assert_eq!(body["artists"][0]["name"], "Matt Quevedo Trio");

    let (_, body) = get(&app, &format!("/api/artists/{id}")).await;
    assert_eq!(body["artist"]["seeking_venue"], true);
}

#[tokio::test]
async fn show_for_missing_artist_is_404() {
    let app = test_app().await;
    let (_, body) = post(&app, "/api/venues", venue("The Musical Hop", "San Francisco", "CA")).await;
    let venue_id = body["id"].as_i64().unwrap();

    let (status, _) = post(
        &app,
        "/api/shows",
        json!({"venue_id": venue_id, "artist_id": 9, "start_time": "2035-01-01 20:00:00"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn trivia_flow() {
    let app = test_app().await;
    let (status, body) = post(&app, "/api/categories", json!({"type": "Science"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let science = body["id"].as_i64().unwrap();

    for i in 0..12 {
        let (status, _) = post(
            &app,
            "/api/questions",
            json!({"question": format!("Science question {i}"), "answer": "yes", "category": science, "difficulty": 1}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = get(&app, "/api/questions?page=2").await;
    assert_eq!(body["total_questions"], 12);
    assert_eq!(body["questions"].as_array().unwrap().len(), 2);
    assert_eq!(body["categories"][science.to_string()], "Science");

    let (status, body) = get(&app, "/api/questions?page=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"], json!([]));

    let (_, body) = post(&app, "/api/questions", json!({"searchTerm": "QUESTION 1"})).await;
    assert_eq!(body["total_questions"], 3);

    let (_, body) = get(&app, &format!("/api/categories/{science}/questions")).await;
    assert_eq!(body["current_category"], "Science");
    assert_eq!(body["total_questions"], 12);

    let (status, _) = get(&app, "/api/categories/999/questions").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn question_with_bad_difficulty_is_422() {
    let app = test_app().await;
    let (status, _) = post(
        &app,
        "/api/questions",
        json!({"question": "Q", "answer": "A", "difficulty": "hard"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn quiz_runs_until_exhausted() {
    let app = test_app().await;
    let (_, body) = post(&app, "/api/categories", json!({"type": "Art"})).await;
    let art = body["id"].as_i64().unwrap();
    for text in ["Who painted La Giaconda?", "Which Dutch artist cut off his ear?"] {
        post(&app, "/api/questions", json!({"question": text, "answer": "A", "category": art})).await;
    }

    let mut previous: Vec<i64> = Vec::new();
    loop {
        let (status, body) = post(
            &app,
            "/api/quizzes",
            json!({"previous_questions": previous, "quiz_category": {"id": art, "type": "Art"}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        match body["question"].as_object() {
            Some(q) => {
                let id = q["id"].as_i64().unwrap();
                assert!(!previous.contains(&id));
                previous.push(id);
            }
            None => break,
        }
    }
    assert_eq!(previous.len(), 2);
}

#[tokio::test]
async fn quiz_with_unknown_category_is_422() {
    let app = test_app().await;
    let (status, body) = post(
        &app,
        "/api/quizzes",
        json!({"previous_questions": [], "quiz_category": {"id": 31, "type": "Nope"}}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn drinks_flow() {
    let app = test_app().await;
    let latte = json!({
        "title": "latte",
        "recipe": [
            {"name": "espresso", "color": "brown", "parts": 1},
            {"name": "milk", "color": "white", "parts": 3}
        ]
    });

    let (status, body) = post(&app, "/api/drinks", latte.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["drinks"][0]["id"].as_i64().unwrap();

    let (status, _) = post(&app, "/api/drinks", latte).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = get(&app, "/api/drinks").await;
    assert_eq!(body["drinks"].as_array().unwrap().len(), 1);
    assert!(body["drinks"][0]["recipe"][0].get("name").is_none());

    let (_, body) = get(&app, "/api/drinks-detail").await;
    assert_eq!(body["drinks"][0]["recipe"][0]["name"], "espresso");

    let (status, body) = send(&app, "PATCH", &format!("/api/drinks/{id}"), Some(json!({"title": "cafe latte"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["title"], "cafe latte");

    let (status, body) = delete(&app, &format!("/api/drinks/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["delete"], id);

    let (status, _) = delete(&app, &format!("/api/drinks/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
