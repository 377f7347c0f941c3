// Shared fixtures for the store-backed integration tests
#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use fyyur_core::booking::{self, ArtistForm, ShowForm, VenueForm};
use fyyur_core::trivia::{self, CategoryForm, QuestionForm};
use fyyur_migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::json;

/// Fresh in-memory SQLite store with every migration applied. One pooled
/// connection, so the whole test sees a single database.
pub async fn test_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub fn days(n: i64) -> Duration {
    Duration::days(n)
}

pub fn at(t: DateTime<Utc>) -> String {
    t.to_rfc3339()
}

pub async fn add_venue(db: &DatabaseConnection, name: &str, city: &str, state: &str) -> i32 {
    let form = VenueForm {
        name: name.into(),
        city: city.into(),
        state: state.into(),
        address: "1015 Folsom Street".into(),
        genres: vec!["Jazz".into(), "Folk".into()],
        ..Default::default()
    };
    booking::create_venue(db, form)
        .await
        .into_result()
        .expect("create venue")
        .id()
}

pub async fn add_artist(db: &DatabaseConnection, name: &str) -> i32 {
    let form = ArtistForm {
        name: name.into(),
        city: "San Francisco".into(),
        state: "CA".into(),
        genres: vec!["Rock n Roll".into()],
        ..Default::default()
    };
    booking::create_artist(db, form)
        .await
        .into_result()
        .expect("create artist")
        .id()
}

pub async fn add_show(
    db: &DatabaseConnection,
    venue_id: i32,
    artist_id: i32,
    start: DateTime<Utc>,
) -> i32 {
    let form = ShowForm {
        venue_id,
        artist_id,
        start_time: at(start),
    };
    booking::create_show(db, form)
        .await
        .into_result()
        .expect("create show")
        .id()
}

pub async fn add_category(db: &DatabaseConnection, kind: &str) -> i32 {
    trivia::create_category(db, CategoryForm { kind: kind.into() })
        .await
        .into_result()
        .expect("create category")
        .id()
}

pub async fn add_question(db: &DatabaseConnection, text: &str, category: Option<i32>) -> i32 {
    let form = QuestionForm {
        question: text.into(),
        answer: format!("answer to {text}"),
        category: category.map(|c| json!(c)),
        difficulty: Some(json!(2)),
    };
    trivia::create_question(db, form)
        .await
        .into_result()
        .expect("create question")
        .id()
}
