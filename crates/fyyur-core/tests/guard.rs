mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::*;
use fyyur_core::drinks::{self, DrinkForm};
use fyyur_core::guard::MutationGuard;
use fyyur_core::{Affected, CoreError, MutationState, Outcome};
use fyyur_db::entities::{category, drink};
use sea_orm::{EntityTrait, PaginatorTrait, Set};
use serde_json::json;

fn latte() -> DrinkForm {
    DrinkForm {
        title: Some("latte".into()),
        recipe: Some(json!([
            {"name": "espresso", "color": "brown", "parts": 1},
            {"name": "milk", "color": "white", "parts": 3}
        ])),
    }
}

#[tokio::test]
async fn new_guard_is_pending() {
    let db = test_db().await;
    let guard = MutationGuard::new(&db, "noop");
    assert_eq!(guard.state(), MutationState::Pending);
}

#[tokio::test]
async fn store_error_rolls_back_earlier_writes() {
    let db = test_db().await;
    let outcome = MutationGuard::new(&db, "two categories")
        .run(Ok(()), |txn, ()| {
            Box::pin(async move {
                let model = category::ActiveModel {
                    kind: Set("Science".into()),
                    ..Default::default()
                };
                category::Entity::insert(model).exec(txn).await?;
                Err::<Affected, _>(CoreError::Store("boom".into()))
            })
        })
        .await;

    assert_eq!(outcome.state(), MutationState::RolledBack);
    assert_eq!(category::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn validation_error_never_reaches_store() {
    let db = test_db().await;
    let ran = Arc::new(AtomicBool::new(false));
    let flag = ran.clone();
    let outcome: Outcome<Affected> = MutationGuard::new(&db, "rejected")
        .run(Err::<(), _>(CoreError::validation("nope")), move |_txn, ()| {
            Box::pin(async move {
                flag.store(true, Ordering::SeqCst);
                Ok(Affected::Created { id: 0 })
            })
        })
        .await;
    assert!(matches!(outcome.into_result(), Err(CoreError::Validation(_))));
    assert!(!ran.load(Ordering::SeqCst));
}

#[tokio::test]
async fn create_drink_returns_long_form() {
    let db = test_db().await;
    let created = drinks::create_drink(&db, latte()).await.into_result().unwrap();
    assert_eq!(created.title, "latte");
    assert_eq!(created.recipe.len(), 2);

    let short = drinks::list_drinks(&db).await.unwrap();
    assert_eq!(short.len(), 1);
    assert_eq!(short[0].recipe[1].color, "white");
}

#[tokio::test]
async fn duplicate_drink_title_is_constraint_violation() {
    let db = test_db().await;
    let first = drinks::create_drink(&db, latte()).await.into_result().unwrap();

    let outcome = drinks::create_drink(&db, latte()).await;
    assert_eq!(outcome.state(), MutationState::RolledBack);
    assert!(matches!(
        outcome.into_result(),
        Err(CoreError::ConstraintViolation(_))
    ));

    let stored = drink::Entity::find().all(&db).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, first.id);
}

#[tokio::test]
async fn malformed_recipe_is_validation_error() {
    let db = test_db().await;
    let form = DrinkForm {
        title: Some("mud".into()),
        recipe: Some(json!([{"name": "dirt", "color": "brown", "parts": "lots"}])),
    };
    let outcome = drinks::create_drink(&db, form).await;
    assert!(matches!(outcome.into_result(), Err(CoreError::Validation(_))));
    assert_eq!(drink::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn patch_changes_only_named_fields() {
    let db = test_db().await;
    let created = drinks::create_drink(&db, latte()).await.into_result().unwrap();

    let patch = DrinkForm {
        title: Some("flat white".into()),
        recipe: None,
    };
    let updated = drinks::update_drink(&db, created.id, patch)
        .await
        .into_result()
        .unwrap();
    assert_eq!(updated.title, "flat white");
    assert_eq!(updated.recipe, created.recipe);
}

#[tokio::test]
async fn patch_missing_drink_is_not_found() {
    let db = test_db().await;
    let outcome = drinks::update_drink(&db, 5, latte()).await;
    assert!(matches!(
        outcome.into_result(),
        Err(CoreError::NotFound { entity: "drink", id: 5 })
    ));
}

#[tokio::test]
async fn delete_drink_reports_rows() {
    let db = test_db().await;
    let created = drinks::create_drink(&db, latte()).await.into_result().unwrap();
    let deleted = drinks::delete_drink(&db, created.id).await.into_result().unwrap();
    assert_eq!(deleted, Affected::Deleted { id: created.id, rows: 1 });
    assert!(drinks::list_drinks_detail(&db).await.unwrap().is_empty());
}
