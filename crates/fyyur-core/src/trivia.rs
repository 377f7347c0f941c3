//! Trivia reads (categories, paginated question lists, search) and the
//! question/category commands.

use std::collections::BTreeMap;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::guard::{Affected, MutationGuard, Outcome};
use crate::page::Page;
use crate::quiz::int_value;
use crate::search::NameFilter;
use crate::store;
use fyyur_db::entities::{category, question};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub category: Option<i32>,
    pub difficulty: Option<i32>,
}

impl From<question::Model> for QuestionView {
    fn from(q: question::Model) -> Self {
        Self {
            id: q.id,
            question: q.question,
            answer: q.answer,
            category: q.category_id,
            difficulty: q.difficulty,
        }
    }
}

/// Category id to label, ordered by id.
pub async fn categories<C>(db: &C) -> Result<BTreeMap<i32, String>, CoreError>
where
    C: ConnectionTrait,
{
    Ok(category::Entity::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.kind))
        .collect())
}

async fn paged<C>(
    db: &C,
    query: sea_orm::Select<question::Entity>,
    page: u64,
    per_page: u64,
) -> Result<Page<QuestionView>, CoreError>
where
    C: ConnectionTrait,
{
    let rows = query.order_by_asc(question::Column::Id).all(db).await?;
    Ok(Page::slice(rows, page, per_page).map(QuestionView::from))
}

/// Every question, one page at a time.
pub async fn list_questions<C>(
    db: &C,
    page: u64,
    per_page: u64,
) -> Result<Page<QuestionView>, CoreError>
where
    C: ConnectionTrait,
{
    paged(db, question::Entity::find(), page, per_page).await
}

/// Questions of one category. An unknown category is [`CoreError::NotFound`].
pub async fn questions_by_category<C>(
    db: &C,
    category_id: i32,
    page: u64,
    per_page: u64,
) -> Result<(category::Model, Page<QuestionView>), CoreError>
where
    C: ConnectionTrait,
{
    let cat = store::require::<category::Entity, _>(db, "category", category_id).await?;
    let query = question::Entity::find().filter(question::Column::CategoryId.eq(category_id));
    Ok((cat, paged(db, query, page, per_page).await?))
}

/// Case-insensitive substring search on question text; `total` counts every
/// match, not just this page.
pub async fn search_questions<C>(
    db: &C,
    term: &str,
    page: u64,
    per_page: u64,
) -> Result<Page<QuestionView>, CoreError>
where
    C: ConnectionTrait,
{
    let filter = NameFilter::new(term);
    let rows: Vec<question::Model> = question::Entity::find()
        .order_by_asc(question::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .filter(|q| filter.matches(&q.question))
        .collect();
    let found = Page::slice(rows, page, per_page).map(QuestionView::from);
    tracing::debug!(term, total = found.total, "question search");
    Ok(found)
}

// ── Forms ─────────────────────────────────────────────────────────────

/// `category` and `difficulty` accept integers or integer strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuestionForm {
    pub question: String,
    pub answer: String,
    pub category: Option<Value>,
    pub difficulty: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidQuestion {
    pub question: String,
    pub answer: String,
    pub category_id: Option<i32>,
    pub difficulty: Option<i32>,
}

fn optional_int(field: &str, raw: Option<Value>) -> Result<Option<i32>, CoreError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(v) => {
            let n = int_value(field, &v)?;
            i32::try_from(n)
                .map(Some)
                .map_err(|_| CoreError::validation(format!("{field} is out of range")))
        }
    }
}

impl QuestionForm {
    pub fn validate(self) -> Result<ValidQuestion, CoreError> {
        let question = self.question.trim().to_string();
        if question.is_empty() {
            return Err(CoreError::validation("question is required"));
        }
        let answer = self.answer.trim().to_string();
        if answer.is_empty() {
            return Err(CoreError::validation("answer is required"));
        }
        Ok(ValidQuestion {
            question,
            answer,
            category_id: optional_int("category", self.category)?,
            difficulty: optional_int("difficulty", self.difficulty)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
    #[serde(rename = "type")]
    pub kind: String,
}

// ── Commands ──────────────────────────────────────────────────────────

/// Adds a question. A category id that does not exist is a validation error.
pub async fn create_question(db: &DatabaseConnection, form: QuestionForm) -> Outcome<Affected> {
    MutationGuard::new(db, "create question")
        .run(form.validate(), |txn, valid| {
            Box::pin(async move {
                if let Some(cat) = valid.category_id {
                    if store::find::<category::Entity, _>(txn, cat).await?.is_none() {
                        return Err(CoreError::validation(format!("unknown category {cat}")));
                    }
                }
                let model = question::ActiveModel {
                    question: Set(valid.question),
                    answer: Set(valid.answer),
                    category_id: Set(valid.category_id),
                    difficulty: Set(valid.difficulty),
                    ..Default::default()
                };
                let id = question::Entity::insert(model).exec(txn).await?.last_insert_id;
                Ok(Affected::Created { id })
            })
        })
        .await
}

pub async fn delete_question(db: &DatabaseConnection, id: i32) -> Outcome<Affected> {
    MutationGuard::new(db, "delete question")
        .run(Ok(()), move |txn, ()| {
            Box::pin(async move {
                let rows = store::delete::<question::Entity, _>(txn, "question", id).await?;
                Ok(Affected::Deleted { id, rows })
            })
        })
        .await
}

pub async fn create_category(db: &DatabaseConnection, form: CategoryForm) -> Outcome<Affected> {
    let validated = match form.kind.trim() {
        "" => Err(CoreError::validation("type is required")),
        kind => Ok(kind.to_string()),
    };
    MutationGuard::new(db, "create category")
        .run(validated, |txn, kind| {
            Box::pin(async move {
                let model = category::ActiveModel {
                    kind: Set(kind),
                    ..Default::default()
                };
                let id = category::Entity::insert(model).exec(txn).await?.last_insert_id;
                Ok(Affected::Created { id })
            })
        })
        .await
}

/// Deletes a category. Its questions survive uncategorized and are not
/// counted in `rows`.
pub async fn delete_category(db: &DatabaseConnection, id: i32) -> Outcome<Affected> {
    MutationGuard::new(db, "delete category")
        .run(Ok(()), move |txn, ()| {
            Box::pin(async move {
                store::require::<category::Entity, _>(txn, "category", id).await?;
                question::Entity::update_many()
                    .col_expr(question::Column::CategoryId, Expr::value(Option::<i32>::None))
                    .filter(question::Column::CategoryId.eq(id))
                    .exec(txn)
                    .await?;
                let rows = store::delete::<category::Entity, _>(txn, "category", id).await?;
                Ok(Affected::Deleted { id, rows })
            })
        })
        .await
}
