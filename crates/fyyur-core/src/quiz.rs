//! Non-repeating random question selection for quiz sessions.

use rand::seq::IndexedRandom;
use rand::Rng;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::store;
use crate::trivia::QuestionView;
use fyyur_db::entities::{category, question};

/// Which questions a quiz draws from. On the wire, category id `0` means
/// every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(i32),
}

impl CategoryFilter {
    const ALL_ON_WIRE: i64 = 0;

    /// Parse a wire category id: a JSON integer or an integer string.
    pub fn from_wire(raw: &Value) -> Result<Self, CoreError> {
        let id = int_value("quiz_category.id", raw)?;
        match id {
            Self::ALL_ON_WIRE => Ok(CategoryFilter::All),
            id if id > 0 && id <= i64::from(i32::MAX) => Ok(CategoryFilter::Only(id as i32)),
            other => Err(CoreError::validation(format!(
                "quiz_category.id {other} is not a category"
            ))),
        }
    }

    pub fn admits(&self, category_id: Option<i32>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(id) => category_id == Some(*id),
        }
    }
}

/// Read an integer from a JSON number or a numeric string.
pub(crate) fn int_value(field: &str, raw: &Value) -> Result<i64, CoreError> {
    let parsed = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| CoreError::validation(format!("{field} must be an integer")))
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizCategory {
    pub id: Value,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Body of a quiz round: the ids already asked and the chosen category.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Vec<i32>,
    pub quiz_category: Option<QuizCategory>,
}

impl QuizRequest {
    pub fn parse(self) -> Result<(CategoryFilter, Vec<i32>), CoreError> {
        let category = self
            .quiz_category
            .ok_or_else(|| CoreError::validation("quiz_category is required"))?;
        Ok((CategoryFilter::from_wire(&category.id)?, self.previous_questions))
    }
}

/// Pick uniformly among the questions that pass `filter` and are not in
/// `exclude`. `None` means the session is exhausted.
pub fn select_next<'a, R>(
    pool: &'a [question::Model],
    filter: CategoryFilter,
    exclude: &[i32],
    rng: &mut R,
) -> Option<&'a question::Model>
where
    R: Rng + ?Sized,
{
    let qualifying: Vec<&question::Model> = pool
        .iter()
        .filter(|q| filter.admits(q.category_id) && !exclude.contains(&q.id))
        .collect();
    qualifying.choose(rng).copied()
}

/// Next quiz question from the store.
///
/// An unknown category is a [`CoreError::Validation`]; an exhausted session is
/// `Ok(None)`.
pub async fn next_question<C>(
    db: &C,
    filter: CategoryFilter,
    exclude: &[i32],
) -> Result<Option<QuestionView>, CoreError>
where
    C: ConnectionTrait,
{
    let mut query = question::Entity::find();
    if let CategoryFilter::Only(id) = filter {
        if store::find::<category::Entity, _>(db, id).await?.is_none() {
            return Err(CoreError::validation(format!("unknown category {id}")));
        }
        query = query.filter(question::Column::CategoryId.eq(id));
    }
    if !exclude.is_empty() {
        query = query.filter(question::Column::Id.is_not_in(exclude.iter().copied()));
    }
    let pool = query.order_by_asc(question::Column::Id).all(db).await?;

    let picked = select_next(&pool, filter, exclude, &mut rand::rng()).cloned();
    tracing::debug!(
        ?filter,
        asked = exclude.len(),
        remaining = pool.len(),
        picked = picked.as_ref().map(|q| q.id),
        "quiz selection"
    );
    Ok(picked.map(QuestionView::from))
}
