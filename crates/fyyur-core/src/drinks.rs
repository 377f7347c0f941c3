//! Coffee-shop drinks: recipe validation, short/long views and commands.

use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::guard::{Affected, MutationGuard, Outcome};
use crate::store;
use fyyur_db::entities::drink;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

/// Ingredient as shown to anonymous customers: no names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Swatch {
    pub color: String,
    pub parts: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkShort {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Swatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkLong {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl DrinkLong {
    fn from_model(m: drink::Model) -> Result<Self, CoreError> {
        let recipe = serde_json::from_str(&m.recipe)
            .map_err(|e| CoreError::Store(format!("drink {} has an unreadable recipe: {e}", m.id)))?;
        Ok(Self {
            id: m.id,
            title: m.title,
            recipe,
        })
    }

    pub fn short(self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title,
            recipe: self
                .recipe
                .into_iter()
                .map(|i| Swatch {
                    color: i.color,
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

fn text_field(idx: usize, item: &Value, key: &str) -> Result<String, CoreError> {
    match item.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(CoreError::validation(format!(
            "recipe[{idx}].{key} must be a non-empty string"
        ))),
    }
}

/// Check a submitted recipe. A single ingredient object is accepted as a
/// one-item list; every ingredient needs a `name`, a `color` and a positive
/// integer `parts`.
pub fn validate_recipe(raw: &Value) -> Result<Vec<Ingredient>, CoreError> {
    let items: Vec<&Value> = match raw {
        Value::Array(items) => items.iter().collect(),
        obj @ Value::Object(_) => vec![obj],
        _ => return Err(CoreError::validation("recipe must be a list of ingredients")),
    };
    if items.is_empty() {
        return Err(CoreError::validation("recipe needs at least one ingredient"));
    }

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            if !item.is_object() {
                return Err(CoreError::validation(format!("recipe[{idx}] must be an object")));
            }
            let parts = item
                .get("parts")
                .and_then(Value::as_i64)
                .filter(|p| *p > 0)
                .ok_or_else(|| {
                    CoreError::validation(format!("recipe[{idx}].parts must be a positive integer"))
                })?;
            Ok(Ingredient {
                name: text_field(idx, item, "name")?,
                color: text_field(idx, item, "color")?,
                parts,
            })
        })
        .collect()
}

fn encode_recipe(recipe: &[Ingredient]) -> Result<String, CoreError> {
    serde_json::to_string(recipe).map_err(|e| CoreError::Store(e.to_string()))
}

fn required_title(title: String) -> Result<String, CoreError> {
    match title.trim() {
        "" => Err(CoreError::validation("title is required")),
        t => Ok(t.to_string()),
    }
}

pub async fn list_drinks_detail<C>(db: &C) -> Result<Vec<DrinkLong>, CoreError>
where
    C: ConnectionTrait,
{
    drink::Entity::find()
        .order_by_asc(drink::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(DrinkLong::from_model)
        .collect()
}

pub async fn list_drinks<C>(db: &C) -> Result<Vec<DrinkShort>, CoreError>
where
    C: ConnectionTrait,
{
    Ok(list_drinks_detail(db)
        .await?
        .into_iter()
        .map(DrinkLong::short)
        .collect())
}

/// Create or patch body. Both fields are required on create; a patch
/// changes only what it names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DrinkForm {
    pub title: Option<String>,
    pub recipe: Option<Value>,
}

#[derive(Debug)]
struct DrinkPatch {
    title: Option<String>,
    recipe: Option<Vec<Ingredient>>,
}

impl DrinkForm {
    fn patch(self) -> Result<DrinkPatch, CoreError> {
        Ok(DrinkPatch {
            title: self.title.map(required_title).transpose()?,
            recipe: self.recipe.as_ref().map(validate_recipe).transpose()?,
        })
    }

    fn create(self) -> Result<(String, Vec<Ingredient>), CoreError> {
        let patch = self.patch()?;
        let title = patch
            .title
            .ok_or_else(|| CoreError::validation("title is required"))?;
        let recipe = patch
            .recipe
            .ok_or_else(|| CoreError::validation("recipe is required"))?;
        Ok((title, recipe))
    }
}

/// A duplicate title is a [`CoreError::ConstraintViolation`].
pub async fn create_drink(db: &DatabaseConnection, form: DrinkForm) -> Outcome<DrinkLong> {
    MutationGuard::new(db, "create drink")
        .run(form.create(), |txn, (title, recipe)| {
            Box::pin(async move {
                let model = drink::ActiveModel {
                    title: Set(title),
                    recipe: Set(encode_recipe(&recipe)?),
                    ..Default::default()
                };
                let created = model.insert(txn).await?;
                DrinkLong::from_model(created)
            })
        })
        .await
}

pub async fn update_drink(db: &DatabaseConnection, id: i32, form: DrinkForm) -> Outcome<DrinkLong> {
    MutationGuard::new(db, "update drink")
        .run(form.patch(), move |txn, patch| {
            Box::pin(async move {
                let existing = store::require::<drink::Entity, _>(txn, "drink", id).await?;
                let mut model: drink::ActiveModel = existing.into();
                if let Some(title) = patch.title {
                    model.title = Set(title);
                }
                if let Some(recipe) = patch.recipe {
                    model.recipe = Set(encode_recipe(&recipe)?);
                }
                let updated = model.update(txn).await?;
                DrinkLong::from_model(updated)
            })
        })
        .await
}

pub async fn delete_drink(db: &DatabaseConnection, id: i32) -> Outcome<Affected> {
    MutationGuard::new(db, "delete drink")
        .run(Ok(()), move |txn, ()| {
            Box::pin(async move {
                let rows = store::delete::<drink::Entity, _>(txn, "drink", id).await?;
                Ok(Affected::Deleted { id, rows })
            })
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_recipe() {
        let recipe = validate_recipe(&json!([
            {"name": "water", "color": "blue", "parts": 1},
            {"name": "espresso", "color": "brown", "parts": 2}
        ]))
        .unwrap();
        assert_eq!(recipe.len(), 2);
        assert_eq!(recipe[1].name, "espresso");
        assert_eq!(recipe[1].parts, 2);
    }

    #[test]
    fn test_single_object_recipe_is_wrapped() {
        let recipe = validate_recipe(&json!({"name": "milk", "color": "grey", "parts": 3})).unwrap();
        assert_eq!(recipe.len(), 1);
        assert_eq!(recipe[0].color, "grey");
    }

    #[test]
    fn test_malformed_recipes() {
        let bad = [
            json!("water"),
            json!([]),
            json!([{"name": "water", "color": "blue"}]),
            json!([{"name": "water", "color": "blue", "parts": "1"}]),
            json!([{"name": "water", "color": "blue", "parts": 1.5}]),
            json!([{"name": "water", "color": "blue", "parts": 0}]),
            json!([{"color": "blue", "parts": 1}]),
            json!([{"name": "water", "color": 7, "parts": 1}]),
            json!([42]),
        ];
        for raw in bad {
            assert!(
                matches!(validate_recipe(&raw), Err(CoreError::Validation(_))),
                "accepted {raw}"
            );
        }
    }

    #[test]
    fn test_short_form_hides_names() {
        let long = DrinkLong {
            id: 1,
            title: "matcha shake".into(),
            recipe: vec![Ingredient {
                name: "matcha".into(),
                color: "green".into(),
                parts: 1,
            }],
        };
        let json = serde_json::to_value(long.short()).unwrap();
        assert_eq!(json["recipe"], json!([{"color": "green", "parts": 1}]));
    }

    #[test]
    fn test_create_requires_both_fields() {
        let form = DrinkForm {
            title: Some("flat white".into()),
            recipe: None,
        };
        assert!(matches!(form.create(), Err(CoreError::Validation(_))));

        let form = DrinkForm {
            title: Some("  ".into()),
            recipe: Some(json!([{"name": "milk", "color": "white", "parts": 1}])),
        };
        assert!(matches!(form.create(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_patch_allows_partial_body() {
        let form: DrinkForm = serde_json::from_value(json!({"title": "cortado"})).unwrap();
        let patch = form.patch().unwrap();
        assert_eq!(patch.title.as_deref(), Some("cortado"));
        assert!(patch.recipe.is_none());
    }

    #[test]
    fn test_unreadable_stored_recipe_is_store_error() {
        let err = DrinkLong::from_model(drink::Model {
            id: 3,
            title: "mystery".into(),
            recipe: "not json".into(),
        })
        .unwrap_err();
        assert!(matches!(err, CoreError::Store(_)));
    }
}
