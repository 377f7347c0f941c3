//! Case-insensitive name search for venues and artists.

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::store::{self, ShowSide};
use fyyur_db::entities::{artist, venue};

/// A venue or artist in a list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Venue,
    Artist,
}

impl SearchKind {
    fn side(self) -> ShowSide {
        match self {
            SearchKind::Venue => ShowSide::Venue,
            SearchKind::Artist => ShowSide::Artist,
        }
    }
}

/// `count` always equals `data.len()`; pagination, if any, happens after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<Summary>,
}

/// A trimmed search term folded with Unicode lowercasing. Both sides are
/// folded here, not in SQL, as SQLite's `LOWER` only folds ASCII. An empty
/// term matches everything; `%` and `_` are plain characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter(Option<String>);

impl NameFilter {
    pub fn new(term: &str) -> Self {
        let term = term.trim();
        Self((!term.is_empty()).then(|| term.to_lowercase()))
    }

    pub fn matches(&self, text: &str) -> bool {
        match &self.0 {
            None => true,
            Some(needle) => text.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Search venues or artists by name. Results are ordered by id.
pub async fn search<C>(
    db: &C,
    kind: SearchKind,
    term: &str,
    now: DateTime<Utc>,
) -> Result<SearchResults, CoreError>
where
    C: ConnectionTrait,
{
    let filter = NameFilter::new(term);

    let rows: Vec<(i32, String)> = match kind {
        SearchKind::Venue => {
            venue::Entity::find()
                .select_only()
                .columns([venue::Column::Id, venue::Column::Name])
                .order_by_asc(venue::Column::Id)
                .into_tuple()
                .all(db)
                .await?
        }
        SearchKind::Artist => {
            artist::Entity::find()
                .select_only()
                .columns([artist::Column::Id, artist::Column::Name])
                .order_by_asc(artist::Column::Id)
                .into_tuple()
                .all(db)
                .await?
        }
    };

    let upcoming = store::count_upcoming(db, kind.side(), now).await?;
    let data: Vec<Summary> = rows
        .into_iter()
        .filter(|(_, name)| filter.matches(name))
        .map(|(id, name)| Summary {
            id,
            name,
            num_upcoming_shows: upcoming.get(&id).copied().unwrap_or(0),
        })
        .collect();

    tracing::debug!(?kind, term, matches = data.len(), "name search");
    Ok(SearchResults {
        count: data.len(),
        data,
    })
}
