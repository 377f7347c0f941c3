//! Venues grouped by area.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, EntityTrait};
use serde::Serialize;

use crate::error::CoreError;
use crate::search::Summary;
use crate::store::{self, ShowSide};
use fyyur_db::entities::venue;

/// All venues sharing one `(city, state)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<Summary>,
}

/// Group venues by `(city, state)`. Areas are ordered by state then city,
/// venues inside an area by id, regardless of input order.
pub fn group_by_area(venues: Vec<venue::Model>, upcoming: &HashMap<i32, u64>) -> Vec<Area> {
    let mut areas: BTreeMap<(String, String), Vec<Summary>> = BTreeMap::new();
    for v in venues {
        let summary = Summary {
            id: v.id,
            name: v.name,
            num_upcoming_shows: upcoming.get(&v.id).copied().unwrap_or(0),
        };
        areas.entry((v.state, v.city)).or_default().push(summary);
    }

    areas
        .into_iter()
        .map(|((state, city), mut venues)| {
            venues.sort_by_key(|s| s.id);
            Area {
                city,
                state,
                venues,
            }
        })
        .collect()
}

/// Every area with its venues and their upcoming-show counts as of `now`.
pub async fn group_venues<C>(db: &C, now: DateTime<Utc>) -> Result<Vec<Area>, CoreError>
where
    C: ConnectionTrait,
{
    let venues = venue::Entity::find().all(db).await?;
    let upcoming = store::count_upcoming(db, ShowSide::Venue, now).await?;
    tracing::debug!(venues = venues.len(), "grouping venues by area");
    Ok(group_by_area(venues, &upcoming))
}
