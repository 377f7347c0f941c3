//! Store primitives shared by the query engines and mutation commands.
//!
//! Everything is generic over [`ConnectionTrait`], so the same call works on
//! a pooled connection for reads and on a [`sea_orm::DatabaseTransaction`]
//! inside the mutation guard.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PrimaryKeyTrait, QueryFilter, QuerySelect,
};

use crate::error::CoreError;
use fyyur_db::entities::show;

/// Look up one row by integer primary key.
pub async fn find<E, C>(db: &C, id: i32) -> Result<Option<E::Model>, CoreError>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    C: ConnectionTrait,
{
    Ok(E::find_by_id(id).one(db).await?)
}

/// Like [`find`], but absence is a [`CoreError::NotFound`].
pub async fn require<E, C>(db: &C, entity: &'static str, id: i32) -> Result<E::Model, CoreError>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    C: ConnectionTrait,
{
    find::<E, C>(db, id)
        .await?
        .ok_or_else(|| CoreError::not_found(entity, id))
}

/// Delete one row by primary key, returning the affected row count.
/// Deleting an absent id is [`CoreError::NotFound`].
pub async fn delete<E, C>(db: &C, entity: &'static str, id: i32) -> Result<u64, CoreError>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    C: ConnectionTrait,
{
    let res = E::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(CoreError::not_found(entity, id));
    }
    Ok(res.rows_affected)
}

/// Which end of the show relation a count is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowSide {
    Venue,
    Artist,
}

impl ShowSide {
    fn column(self) -> show::Column {
        match self {
            ShowSide::Venue => show::Column::VenueId,
            ShowSide::Artist => show::Column::ArtistId,
        }
    }
}

/// Upcoming-show count per venue or artist id. Ids with no upcoming show are
/// absent from the map; callers read them as zero.
///
/// Uses the same strict `start_time > now` rule as [`crate::temporal::timing`].
pub async fn count_upcoming<C>(
    db: &C,
    side: ShowSide,
    now: DateTime<Utc>,
) -> Result<HashMap<i32, u64>, CoreError>
where
    C: ConnectionTrait,
{
    let rows: Vec<(i32, i64)> = show::Entity::find()
        .select_only()
        .column(side.column())
        .column_as(Expr::col(show::Column::Id).count(), "upcoming")
        .filter(show::Column::StartTime.gt(now))
        .group_by(side.column())
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, n)| (id, n.max(0) as u64))
        .collect())
}

/// Delete every show booked at a venue or by an artist.
pub async fn delete_shows_of<C>(db: &C, side: ShowSide, id: i32) -> Result<u64, CoreError>
where
    C: ConnectionTrait,
{
    let res = show::Entity::delete_many()
        .filter(side.column().eq(id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
