//! Venues, artists and shows: detail views and guarded commands.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::genres::GenreTags;
use crate::guard::{Affected, MutationGuard, Outcome};
use crate::search::{self, SearchKind, Summary};
use crate::store::{self, ShowSide};
use crate::temporal::{classify, Appearance, Classified};
use fyyur_db::entities::{artist, show, venue};

// ── Views ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct VenueDetail {
    pub id: i32,
    pub name: String,
    pub genres: GenreTags,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    #[serde(flatten)]
    pub shows: Classified,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistDetail {
    pub id: i32,
    pub name: String,
    pub genres: GenreTags,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    #[serde(flatten)]
    pub shows: Classified,
}

/// A row of the all-shows listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub id: i32,
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// Venue page: the venue plus its shows split around `now`.
pub async fn venue_detail<C>(db: &C, id: i32, now: DateTime<Utc>) -> Result<VenueDetail, CoreError>
where
    C: ConnectionTrait,
{
    let v = store::require::<venue::Entity, _>(db, "venue", id).await?;

    let appearances = show::Entity::find()
        .filter(show::Column::VenueId.eq(id))
        .find_also_related(artist::Entity)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(s, a)| {
            a.map(|a| Appearance {
                show_id: s.id,
                counterpart_id: a.id,
                counterpart_name: a.name,
                counterpart_image_link: a.image_link,
                start_time: s.start_time,
            })
        });

    Ok(VenueDetail {
        id: v.id,
        name: v.name,
        genres: GenreTags::decode(v.genres.as_deref()),
        city: v.city,
        state: v.state,
        address: v.address,
        phone: v.phone,
        website: v.website,
        facebook_link: v.facebook_link,
        image_link: v.image_link,
        seeking_talent: v.seeking_talent,
        seeking_description: v.seeking_description,
        shows: classify(appearances, now),
    })
}

/// Artist page: the artist plus their shows split around `now`.
pub async fn artist_detail<C>(db: &C, id: i32, now: DateTime<Utc>) -> Result<ArtistDetail, CoreError>
where
    C: ConnectionTrait,
{
    let a = store::require::<artist::Entity, _>(db, "artist", id).await?;

    let appearances = show::Entity::find()
        .filter(show::Column::ArtistId.eq(id))
        .find_also_related(venue::Entity)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(s, v)| {
            v.map(|v| Appearance {
                show_id: s.id,
                counterpart_id: v.id,
                counterpart_name: v.name,
                counterpart_image_link: v.image_link,
                start_time: s.start_time,
            })
        });

    Ok(ArtistDetail {
        id: a.id,
        name: a.name,
        genres: GenreTags::decode(a.genres.as_deref()),
        city: a.city,
        state: a.state,
        phone: a.phone,
        website: a.website,
        facebook_link: a.facebook_link,
        image_link: a.image_link,
        seeking_venue: a.seeking_venue,
        seeking_description: a.seeking_description,
        shows: classify(appearances, now),
    })
}

/// All artists with their upcoming-show counts, ordered by id.
pub async fn list_artists<C>(db: &C, now: DateTime<Utc>) -> Result<Vec<Summary>, CoreError>
where
    C: ConnectionTrait,
{
    Ok(search::search(db, SearchKind::Artist, "", now).await?.data)
}

/// Every show with venue and artist display fields, ordered by start time.
pub async fn list_shows<C>(db: &C) -> Result<Vec<ShowListing>, CoreError>
where
    C: ConnectionTrait,
{
    let shows = show::Entity::find()
        .order_by_asc(show::Column::StartTime)
        .order_by_asc(show::Column::Id)
        .all(db)
        .await?;
    let venues: HashMap<i32, venue::Model> = venue::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|v| (v.id, v))
        .collect();
    let artists: HashMap<i32, artist::Model> = artist::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    Ok(shows
        .into_iter()
        .filter_map(|s| {
            let v = venues.get(&s.venue_id)?;
            let a = artists.get(&s.artist_id)?;
            Some(ShowListing {
                id: s.id,
                venue_id: v.id,
                venue_name: v.name.clone(),
                artist_id: a.id,
                artist_name: a.name.clone(),
                artist_image_link: a.image_link.clone(),
                start_time: s.start_time,
            })
        })
        .collect())
}

// ── Forms ─────────────────────────────────────────────────────────────

fn required(field: &str, value: String) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueForm {
    /// Checked active model with every column set except the id.
    pub fn validate(self) -> Result<venue::ActiveModel, CoreError> {
        let genres = GenreTags::parse(self.genres)?;
        Ok(venue::ActiveModel {
            name: Set(required("name", self.name)?),
            city: Set(required("city", self.city)?),
            state: Set(required("state", self.state)?),
            address: Set(required("address", self.address)?),
            phone: Set(optional(self.phone)),
            genres: Set(genres.encode()),
            image_link: Set(optional(self.image_link)),
            facebook_link: Set(optional(self.facebook_link)),
            website: Set(optional(self.website)),
            seeking_talent: Set(self.seeking_talent),
            seeking_description: Set(optional(self.seeking_description)),
            ..Default::default()
        })
    }
}

/// Pre-filled edit form.
impl From<venue::Model> for VenueForm {
    fn from(v: venue::Model) -> Self {
        Self {
            genres: GenreTags::decode(v.genres.as_deref()).into_vec(),
            name: v.name,
            city: v.city,
            state: v.state,
            address: v.address,
            phone: v.phone,
            image_link: v.image_link,
            facebook_link: v.facebook_link,
            website: v.website,
            seeking_talent: v.seeking_talent,
            seeking_description: v.seeking_description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn validate(self) -> Result<artist::ActiveModel, CoreError> {
        let genres = GenreTags::parse(self.genres)?;
        Ok(artist::ActiveModel {
            name: Set(required("name", self.name)?),
            city: Set(required("city", self.city)?),
            state: Set(required("state", self.state)?),
            phone: Set(optional(self.phone)),
            genres: Set(genres.encode()),
            image_link: Set(optional(self.image_link)),
            facebook_link: Set(optional(self.facebook_link)),
            website: Set(optional(self.website)),
            seeking_venue: Set(self.seeking_venue),
            seeking_description: Set(optional(self.seeking_description)),
            ..Default::default()
        })
    }
}

impl From<artist::Model> for ArtistForm {
    fn from(a: artist::Model) -> Self {
        Self {
            genres: GenreTags::decode(a.genres.as_deref()).into_vec(),
            name: a.name,
            city: a.city,
            state: a.state,
            phone: a.phone,
            image_link: a.image_link,
            facebook_link: a.facebook_link,
            website: a.website,
            seeking_venue: a.seeking_venue,
            seeking_description: a.seeking_description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub venue_id: i32,
    pub artist_id: i32,
    /// RFC 3339, or `YYYY-MM-DD HH:MM:SS` read as UTC.
    pub start_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidShow {
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: DateTime<Utc>,
}

impl ShowForm {
    pub fn validate(self) -> Result<ValidShow, CoreError> {
        if self.venue_id <= 0 {
            return Err(CoreError::validation("venue_id is required"));
        }
        if self.artist_id <= 0 {
            return Err(CoreError::validation("artist_id is required"));
        }
        Ok(ValidShow {
            venue_id: self.venue_id,
            artist_id: self.artist_id,
            start_time: parse_start_time(&self.start_time)?,
        })
    }
}

pub fn parse_start_time(raw: &str) -> Result<DateTime<Utc>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CoreError::validation("start_time is required"));
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|t| t.and_utc())
        .map_err(|_| CoreError::validation(format!("start_time {raw:?} is not a valid timestamp")))
}

// ── Commands ──────────────────────────────────────────────────────────

pub async fn create_venue(db: &DatabaseConnection, form: VenueForm) -> Outcome<Affected> {
    MutationGuard::new(db, "create venue")
        .run(form.validate(), |txn, model| {
            Box::pin(async move {
                let id = venue::Entity::insert(model).exec(txn).await?.last_insert_id;
                Ok(Affected::Created { id })
            })
        })
        .await
}

pub async fn update_venue(db: &DatabaseConnection, id: i32, form: VenueForm) -> Outcome<Affected> {
    MutationGuard::new(db, "update venue")
        .run(form.validate(), move |txn, mut model| {
            Box::pin(async move {
                store::require::<venue::Entity, _>(txn, "venue", id).await?;
                model.id = Set(id);
                model.update(txn).await?;
                Ok(Affected::Updated { id })
            })
        })
        .await
}

/// Deletes the venue and every show booked there.
pub async fn delete_venue(db: &DatabaseConnection, id: i32) -> Outcome<Affected> {
    MutationGuard::new(db, "delete venue")
        .run(Ok(()), move |txn, ()| {
            Box::pin(async move {
                store::require::<venue::Entity, _>(txn, "venue", id).await?;
                let shows = store::delete_shows_of(txn, ShowSide::Venue, id).await?;
                let rows = store::delete::<venue::Entity, _>(txn, "venue", id).await?;
                Ok(Affected::Deleted {
                    id,
                    rows: rows + shows,
                })
            })
        })
        .await
}

pub async fn create_artist(db: &DatabaseConnection, form: ArtistForm) -> Outcome<Affected> {
    MutationGuard::new(db, "create artist")
        .run(form.validate(), |txn, model| {
            Box::pin(async move {
                let id = artist::Entity::insert(model).exec(txn).await?.last_insert_id;
                Ok(Affected::Created { id })
            })
        })
        .await
}

pub async fn update_artist(
    db: &DatabaseConnection,
    id: i32,
    form: ArtistForm,
) -> Outcome<Affected> {
    MutationGuard::new(db, "update artist")
        .run(form.validate(), move |txn, mut model| {
            Box::pin(async move {
                store::require::<artist::Entity, _>(txn, "artist", id).await?;
                model.id = Set(id);
                model.update(txn).await?;
                Ok(Affected::Updated { id })
            })
        })
        .await
}

/// Deletes the artist and every show they were booked for.
pub async fn delete_artist(db: &DatabaseConnection, id: i32) -> Outcome<Affected> {
    MutationGuard::new(db, "delete artist")
        .run(Ok(()), move |txn, ()| {
            Box::pin(async move {
                store::require::<artist::Entity, _>(txn, "artist", id).await?;
                let shows = store::delete_shows_of(txn, ShowSide::Artist, id).await?;
                let rows = store::delete::<artist::Entity, _>(txn, "artist", id).await?;
                Ok(Affected::Deleted {
                    id,
                    rows: rows + shows,
                })
            })
        })
        .await
}

/// Books an artist at a venue. Both must already exist.
pub async fn create_show(db: &DatabaseConnection, form: ShowForm) -> Outcome<Affected> {
    MutationGuard::new(db, "create show")
        .run(form.validate(), |txn, booking| {
            Box::pin(async move {
                store::require::<venue::Entity, _>(txn, "venue", booking.venue_id).await?;
                store::require::<artist::Entity, _>(txn, "artist", booking.artist_id).await?;
                let model = show::ActiveModel {
                    venue_id: Set(booking.venue_id),
                    artist_id: Set(booking.artist_id),
                    start_time: Set(booking.start_time),
                    ..Default::default()
                };
                let id = show::Entity::insert(model).exec(txn).await?.last_insert_id;
                Ok(Affected::Created { id })
            })
        })
        .await
}
