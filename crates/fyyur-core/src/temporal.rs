//! Past/upcoming partitioning of shows relative to a reference instant.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which side of `now` a show falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    Past,
    Upcoming,
}

/// Strict comparison: a show starting exactly at `now` is already past.
pub fn timing(start_time: DateTime<Utc>, now: DateTime<Utc>) -> Timing {
    if start_time > now {
        Timing::Upcoming
    } else {
        Timing::Past
    }
}

/// A show as seen from one side of the venue/artist relation, carrying the
/// other side's display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appearance {
    pub show_id: i32,
    pub counterpart_id: i32,
    pub counterpart_name: String,
    pub counterpart_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classified {
    pub past_shows: Vec<Appearance>,
    pub upcoming_shows: Vec<Appearance>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

/// Partition `shows` around `now`. Both lists are ordered by start time, then
/// show id.
pub fn classify<I>(shows: I, now: DateTime<Utc>) -> Classified
where
    I: IntoIterator<Item = Appearance>,
{
    let mut shows: Vec<Appearance> = shows.into_iter().collect();
    shows.sort_by(|a, b| {
        a.start_time
            .cmp(&b.start_time)
            .then(a.show_id.cmp(&b.show_id))
    });

    let (upcoming, past): (Vec<_>, Vec<_>) = shows
        .into_iter()
        .partition(|s| timing(s.start_time, now) == Timing::Upcoming);

    Classified {
        past_shows_count: past.len(),
        upcoming_shows_count: upcoming.len(),
        past_shows: past,
        upcoming_shows: upcoming,
    }
}
