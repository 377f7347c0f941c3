//! Genre tags, stored as one comma-delimited text column.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const DELIMITER: char = ',';

/// An ordered set of genre tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenreTags(Vec<String>);

impl GenreTags {
    /// Build from submitted tags. Rejects tags that could not survive the
    /// comma-delimited column; duplicates keep their first position.
    pub fn parse<I, S>(tags: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into();
            if tag.trim().is_empty() {
                return Err(CoreError::validation("genre tags must not be empty"));
            }
            if tag.contains(DELIMITER) {
                return Err(CoreError::validation(format!(
                    "genre tag {tag:?} must not contain '{DELIMITER}'"
                )));
            }
            if !out.contains(&tag) {
                out.push(tag);
            }
        }
        Ok(Self(out))
    }

    /// Decode the stored column. Absent or empty text is the empty set.
    pub fn decode(column: Option<&str>) -> Self {
        match column {
            None | Some("") => Self::default(),
            Some(s) => Self(s.split(DELIMITER).map(str::to_string).collect()),
        }
    }

    /// Encode for the stored column. The empty set encodes as `None`.
    pub fn encode(&self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.join(&DELIMITER.to_string()))
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> GenreTags {
        GenreTags::parse(items.iter().copied()).unwrap()
    }

    #[test]
    fn test_round_trip_zero_to_five_tags() {
        let pool = ["Jazz", "Reggae", "Swing", "Classical", "Folk"];
        for n in 0..=pool.len() {
            let tagged = tags(&pool[..n]);
            let encoded = tagged.encode();
            let decoded = GenreTags::decode(encoded.as_deref());
            assert_eq!(decoded, tagged, "round trip failed for {n} tags");
        }
    }

    #[test]
    fn test_round_trip_keeps_order() {
        let tagged = tags(&["Rock n Roll", "Blues", "Alternative"]);
        assert_eq!(tagged.encode().as_deref(), Some("Rock n Roll,Blues,Alternative"));
        let decoded = GenreTags::decode(tagged.encode().as_deref());
        assert_eq!(decoded.as_slice(), ["Rock n Roll", "Blues", "Alternative"]);
    }

    #[test]
    fn test_decode_absent_and_empty() {
        assert!(GenreTags::decode(None).is_empty());
        assert!(GenreTags::decode(Some("")).is_empty());
    }

    #[test]
    fn test_parse_rejects_delimiter_and_blank() {
        assert!(matches!(
            GenreTags::parse(["Hip,Hop"]),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            GenreTags::parse(["Jazz", "  "]),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_collapses_duplicates() {
        let t = tags(&["Jazz", "Folk", "Jazz"]);
        assert_eq!(t.as_slice(), ["Jazz", "Folk"]);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let json = serde_json::to_value(tags(&["Jazz", "Folk"])).unwrap();
        assert_eq!(json, serde_json::json!(["Jazz", "Folk"]));
    }
}
