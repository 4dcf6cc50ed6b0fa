//! Domain models for the catalog query engine
//!
//! Records returned by the engine are flat: the entity's own attributes plus
//! the joined annotation fields, so a listing row looks the same whether or
//! not the user ever touched the item.

use crate::error::{CatalogError, Result};
use bridge_traits::database::{QueryRow, QueryValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Entity Kind
// =============================================================================

/// Kind of catalog entity a query targets.
///
/// The kind selects the collection, the annotation `item_type` tag and the
/// per-kind configuration table (search fields, sort allow-list, filters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Artist,
    Album,
    MediaFile,
}

impl EntityKind {
    /// Collection (table) holding entities of this kind
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Artist => "artists",
            EntityKind::Album => "albums",
            EntityKind::MediaFile => "media_files",
        }
    }

    /// Tag stored in `annotations.item_type` and `item_artists.item_type`
    pub fn item_type(&self) -> &'static str {
        match self {
            EntityKind::Artist => "artist",
            EntityKind::Album => "album",
            EntityKind::MediaFile => "media",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Artist => "artist",
            EntityKind::Album => "album",
            EntityKind::MediaFile => "media_file",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Annotation
// =============================================================================

/// Per-item user state, flattened onto every record.
///
/// A missing annotation row is not an error: the join materializes
/// `Annotation::default()` for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Number of completed plays
    pub play_count: i64,
    /// Last play time (Unix seconds)
    pub play_date: Option<i64>,
    /// User rating, fractional values allowed
    pub rating: f64,
    /// Starred flag
    pub starred: bool,
    /// When the item was starred (Unix seconds)
    pub starred_at: Option<i64>,
}

impl Annotation {
    pub fn played_at(&self) -> Option<DateTime<Utc>> {
        self.play_date.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    pub fn starred_on(&self) -> Option<DateTime<Utc>> {
        self.starred_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    pub(crate) fn from_row(row: &QueryRow) -> Result<Self> {
        Ok(Self {
            play_count: required_i64(row, "play_count")?,
            play_date: optional_i64(row, "play_date")?,
            rating: required_f64(row, "rating")?,
            starred: required_bool(row, "starred")?,
            starred_at: optional_i64(row, "starred_at")?,
        })
    }
}

// =============================================================================
// Records
// =============================================================================

/// A typed row the executor can decode from a listing result.
pub trait CatalogRecord: Sized + Send {
    /// Kind of entity this record represents
    const KIND: EntityKind;

    /// Decode one listing row
    fn from_row(row: &QueryRow) -> Result<Self>;
}

/// Artist listing row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistMetadata {
    pub id: String,
    pub name: String,
    pub genre: Option<String>,
    pub album_count: i64,
    pub song_count: i64,
    /// Total size in bytes
    pub size: i64,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(flatten)]
    pub annotation: Annotation,
}

impl CatalogRecord for ArtistMetadata {
    const KIND: EntityKind = EntityKind::Artist;

    fn from_row(row: &QueryRow) -> Result<Self> {
        Ok(Self {
            id: required_string(row, "id")?,
            name: required_string(row, "name")?,
            genre: optional_string(row, "genre")?,
            album_count: required_i64(row, "album_count")?,
            song_count: required_i64(row, "song_count")?,
            size: required_i64(row, "size")?,
            created_at: required_i64(row, "created_at")?,
            updated_at: required_i64(row, "updated_at")?,
            annotation: Annotation::from_row(row)?,
        })
    }
}

/// Album listing row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumMetadata {
    pub id: String,
    pub name: String,
    /// Primary album artist reference
    pub artist_id: Option<String>,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    /// Every artist credited on the album, sorted
    pub all_artist_ids: Vec<String>,
    /// Earliest track year on the album
    pub min_year: Option<i32>,
    /// Latest track year on the album
    pub max_year: Option<i32>,
    pub genre: Option<String>,
    pub song_count: i64,
    pub duration_ms: i64,
    pub size: i64,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(flatten)]
    pub annotation: Annotation,
}

impl CatalogRecord for AlbumMetadata {
    const KIND: EntityKind = EntityKind::Album;

    fn from_row(row: &QueryRow) -> Result<Self> {
        Ok(Self {
            id: required_string(row, "id")?,
            name: required_string(row, "name")?,
            artist_id: optional_string(row, "artist_id")?,
            artist: optional_string(row, "artist")?,
            album_artist: optional_string(row, "album_artist")?,
            all_artist_ids: id_list(row, "all_artist_ids")?,
            min_year: optional_i32(row, "min_year")?,
            max_year: optional_i32(row, "max_year")?,
            genre: optional_string(row, "genre")?,
            song_count: required_i64(row, "song_count")?,
            duration_ms: required_i64(row, "duration_ms")?,
            size: required_i64(row, "size")?,
            created_at: required_i64(row, "created_at")?,
            updated_at: required_i64(row, "updated_at")?,
            annotation: Annotation::from_row(row)?,
        })
    }
}

/// Track (media file) listing row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFileMetadata {
    pub id: String,
    pub title: String,
    pub file_name: String,
    pub album_id: Option<String>,
    pub album: Option<String>,
    /// Primary track artist reference
    pub artist_id: Option<String>,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    /// Every artist credited on the track, sorted
    pub all_artist_ids: Vec<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub track_number: Option<i32>,
    pub duration_ms: i64,
    /// Bitrate in kbps
    pub bit_rate: Option<i32>,
    pub size: i64,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(flatten)]
    pub annotation: Annotation,
}

impl CatalogRecord for MediaFileMetadata {
    const KIND: EntityKind = EntityKind::MediaFile;

    fn from_row(row: &QueryRow) -> Result<Self> {
        Ok(Self {
            id: required_string(row, "id")?,
            title: required_string(row, "title")?,
            file_name: required_string(row, "file_name")?,
            album_id: optional_string(row, "album_id")?,
            album: optional_string(row, "album")?,
            artist_id: optional_string(row, "artist_id")?,
            artist: optional_string(row, "artist")?,
            album_artist: optional_string(row, "album_artist")?,
            all_artist_ids: id_list(row, "all_artist_ids")?,
            year: optional_i32(row, "year")?,
            genre: optional_string(row, "genre")?,
            track_number: optional_i32(row, "track_number")?,
            duration_ms: required_i64(row, "duration_ms")?,
            bit_rate: optional_i32(row, "bit_rate")?,
            size: required_i64(row, "size")?,
            created_at: required_i64(row, "created_at")?,
            updated_at: required_i64(row, "updated_at")?,
            annotation: Annotation::from_row(row)?,
        })
    }
}

// =============================================================================
// Facet Counts
// =============================================================================

/// Aggregate counts over one filtered set.
///
/// `starred <= total` and `recent_play <= total` always hold because all three
/// are computed from the same rows in the same statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCounts {
    pub total: u64,
    pub starred: u64,
    pub recent_play: u64,
}

impl FacetCounts {
    pub(crate) fn from_row(row: &QueryRow) -> Result<Self> {
        Ok(Self {
            total: count(row, "total")?,
            starred: count(row, "starred")?,
            recent_play: count(row, "recent_play")?,
        })
    }
}

// =============================================================================
// Row decoding helpers
// =============================================================================

fn column<'a>(row: &'a QueryRow, column: &str) -> Result<&'a QueryValue> {
    row.get(column)
        .ok_or_else(|| CatalogError::decode(column, "missing column in result set"))
}

fn required_string(row: &QueryRow, name: &str) -> Result<String> {
    column(row, name)?
        .as_string()
        .ok_or_else(|| CatalogError::decode(name, "expected text"))
}

fn optional_string(row: &QueryRow, name: &str) -> Result<Option<String>> {
    match column(row, name)? {
        QueryValue::Null => Ok(None),
        QueryValue::Text(value) => Ok(Some(value.clone())),
        _ => Err(CatalogError::decode(name, "expected text or null")),
    }
}

fn required_i64(row: &QueryRow, name: &str) -> Result<i64> {
    column(row, name)?
        .as_i64()
        .ok_or_else(|| CatalogError::decode(name, "expected integer"))
}

fn required_f64(row: &QueryRow, name: &str) -> Result<f64> {
    column(row, name)?
        .as_f64()
        .ok_or_else(|| CatalogError::decode(name, "expected number"))
}

fn optional_i64(row: &QueryRow, name: &str) -> Result<Option<i64>> {
    match column(row, name)? {
        QueryValue::Null => Ok(None),
        QueryValue::Integer(value) => Ok(Some(*value)),
        _ => Err(CatalogError::decode(name, "expected integer or null")),
    }
}

fn optional_i32(row: &QueryRow, name: &str) -> Result<Option<i32>> {
    optional_i64(row, name)?
        .map(|value| {
            i32::try_from(value)
                .map_err(|_| CatalogError::decode(name, format!("{value} out of range")))
        })
        .transpose()
}

fn required_bool(row: &QueryRow, name: &str) -> Result<bool> {
    column(row, name)?
        .as_bool()
        .ok_or_else(|| CatalogError::decode(name, "expected boolean flag"))
}

fn count(row: &QueryRow, name: &str) -> Result<u64> {
    let value = required_i64(row, name)?;
    u64::try_from(value).map_err(|_| CatalogError::decode(name, "negative count"))
}

/// Associated ids arrive as a JSON array projected by the store.
fn id_list(row: &QueryRow, name: &str) -> Result<Vec<String>> {
    match column(row, name)? {
        QueryValue::Null => Ok(Vec::new()),
        QueryValue::Text(raw) => {
            let mut ids: Vec<String> = serde_json::from_str(raw)
                .map_err(|e| CatalogError::decode(name, e.to_string()))?;
            ids.sort();
            Ok(ids)
        }
        _ => Err(CatalogError::decode(name, "expected JSON array text")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation_columns(row: &mut QueryRow) {
        row.insert("play_count".into(), QueryValue::Integer(3));
        row.insert("play_date".into(), QueryValue::Integer(1_700_000_000));
        row.insert("rating".into(), QueryValue::Integer(4));
        row.insert("starred".into(), QueryValue::Integer(1));
        row.insert("starred_at".into(), QueryValue::Null);
    }

    fn artist_row() -> QueryRow {
        let mut row = QueryRow::new();
        row.insert("id".into(), QueryValue::Text("ar-1".into()));
        row.insert("name".into(), QueryValue::Text("Nina".into()));
        row.insert("genre".into(), QueryValue::Null);
        row.insert("album_count".into(), QueryValue::Integer(2));
        row.insert("song_count".into(), QueryValue::Integer(20));
        row.insert("size".into(), QueryValue::Integer(1024));
        row.insert("created_at".into(), QueryValue::Integer(1));
        row.insert("updated_at".into(), QueryValue::Integer(2));
        annotation_columns(&mut row);
        row
    }

    #[test]
    fn entity_kind_tags() {
        assert_eq!(EntityKind::MediaFile.item_type(), "media");
        assert_eq!(EntityKind::Album.collection(), "albums");
        assert_eq!(EntityKind::Artist.to_string(), "artist");
    }

    #[test]
    fn default_annotation_is_unplayed_and_unstarred() {
        let annotation = Annotation::default();
        assert_eq!(annotation.play_count, 0);
        assert_eq!(annotation.rating, 0.0);
        assert!(!annotation.starred);
        assert!(annotation.play_date.is_none());
        assert!(annotation.played_at().is_none());
    }

    #[test]
    fn decodes_artist_row_with_annotation() {
        let artist = ArtistMetadata::from_row(&artist_row()).unwrap();
        assert_eq!(artist.id, "ar-1");
        assert_eq!(artist.annotation.play_count, 3);
        assert!(artist.annotation.starred);
        assert_eq!(
            artist.annotation.played_at().map(|at| at.timestamp()),
            Some(1_700_000_000)
        );
    }

    #[test]
    fn decodes_fractional_and_integer_ratings() {
        let mut row = artist_row();
        assert_eq!(ArtistMetadata::from_row(&row).unwrap().annotation.rating, 4.0);

        row.insert("rating".into(), QueryValue::Real(3.5));
        assert_eq!(ArtistMetadata::from_row(&row).unwrap().annotation.rating, 3.5);

        row.insert("rating".into(), QueryValue::Text("great".into()));
        let err = ArtistMetadata::from_row(&row).unwrap_err();
        assert!(matches!(err, CatalogError::Decode { ref column, .. } if column == "rating"));
    }

    #[test]
    fn missing_column_is_decode_error() {
        let mut row = artist_row();
        row.remove("name");
        let err = ArtistMetadata::from_row(&row).unwrap_err();
        assert!(err.is_decode_failure());
    }

    #[test]
    fn wrong_type_is_decode_error() {
        let mut row = artist_row();
        row.insert("play_count".into(), QueryValue::Text("many".into()));
        let err = ArtistMetadata::from_row(&row).unwrap_err();
        assert!(matches!(err, CatalogError::Decode { ref column, .. } if column == "play_count"));
    }

    #[test]
    fn id_list_is_sorted_and_null_is_empty() {
        let mut row = QueryRow::new();
        row.insert("ids".into(), QueryValue::Text(r#"["b","a"]"#.into()));
        assert_eq!(id_list(&row, "ids").unwrap(), vec!["a", "b"]);

        row.insert("ids".into(), QueryValue::Null);
        assert!(id_list(&row, "ids").unwrap().is_empty());

        row.insert("ids".into(), QueryValue::Text("not json".into()));
        assert!(id_list(&row, "ids").unwrap_err().is_decode_failure());
    }

    #[test]
    fn facet_counts_reject_negative_values() {
        let mut row = QueryRow::new();
        row.insert("total".into(), QueryValue::Integer(10));
        row.insert("starred".into(), QueryValue::Integer(3));
        row.insert("recent_play".into(), QueryValue::Integer(4));
        let counts = FacetCounts::from_row(&row).unwrap();
        assert_eq!(
            counts,
            FacetCounts {
                total: 10,
                starred: 3,
                recent_play: 4
            }
        );

        row.insert("starred".into(), QueryValue::Integer(-1));
        assert!(FacetCounts::from_row(&row).is_err());
    }

    #[test]
    fn records_serialize_flat() {
        let artist = ArtistMetadata::from_row(&artist_row()).unwrap();
        let json = serde_json::to_value(&artist).unwrap();
        assert_eq!(json["play_count"], 3);
        assert_eq!(json["starred"], true);
        assert!(json.get("annotation").is_none());
    }
}
