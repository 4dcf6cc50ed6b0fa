//! Per-kind query configuration tables.
//!
//! Every field name that can end up in a compiled statement comes from these
//! tables. Request input only ever selects an entry; it is never spliced into
//! SQL.

use crate::models::EntityKind;
use crate::query::params::ParamKey;

/// Unique identifier column shared by all kinds; the mandatory tie-break.
pub const ID_FIELD: &str = "id";

/// Fallback ordering when the requested sort key is not allow-listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultSort {
    /// Order by entity id
    Id,
    /// Order by `file_name` while a single album is being viewed, else by id
    FileNameWithinAlbum,
}

/// Sort keys that also restrict the result set to played items.
#[derive(Debug, Clone, Copy)]
pub struct PlayedSortRule {
    /// Physical fields that trigger the restriction
    pub fields: &'static [&'static str],
    /// Also require a recorded `play_date`
    pub require_play_date: bool,
}

/// Artist linkage: direct foreign key OR membership in the associated ids.
#[derive(Debug, Clone, Copy)]
pub struct AssociativeFilter {
    pub param: ParamKey,
    pub field: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Integer,
}

/// Equality on a parsed parameter.
#[derive(Debug, Clone, Copy)]
pub struct ExactFilter {
    pub param: ParamKey,
    pub field: &'static str,
    pub value: ValueType,
}

/// Overlap test between a requested year window and the entity's own span.
#[derive(Debug, Clone, Copy)]
pub struct YearRangeFilter {
    pub lower_param: ParamKey,
    pub upper_param: ParamKey,
    pub lower_field: &'static str,
    pub upper_field: &'static str,
}

/// Static configuration for one entity kind.
#[derive(Debug)]
pub struct KindProfile {
    pub kind: EntityKind,
    /// Name-like fields searched case-insensitively, OR'd together
    pub search_fields: &'static [&'static str],
    /// Logical sort key to physical field
    pub sort_fields: &'static [(&'static str, &'static str)],
    pub default_sort: DefaultSort,
    pub played_sort: PlayedSortRule,
    pub associative: Option<AssociativeFilter>,
    pub exact_filters: &'static [ExactFilter],
    pub year_range: Option<YearRangeFilter>,
    /// Project the associated artist ids into each row
    pub linked_artists: bool,
    /// Accept an allow-listed physical field name as a sort key
    pub physical_sort_keys: bool,
}

impl KindProfile {
    /// Look up a physical sort field.
    ///
    /// Matches logical keys case-insensitively, then, for kinds with
    /// `physical_sort_keys`, a key that already names an allow-listed
    /// physical field.
    pub fn sort_field(&self, key: &str) -> Option<&'static str> {
        let key = key.to_ascii_lowercase();
        self.sort_fields
            .iter()
            .find(|(logical, _)| *logical == key)
            .or_else(|| {
                if !self.physical_sort_keys {
                    return None;
                }
                self.sort_fields.iter().find(|(_, physical)| *physical == key)
            })
            .map(|(_, physical)| *physical)
    }

    pub fn is_played_sort(&self, field: &str) -> bool {
        self.played_sort.fields.contains(&field)
    }
}

static ARTIST: KindProfile = KindProfile {
    kind: EntityKind::Artist,
    search_fields: &["name"],
    sort_fields: &[
        ("name", "order_artist_name"),
        ("genre", "genre"),
        ("album_count", "album_count"),
        ("song_count", "song_count"),
        ("size", "size"),
        ("rating", "rating"),
        ("starred_at", "starred_at"),
        ("play_count", "play_count"),
        ("play_date", "play_date"),
        ("created_at", "created_at"),
        ("updated_at", "updated_at"),
    ],
    default_sort: DefaultSort::Id,
    played_sort: PlayedSortRule {
        fields: &["play_count", "play_date"],
        require_play_date: true,
    },
    associative: None,
    exact_filters: &[],
    year_range: None,
    linked_artists: false,
    physical_sort_keys: true,
};

static ALBUM: KindProfile = KindProfile {
    kind: EntityKind::Album,
    search_fields: &["name", "artist", "album_artist"],
    sort_fields: &[
        ("name", "order_album_name"),
        ("artist", "artist"),
        ("album_artist", "album_artist"),
        ("min_year", "min_year"),
        ("max_year", "max_year"),
        ("rating", "rating"),
        ("starred_at", "starred_at"),
        ("genre", "genre"),
        ("song_count", "song_count"),
        ("duration", "duration_ms"),
        ("size", "size"),
        ("play_count", "play_count"),
        ("play_date", "play_date"),
        ("created_at", "created_at"),
        ("updated_at", "updated_at"),
    ],
    default_sort: DefaultSort::Id,
    played_sort: PlayedSortRule {
        fields: &["play_count", "play_date"],
        require_play_date: true,
    },
    associative: Some(AssociativeFilter {
        param: ParamKey::ArtistId,
        field: "artist_id",
    }),
    exact_filters: &[],
    year_range: Some(YearRangeFilter {
        lower_param: ParamKey::MinYear,
        upper_param: ParamKey::MaxYear,
        lower_field: "min_year",
        upper_field: "max_year",
    }),
    linked_artists: true,
    physical_sort_keys: true,
};

static MEDIA_FILE: KindProfile = KindProfile {
    kind: EntityKind::MediaFile,
    search_fields: &["title", "artist", "album"],
    sort_fields: &[
        ("title", "order_title"),
        ("album", "order_album_name"),
        ("artist", "order_artist_name"),
        ("album_artist", "order_album_artist_name"),
        ("year", "year"),
        ("rating", "rating"),
        ("starred_at", "starred_at"),
        ("genre", "genre"),
        ("play_count", "play_count"),
        ("play_date", "play_date"),
        ("duration", "duration_ms"),
        ("bit_rate", "bit_rate"),
        ("size", "size"),
        ("created_at", "created_at"),
        ("updated_at", "updated_at"),
    ],
    default_sort: DefaultSort::FileNameWithinAlbum,
    played_sort: PlayedSortRule {
        fields: &["play_date"],
        require_play_date: false,
    },
    associative: Some(AssociativeFilter {
        param: ParamKey::ArtistId,
        field: "artist_id",
    }),
    exact_filters: &[
        ExactFilter {
            param: ParamKey::AlbumId,
            field: "album_id",
            value: ValueType::Text,
        },
        ExactFilter {
            param: ParamKey::Year,
            field: "year",
            value: ValueType::Integer,
        },
    ],
    year_range: None,
    linked_artists: true,
    physical_sort_keys: false,
};

impl EntityKind {
    /// Configuration table for this kind
    pub fn profile(&self) -> &'static KindProfile {
        match self {
            EntityKind::Artist => &ARTIST,
            EntityKind::Album => &ALBUM,
            EntityKind::MediaFile => &MEDIA_FILE,
        }
    }
}
