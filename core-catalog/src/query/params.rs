//! Request parameters as they arrive from the request layer.
//!
//! Everything is an optional string. Parsing never fails: a value that does
//! not parse is treated exactly like an absent value.

use serde::{Deserialize, Serialize};

/// Names of the optional filter parameters a profile may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKey {
    ArtistId,
    AlbumId,
    Year,
    MinYear,
    MaxYear,
}

/// Kind-agnostic filter parameters.
///
/// Each kind's profile decides which of these it honors; the rest are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub search: Option<String>,
    pub starred: Option<String>,
    pub artist_id: Option<String>,
    pub album_id: Option<String>,
    pub year: Option<String>,
    pub min_year: Option<String>,
    pub max_year: Option<String>,
}

impl FilterParams {
    /// Search term, if present and non-empty
    pub fn search(&self) -> Option<&str> {
        non_empty(&self.search)
    }

    /// Parsed starred flag; unparsable means "no constraint"
    pub fn starred(&self) -> Option<bool> {
        non_empty(&self.starred).and_then(parse_bool)
    }

    /// Raw value of a profile-selected parameter, if present and non-empty
    pub fn get(&self, key: ParamKey) -> Option<&str> {
        let value = match key {
            ParamKey::ArtistId => &self.artist_id,
            ParamKey::AlbumId => &self.album_id,
            ParamKey::Year => &self.year,
            ParamKey::MinYear => &self.min_year,
            ParamKey::MaxYear => &self.max_year,
        };
        non_empty(value)
    }

    /// Parsed integer value of a parameter; unparsable means absent
    pub fn get_int(&self, key: ParamKey) -> Option<i64> {
        self.get(key).and_then(parse_int)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Parse a boolean the way the request layer's clients send it.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parse a signed decimal integer without trimming.
pub fn parse_int(value: &str) -> Option<i64> {
    value.parse().ok()
}

// =============================================================================
// Typed per-kind requests
// =============================================================================

/// Filters accepted when listing artists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistFilter {
    pub search: Option<String>,
    pub starred: Option<String>,
}

/// Filters accepted when listing albums.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlbumFilter {
    pub search: Option<String>,
    pub starred: Option<String>,
    pub artist_id: Option<String>,
    pub min_year: Option<String>,
    pub max_year: Option<String>,
}

/// Filters accepted when listing tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaFileFilter {
    pub search: Option<String>,
    pub starred: Option<String>,
    pub album_id: Option<String>,
    pub artist_id: Option<String>,
    pub year: Option<String>,
}

impl From<&ArtistFilter> for FilterParams {
    fn from(filter: &ArtistFilter) -> Self {
        Self {
            search: filter.search.clone(),
            starred: filter.starred.clone(),
            ..Self::default()
        }
    }
}

impl From<&AlbumFilter> for FilterParams {
    fn from(filter: &AlbumFilter) -> Self {
        Self {
            search: filter.search.clone(),
            starred: filter.starred.clone(),
            artist_id: filter.artist_id.clone(),
            min_year: filter.min_year.clone(),
            max_year: filter.max_year.clone(),
            ..Self::default()
        }
    }
}

impl From<&MediaFileFilter> for FilterParams {
    fn from(filter: &MediaFileFilter) -> Self {
        Self {
            search: filter.search.clone(),
            starred: filter.starred.clone(),
            artist_id: filter.artist_id.clone(),
            album_id: filter.album_id.clone(),
            year: filter.year.clone(),
            ..Self::default()
        }
    }
}

/// A listing request: page window, ordering and kind-specific filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "F: Deserialize<'de> + Default"))]
pub struct ListRequest<F> {
    pub start: Option<String>,
    pub end: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    #[serde(flatten)]
    pub filter: F,
}

impl<F> ListRequest<F> {
    pub fn new(filter: F) -> Self {
        Self {
            start: None,
            end: None,
            sort: None,
            order: None,
            filter,
        }
    }

    /// Request the `[start, end)` window
    pub fn range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self.end = Some(end.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<String>, order: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self.order = Some(order.into());
        self
    }
}

/// Kind-agnostic listing query handed to the executor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemsQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub params: FilterParams,
}

impl<F> From<&ListRequest<F>> for ItemsQuery
where
    for<'a> FilterParams: From<&'a F>,
{
    fn from(request: &ListRequest<F>) -> Self {
        Self {
            start: request.start.clone(),
            end: request.end.clone(),
            sort: request.sort.clone(),
            order: request.order.clone(),
            params: FilterParams::from(&request.filter),
        }
    }
}
