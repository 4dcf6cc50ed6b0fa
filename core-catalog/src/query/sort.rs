//! Sort resolution.
//!
//! A requested sort key is mapped through the kind's allow-list to a physical
//! field; unknown keys fall back to the kind's default. Every ordering ends
//! with the entity id ascending so ties are broken the same way on every call.
//!
//! Sorting by a play-history field also narrows the result set: never-played
//! items are excluded instead of being ordered last.

use crate::models::EntityKind;
use crate::query::filter::{Comparison, Predicate};
use crate::query::params::{FilterParams, ParamKey};
use crate::query::profile::{DefaultSort, KindProfile, ID_FIELD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// `desc` (any case) sorts descending; anything else ascending
    pub fn from_order(order: Option<&str>) -> Self {
        match order {
            Some(order) if order.eq_ignore_ascii_case("desc") => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// Two-level ordering: requested field, then id ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ordering keys in application order, tie-break included
    pub fn keys(&self) -> [(&'static str, SortDirection); 2] {
        [
            (self.field, self.direction),
            (ID_FIELD, SortDirection::Ascending),
        ]
    }
}

/// Resolved ordering plus the result-set restriction it implies.
#[derive(Debug, Clone, PartialEq)]
pub struct SortPlan {
    pub spec: SortSpec,
    /// Applied before sorting when the field tracks play history
    pub played_only: Option<Predicate>,
}

pub struct SortResolver;

impl SortResolver {
    /// Map a requested key to an allow-listed physical field.
    pub fn resolve(kind: EntityKind, requested: Option<&str>, params: &FilterParams) -> &'static str {
        let profile = kind.profile();
        requested
            .and_then(|key| profile.sort_field(key))
            .unwrap_or_else(|| default_field(profile, params))
    }

    pub fn plan(
        kind: EntityKind,
        requested: Option<&str>,
        order: Option<&str>,
        params: &FilterParams,
    ) -> SortPlan {
        let profile = kind.profile();
        let field = Self::resolve(kind, requested, params);
        let played_only = profile
            .is_played_sort(field)
            .then(|| played_predicate(profile));

        SortPlan {
            spec: SortSpec {
                field,
                direction: SortDirection::from_order(order),
            },
            played_only,
        }
    }
}

fn default_field(profile: &KindProfile, params: &FilterParams) -> &'static str {
    match profile.default_sort {
        DefaultSort::Id => ID_FIELD,
        DefaultSort::FileNameWithinAlbum if params.get(ParamKey::AlbumId).is_some() => "file_name",
        DefaultSort::FileNameWithinAlbum => ID_FIELD,
    }
}

fn played_predicate(profile: &KindProfile) -> Predicate {
    let played = Predicate::Compare {
        field: "play_count",
        op: Comparison::Gt,
        value: 0,
    };
    if profile.played_sort.require_play_date {
        Predicate::All(vec![played, Predicate::NotNull { field: "play_date" }])
    } else {
        played
    }
}
