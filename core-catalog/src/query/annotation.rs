//! Left-outer join of entities with their annotation row.
//!
//! Annotation fields are flattened onto the entity and defaulted when no row
//! exists, so filters and sorts see `starred = 0` rather than a missing value
//! for never-touched items.

use crate::models::EntityKind;

/// Collection holding per-item annotation rows
pub const ANNOTATION_COLLECTION: &str = "annotations";

/// Collection holding the multi-valued artist linkage
pub const LINKED_ARTIST_COLLECTION: &str = "item_artists";

/// One annotation field copied onto the joined row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenedField {
    pub name: &'static str,
    /// Value materialized when the entity has no annotation; `None` keeps null
    pub default: Option<i64>,
}

/// Annotation fields in projection order.
pub const FLATTENED_FIELDS: [FlattenedField; 5] = [
    FlattenedField {
        name: "play_count",
        default: Some(0),
    },
    FlattenedField {
        name: "play_date",
        default: None,
    },
    FlattenedField {
        name: "rating",
        default: Some(0),
    },
    FlattenedField {
        name: "starred",
        default: Some(0),
    },
    FlattenedField {
        name: "starred_at",
        default: None,
    },
];

/// Join stage description for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationJoin {
    pub kind: EntityKind,
    /// Entity collection
    pub collection: &'static str,
    /// Join key tag matched against `annotations.item_type`
    pub item_type: &'static str,
    /// Also project the associated artist ids
    pub linked_artists: bool,
}

impl AnnotationJoin {
    pub fn fields(&self) -> &'static [FlattenedField] {
        &FLATTENED_FIELDS
    }
}

pub struct AnnotationJoiner;

impl AnnotationJoiner {
    pub fn join(kind: EntityKind) -> AnnotationJoin {
        AnnotationJoin {
            kind,
            collection: kind.collection(),
            item_type: kind.item_type(),
            linked_artists: kind.profile().linked_artists,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Annotation;
    use bridge_traits::database::{QueryRow, QueryValue};

    #[test]
    fn join_keys_follow_entity_kind() {
        let join = AnnotationJoiner::join(EntityKind::MediaFile);
        assert_eq!(join.collection, "media_files");
        assert_eq!(join.item_type, "media");
        assert!(join.linked_artists);

        let join = AnnotationJoiner::join(EntityKind::Artist);
        assert_eq!(join.item_type, "artist");
        assert!(!join.linked_artists);
    }

    #[test]
    fn defaults_materialize_the_empty_annotation() {
        let row: QueryRow = FLATTENED_FIELDS
            .iter()
            .map(|field| {
                let value = field.default.map_or(QueryValue::Null, QueryValue::Integer);
                (field.name.to_string(), value)
            })
            .collect();

        assert_eq!(Annotation::from_row(&row).unwrap(), Annotation::default());
    }
}
