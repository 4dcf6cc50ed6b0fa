//! Filter construction.
//!
//! Turns loosely typed request parameters into a conjunction of predicates.
//! Malformed optional parameters contribute no clause; an empty filter
//! matches everything.

use crate::models::EntityKind;
use crate::query::params::FilterParams;
use crate::query::profile::{KindProfile, ValueType, YearRangeFilter};
use bridge_traits::database::QueryValue;

/// Numeric comparison operators used by range and played filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Gt,
    Gte,
    Lte,
}

impl Comparison {
    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Gt => ">",
            Comparison::Gte => ">=",
            Comparison::Lte => "<=",
        }
    }
}

/// A single boolean condition over the joined, flattened row.
///
/// Field names are `'static` because they only ever come from profile tables.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring match
    Contains {
        field: &'static str,
        needle: String,
    },
    Equals {
        field: &'static str,
        value: QueryValue,
    },
    Compare {
        field: &'static str,
        op: Comparison,
        value: i64,
    },
    NotNull {
        field: &'static str,
    },
    /// The artist appears among the row's associated artist ids
    LinkedArtist {
        item_type: &'static str,
        artist_id: String,
    },
    Any(Vec<Predicate>),
    All(Vec<Predicate>),
}

/// Conjunction of predicates built for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Predicate>,
}

impl Filter {
    pub fn new(clauses: Vec<Predicate>) -> Self {
        Self { clauses }
    }

    pub fn clauses(&self) -> &[Predicate] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Builds the base filter for a kind from request parameters.
pub struct FilterBuilder;

impl FilterBuilder {
    pub fn build(kind: EntityKind, params: &FilterParams) -> Filter {
        let profile = kind.profile();
        let mut clauses = Vec::new();

        if let Some(clause) = associative_clause(profile, params) {
            clauses.push(clause);
        }

        for exact in profile.exact_filters {
            let value = match exact.value {
                ValueType::Text => params.get(exact.param).map(QueryValue::from),
                ValueType::Integer => params.get_int(exact.param).map(QueryValue::Integer),
            };
            if let Some(value) = value {
                clauses.push(Predicate::Equals {
                    field: exact.field,
                    value,
                });
            }
        }

        if let Some(clause) = profile
            .year_range
            .and_then(|range| year_overlap_clause(&range, params))
        {
            clauses.push(clause);
        }

        if let Some(search) = params.search() {
            clauses.push(Predicate::Any(
                profile
                    .search_fields
                    .iter()
                    .map(|&field| Predicate::Contains {
                        field,
                        needle: search.to_string(),
                    })
                    .collect(),
            ));
        }

        if let Some(starred) = params.starred() {
            clauses.push(Predicate::Equals {
                field: "starred",
                value: QueryValue::from(starred),
            });
        }

        Filter::new(clauses)
    }
}

fn associative_clause(profile: &KindProfile, params: &FilterParams) -> Option<Predicate> {
    let associative = profile.associative?;
    let artist_id = params.get(associative.param)?;
    Some(Predicate::Any(vec![
        Predicate::Equals {
            field: associative.field,
            value: QueryValue::from(artist_id),
        },
        Predicate::LinkedArtist {
            item_type: profile.kind.item_type(),
            artist_id: artist_id.to_string(),
        },
    ]))
}

/// Matches when either end of the entity's own span falls inside the
/// requested window. Partial overlaps are admitted.
fn year_overlap_clause(range: &YearRangeFilter, params: &FilterParams) -> Option<Predicate> {
    let lower = params.get_int(range.lower_param);
    let upper = params.get_int(range.upper_param);
    if lower.is_none() && upper.is_none() {
        return None;
    }

    let window = |field: &'static str| {
        let mut bounds = Vec::with_capacity(2);
        if let Some(value) = lower {
            bounds.push(Predicate::Compare {
                field,
                op: Comparison::Gte,
                value,
            });
        }
        if let Some(value) = upper {
            bounds.push(Predicate::Compare {
                field,
                op: Comparison::Lte,
                value,
            });
        }
        Predicate::All(bounds)
    };

    Some(Predicate::Any(vec![
        window(range.lower_field),
        window(range.upper_field),
    ]))
}
