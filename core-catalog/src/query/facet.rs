//! Aggregate counts over the base-filtered set.
//!
//! All branches are evaluated over the same joined and filtered rows in one
//! statement, which keeps `starred <= total` and `recent_play <= total`.

use crate::query::filter::{Comparison, Predicate};
use bridge_traits::database::QueryValue;

/// One named count; `None` counts every row.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetBranch {
    pub name: &'static str,
    pub predicate: Option<Predicate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacetSpec {
    pub branches: Vec<FacetBranch>,
}

pub struct FacetCounter;

impl FacetCounter {
    /// The `{total, starred, recent_play}` facet set
    pub fn spec() -> FacetSpec {
        FacetSpec {
            branches: vec![
                FacetBranch {
                    name: "total",
                    predicate: None,
                },
                FacetBranch {
                    name: "starred",
                    predicate: Some(Predicate::Equals {
                        field: "starred",
                        value: QueryValue::from(true),
                    }),
                },
                FacetBranch {
                    name: "recent_play",
                    predicate: Some(Predicate::Compare {
                        field: "play_count",
                        op: Comparison::Gt,
                        value: 0,
                    }),
                },
            ],
        }
    }
}
