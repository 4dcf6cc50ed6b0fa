//! Query pipeline assembly and compilation.
//!
//! A [`Pipeline`] is an ordered list of tagged stages. Compiling it yields a
//! single parameterized SQLite statement: the annotation join becomes a derived
//! table aliased `c`, filters become the `WHERE` clause, and the tail stages
//! become `ORDER BY`/`LIMIT`/`OFFSET` or a facet projection.
//!
//! Request values only ever travel as bound parameters. Field names come from
//! the static profile tables.

use crate::error::{CatalogError, Result};
use crate::models::EntityKind;
use crate::query::annotation::{
    AnnotationJoin, AnnotationJoiner, ANNOTATION_COLLECTION, LINKED_ARTIST_COLLECTION,
};
use crate::query::facet::{FacetCounter, FacetSpec};
use crate::query::filter::{Filter, FilterBuilder, Predicate};
use crate::query::pagination::Paginator;
use crate::query::params::{FilterParams, ItemsQuery};
use crate::query::profile::ID_FIELD;
use crate::query::sort::{SortResolver, SortSpec};
use bridge_traits::database::QueryValue;

/// One step of a catalog query.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Join(AnnotationJoin),
    Filter(Filter),
    /// Restriction implied by the chosen sort
    ConditionalFilter(Predicate),
    Sort(SortSpec),
    Skip(u64),
    Limit(u64),
    Facet(FacetSpec),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Join(_) => "join",
            Stage::Filter(_) => "filter",
            Stage::ConditionalFilter(_) => "conditional_filter",
            Stage::Sort(_) => "sort",
            Stage::Skip(_) => "skip",
            Stage::Limit(_) => "limit",
            Stage::Facet(_) => "facet",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Stage::Join(_) => 0,
            Stage::Filter(_) => 1,
            Stage::ConditionalFilter(_) => 2,
            Stage::Sort(_) => 3,
            Stage::Skip(_) => 4,
            Stage::Limit(_) => 5,
            Stage::Facet(_) => 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    kind: EntityKind,
    stages: Vec<Stage>,
}

/// SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<QueryValue>,
}

impl Pipeline {
    pub fn new(kind: EntityKind, stages: Vec<Stage>) -> Self {
        Self { kind, stages }
    }

    /// Listing pipeline: join, filter, optional played restriction, sort and
    /// optional window.
    pub fn items(kind: EntityKind, query: &ItemsQuery) -> Self {
        let mut stages = vec![
            Stage::Join(AnnotationJoiner::join(kind)),
            Stage::Filter(FilterBuilder::build(kind, &query.params)),
        ];

        let plan = SortResolver::plan(
            kind,
            query.sort.as_deref(),
            query.order.as_deref(),
            &query.params,
        );
        if let Some(predicate) = plan.played_only {
            stages.push(Stage::ConditionalFilter(predicate));
        }
        stages.push(Stage::Sort(plan.spec));

        if let Some(window) = Paginator::resolve(query.start.as_deref(), query.end.as_deref()) {
            if let Some(skip) = window.skip_stage() {
                stages.push(Stage::Skip(skip));
            }
            stages.push(Stage::Limit(window.limit));
        }

        Self::new(kind, stages)
    }

    /// Facet pipeline over the same base filter as a listing.
    pub fn facets(kind: EntityKind, params: &FilterParams) -> Self {
        Self::new(
            kind,
            vec![
                Stage::Join(AnnotationJoiner::join(kind)),
                Stage::Filter(FilterBuilder::build(kind, params)),
                Stage::Facet(FacetCounter::spec()),
            ],
        )
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Check stage ordering: exactly one leading join, each later stage at
    /// most once and in canonical order, facets never combined with ordering
    /// or windowing.
    pub fn validate(&self) -> Result<()> {
        match self.stages.first() {
            Some(Stage::Join(join)) if join.kind == self.kind => {}
            Some(Stage::Join(join)) => {
                return Err(CatalogError::MalformedQuery(format!(
                    "join targets {} but pipeline lists {}",
                    join.kind, self.kind
                )))
            }
            Some(other) => {
                return Err(CatalogError::MalformedQuery(format!(
                    "pipeline must start with join, found {}",
                    other.name()
                )))
            }
            None => return Err(CatalogError::MalformedQuery("empty pipeline".to_string())),
        }

        for pair in self.stages.windows(2) {
            if pair[1].rank() <= pair[0].rank() {
                return Err(CatalogError::MalformedQuery(format!(
                    "{} stage cannot follow {}",
                    pair[1].name(),
                    pair[0].name()
                )));
            }
        }

        let has_facet = self.stages.iter().any(|s| matches!(s, Stage::Facet(_)));
        let has_window = self
            .stages
            .iter()
            .any(|s| matches!(s, Stage::Sort(_) | Stage::Skip(_) | Stage::Limit(_)));
        if has_facet && has_window {
            return Err(CatalogError::MalformedQuery(
                "facet stage cannot be combined with sort or pagination".to_string(),
            ));
        }

        Ok(())
    }

    /// Render the pipeline as one statement.
    pub fn compile(&self) -> Result<CompiledQuery> {
        self.validate()?;

        let mut join = None;
        let mut predicates: Vec<&Predicate> = Vec::new();
        let mut sort = None;
        let mut skip = None;
        let mut limit = None;
        let mut facet = None;

        for stage in &self.stages {
            match stage {
                Stage::Join(j) => join = Some(j),
                Stage::Filter(filter) => predicates.extend(filter.clauses()),
                Stage::ConditionalFilter(predicate) => predicates.push(predicate),
                Stage::Sort(spec) => sort = Some(spec),
                Stage::Skip(n) => skip = Some(*n),
                Stage::Limit(n) => limit = Some(*n),
                Stage::Facet(spec) => facet = Some(spec),
            }
        }

        let join = join.ok_or_else(|| CatalogError::MalformedQuery("missing join".to_string()))?;
        let mut writer = SqlWriter::default();

        match facet {
            Some(spec) => writer.facet_projection(spec),
            None => writer.push("SELECT c.*"),
        }
        writer.push(" FROM (");
        writer.join(join);
        writer.push(") AS c");

        if !predicates.is_empty() {
            writer.push(" WHERE ");
            for (index, predicate) in predicates.iter().enumerate() {
                if index > 0 {
                    writer.push(" AND ");
                }
                writer.predicate(predicate);
            }
        }

        if let Some(spec) = sort {
            writer.push(" ORDER BY ");
            for (index, (field, direction)) in spec.keys().iter().enumerate() {
                if index > 0 {
                    writer.push(", ");
                }
                writer.column(field);
                writer.push(" ");
                writer.push(direction.as_sql());
            }
        }

        match (limit, skip) {
            (Some(limit), skip) => {
                writer.push(" LIMIT ");
                writer.bind(count_param(limit)?);
                if let Some(skip) = skip {
                    writer.push(" OFFSET ");
                    writer.bind(count_param(skip)?);
                }
            }
            (None, Some(skip)) => {
                writer.push(" LIMIT -1 OFFSET ");
                writer.bind(count_param(skip)?);
            }
            (None, None) => {}
        }

        Ok(writer.finish())
    }
}

fn count_param(value: u64) -> Result<QueryValue> {
    i64::try_from(value)
        .map(QueryValue::Integer)
        .map_err(|_| CatalogError::MalformedQuery(format!("window bound {} out of range", value)))
}

/// Case-insensitive `REGEXP` pattern matching the needle literally.
///
/// `(?i)` folds Unicode case, so `björk` finds `BJÖRK LIVE`.
fn search_pattern(needle: &str) -> String {
    format!("(?i){}", regex::escape(needle))
}

/// Appends SQL and parameters together so placeholders stay in textual order.
#[derive(Default)]
struct SqlWriter {
    sql: String,
    params: Vec<QueryValue>,
}

impl SqlWriter {
    fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    fn bind(&mut self, value: QueryValue) {
        self.sql.push('?');
        self.params.push(value);
    }

    fn column(&mut self, field: &'static str) {
        self.sql.push_str("c.");
        self.sql.push_str(field);
    }

    fn join(&mut self, join: &AnnotationJoin) {
        self.push("SELECT e.*");
        for field in join.fields() {
            match field.default {
                Some(default) => self.push(&format!(
                    ", COALESCE(an.{name}, {default}) AS {name}",
                    name = field.name
                )),
                None => self.push(&format!(", an.{name} AS {name}", name = field.name)),
            }
        }
        if join.linked_artists {
            self.push(&format!(
                ", (SELECT json_group_array(ia.artist_id) FROM {LINKED_ARTIST_COLLECTION} ia \
                 WHERE ia.item_id = e.id AND ia.item_type = "
            ));
            self.bind(QueryValue::from(join.item_type));
            self.push(") AS all_artist_ids");
        }
        self.push(&format!(
            " FROM {} e LEFT JOIN {ANNOTATION_COLLECTION} an ON an.item_id = e.id AND an.item_type = ",
            join.collection
        ));
        self.bind(QueryValue::from(join.item_type));
    }

    fn predicate(&mut self, predicate: &Predicate) {
        match predicate {
            Predicate::Contains { field, needle } => {
                self.column(field);
                self.push(" REGEXP ");
                self.bind(QueryValue::Text(search_pattern(needle)));
            }
            Predicate::Equals { field, value } => {
                self.column(field);
                self.push(" = ");
                self.bind(value.clone());
            }
            Predicate::Compare { field, op, value } => {
                self.column(field);
                self.push(" ");
                self.push(op.as_sql());
                self.push(" ");
                self.bind(QueryValue::Integer(*value));
            }
            Predicate::NotNull { field } => {
                self.column(field);
                self.push(" IS NOT NULL");
            }
            Predicate::LinkedArtist {
                item_type,
                artist_id,
            } => {
                self.push(&format!(
                    "EXISTS (SELECT 1 FROM {LINKED_ARTIST_COLLECTION} ia WHERE ia.item_id = c.{ID_FIELD} AND ia.item_type = "
                ));
                self.bind(QueryValue::from(*item_type));
                self.push(" AND ia.artist_id = ");
                self.bind(QueryValue::from(artist_id.as_str()));
                self.push(")");
            }
            Predicate::Any(alternatives) => self.group(alternatives, " OR ", "0"),
            Predicate::All(conditions) => self.group(conditions, " AND ", "1"),
        }
    }

    fn group(&mut self, members: &[Predicate], separator: &str, empty: &str) {
        if members.is_empty() {
            self.push(empty);
            return;
        }
        self.push("(");
        for (index, member) in members.iter().enumerate() {
            if index > 0 {
                self.push(separator);
            }
            self.predicate(member);
        }
        self.push(")");
    }

    fn facet_projection(&mut self, spec: &FacetSpec) {
        self.push("SELECT ");
        for (index, branch) in spec.branches.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            match &branch.predicate {
                None => self.push("COUNT(*)"),
                Some(predicate) => {
                    self.push("COALESCE(SUM(CASE WHEN ");
                    self.predicate(predicate);
                    self.push(" THEN 1 ELSE 0 END), 0)");
                }
            }
            self.push(" AS ");
            self.push(branch.name);
        }
    }

    fn finish(self) -> CompiledQuery {
        CompiledQuery {
            sql: self.sql,
            params: self.params,
        }
    }
}
