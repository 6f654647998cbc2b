//! The evaluable list: static definition plus per-instance additions.
//!
//! Evaluation renders one statement of the shape
//!
//! ```text
//! SELECT *, count(*) OVER() AS total_row_count FROM (
//!   SELECT <column> AS <name>, ...
//!   FROM <base table>
//!   <joins in dependency order>
//!   WHERE <qualifier> AND ...
//! ) AS intermediate_result
//! WHERE (<filter>) AND ...
//! ORDER BY <sort>, ...
//! LIMIT <page size> OFFSET <offset>
//! ```
//!
//! so filters and sorts address output aliases, and the total match count
//! arrives with the page in a single round trip.

use std::sync::{Arc, OnceLock};

use compact_str::CompactString;

use crate::column::Column;
use crate::connection::Connection;
use crate::definition::ListDefinition;
use crate::dependency::JoinDependencies;
use crate::error::Result;
use crate::escape::EscapeLiteral;
use crate::join::Join;
use crate::options::{EvaluateOptions, parse_sort};
use crate::qualifier::Qualifier;
use crate::registry::Registry;
use crate::result::{Record, ResultSet};
use crate::row::Row;
use crate::value::parse_integer;

/// Window-count column added to every row by the outer query.
pub const TOTAL_ROW_COUNT: &str = "total_row_count";

const SELECT_SEPARATOR: &str = ",\n         ";
const QUALIFIER_SEPARATOR: &str = "\n    AND ";

/// A list instance. Cheap to create per request from a shared
/// [`ListDefinition`]; dynamic additions only affect this instance.
#[derive(Debug, Clone)]
pub struct List {
    definition: Arc<ListDefinition>,
    columns: Registry<Column>,
    joins: Registry<Join>,
    qualifiers: Vec<Arc<Qualifier>>,
    all_columns: OnceLock<Registry<Column>>,
    all_joins: OnceLock<Registry<Join>>,
    all_qualifiers: OnceLock<Vec<Arc<Qualifier>>>,
}

impl List {
    pub fn new(definition: impl Into<Arc<ListDefinition>>) -> Self {
        Self {
            definition: definition.into(),
            columns: Registry::new(),
            joins: Registry::new(),
            qualifiers: Vec::new(),
            all_columns: OnceLock::new(),
            all_joins: OnceLock::new(),
            all_qualifiers: OnceLock::new(),
        }
    }

    pub fn definition(&self) -> &ListDefinition {
        &self.definition
    }

    /// Add a column to this instance. A name already declared statically is
    /// overridden for this instance only.
    pub fn add_column(&mut self, column: Column) -> &mut Self {
        crate::listql_trace_registry!("column", column.name());
        self.columns.insert(column);
        self.all_columns.take();
        self
    }

    pub fn add_join(&mut self, join: Join) -> &mut Self {
        crate::listql_trace_registry!("join", join.name());
        self.joins.insert(join);
        self.all_joins.take();
        self
    }

    pub fn add_qualifier(&mut self, qualifier: Qualifier) -> &mut Self {
        crate::listql_trace_registry!("qualifier", qualifier.to_sql());
        self.qualifiers.push(Arc::new(qualifier));
        self.all_qualifiers.take();
        self
    }

    /// Static columns with this instance's columns merged over them.
    pub fn all_columns(&self) -> &Registry<Column> {
        self.all_columns
            .get_or_init(|| self.definition.columns().merged(&self.columns))
    }

    pub fn all_joins(&self) -> &Registry<Join> {
        self.all_joins
            .get_or_init(|| self.definition.joins().merged(&self.joins))
    }

    /// Static qualifiers followed by this instance's.
    pub fn all_qualifiers(&self) -> &[Arc<Qualifier>] {
        self.all_qualifiers.get_or_init(|| {
            self.definition
                .qualifiers()
                .iter()
                .chain(&self.qualifiers)
                .cloned()
                .collect()
        })
    }

    pub fn dynamic_columns(&self) -> &Registry<Column> {
        &self.columns
    }

    pub fn dynamic_joins(&self) -> &Registry<Join> {
        &self.joins
    }

    pub fn dynamic_qualifiers(&self) -> &[Arc<Qualifier>] {
        &self.qualifiers
    }

    /// Columns with a display name, in registry order.
    pub fn display_columns(&self) -> impl Iterator<Item = &Arc<Column>> {
        self.all_columns()
            .iter()
            .filter(|c| c.display_name().is_some())
    }

    pub fn column(&self, name: &str) -> Option<&Arc<Column>> {
        self.all_columns().get(name)
    }

    /// Render the statement [`evaluate`](Self::evaluate) would run.
    pub fn to_sql<S: AsRef<str>>(
        &self,
        column_names: &[S],
        options: &EvaluateOptions,
        escaper: &(impl EscapeLiteral + ?Sized),
    ) -> Result<String> {
        let projection = self.project(column_names, options);
        self.render(&projection, options, escaper)
    }

    /// Run one paged, filtered, sorted query and decode the rows.
    ///
    /// Unregistered names in `column_names` and `options` are ignored. A
    /// filter on a registered column that was not requested still applies;
    /// the column is projected for the filter and left out of the records.
    pub fn evaluate<C, S>(
        &self,
        connection: &mut C,
        column_names: &[S],
        options: &EvaluateOptions,
    ) -> Result<ResultSet>
    where
        C: Connection + ?Sized,
        S: AsRef<str>,
    {
        let projection = self.project(column_names, options);
        let sql = self.render(&projection, options, &*connection)?;

        crate::listql_trace_query!(sql, projection.requested.len());
        let rows = connection.select_all(&sql)?;

        let total_count = rows
            .first()
            .and_then(|row| row.get(TOTAL_ROW_COUNT))
            .flatten()
            .map_or(rows.len() as u64, |raw| {
                u64::try_from(parse_integer(raw)).unwrap_or(0)
            });

        let mut strip = Vec::with_capacity(projection.filter_only.len() + 1);
        strip.push(TOTAL_ROW_COUNT);
        strip.extend(projection.filter_only.iter().map(|c| c.name()));

        self.prepare_result_set(&rows, options.page, options.page_size, total_count, &strip)
    }

    /// Decode raw rows into a [`ResultSet`].
    ///
    /// Each field is cast by its registered column; `strip` and names with no
    /// registered column are dropped. A missing or zero `page_size` yields a
    /// single page holding all `total_count` rows.
    pub fn prepare_result_set(
        &self,
        rows: &[Row],
        page: Option<u64>,
        page_size: Option<u64>,
        total_count: u64,
        strip: &[&str],
    ) -> Result<ResultSet> {
        let (page, page_size) = match page_size {
            None | Some(0) => (1, total_count),
            Some(size) => (page.unwrap_or(1).max(1), size),
        };

        let columns = self.all_columns();
        let records = rows
            .iter()
            .map(|row| {
                let mut record = Record::with_capacity(row.len());
                for (name, raw) in row.iter() {
                    if strip.contains(&name) {
                        continue;
                    }
                    if let Some(column) = columns.get(name) {
                        record.push(name, column.type_cast(raw)?);
                    }
                }
                Ok(record)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ResultSet::new(page, page_size, total_count, records))
    }

    /// Requested columns (registered only, first occurrence wins) plus the
    /// filterable columns that `options` filters on without requesting.
    fn project<S: AsRef<str>>(&self, names: &[S], options: &EvaluateOptions) -> Projection<'_> {
        let registry = self.all_columns();
        let mut requested: Vec<&Arc<Column>> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if find(&requested, name).is_some() {
                continue;
            }
            if let Some(column) = registry.get(name) {
                requested.push(column);
            }
        }

        let mut filter_only: Vec<&Arc<Column>> = Vec::new();
        for (name, _) in &options.filters {
            if find(&requested, name).is_some() || find(&filter_only, name).is_some() {
                continue;
            }
            if let Some(column) = registry.get(name).filter(|c| c.is_filterable()) {
                filter_only.push(column);
            }
        }

        Projection {
            requested,
            filter_only,
        }
    }

    fn render(
        &self,
        projection: &Projection<'_>,
        options: &EvaluateOptions,
        escaper: &(impl EscapeLiteral + ?Sized),
    ) -> Result<String> {
        let qualifiers = self.all_qualifiers();
        let seeds = projection
            .columns()
            .flat_map(|c| c.join_dependencies())
            .chain(qualifiers.iter().flat_map(|q| q.join_dependencies()))
            .map(CompactString::as_str);
        let joins = JoinDependencies::new(self.all_joins(), seeds).tsort()?;

        let mut sql = String::with_capacity(512);
        sql.push_str("SELECT *, count(*) OVER() AS ");
        sql.push_str(TOTAL_ROW_COUNT);
        sql.push_str(" FROM (\n  SELECT ");
        let select: Vec<String> = projection.columns().map(|c| c.to_sql()).collect();
        sql.push_str(&select.join(SELECT_SEPARATOR));
        sql.push_str("\n  FROM ");
        sql.push_str(self.definition.base_table());
        for join in &joins {
            sql.push_str("\n  ");
            sql.push_str(join.to_sql());
        }
        if !qualifiers.is_empty() {
            let conditions: Vec<&str> = qualifiers.iter().map(|q| q.to_sql()).collect();
            sql.push_str("\n  WHERE ");
            sql.push_str(&conditions.join(QUALIFIER_SEPARATOR));
        }
        sql.push_str("\n) AS intermediate_result");

        let filters = filter_fragments(self.all_columns(), options, escaper);
        if !filters.is_empty() {
            sql.push_str("\nWHERE (");
            sql.push_str(&filters.join(") AND ("));
            sql.push(')');
        }

        let sorts = sort_fragments(&projection.requested, options);
        if !sorts.is_empty() {
            sql.push_str("\nORDER BY ");
            sql.push_str(&sorts.join(", "));
        }

        if let Some((limit, offset)) = options.limit_offset() {
            sql.push_str(&format!("\nLIMIT {limit} OFFSET {offset}"));
        }
        Ok(sql)
    }
}

/// Columns of the intermediate query.
struct Projection<'a> {
    requested: Vec<&'a Arc<Column>>,
    /// Filtered but not requested; stripped from decoded records
    filter_only: Vec<&'a Arc<Column>>,
}

impl<'a> Projection<'a> {
    fn columns(&self) -> impl Iterator<Item = &'a Arc<Column>> + '_ {
        self.requested.iter().chain(&self.filter_only).copied()
    }
}

fn find<'c>(columns: &[&'c Arc<Column>], name: &str) -> Option<&'c Arc<Column>> {
    columns.iter().copied().find(|c| c.name() == name)
}

/// Ungrouped fragments first, then one OR-ed fragment per filter group in
/// order of first appearance.
fn filter_fragments(
    columns: &Registry<Column>,
    options: &EvaluateOptions,
    escaper: &(impl EscapeLiteral + ?Sized),
) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut groups: Vec<(&str, Vec<String>)> = Vec::new();

    for (name, value) in &options.filters {
        let Some(column) = columns.get(name) else {
            continue;
        };
        let Some(fragment) = column.filter_sql(value, escaper) else {
            continue;
        };
        match column.filter_group() {
            None => fragments.push(fragment),
            Some(group) => match groups.iter_mut().find(|(g, _)| *g == group) {
                Some((_, members)) => members.push(fragment),
                None => groups.push((group, vec![fragment])),
            },
        }
    }

    fragments.extend(
        groups
            .into_iter()
            .map(|(_, members)| format!("({})", members.join(" OR "))),
    );
    fragments
}

fn sort_fragments(columns: &[&Arc<Column>], options: &EvaluateOptions) -> Vec<String> {
    options
        .sorts
        .iter()
        .filter_map(|token| parse_sort(token))
        .filter_map(|(name, direction)| {
            find(columns, name).map(|c| c.sort_sql(direction.is_descending()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnOptions;
    use crate::escape::StandardEscape;
    use crate::value::{DataType, Value};

    fn definition() -> Arc<ListDefinition> {
        ListDefinition::new("people")
            .column(Column::new("name", "people.name"))
            .column(
                Column::with_options(
                    "team",
                    "teams.name",
                    ColumnOptions::default()
                        .require_join(["teams"])
                        .display_name("Team"),
                )
                .unwrap(),
            )
            .column(
                Column::with_options(
                    "age",
                    "people.age",
                    ColumnOptions::default()
                        .datatype(DataType::Integer)
                        .display_name("Age"),
                )
                .unwrap(),
            )
            .join(Join::new("teams", "JOIN teams ON teams.id = people.team_id"))
            .into_shared()
    }

    fn sql(list: &List, columns: &[&str], options: &EvaluateOptions) -> String {
        list.to_sql(columns, options, &StandardEscape).unwrap()
    }

    #[test]
    fn minimal_statement() {
        let list = List::new(definition());
        assert_eq!(
            sql(&list, &["name"], &EvaluateOptions::new()),
            "SELECT *, count(*) OVER() AS total_row_count FROM (\n\
             \x20 SELECT people.name AS name\n\
             \x20 FROM people\n\
             ) AS intermediate_result"
        );
    }

    #[test]
    fn joins_follow_projected_columns_only() {
        let list = List::new(definition());
        assert!(!sql(&list, &["name", "age"], &EvaluateOptions::new()).contains("JOIN"));
        assert!(
            sql(&list, &["team"], &EvaluateOptions::new())
                .contains("\n  JOIN teams ON teams.id = people.team_id\n")
        );
    }

    #[test]
    fn unknown_and_repeated_columns() {
        let list = List::new(definition());
        let rendered = sql(&list, &["name", "ghost", "name"], &EvaluateOptions::new());
        assert_eq!(rendered.matches("people.name AS name").count(), 1);
    }

    #[test]
    fn only_unknown_columns_render_an_empty_projection() {
        let list = List::new(definition());
        assert_eq!(
            sql(&list, &["ghost"], &EvaluateOptions::new()),
            "SELECT *, count(*) OVER() AS total_row_count FROM (\n\
             \x20 SELECT \n\
             \x20 FROM people\n\
             ) AS intermediate_result"
        );
    }

    #[test]
    fn filtered_columns_join_the_projection() {
        let list = List::new(definition());
        let options = EvaluateOptions::new()
            .filter("team", "reds")
            .filter("name", "o'neil")
            .filter("ghost", "boo")
            .sort("age desc")
            .sort("name");
        let rendered = sql(&list, &["name"], &options);
        assert!(rendered.contains(
            "  SELECT people.name AS name,\n         teams.name AS team\n  FROM people\n  JOIN teams ON teams.id = people.team_id\n"
        ));
        assert!(rendered.ends_with(
            "\nWHERE (team ILIKE '%reds%') AND (name ILIKE '%o''neil%')\nORDER BY name ASC NULLS LAST"
        ));
        assert!(!rendered.contains("ghost"));
        assert!(!rendered.contains("age"));
    }

    #[test]
    fn disabled_filter_does_not_widen_the_projection() {
        let mut list = List::new(definition());
        list.add_column(
            Column::with_options("secret", "people.secret", ColumnOptions::default().disable_filter())
                .unwrap(),
        );
        let rendered = sql(&list, &["name"], &EvaluateOptions::new().filter("secret", "x"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn grouped_filters_are_ored_after_ungrouped() {
        let list = {
            let mut list = List::new(definition());
            list.add_column(
                Column::with_options(
                    "first",
                    "people.first",
                    ColumnOptions::default().filter_group("who"),
                )
                .unwrap(),
            )
            .add_column(
                Column::with_options(
                    "last",
                    "people.last",
                    ColumnOptions::default().filter_group("who"),
                )
                .unwrap(),
            );
            list
        };
        let options = EvaluateOptions::new()
            .filter("first", "ann")
            .filter("name", "x")
            .filter("last", "lee");
        let rendered = sql(&list, &["first", "last", "name"], &options);
        assert!(rendered.contains(
            "\nWHERE (name ILIKE '%x%') AND ((first ILIKE '%ann%' OR last ILIKE '%lee%'))"
        ));
    }

    #[test]
    fn paging_clause() {
        let list = List::new(definition());
        let options = EvaluateOptions::new().page(2).page_size(20);
        assert!(sql(&list, &["name"], &options).ends_with("\nLIMIT 20 OFFSET 20"));
        let unpaged = EvaluateOptions::new().page(2).page_size(0);
        assert!(!sql(&list, &["name"], &unpaged).contains("LIMIT"));
    }

    #[test]
    fn dynamic_additions_invalidate_views() {
        let mut list = List::new(definition());
        assert_eq!(list.all_columns().len(), 3);
        assert_eq!(list.all_joins().len(), 1);
        assert!(list.all_qualifiers().is_empty());

        list.add_column(Column::new("email", "people.email"))
            .add_join(Join::new("pets", "LEFT JOIN pets ON pets.owner_id = people.id"))
            .add_qualifier(Qualifier::new("people.active"));

        assert_eq!(list.all_columns().len(), 4);
        assert_eq!(list.all_joins().len(), 2);
        assert_eq!(list.all_qualifiers().len(), 1);
        assert_eq!(list.dynamic_columns().len(), 1);
        assert_eq!(list.definition().columns().len(), 3);
    }

    #[test]
    fn dynamic_column_overrides_static_for_this_instance() {
        let definition = definition();
        let mut list = List::new(Arc::clone(&definition));
        list.add_column(Column::new("name", "upper(people.name)"));

        assert_eq!(
            list.column("name").map(|c| c.sql_expression()),
            Some("upper(people.name)")
        );
        assert_eq!(
            List::new(definition).column("name").map(|c| c.sql_expression()),
            Some("people.name")
        );
    }

    #[test]
    fn display_columns_keep_registry_order() {
        let list = List::new(definition());
        let names: Vec<&str> = list.display_columns().map(|c| c.name()).collect();
        assert_eq!(names, ["team", "age"]);
    }

    #[test]
    fn prepare_casts_and_strips() {
        let list = List::new(definition());
        let rows = vec![
            Row::from_iter([("name", Some("ann")), ("age", Some("41")), ("extra", Some("x"))]),
            Row::from_iter([("name", Some("bob")), ("age", None), ("extra", None)]),
        ];
        let set = list
            .prepare_result_set(&rows, Some(1), Some(2), 7, &["name"])
            .unwrap();
        assert_eq!(set.total_pages(), 4);
        assert_eq!(set[0].members().collect::<Vec<_>>(), ["age"]);
        assert_eq!(set[0]["age"], Value::Integer(41));
        assert_eq!(set[1]["age"], Value::Null);
    }

    #[test]
    fn unpaged_result_is_a_single_page() {
        let list = List::new(definition());
        let set = list.prepare_result_set(&[], Some(4), None, 12, &[]).unwrap();
        assert_eq!(set.current_page(), 1);
        assert_eq!(set.per_page(), 12);
        assert_eq!(set.total_pages(), 1);
    }
}
