//! Static list declarations shared by every [`List`](crate::List) instance.

use std::sync::Arc;

use compact_str::CompactString;

use crate::column::Column;
use crate::join::Join;
use crate::qualifier::Qualifier;
use crate::registry::Registry;

/// The part of a list fixed at definition time: base table plus the columns,
/// joins and qualifiers every instance starts from.
///
/// Build once, wrap in an [`Arc`] and hand to as many lists as needed; a
/// definition is never mutated after it is shared.
///
/// ```ignore
/// let people = ListDefinition::new("people")
///     .column(Column::new("name", "people.name"))
///     .join(Join::new("teams", "JOIN teams ON teams.id = people.team_id"))
///     .qualifier(Qualifier::new("people.deleted_at IS NULL"))
///     .into_shared();
/// ```
#[derive(Debug, Clone)]
pub struct ListDefinition {
    base_table: CompactString,
    columns: Registry<Column>,
    joins: Registry<Join>,
    qualifiers: Vec<Arc<Qualifier>>,
}

impl ListDefinition {
    pub fn new(base_table: impl Into<CompactString>) -> Self {
        Self {
            base_table: base_table.into(),
            columns: Registry::new(),
            joins: Registry::new(),
            qualifiers: Vec::new(),
        }
    }

    /// Register a column; a later column with the same name replaces it.
    pub fn column(mut self, column: Column) -> Self {
        self.columns.insert(column);
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.insert(join);
        self
    }

    pub fn qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(Arc::new(qualifier));
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn base_table(&self) -> &str {
        &self.base_table
    }

    pub fn columns(&self) -> &Registry<Column> {
        &self.columns
    }

    pub fn joins(&self) -> &Registry<Join> {
        &self.joins
    }

    pub fn qualifiers(&self) -> &[Arc<Qualifier>] {
        &self.qualifiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_order_and_replacement() {
        let definition = ListDefinition::new("my_table")
            .column(Column::new("a", "my_table.a"))
            .column(Column::new("b", "my_table.b"))
            .column(Column::new("a", "my_table.a2"))
            .join(Join::new("j", "JOIN j ON TRUE"))
            .qualifier(Qualifier::new("my_table.x = 1"))
            .qualifier(Qualifier::new("my_table.x = 1"));

        assert_eq!(definition.base_table(), "my_table");
        assert_eq!(definition.columns().names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(
            definition.columns().get("a").map(|c| c.sql_expression()),
            Some("my_table.a2")
        );
        assert_eq!(definition.joins().len(), 1);
        assert_eq!(definition.qualifiers().len(), 2);
    }
}
