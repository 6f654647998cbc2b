//! Always-applied conditions for the inner `WHERE` clause.

use compact_str::CompactString;

use crate::join::{JoinDeps, join_deps};

/// A WHERE condition applied to every evaluation of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifier {
    sql: String,
    join_dependencies: JoinDeps,
}

impl Qualifier {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            join_dependencies: JoinDeps::new(),
        }
    }

    pub fn require_join<I, S>(mut self, joins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.join_dependencies = join_deps(joins);
        self
    }

    pub fn join_dependencies(&self) -> &[CompactString] {
        &self.join_dependencies
    }

    pub fn to_sql(&self) -> &str {
        &self.sql
    }
}
