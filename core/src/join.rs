//! Named JOIN fragments and their prerequisites.

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::registry::Named;

/// Names of the joins a column, join or qualifier needs.
pub type JoinDeps = SmallVec<[CompactString; 4]>;

/// Collect join names, dropping repeats while keeping first-seen order.
pub fn join_deps<I, S>(names: I) -> JoinDeps
where
    I: IntoIterator<Item = S>,
    S: Into<CompactString>,
{
    let mut deps = JoinDeps::new();
    for name in names {
        let name = name.into();
        if !deps.contains(&name) {
            deps.push(name);
        }
    }
    deps
}

/// A full JOIN clause, e.g. `LEFT JOIN b ON b.id = a.b_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    name: CompactString,
    sql: String,
    join_dependencies: JoinDeps,
}

impl Join {
    pub fn new(name: impl Into<CompactString>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
            join_dependencies: JoinDeps::new(),
        }
    }

    /// Joins that must render earlier in the FROM clause.
    pub fn require_join<I, S>(mut self, joins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.join_dependencies = join_deps(joins);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn join_dependencies(&self) -> &[CompactString] {
        &self.join_dependencies
    }

    pub fn to_sql(&self) -> &str {
        &self.sql
    }
}

impl Named for Join {
    fn name(&self) -> &str {
        &self.name
    }
}
