//! Dependency-ordered join resolution.
//!
//! Depth-first topological sort over "join A requires join B". Seeds are
//! visited in the order given and each join's prerequisites in declaration
//! order, so the same request always renders the same FROM clause.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::error::{ListError, Result};
use crate::join::Join;
use crate::registry::Registry;

/// Origin reported for seeds that name an unregistered join.
const SEED: &str = "query";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// A seed set of required joins over a join registry.
pub struct JoinDependencies<'r> {
    joins: &'r Registry<Join>,
    required: Vec<&'r str>,
}

impl<'r> JoinDependencies<'r> {
    pub fn new<I>(joins: &'r Registry<Join>, required: I) -> Self
    where
        I: IntoIterator<Item = &'r str>,
    {
        let mut seeds: Vec<&str> = Vec::new();
        for name in required {
            if !seeds.contains(&name) {
                seeds.push(name);
            }
        }
        Self {
            joins,
            required: seeds,
        }
    }

    /// The seeds and their transitive prerequisites, each exactly once and
    /// after everything it depends on.
    pub fn tsort(&self) -> Result<Vec<Arc<Join>>> {
        let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(self.joins.len());
        let mut path: Vec<&str> = Vec::new();
        let mut sorted = Vec::with_capacity(self.required.len());

        for &name in &self.required {
            self.visit(name, SEED, &mut marks, &mut path, &mut sorted)?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            joins = ?sorted.iter().map(|j| j.name()).collect::<Vec<_>>(),
            "listql.joins.resolved"
        );
        Ok(sorted)
    }

    fn visit(
        &self,
        name: &'r str,
        required_by: &str,
        marks: &mut HashMap<&'r str, Mark>,
        path: &mut Vec<&'r str>,
        sorted: &mut Vec<Arc<Join>>,
    ) -> Result<()> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = path.iter().position(|&n| n == name).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|n| (*n).to_owned()).collect();
                cycle.push(name.to_owned());
                return Err(ListError::DependencyCycle(cycle));
            }
            None => {}
        }

        let join = self.joins.get(name).ok_or_else(|| ListError::UnknownJoin {
            name: name.to_owned(),
            required_by: required_by.to_owned(),
        })?;

        marks.insert(name, Mark::Visiting);
        path.push(name);
        for dep in join.join_dependencies() {
            self.visit(dep.as_str(), name, marks, path, sorted)?;
        }
        path.pop();
        marks.insert(name, Mark::Done);
        sorted.push(Arc::clone(join));
        Ok(())
    }
}
