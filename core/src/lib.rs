//! Core of `listql`: declarative, paginated list queries over a SQL database.
//!
//! A [`ListDefinition`] declares columns, joins and qualifiers once; a [`List`]
//! built from it may add more per request, then [`List::evaluate`] renders one
//! statement, runs it through a [`Connection`] and decodes a [`ResultSet`].

pub mod column;
pub mod connection;
pub mod definition;
pub mod dependency;
pub mod error;
pub mod escape;
pub mod format;
pub mod join;
pub mod list;
pub mod options;
pub mod qualifier;
pub mod registry;
pub mod result;
pub mod row;
pub mod tracing;
pub mod value;

// Re-export key types and traits
pub use column::{
    Column, ColumnOptions, Condition, DEFAULT_FILTER, Filter, FilterOption, FilterTemplate,
    Formatter, TAUTOLOGY,
};
pub use connection::Connection;
pub use definition::ListDefinition;
pub use dependency::JoinDependencies;
pub use error::{ListError, Result};
pub use escape::{EscapeLiteral, StandardEscape};
pub use join::{Join, JoinDeps};
pub use list::{List, TOTAL_ROW_COUNT};
pub use options::{EvaluateOptions, SortDirection};
pub use qualifier::Qualifier;
pub use registry::{Named, Registry};
pub use result::{Record, ResultSet};
pub use row::Row;
pub use value::{DataType, Value};
