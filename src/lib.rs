//! # listql
//!
//! Declarative, paginated list queries for PostgreSQL.
//!
//! A list is declared once as columns, joins and qualifiers over a base table.
//! Each evaluation picks the columns to show plus filters, sorts and a page,
//! and listql renders a single statement that returns the page together with
//! the total match count. Only the joins the chosen columns and qualifiers
//! need are emitted, in dependency order.
//!
//! ## Quick Start
//!
//! ```rust
//! use listql::{Column, ColumnOptions, EvaluateOptions, Join, List, ListDefinition, StandardEscape};
//!
//! # fn main() -> listql::Result<()> {
//! let definition = ListDefinition::new("orders")
//!     .column(Column::new("number", "orders.number"))
//!     .column(Column::with_options(
//!         "customer",
//!         "customers.name",
//!         ColumnOptions::default().require_join(["customers"]),
//!     )?)
//!     .join(Join::new("customers", "JOIN customers ON customers.id = orders.customer_id"))
//!     .into_shared();
//!
//! let list = List::new(definition);
//! let options = EvaluateOptions::new().filter("customer", "acme").page_size(20);
//! let sql = list.to_sql(&["number", "customer"], &options, &StandardEscape)?;
//! assert!(sql.contains("JOIN customers"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Database Support
//!
//! | Database   | Driver   | Feature Flag    |
//! |------------|----------|-----------------|
//! | PostgreSQL | postgres | `postgres-sync` |
//!
//! Any other backend plugs in by implementing [`Connection`].

pub mod config;
#[cfg(feature = "postgres-sync")]
pub mod postgres_sync;

pub use listql_core::*;

pub use config::{Config, ConfigError};
