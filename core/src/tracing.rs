//! Tracing utilities for list query observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level tracing event with the SQL text and projected column count.
///
/// ```ignore
/// listql_trace_query!(&sql, columns.len());
/// ```
#[macro_export]
macro_rules! listql_trace_query {
    ($sql:expr, $column_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %$sql, columns = $column_count, "listql.query");
    };
}

/// Emit a trace-level event when a dynamic registry change drops a cached view.
///
/// ```ignore
/// listql_trace_registry!("column", name);
/// ```
#[macro_export]
macro_rules! listql_trace_registry {
    ($kind:literal, $name:expr) => {
        #[cfg(feature = "tracing")]
        tracing::trace!(kind = $kind, name = %$name, "listql.registry.invalidate");
    };
}
