//! The database collaborator a [`List`](crate::List) evaluates against.

use crate::error::Result;
use crate::escape::EscapeLiteral;
use crate::row::Row;

/// Executes generated SQL and escapes runtime filter values.
///
/// Implementations own timeouts, retries and cancellation; errors are handed
/// back to the caller of [`List::evaluate`](crate::List::evaluate) unchanged.
pub trait Connection: EscapeLiteral {
    /// Run `sql` and return every row with columns in projection order.
    fn select_all(&mut self, sql: &str) -> Result<Vec<Row>>;
}

impl<C: Connection + ?Sized> Connection for &mut C {
    fn select_all(&mut self, sql: &str) -> Result<Vec<Row>> {
        (**self).select_all(sql)
    }
}

impl<C: Connection + ?Sized> EscapeLiteral for &mut C {
    fn escape_literal(&self, value: &str) -> String {
        (**self).escape_literal(value)
    }
}
