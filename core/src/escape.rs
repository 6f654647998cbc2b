//! Literal escaping for runtime filter values.
//!
//! Filter templates carry their own quotes (`ILIKE '%%%s%%'`), so escaping
//! produces the *body* of a string literal, not a quoted literal.

/// Capability to make a single untrusted value safe inside a quoted SQL literal.
pub trait EscapeLiteral {
    fn escape_literal(&self, value: &str) -> String;
}

/// Standard-conforming string literal escaping: single quotes are doubled and
/// NUL bytes, which no PostgreSQL text value can hold, are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEscape;

impl EscapeLiteral for StandardEscape {
    fn escape_literal(&self, value: &str) -> String {
        escape_literal(value)
    }
}

impl<E: EscapeLiteral + ?Sized> EscapeLiteral for &E {
    fn escape_literal(&self, value: &str) -> String {
        (**self).escape_literal(value)
    }
}

pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\0' => {}
            c => out.push(c),
        }
    }
    out
}
