//! Runtime parameters of a single [`List::evaluate`](crate::List::evaluate) call.

use core::fmt;

use compact_str::CompactString;

/// Sort direction parsed from a `"<column> <asc|desc>"` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` in any case is descending; anything else, including nothing, ascends.
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some(t) if t.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    #[inline]
    pub const fn is_descending(self) -> bool {
        matches!(self, Self::Desc)
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a sort token into column name and direction. Blank tokens yield `None`.
pub fn parse_sort(token: &str) -> Option<(&str, SortDirection)> {
    let mut parts = token.split_whitespace();
    let column = parts.next()?;
    Some((column, SortDirection::parse(parts.next())))
}

/// Page, filters and sorts for one evaluation.
///
/// `page_size` of `None` or `Some(0)` returns every row as a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluateOptions {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// Column name to raw filter value, in insertion order
    pub filters: Vec<(CompactString, String)>,
    /// `"<column> <asc|desc>"` tokens, highest precedence first
    pub sorts: Vec<String>,
}

impl EvaluateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Add a filter; a second filter on the same column replaces the first.
    pub fn filter(mut self, column: impl Into<CompactString>, value: impl Into<String>) -> Self {
        let column = column.into();
        let value = value.into();
        match self.filters.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.filters.push((column, value)),
        }
        self
    }

    pub fn sort(mut self, token: impl Into<String>) -> Self {
        self.sorts.push(token.into());
        self
    }

    pub fn sort_by(self, column: &str, direction: SortDirection) -> Self {
        self.sort(format!("{column} {direction}"))
    }

    /// `(limit, offset)`, or `None` when unpaged. Pages below 1 count as 1.
    pub fn limit_offset(&self) -> Option<(u64, u64)> {
        match self.page_size {
            None | Some(0) => None,
            Some(size) => {
                let page = self.page.unwrap_or(1).max(1);
                Some((size, (page - 1).saturating_mul(size)))
            }
        }
    }
}
