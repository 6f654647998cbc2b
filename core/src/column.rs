//! Column declarations: projection, sorting, filtering and value casting.

use core::fmt;
use std::sync::Arc;

use compact_str::CompactString;

use crate::error::{ListError, Result};
use crate::escape::EscapeLiteral;
use crate::format::sprintf;
use crate::join::{JoinDeps, join_deps};
use crate::registry::Named;
use crate::value::{DataType, Value};

/// Template used by free-text filters unless a column declares its own.
pub const DEFAULT_FILTER: &str = "ILIKE '%%%s%%'";

/// Condition rendered when an enumerated filter value matches no option.
pub const TAUTOLOGY: &str = "1=1";

/// Comparison template for free-text filters.
#[derive(Clone)]
pub enum FilterTemplate {
    /// printf-style template, `%s` receives the escaped value
    Literal(String),
    /// Picks the template from the raw value; the result is rendered like `Literal`
    Computed(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl FilterTemplate {
    pub fn computed(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self::Computed(Arc::new(f))
    }

    fn resolve(&self, value: &str) -> String {
        match self {
            Self::Literal(template) => template.clone(),
            Self::Computed(f) => f(value),
        }
    }
}

impl fmt::Debug for FilterTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(t) => f.debug_tuple("Literal").field(t).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for FilterTemplate {
    fn from(template: &str) -> Self {
        Self::Literal(template.to_owned())
    }
}

impl From<String> for FilterTemplate {
    fn from(template: String) -> Self {
        Self::Literal(template)
    }
}

/// Condition of an enumerated filter option.
#[derive(Clone)]
pub enum Condition {
    Literal(String),
    /// Evaluated at render time, e.g. for "older than now" cut-offs
    Computed(Arc<dyn Fn() -> String + Send + Sync>),
}

impl Condition {
    pub fn computed(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self::Computed(Arc::new(f))
    }

    fn render(&self) -> String {
        match self {
            Self::Literal(c) => c.clone(),
            Self::Computed(f) => f(),
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(c) => f.debug_tuple("Literal").field(c).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for Condition {
    fn from(condition: &str) -> Self {
        Self::Literal(condition.to_owned())
    }
}

impl From<String> for Condition {
    fn from(condition: String) -> Self {
        Self::Literal(condition)
    }
}

/// One entry of an enumerated filter, e.g. `{ value: "1", condition: "<= 0",
/// display_name: "Overdue" }`.
#[derive(Debug, Clone)]
pub struct FilterOption {
    pub value: String,
    pub condition: Condition,
    pub display_name: Option<String>,
    pub display_suffix: Option<String>,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, condition: impl Into<Condition>) -> Self {
        Self {
            value: value.into(),
            condition: condition.into(),
            display_name: None,
            display_suffix: None,
        }
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn display_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.display_suffix = Some(suffix.into());
        self
    }

    /// Label shown to users: the display name, else the raw value.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.value)
    }
}

/// How a column reacts to a runtime filter value.
#[derive(Debug, Clone)]
pub enum Filter {
    Disabled,
    FreeText(FilterTemplate),
    Options(Vec<FilterOption>),
}

impl Default for Filter {
    fn default() -> Self {
        Self::FreeText(FilterTemplate::Literal(DEFAULT_FILTER.to_owned()))
    }
}

/// Presentation formatter applied by [`Column::humanize`].
#[derive(Clone)]
pub enum Formatter {
    /// printf-style template, skipped for blank values
    Template(String),
    Computed(Arc<dyn Fn(&Value) -> String + Send + Sync>),
}

impl Formatter {
    pub fn computed(f: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        Self::Computed(Arc::new(f))
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for Formatter {
    fn from(template: &str) -> Self {
        Self::Template(template.to_owned())
    }
}

/// Declaration-time options for a [`Column`].
#[derive(Debug, Clone)]
pub struct ColumnOptions {
    pub datatype: DataType,
    pub require_join: JoinDeps,
    pub filter: Filter,
    /// Filters sharing a group are ORed together before being ANDed with the rest
    pub filter_group: Option<CompactString>,
    pub sort_nulls_last: bool,
    /// Columns without one are internal and left out of `display_columns`
    pub display_name: Option<String>,
    pub format: Option<Formatter>,
}

impl Default for ColumnOptions {
    fn default() -> Self {
        Self {
            datatype: DataType::String,
            require_join: JoinDeps::new(),
            filter: Filter::default(),
            filter_group: None,
            sort_nulls_last: true,
            display_name: None,
            format: None,
        }
    }
}

impl ColumnOptions {
    pub fn datatype(mut self, datatype: DataType) -> Self {
        self.datatype = datatype;
        self
    }

    pub fn require_join<I, S>(mut self, joins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.require_join = join_deps(joins);
        self
    }

    pub fn filter_template(mut self, template: impl Into<FilterTemplate>) -> Self {
        self.filter = Filter::FreeText(template.into());
        self
    }

    pub fn filter_options(mut self, options: impl IntoIterator<Item = FilterOption>) -> Self {
        self.filter = Filter::Options(options.into_iter().collect());
        self
    }

    pub fn disable_filter(mut self) -> Self {
        self.filter = Filter::Disabled;
        self
    }

    pub fn filter_group(mut self, group: impl Into<CompactString>) -> Self {
        self.filter_group = Some(group.into());
        self
    }

    pub fn sort_nulls_last(mut self, nulls_last: bool) -> Self {
        self.sort_nulls_last = nulls_last;
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn format(mut self, format: impl Into<Formatter>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// A named, typed projection that can be sorted and filtered.
#[derive(Debug, Clone)]
pub struct Column {
    name: CompactString,
    sql_expression: String,
    datatype: DataType,
    join_dependencies: JoinDeps,
    filter: Filter,
    filter_group: Option<CompactString>,
    sort_nulls_last: bool,
    display_name: Option<String>,
    format: Option<Formatter>,
}

impl Column {
    /// A string column with the default `ILIKE` filter.
    pub fn new(name: impl Into<CompactString>, sql_expression: impl Into<String>) -> Self {
        let ColumnOptions {
            datatype,
            require_join,
            filter,
            filter_group,
            sort_nulls_last,
            display_name,
            format,
        } = ColumnOptions::default();
        Self {
            name: name.into(),
            sql_expression: sql_expression.into(),
            datatype,
            join_dependencies: require_join,
            filter,
            filter_group,
            sort_nulls_last,
            display_name,
            format,
        }
    }

    /// Fails if an enumerated filter option has an empty value or condition.
    pub fn with_options(
        name: impl Into<CompactString>,
        sql_expression: impl Into<String>,
        options: ColumnOptions,
    ) -> Result<Self> {
        let name = name.into();
        if let Filter::Options(ref opts) = options.filter {
            validate_filter_options(&name, opts)?;
        }
        Ok(Self {
            name,
            sql_expression: sql_expression.into(),
            datatype: options.datatype,
            join_dependencies: options.require_join,
            filter: options.filter,
            filter_group: options.filter_group,
            sort_nulls_last: options.sort_nulls_last,
            display_name: options.display_name,
            format: options.format,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sql_expression(&self) -> &str {
        &self.sql_expression
    }

    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    pub fn join_dependencies(&self) -> &[CompactString] {
        &self.join_dependencies
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn filter_group(&self) -> Option<&str> {
        self.filter_group.as_deref()
    }

    pub fn sort_nulls_last(&self) -> bool {
        self.sort_nulls_last
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn is_filterable(&self) -> bool {
        !matches!(self.filter, Filter::Disabled)
    }

    /// `<expression> AS <name>`
    pub fn to_sql(&self) -> String {
        format!("{} AS {}", self.sql_expression, self.name)
    }

    /// Sorts by the output alias, since ordering happens over the projected
    /// intermediate result.
    pub fn sort_sql(&self, descending: bool) -> String {
        let direction = if descending { "DESC" } else { "ASC" };
        let nulls = if self.sort_nulls_last { " NULLS LAST" } else { "" };
        format!("{} {direction}{nulls}", self.name)
    }

    /// WHERE fragment for `value`, `None` when filtering is disabled.
    ///
    /// Free-text values always go through `escaper`. An enumerated value with
    /// no matching option renders the tautology `1=1` so it is ignored.
    pub fn filter_sql(&self, value: &str, escaper: &(impl EscapeLiteral + ?Sized)) -> Option<String> {
        match &self.filter {
            Filter::Disabled => None,
            Filter::FreeText(template) => {
                let template = template.resolve(value);
                let escaped = Value::Text(escaper.escape_literal(value));
                Some(format!("{} {}", self.name, sprintf(&template, &escaped)))
            }
            Filter::Options(options) => Some(
                match options.iter().find(|o| o.value == value) {
                    Some(option) => format!("{} {}", self.name, option.condition.render()),
                    None => TAUTOLOGY.to_owned(),
                },
            ),
        }
    }

    /// Canonical filter value for a user-facing label (display name, or the raw
    /// value for options without one).
    pub fn filter_value_matching(&self, label: &str) -> Option<&str> {
        match &self.filter {
            Filter::Options(options) => options
                .iter()
                .find(|o| o.label() == label)
                .map(|o| o.value.as_str()),
            _ => None,
        }
    }

    pub fn type_cast(&self, raw: Option<&str>) -> Result<Value> {
        self.datatype.cast(raw)
    }

    /// Apply the column's format. Templates skip blank values; without a
    /// formatter the value comes back unchanged.
    pub fn humanize(&self, value: &Value) -> Value {
        match &self.format {
            Some(Formatter::Template(template)) if !value.is_blank() => {
                Value::Text(sprintf(template, value))
            }
            Some(Formatter::Computed(f)) => Value::Text(f(value)),
            _ => value.clone(),
        }
    }
}

impl Named for Column {
    fn name(&self) -> &str {
        &self.name
    }
}

fn validate_filter_options(column: &str, options: &[FilterOption]) -> Result<()> {
    for option in options {
        let reason = if option.value.is_empty() {
            "value must be a non-empty string"
        } else if matches!(&option.condition, Condition::Literal(c) if c.trim().is_empty()) {
            "condition must be a non-empty string or a computed condition"
        } else {
            continue;
        };
        return Err(ListError::InvalidFilterOption {
            column: column.to_owned(),
            reason: reason.to_owned(),
        });
    }
    Ok(())
}
