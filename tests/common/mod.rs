#![allow(dead_code)]

use listql::{
    Column, ColumnOptions, Connection, DataType, EscapeLiteral, FilterOption, Join, List,
    ListDefinition, ListError, Qualifier, Result, Row, StandardEscape,
};
use std::sync::Arc;

/// Records every statement and answers with canned rows.
#[derive(Default)]
pub struct MockConnection {
    pub statements: Vec<String>,
    rows: Vec<Row>,
    failure: Option<String>,
}

impl MockConnection {
    pub fn returning(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_owned()),
            ..Self::default()
        }
    }

    pub fn last_statement(&self) -> Option<&str> {
        self.statements.last().map(String::as_str)
    }
}

impl EscapeLiteral for MockConnection {
    fn escape_literal(&self, value: &str) -> String {
        StandardEscape.escape_literal(value)
    }
}

impl Connection for MockConnection {
    fn select_all(&mut self, sql: &str) -> Result<Vec<Row>> {
        self.statements.push(sql.to_owned());
        match self.failure {
            Some(ref message) => Err(ListError::Execution(message.clone())),
            None => Ok(self.rows.clone()),
        }
    }
}

pub fn row(fields: &[(&str, Option<&str>)]) -> Row {
    fields.iter().copied().collect()
}

/// Three static columns, three chained joins and two qualifiers over `my_table`.
pub fn definition() -> Arc<ListDefinition> {
    ListDefinition::new("my_table")
        .column(
            Column::with_options(
                "attr1",
                "my_table.attribute_1",
                ColumnOptions::default()
                    .datatype(DataType::String)
                    .disable_filter()
                    .display_name("One"),
            )
            .unwrap(),
        )
        .column(
            Column::with_options(
                "attr2",
                "another_table.attribute_2",
                ColumnOptions::default()
                    .datatype(DataType::Integer)
                    .require_join(["another_table"]),
            )
            .unwrap(),
        )
        .column(
            Column::with_options(
                "attr3",
                "my_table.attribute_3",
                ColumnOptions::default()
                    .filter_options([FilterOption::new("1", "= 1").display_name("One")])
                    .display_name("Three"),
            )
            .unwrap(),
        )
        .join(
            Join::new(
                "other_table",
                "JOIN other_table ON other_table.id = my_table.other_table_id",
            )
            .require_join(["yet_more_table"]),
        )
        .join(
            Join::new(
                "another_table",
                "JOIN another_table ON another_table.id = other_table.another_table_id",
            )
            .require_join(["other_table"]),
        )
        .join(Join::new(
            "yet_more_table",
            "JOIN yet_more_table ON yet_more_table.id = my_table.yet_more_id",
        ))
        .qualifier(Qualifier::new("my_table.state = 4"))
        .qualifier(Qualifier::new("yet_more_table.state = 1").require_join(["yet_more_table"]))
        .into_shared()
}

/// [`definition`] plus two grouped columns, one join and one qualifier added
/// on the instance.
pub fn list() -> List {
    let mut list = List::new(definition());
    list.add_column(
        Column::with_options(
            "attr4",
            "dyn_table.attribute_4",
            ColumnOptions::default()
                .datatype(DataType::DateTime)
                .filter_group("one"),
        )
        .unwrap(),
    )
    .add_column(
        Column::with_options(
            "attr5",
            "my_table.attribute_5",
            ColumnOptions::default()
                .filter_group("one")
                .display_name("Five"),
        )
        .unwrap(),
    )
    .add_join(
        Join::new(
            "dyn_table",
            "LEFT JOIN dyn_table ON dyn_table.id = other_table.dyn_table_id",
        )
        .require_join(["other_table", "another_table"]),
    )
    .add_qualifier(Qualifier::new("my_table.something = 'Some '' Stuff'"));
    list
}
