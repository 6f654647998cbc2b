//! Synchronous PostgreSQL driver using [`postgres`].
//!
//! # Example
//!
//! ```no_run
//! use listql::postgres_sync::PostgresConnection;
//! use listql::{Column, EvaluateOptions, List, ListDefinition};
//!
//! fn main() -> listql::Result<()> {
//!     let definition = ListDefinition::new("users")
//!         .column(Column::new("name", "users.name"))
//!         .into_shared();
//!
//!     let mut conn = PostgresConnection::open("host=localhost user=postgres")?;
//!     let users = List::new(definition).evaluate(
//!         &mut conn,
//!         &["name"],
//!         &EvaluateOptions::new().page_size(25),
//!     )?;
//!     println!("{} users", users.total_entries());
//!     Ok(())
//! }
//! ```

use listql_core::{Connection, EscapeLiteral, ListError, Result, Row, escape};
use postgres::{Client, NoTls, SimpleQueryMessage};

use crate::config::DatabaseConfig;

/// A [`Connection`] over a blocking [`postgres::Client`].
///
/// Statements go through the simple-query protocol, so every value arrives
/// as text in projection order, ready for the list's own casts.
pub struct PostgresConnection {
    client: Client,
}

impl PostgresConnection {
    /// Wrap an existing client, switching its session to
    /// `standard_conforming_strings = on` so doubled quotes are the only
    /// escaping literals need.
    pub fn new(mut client: Client) -> Result<Self> {
        client.batch_execute("SET standard_conforming_strings = on")?;
        Ok(Self { client })
    }

    /// Connect without TLS using a libpq-style connection string or URL.
    pub fn open(params: &str) -> Result<Self> {
        Self::new(Client::connect(params, NoTls)?)
    }

    /// Connect from `[database]` settings, applying the statement timeout.
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut conn = Self::open(&config.connection_string())?;
        if let Some(ms) = config.statement_timeout_ms {
            #[cfg(feature = "tracing")]
            tracing::debug!(timeout_ms = ms, "listql.connect.statement_timeout");
            conn.client
                .batch_execute(&format!("SET statement_timeout = {ms}"))?;
        }
        Ok(conn)
    }

    /// Gets a reference to the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Gets a mutable reference to the underlying client
    pub fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }

    pub fn into_inner(self) -> Client {
        self.client
    }
}

impl EscapeLiteral for PostgresConnection {
    fn escape_literal(&self, value: &str) -> String {
        escape::escape_literal(value)
    }
}

impl Connection for PostgresConnection {
    fn select_all(&mut self, sql: &str) -> Result<Vec<Row>> {
        let messages = self.client.simple_query(sql)?;
        let mut rows = Vec::with_capacity(messages.len());
        for message in messages {
            if let SimpleQueryMessage::Row(row) = message {
                let mut out = Row::with_capacity(row.len());
                for (idx, column) in row.columns().iter().enumerate() {
                    out.push(column.name(), row.get(idx).map(str::to_owned));
                }
                rows.push(out);
            }
        }
        Ok(rows)
    }
}

impl TryFrom<Client> for PostgresConnection {
    type Error = ListError;

    fn try_from(client: Client) -> Result<Self> {
        Self::new(client)
    }
}
