use serde::Serialize;
use sqlx::Connection;

use crate::database::connection::{connect, ConnectionParams};
use crate::error::Result;

/// Tables the portal's user accounts may live in, depending on how auth is wired.
pub const USER_TABLES: [&str; 4] = ["auth_user", "usuarios_usuario", "users", "user"];

#[derive(Debug, Clone, Serialize)]
pub struct TableCount {
    pub table: String,
    /// `None` when the table does not exist or cannot be read.
    pub rows: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackendProbe {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub server_version: String,
    pub public_tables: Vec<String>,
    pub user_tables: Vec<TableCount>,
}

impl BackendProbe {
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!(
                "connected to {}:{}/{} ({})",
                self.host, self.port, self.database, self.server_version
            ),
            format!("{} tables in schema public", self.public_tables.len()),
        ];
        for count in &self.user_tables {
            lines.push(match count.rows {
                Some(n) => format!("  {}: {} rows", count.table, n),
                None => format!("  {}: absent", count.table),
            });
        }
        lines.join("\n")
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Connects, lists the public tables and counts rows in each known user table.
pub async fn probe_backend(database_url: &str) -> Result<BackendProbe> {
    let params = ConnectionParams::parse(database_url)?;
    tracing::info!(
        host = %params.host,
        port = params.port,
        database = %params.dbname,
        user = %params.user,
        "probing backend"
    );

    let mut conn = connect(database_url).await?;
    let (server_version,): (String,) = sqlx::query_as("SELECT version()")
        .fetch_one(&mut conn)
        .await?;

    let public_tables: Vec<String> = sqlx::query_scalar(
        "SELECT table_name::text FROM information_schema.tables WHERE table_schema = 'public' ORDER BY table_name",
    )
    .fetch_all(&mut conn)
    .await?;

    let mut user_tables = Vec::with_capacity(USER_TABLES.len());
    for table in USER_TABLES {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        let rows = match sqlx::query_scalar::<_, i64>(&sql).fetch_one(&mut conn).await {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::debug!(table, error = %e, "user table not readable");
                None
            }
        };
        user_tables.push(TableCount {
            table: table.to_string(),
            rows,
        });
    }
    conn.close().await?;

    Ok(BackendProbe {
        host: params.host,
        port: params.port,
        database: params.dbname,
        server_version,
        public_tables,
        user_tables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_table_names_are_quoted() {
        assert_eq!(quote_ident("user"), "\"user\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn summary_marks_absent_tables() {
        let probe = BackendProbe {
            host: "localhost".into(),
            port: 5432,
            database: "portal_empleo".into(),
            server_version: "PostgreSQL 15.4".into(),
            public_tables: vec!["empleos_vacante".into(), "usuarios_usuario".into()],
            user_tables: vec![
                TableCount {
                    table: "auth_user".into(),
                    rows: None,
                },
                TableCount {
                    table: "usuarios_usuario".into(),
                    rows: Some(12),
                },
            ],
        };

        let summary = probe.summary();
        assert!(summary.starts_with("connected to localhost:5432/portal_empleo"));
        assert!(summary.contains("2 tables in schema public"));
        assert!(summary.contains("auth_user: absent"));
        assert!(summary.contains("usuarios_usuario: 12 rows"));
    }
}
