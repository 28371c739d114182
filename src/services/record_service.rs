use async_trait::async_trait;
use sqlx::{Connection, PgConnection};

use crate::database::connection::{connect, redacted};
use crate::error::Result;
use crate::models::user::{UserIdentity, UserRecord};
use crate::models::vacancy::{VacancyKey, VacancyRecord};

/// Direct reads and deletes against the portal's backend store.
///
/// This is the only seam that knows the portal persists to SQL; everything above it
/// speaks in users and vacancies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Users whose username OR email equals the identity's.
    async fn find_users(&self, identity: &UserIdentity) -> Result<Vec<UserRecord>>;
    async fn delete_users(&self, identity: &UserIdentity) -> Result<u64>;
    async fn find_vacancies(&self, key: &VacancyKey) -> Result<Vec<VacancyRecord>>;
    async fn count_vacancies(&self) -> Result<i64>;
    async fn delete_vacancies(&self, key: &VacancyKey) -> Result<u64>;
}

/// [`RecordStore`] over the portal's Postgres database. Every call opens its own
/// connection and closes it before returning.
#[derive(Clone)]
pub struct PgRecordStore {
    database_url: String,
}

impl PgRecordStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    async fn open(&self) -> Result<PgConnection> {
        tracing::debug!(database = %redacted(&self.database_url), "opening backend connection");
        connect(&self.database_url).await
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn find_users(&self, identity: &UserIdentity) -> Result<Vec<UserRecord>> {
        let mut conn = self.open().await?;
        let users = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id::bigint AS id, username, email, first_name, last_name, rol::text AS rol
            FROM usuarios_usuario
            WHERE username = $1 OR email = $2
            "#,
        )
        .bind(&identity.username)
        .bind(&identity.email)
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;
        Ok(users)
    }

    async fn delete_users(&self, identity: &UserIdentity) -> Result<u64> {
        let mut conn = self.open().await?;
        let result = sqlx::query("DELETE FROM usuarios_usuario WHERE username = $1 OR email = $2")
            .bind(&identity.username)
            .bind(&identity.email)
            .execute(&mut conn)
            .await?;
        conn.close().await?;
        Ok(result.rows_affected())
    }

    async fn find_vacancies(&self, key: &VacancyKey) -> Result<Vec<VacancyRecord>> {
        let mut conn = self.open().await?;
        let vacancies = sqlx::query_as::<_, VacancyRecord>(
            r#"
            SELECT
                id::bigint AS id,
                titulo AS title,
                ubicacion AS location,
                descripcion AS description,
                requisitos AS requirements,
                tipo_contrato::text AS contract_type
            FROM empleos_vacante
            WHERE titulo = $1 AND descripcion = $2 AND requisitos = $3
            ORDER BY id
            "#,
        )
        .bind(&key.title)
        .bind(&key.description)
        .bind(&key.requirements)
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;
        Ok(vacancies)
    }

    async fn count_vacancies(&self) -> Result<i64> {
        let mut conn = self.open().await?;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM empleos_vacante")
            .fetch_one(&mut conn)
            .await?;
        conn.close().await?;
        Ok(count)
    }

    async fn delete_vacancies(&self, key: &VacancyKey) -> Result<u64> {
        let mut conn = self.open().await?;
        let result = sqlx::query(
            "DELETE FROM empleos_vacante WHERE titulo = $1 AND descripcion = $2 AND requisitos = $3",
        )
        .bind(&key.title)
        .bind(&key.description)
        .bind(&key.requirements)
        .execute(&mut conn)
        .await?;
        conn.close().await?;
        Ok(result.rows_affected())
    }
}
