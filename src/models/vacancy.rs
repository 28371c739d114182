use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of `empleos_vacante`, columns aliased to English names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VacancyRecord {
    pub id: i64,
    pub title: String,
    pub location: Option<String>,
    pub description: String,
    pub requirements: String,
    pub contract_type: Option<String>,
}

/// The (title, description, requirements) triple used to find a published vacancy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VacancyKey {
    pub title: String,
    pub description: String,
    pub requirements: String,
}

impl std::fmt::Display for VacancyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vacancy {:?}", self.title)
    }
}
