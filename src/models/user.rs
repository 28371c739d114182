use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidato,
    Reclutador,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Candidato => "candidato",
            Role::Reclutador => "reclutador",
        }
    }

    /// Route the portal lands on after a successful login.
    pub fn landing_path(self) -> String {
        format!("/{}", self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row of `usuarios_usuario` as written by the portal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub rol: Option<String>,
}

/// A username/email pair created by a run and owed a cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UserIdentity {
    pub username: String,
    pub email: String,
}

impl UserIdentity {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.username, self.email)
    }
}
