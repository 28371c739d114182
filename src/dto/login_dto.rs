use serde::Serialize;

pub const MSG_LOGIN_SUCCESS: &str = "¡Inicio de sesión exitoso!";

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
