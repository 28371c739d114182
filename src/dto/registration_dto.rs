use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::models::user::{Role, UserIdentity, UserRecord};

pub const MSG_USERNAME_REQUIRED: &str = "El nombre de usuario es obligatorio";
pub const MSG_INVALID_EMAIL: &str = "Por favor, ingrese un correo electrónico válido";
pub const MSG_PASSWORD_TOO_SHORT: &str = "La contraseña debe tener al menos 8 caracteres";
pub const MSG_PASSWORD_MISMATCH: &str = "Las contraseñas no coinciden";
pub const MSG_REQUIRED_FIELDS: &str = "Por favor, complete todos los campos obligatorios";

/// Success toast wordings after registering. The first is the portal's current
/// copy; the others are older wordings still accepted with a warning.
pub const REGISTRATION_SUCCESS_PHRASES: [&str; 3] = [
    "Registro exitoso",
    "Registro completado con éxito",
    "Usuario registrado correctamente",
];

const MIN_PASSWORD_LEN: usize = 8;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("static email pattern"))
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CandidateProfile {
    pub ciudad: String,
    pub experiencia: String,
    pub formacion: String,
    pub habilidades: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecruiterProfile {
    pub empresa: String,
    pub cargo: String,
    pub sitio_web: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "rol", rename_all = "lowercase")]
pub enum Profile {
    Candidato(CandidateProfile),
    Reclutador(RecruiterProfile),
}

/// Values typed into the `/registro/` form. Empty strings are left untyped.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub telefono: String,
    pub profile: Profile,
}

impl RegistrationForm {
    /// Only username, email and the two password fields filled in.
    pub fn credentials_only(role: Role, username: &str, email: &str, password: &str) -> Self {
        let profile = match role {
            Role::Candidato => Profile::Candidato(CandidateProfile::default()),
            Role::Reclutador => Profile::Reclutador(RecruiterProfile::default()),
        };
        Self {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: password.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            telefono: String::new(),
            profile,
        }
    }

    pub fn candidate(username: &str, email: &str, password: &str) -> Self {
        Self {
            first_name: "Test".into(),
            last_name: "User".into(),
            telefono: "3101234567".into(),
            profile: Profile::Candidato(CandidateProfile {
                ciudad: "Bogotá".into(),
                experiencia: "2 años".into(),
                formacion: "Ingeniería".into(),
                habilidades: "Python, Selenium".into(),
            }),
            ..Self::credentials_only(Role::Candidato, username, email, password)
        }
    }

    pub fn recruiter(username: &str, email: &str, password: &str) -> Self {
        Self {
            first_name: "Carlos".into(),
            last_name: "Gómez".into(),
            telefono: "987654321".into(),
            profile: Profile::Reclutador(RecruiterProfile {
                empresa: "TechCorp".into(),
                cargo: "Gerente de TI".into(),
                sitio_web: "https://techcorp.com".into(),
            }),
            ..Self::credentials_only(Role::Reclutador, username, email, password)
        }
    }

    pub fn role(&self) -> Role {
        match self.profile {
            Profile::Candidato(_) => Role::Candidato,
            Profile::Reclutador(_) => Role::Reclutador,
        }
    }

    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(self.username.clone(), self.email.clone())
    }

    /// `(element id, value)` pairs in on-screen order, role selector excluded.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("username", self.username.as_str()),
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
            ("confirmPassword", self.confirm_password.as_str()),
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
            ("telefono", self.telefono.as_str()),
        ];
        match &self.profile {
            Profile::Candidato(p) => fields.extend([
                ("ciudad", p.ciudad.as_str()),
                ("experiencia", p.experiencia.as_str()),
                ("formacion", p.formacion.as_str()),
                ("habilidades", p.habilidades.as_str()),
            ]),
            Profile::Reclutador(p) => fields.extend([
                ("empresa", p.empresa.as_str()),
                ("cargo", p.cargo.as_str()),
                ("sitio_web", p.sitio_web.as_str()),
            ]),
        }
        fields
    }

    /// Fields the portal refuses to submit empty for this role.
    pub fn required_fields(&self) -> Vec<(&'static str, &str)> {
        let optional: &[&str] = match self.profile {
            Profile::Candidato(_) => &[],
            Profile::Reclutador(_) => &["sitio_web"],
        };
        self.fields()
            .into_iter()
            .skip(4)
            .filter(|(id, _)| !optional.contains(id))
            .collect()
    }

    /// Blanks one field by element id. Unknown ids are ignored.
    pub fn clear(&mut self, id: &str) {
        let slot = match (id, &mut self.profile) {
            ("username", _) => &mut self.username,
            ("email", _) => &mut self.email,
            ("password", _) => &mut self.password,
            ("confirmPassword", _) => &mut self.confirm_password,
            ("first_name", _) => &mut self.first_name,
            ("last_name", _) => &mut self.last_name,
            ("telefono", _) => &mut self.telefono,
            ("ciudad", Profile::Candidato(p)) => &mut p.ciudad,
            ("experiencia", Profile::Candidato(p)) => &mut p.experiencia,
            ("formacion", Profile::Candidato(p)) => &mut p.formacion,
            ("habilidades", Profile::Candidato(p)) => &mut p.habilidades,
            ("empresa", Profile::Reclutador(p)) => &mut p.empresa,
            ("cargo", Profile::Reclutador(p)) => &mut p.cargo,
            ("sitio_web", Profile::Reclutador(p)) => &mut p.sitio_web,
            _ => return,
        };
        slot.clear();
    }

    /// Differences between what was submitted and the stored user row.
    /// A missing role counts as a difference.
    pub fn diff(&self, record: &UserRecord) -> Vec<String> {
        let mut out = Vec::new();
        for (field, stored, submitted) in [
            ("username", &record.username, &self.username),
            ("email", &record.email, &self.email),
            ("first_name", &record.first_name, &self.first_name),
            ("last_name", &record.last_name, &self.last_name),
        ] {
            if stored != submitted {
                out.push(format!("{} {:?} != {:?}", field, stored, submitted));
            }
        }
        match record.rol.as_deref() {
            Some(rol) if rol == self.role().as_str() => {}
            Some(rol) => out.push(format!("rol {:?} != {:?}", rol, self.role().as_str())),
            None => out.push(format!("rol missing, registered as {:?}", self.role().as_str())),
        }
        out
    }

    /// The error toast the portal shows for this form, in the order the portal
    /// checks its rules, or `None` when the form passes client-side validation.
    pub fn expected_rejection(&self) -> Option<&'static str> {
        if self.username.trim().is_empty() {
            return Some(MSG_USERNAME_REQUIRED);
        }
        if self.email.trim().is_empty() || !email_pattern().is_match(&self.email) {
            return Some(MSG_INVALID_EMAIL);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Some(MSG_PASSWORD_TOO_SHORT);
        }
        if self.password != self.confirm_password {
            return Some(MSG_PASSWORD_MISMATCH);
        }
        if self
            .required_fields()
            .iter()
            .any(|(_, value)| value.trim().is_empty())
        {
            return Some(MSG_REQUIRED_FIELDS);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "TestPassword123!";

    #[test]
    fn complete_forms_pass_client_validation() {
        let candidate = RegistrationForm::candidate("c1", "c1@example.com", PASSWORD);
        let recruiter = RegistrationForm::recruiter("r1", "r1@example.com", PASSWORD);
        assert_eq!(candidate.expected_rejection(), None);
        assert_eq!(recruiter.expected_rejection(), None);
        assert_eq!(candidate.role(), Role::Candidato);
        assert_eq!(recruiter.role(), Role::Reclutador);
    }

    #[test]
    fn every_required_field_left_empty_is_rejected() {
        for base in [
            RegistrationForm::candidate("c1", "c1@example.com", PASSWORD),
            RegistrationForm::recruiter("r1", "r1@example.com", PASSWORD),
        ] {
            for (id, _) in base.required_fields() {
                let mut form = base.clone();
                form.clear(id);
                assert_eq!(
                    form.expected_rejection(),
                    Some(MSG_REQUIRED_FIELDS),
                    "{} left empty for {}",
                    id,
                    base.role()
                );
            }
        }
    }

    #[test]
    fn recruiter_website_is_optional() {
        let mut form = RegistrationForm::recruiter("r1", "r1@example.com", PASSWORD);
        form.clear("sitio_web");
        assert_eq!(form.expected_rejection(), None);
    }

    #[test]
    fn credentials_only_form_is_rejected_for_both_roles() {
        for role in [Role::Candidato, Role::Reclutador] {
            let form = RegistrationForm::credentials_only(role, "u", "u@example.com", PASSWORD);
            assert_eq!(form.expected_rejection(), Some(MSG_REQUIRED_FIELDS));
        }
    }

    #[test]
    fn rules_apply_in_portal_order() {
        let mut form = RegistrationForm::candidate("c1", "invalid_email", PASSWORD);
        assert_eq!(form.expected_rejection(), Some(MSG_INVALID_EMAIL));

        form.clear("username");
        assert_eq!(form.expected_rejection(), Some(MSG_USERNAME_REQUIRED));

        let mut short = RegistrationForm::candidate("c1", "c1@example.com", "short");
        assert_eq!(short.expected_rejection(), Some(MSG_PASSWORD_TOO_SHORT));

        short.password = PASSWORD.into();
        assert_eq!(short.expected_rejection(), Some(MSG_PASSWORD_MISMATCH));
    }

    fn stored(form: &RegistrationForm) -> UserRecord {
        UserRecord {
            id: 3,
            username: form.username.clone(),
            email: form.email.clone(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            rol: Some(form.role().as_str().into()),
        }
    }

    #[test]
    fn stored_user_matching_the_form_has_no_diff() {
        let form = RegistrationForm::recruiter("r1", "r1@example.com", PASSWORD);
        assert!(form.diff(&stored(&form)).is_empty());
    }

    #[test]
    fn wrong_names_and_missing_role_are_reported() {
        let form = RegistrationForm::recruiter("r1", "r1@example.com", PASSWORD);
        let mut record = stored(&form);
        record.first_name = "WRONG".into();
        record.last_name = "ALSO_WRONG".into();
        record.rol = None;

        let diff = form.diff(&record);
        assert_eq!(diff.len(), 3);
        assert!(diff[0].starts_with("first_name"));
        assert!(diff[1].starts_with("last_name"));
        assert!(diff[2].contains("reclutador"));
    }

    #[test]
    fn fields_follow_role_layout() {
        let form = RegistrationForm::recruiter("r1", "r1@example.com", PASSWORD);
        let ids: Vec<_> = form.fields().into_iter().map(|(id, _)| id).collect();
        assert!(ids.contains(&"empresa"));
        assert!(!ids.contains(&"ciudad"));
        assert_eq!(ids[0], "username");
    }
}
