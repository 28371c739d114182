use serde::Serialize;

use crate::models::vacancy::{VacancyKey, VacancyRecord};

pub const MSG_VACANCY_PUBLISHED: &str = "Vacante publicada exitosamente";

/// Values typed into the recruiter's vacancy form.
#[derive(Debug, Clone, Serialize)]
pub struct VacancyForm {
    pub titulo: String,
    pub ubicacion: String,
    pub descripcion: String,
    pub requisitos: String,
    pub tipo_contrato: String,
}

impl VacancyForm {
    pub fn new(
        titulo: &str,
        ubicacion: &str,
        descripcion: &str,
        requisitos: &str,
        tipo_contrato: &str,
    ) -> Self {
        Self {
            titulo: titulo.to_string(),
            ubicacion: ubicacion.to_string(),
            descripcion: descripcion.to_string(),
            requisitos: requisitos.to_string(),
            tipo_contrato: tipo_contrato.to_string(),
        }
    }

    /// Appends a run tag to the title so repeated runs never collide on the lookup key.
    pub fn tagged(mut self, tag: &str) -> Self {
        self.titulo = format!("{} [{}]", self.titulo, tag);
        self
    }

    pub fn key(&self) -> VacancyKey {
        VacancyKey {
            title: self.titulo.clone(),
            description: self.descripcion.clone(),
            requirements: self.requisitos.clone(),
        }
    }

    /// Text inputs in on-screen order; the contract type select is handled separately.
    pub fn text_fields(&self) -> [(&'static str, &str); 4] {
        [
            ("titulo-vacante", self.titulo.as_str()),
            ("ubicacion-vacante", self.ubicacion.as_str()),
            ("descripcion-vacante", self.descripcion.as_str()),
            ("requisitos-vacante", self.requisitos.as_str()),
        ]
    }

    /// Differences between what was submitted and what got stored.
    pub fn diff(&self, record: &VacancyRecord) -> Vec<String> {
        let mut out = Vec::new();
        if record.title != self.titulo {
            out.push(format!("title {:?} != {:?}", record.title, self.titulo));
        }
        if record.description != self.descripcion {
            out.push(format!(
                "description {:?} != {:?}",
                record.description, self.descripcion
            ));
        }
        if record.requirements != self.requisitos {
            out.push(format!(
                "requirements {:?} != {:?}",
                record.requirements, self.requisitos
            ));
        }
        if let Some(location) = &record.location {
            if location != &self.ubicacion {
                out.push(format!("location {:?} != {:?}", location, self.ubicacion));
            }
        }
        out
    }

    pub fn standard_pair() -> [VacancyForm; 2] {
        [
            VacancyForm::new(
                "Desarrollador Python Senior",
                "Bogotá",
                "Buscamos desarrollador con experiencia en Django",
                "Experiencia de 5+ años en Python",
                "Tiempo Completo",
            ),
            VacancyForm::new(
                "Diseñador UX/UI",
                "Bogotá",
                "Buscamos diseñador creativo para equipo de producto",
                "Portafolio de proyectos, conocimiento de Figma",
                "Freelance",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(form: &VacancyForm) -> VacancyRecord {
        VacancyRecord {
            id: 7,
            title: form.titulo.clone(),
            location: Some(form.ubicacion.clone()),
            description: form.descripcion.clone(),
            requirements: form.requisitos.clone(),
            contract_type: Some("tiempo_completo".into()),
        }
    }

    #[test]
    fn identical_record_has_no_diff() {
        let [form, _] = VacancyForm::standard_pair();
        let record = stored(&form);
        assert!(form.diff(&record).is_empty());
    }

    #[test]
    fn swapped_requirements_are_reported() {
        let [first, second] = VacancyForm::standard_pair();
        let mut record = stored(&first);
        record.requirements = second.requisitos.clone();
        let diff = first.diff(&record);
        assert_eq!(diff.len(), 1);
        assert!(diff[0].starts_with("requirements"));
    }

    #[test]
    fn tagging_changes_only_the_title() {
        let [form, _] = VacancyForm::standard_pair();
        let tagged = form.clone().tagged("e2e_1");
        assert_eq!(tagged.titulo, "Desarrollador Python Senior [e2e_1]");
        assert_eq!(tagged.descripcion, form.descripcion);
    }
}
