use std::fmt;
use std::str::FromStr;
use tokio::time::Instant;

use crate::config::Config;
use crate::dto::login_dto::Credentials;
use crate::dto::registration_dto::{RegistrationForm, MSG_INVALID_EMAIL, REGISTRATION_SUCCESS_PHRASES};
use crate::dto::vacancy_dto::VacancyForm;
use crate::error::{Error, Result};
use crate::models::scenario::{ScenarioRun, ScenarioState};
use crate::models::signal::ExpectedOutcome;
use crate::models::user::Role;
use crate::services::cleanup_service::{purge, IdentityRegistry};
use crate::services::record_service::RecordStore;
use crate::services::report_service::{ScenarioReport, SuiteReport};
use crate::services::verifier_service::Verifier;
use crate::utils::identity::{email_for, unique_username};
use crate::utils::time::{elapsed_ms, now};
use crate::webdriver::{BrowserLauncher, Diagnostics};

/// The user journeys the suite knows how to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    RegisterEmptyFieldsCandidato,
    RegisterEmptyFieldsReclutador,
    RegisterInvalidEmail,
    RegisterCandidato,
    RegisterReclutador,
    PublishVacancyEmptyFields,
    PublishTwoVacancies,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 7] = [
        ScenarioKind::RegisterEmptyFieldsCandidato,
        ScenarioKind::RegisterEmptyFieldsReclutador,
        ScenarioKind::RegisterInvalidEmail,
        ScenarioKind::RegisterCandidato,
        ScenarioKind::RegisterReclutador,
        ScenarioKind::PublishVacancyEmptyFields,
        ScenarioKind::PublishTwoVacancies,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScenarioKind::RegisterEmptyFieldsCandidato => "register-empty-fields-candidato",
            ScenarioKind::RegisterEmptyFieldsReclutador => "register-empty-fields-reclutador",
            ScenarioKind::RegisterInvalidEmail => "register-invalid-email",
            ScenarioKind::RegisterCandidato => "register-candidato",
            ScenarioKind::RegisterReclutador => "register-reclutador",
            ScenarioKind::PublishVacancyEmptyFields => "publish-vacancy-empty-fields",
            ScenarioKind::PublishTwoVacancies => "publish-two-vacancies",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ScenarioKind::RegisterEmptyFieldsCandidato => {
                "candidate registration with only credentials is rejected and not stored"
            }
            ScenarioKind::RegisterEmptyFieldsReclutador => {
                "recruiter registration with only credentials is rejected and not stored"
            }
            ScenarioKind::RegisterInvalidEmail => {
                "registration with a malformed email is rejected and not stored"
            }
            ScenarioKind::RegisterCandidato => {
                "candidate registers, is stored once, then logs in to /candidato"
            }
            ScenarioKind::RegisterReclutador => {
                "recruiter registers, is stored once, then logs in to /reclutador"
            }
            ScenarioKind::PublishVacancyEmptyFields => {
                "recruiter publishes an empty vacancy form and nothing is stored"
            }
            ScenarioKind::PublishTwoVacancies => {
                "recruiter publishes two vacancies that are stored as distinct rows"
            }
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ScenarioKind::ALL
            .into_iter()
            .find(|k| k.name() == s.trim())
            .ok_or_else(|| Error::Config(format!("unknown scenario: {}", s)))
    }
}

/// Runs scenarios one after another, each in a fresh browser, then tears down
/// everything the run created.
pub struct Suite<'a> {
    config: &'a Config,
    launcher: &'a dyn BrowserLauncher,
    store: &'a dyn RecordStore,
}

impl<'a> Suite<'a> {
    pub fn new(config: &'a Config, launcher: &'a dyn BrowserLauncher, store: &'a dyn RecordStore) -> Self {
        Self {
            config,
            launcher,
            store,
        }
    }

    pub async fn run(&self, kinds: &[ScenarioKind]) -> SuiteReport {
        let started_at = now();
        let clock = Instant::now();
        let mut registry = IdentityRegistry::new();
        tracing::info!(scenarios = kinds.len(), "suite starting");

        let mut scenarios = Vec::with_capacity(kinds.len());
        for kind in kinds {
            scenarios.push(self.run_scenario(*kind, &mut registry).await);
        }

        let teardown = registry.teardown(self.store).await;
        let report = SuiteReport::new(started_at, now(), elapsed_ms(clock), scenarios, teardown);
        tracing::info!(
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            duration_ms = report.duration_ms,
            "suite finished"
        );
        report
    }

    /// One scenario end to end. The browser is closed and the scenario's records
    /// are deleted on every path.
    pub async fn run_scenario(&self, kind: ScenarioKind, registry: &mut IdentityRegistry) -> ScenarioReport {
        let mut run = ScenarioRun::new(kind.name());
        tracing::info!(scenario = kind.name(), "{}", kind.description());

        let browser = match self.launcher.launch().await {
            Ok(browser) => browser,
            Err(e) => {
                tracing::error!(scenario = kind.name(), error = %e, "could not start browser");
                let outcome = Err(e);
                finish(&mut run);
                return ScenarioReport::from_run(&run, &outcome, None, &Default::default());
            }
        };

        let outcome = {
            let verifier = Verifier::new(browser.as_ref(), self.store, self.config);
            self.execute(kind, &verifier, &mut run, registry).await
        };

        let diagnostics = match &outcome {
            Ok(()) => None,
            Err(e) => {
                let diagnostics = Diagnostics::capture(browser.as_ref()).await;
                tracing::error!(
                    scenario = kind.name(),
                    error = %e,
                    state = ?run.state(),
                    url = ?diagnostics.current_url,
                    "scenario failed"
                );
                if let Some(excerpt) = diagnostics.page_excerpt() {
                    tracing::debug!(scenario = kind.name(), page = %excerpt, "page at failure");
                }
                Some(diagnostics)
            }
        };

        let cleanup = purge(self.store, run.created_users(), run.created_vacancies()).await;
        if let Err(e) = browser.quit().await {
            tracing::warn!(scenario = kind.name(), error = %e, "error closing browser");
        }
        finish(&mut run);

        if outcome.is_ok() {
            tracing::info!(scenario = kind.name(), duration_ms = elapsed_ms(run.started()), "scenario passed");
        }
        ScenarioReport::from_run(&run, &outcome, diagnostics.as_ref(), &cleanup)
    }

    async fn execute(
        &self,
        kind: ScenarioKind,
        verifier: &Verifier<'_>,
        run: &mut ScenarioRun,
        registry: &mut IdentityRegistry,
    ) -> Result<()> {
        let password = self.config.test_password.as_str();
        match kind {
            ScenarioKind::RegisterEmptyFieldsCandidato | ScenarioKind::RegisterEmptyFieldsReclutador => {
                let role = if kind == ScenarioKind::RegisterEmptyFieldsCandidato {
                    Role::Candidato
                } else {
                    Role::Reclutador
                };
                let username = unique_username(&format!("test_{}", role));
                let form = RegistrationForm::credentials_only(role, &username, &email_for(&username), password);
                let expected = rejection_for(&form)?;
                verifier.register(run, registry, &form, &expected).await
            }
            ScenarioKind::RegisterInvalidEmail => {
                let username = unique_username("invalid_user");
                let email = format!("{}_invalid_email", username);
                let form = RegistrationForm::candidate(&username, &email, password);
                verifier
                    .register(run, registry, &form, &ExpectedOutcome::validation_error(MSG_INVALID_EMAIL))
                    .await
            }
            ScenarioKind::RegisterCandidato | ScenarioKind::RegisterReclutador => {
                let form = if kind == ScenarioKind::RegisterCandidato {
                    let username = unique_username("candidate_test");
                    RegistrationForm::candidate(&username, &email_for(&username), password)
                } else {
                    let username = unique_username("recruiter_test");
                    RegistrationForm::recruiter(&username, &email_for(&username), password)
                };
                let expected = ExpectedOutcome::success(REGISTRATION_SUCCESS_PHRASES);
                verifier.register(run, registry, &form, &expected).await?;
                verifier
                    .login(run, &Credentials::new(&form.username, password), form.role())
                    .await
            }
            ScenarioKind::PublishVacancyEmptyFields => {
                verifier.login_recruiter(run, &self.recruiter()).await?;
                verifier.publish_empty_vacancy(run).await
            }
            ScenarioKind::PublishTwoVacancies => {
                verifier.login_recruiter(run, &self.recruiter()).await?;
                let tag = unique_username("e2e");
                let mut ids = Vec::new();
                for form in VacancyForm::standard_pair() {
                    let record = verifier.publish_vacancy(run, registry, &form.tagged(&tag)).await?;
                    ids.push(record.id);
                }
                if ids.windows(2).any(|pair| pair[0] == pair[1]) {
                    return Err(Error::PersistenceMismatch(format!(
                        "both vacancies resolved to the same row {:?}",
                        ids
                    )));
                }
                Ok(())
            }
        }
    }

    fn recruiter(&self) -> Credentials {
        Credentials::new(&self.config.recruiter_username, &self.config.recruiter_password)
    }
}

fn rejection_for(form: &RegistrationForm) -> Result<ExpectedOutcome> {
    form.expected_rejection()
        .map(ExpectedOutcome::validation_error)
        .ok_or_else(|| Error::Internal(format!("form for {} passes client validation", form.username)))
}

fn finish(run: &mut ScenarioRun) {
    if let Err(e) = run.advance(ScenarioState::Cleaned) {
        tracing::warn!(error = %e, "scenario already cleaned");
    }
}
