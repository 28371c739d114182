use std::collections::HashSet;

use crate::config::Config;
use crate::dto::login_dto::{Credentials, MSG_LOGIN_SUCCESS};
use crate::dto::registration_dto::RegistrationForm;
use crate::dto::vacancy_dto::{VacancyForm, MSG_VACANCY_PUBLISHED};
use crate::error::{Error, Result};
use crate::models::scenario::{ScenarioRun, ScenarioState};
use crate::models::signal::{ExpectedOutcome, Signal, SignalMatch};
use crate::models::user::{Role, UserIdentity};
use crate::models::vacancy::VacancyRecord;
use crate::pages::login_page::{self, LoginPage};
use crate::pages::register_page::{self, RegisterPage};
use crate::pages::vacancy_page::VacancyPage;
use crate::pages::{toast, wait_url_contains};
use crate::services::cleanup_service::IdentityRegistry;
use crate::services::record_service::RecordStore;
use crate::webdriver::{Browser, ElementRef, Wait};

/// Route fragment the portal redirects to after a successful registration.
const POST_REGISTRATION_ROUTE: &str = "login";

/// Drives one browser through portal journeys and checks the backend afterwards.
pub struct Verifier<'a> {
    browser: &'a dyn Browser,
    store: &'a dyn RecordStore,
    config: &'a Config,
    wait: Wait,
}

impl<'a> Verifier<'a> {
    pub fn new(browser: &'a dyn Browser, store: &'a dyn RecordStore, config: &'a Config) -> Self {
        Self {
            browser,
            store,
            config,
            wait: Wait::new(config.wait_timeout(), config.poll_interval()),
        }
    }

    /// Submits the registration form and checks both the toast and the user table.
    ///
    /// The identity is registered for cleanup before submitting, whatever the
    /// expectation, so an unexpected insert is still removed.
    pub async fn register(
        &self,
        run: &mut ScenarioRun,
        registry: &mut IdentityRegistry,
        form: &RegistrationForm,
        expected: &ExpectedOutcome,
    ) -> Result<()> {
        tracing::info!(
            scenario = run.name(),
            role = %form.role(),
            username = %form.username,
            "registering"
        );
        let page = RegisterPage::new(self.browser, &self.wait);
        page.open(&self.config.page_url(register_page::PATH)).await?;
        page.fill(form).await?;
        run.advance(ScenarioState::FormFilled)?;

        let identity = form.identity();
        run.record_user(identity.clone());
        registry.register_user(identity.clone());

        let seen = toast::snapshot(self.browser).await?;
        page.submit().await?;
        run.advance(ScenarioState::Submitted)?;

        let route = expected.is_success().then_some(POST_REGISTRATION_ROUTE);
        self.observe(run, &seen, expected, route).await?;

        if expected.is_success() {
            self.expect_single_user(run, form).await
        } else {
            self.expect_no_user(run, &identity).await
        }
    }

    /// Logs in and requires the success toast plus the redirect to the role's landing route.
    pub async fn login(&self, run: &mut ScenarioRun, credentials: &Credentials, role: Role) -> Result<()> {
        tracing::info!(scenario = run.name(), username = %credentials.username, %role, "logging in");
        let page = LoginPage::new(self.browser, &self.wait);
        page.open(&self.config.page_url(login_page::PATH)).await?;
        page.fill(credentials).await?;
        run.advance(ScenarioState::FormFilled)?;

        let seen = toast::snapshot(self.browser).await?;
        page.submit().await?;
        run.advance(ScenarioState::Submitted)?;

        let expected = ExpectedOutcome::success([MSG_LOGIN_SUCCESS]);
        let landing = role.landing_path();
        self.observe(run, &seen, &expected, Some(landing.as_str())).await?;
        Ok(())
    }

    pub async fn login_recruiter(&self, run: &mut ScenarioRun, credentials: &Credentials) -> Result<()> {
        self.login(run, credentials, Role::Reclutador).await?;
        VacancyPage::new(self.browser, &self.wait)
            .wait_dashboard()
            .await
    }

    /// Publishes one vacancy and returns the single row it produced.
    pub async fn publish_vacancy(
        &self,
        run: &mut ScenarioRun,
        registry: &mut IdentityRegistry,
        form: &VacancyForm,
    ) -> Result<VacancyRecord> {
        tracing::info!(scenario = run.name(), title = %form.titulo, "publishing vacancy");
        let page = VacancyPage::new(self.browser, &self.wait);
        page.open_form().await?;
        page.fill(form).await?;
        run.advance(ScenarioState::FormFilled)?;

        run.record_vacancy(form.key());
        registry.register_vacancy(form.key());

        let seen = toast::snapshot(self.browser).await?;
        page.publish().await?;
        run.advance(ScenarioState::Submitted)?;

        let expected = ExpectedOutcome::success([MSG_VACANCY_PUBLISHED]);
        self.observe(run, &seen, &expected, None).await?;
        self.expect_single_vacancy(run, form).await
    }

    /// Publishes the form untouched: an error toast and an unchanged vacancy count.
    pub async fn publish_empty_vacancy(&self, run: &mut ScenarioRun) -> Result<()> {
        let before = self.store.count_vacancies().await?;
        let page = VacancyPage::new(self.browser, &self.wait);
        page.open_form().await?;
        run.advance(ScenarioState::FormFilled)?;

        let seen = toast::snapshot(self.browser).await?;
        page.publish().await?;
        run.advance(ScenarioState::Submitted)?;

        self.observe(run, &seen, &ExpectedOutcome::any_validation_error(), None)
            .await?;

        let after = self.store.count_vacancies().await?;
        if after != before {
            run.advance(ScenarioState::DatabaseMismatch)?;
            return Err(Error::PersistenceMismatch(format!(
                "vacancy count changed from {} to {} after a rejected submission",
                before, after
            )));
        }
        run.advance(ScenarioState::DatabaseChecked)
    }

    /// Waits for the first new toast (and optionally a route change) and checks it
    /// against `expected`, moving the run to `Verified`, `TimedOut` or `SignalMismatch`.
    async fn observe(
        &self,
        run: &mut ScenarioRun,
        seen: &HashSet<ElementRef>,
        expected: &ExpectedOutcome,
        route: Option<&str>,
    ) -> Result<Signal> {
        run.advance(ScenarioState::AwaitingSignal)?;

        let signal = match toast::await_new(self.browser, &self.wait, seen).await {
            Ok(signal) => signal,
            Err(Error::SignalTimeout { waited, .. }) => {
                run.advance(ScenarioState::TimedOut)?;
                return Err(Error::timeout(expected.to_string(), waited));
            }
            Err(e) => return Err(e),
        };
        tracing::info!(scenario = run.name(), kind = %signal.kind, text = %signal.text, "feedback");

        match expected.check(&signal) {
            SignalMatch::Exact => {}
            SignalMatch::Drifted(phrase) => tracing::warn!(
                scenario = run.name(),
                accepted = %phrase,
                "success toast matched a tolerated alternative wording, not the current copy"
            ),
            SignalMatch::Mismatch => {
                run.advance(ScenarioState::SignalMismatch)?;
                return Err(Error::mismatch(
                    expected.to_string(),
                    format!("{}: {}", signal.kind, signal.text),
                ));
            }
        }

        if let Some(fragment) = route {
            match wait_url_contains(self.browser, &self.wait, fragment).await {
                Ok(url) => tracing::info!(scenario = run.name(), %url, "route changed"),
                Err(e @ Error::SignalTimeout { .. }) => {
                    run.advance(ScenarioState::TimedOut)?;
                    return Err(e);
                }
                Err(e) => return Err(e),
            }
        }

        run.advance(ScenarioState::Verified)?;
        Ok(signal)
    }

    async fn expect_single_user(&self, run: &mut ScenarioRun, form: &RegistrationForm) -> Result<()> {
        let identity = form.identity();
        let users = self.store.find_users(&identity).await?;

        let problem = match users.as_slice() {
            [user] => {
                let diff = form.diff(user);
                (!diff.is_empty())
                    .then(|| format!("user {} stored differently: {}", identity, diff.join("; ")))
            }
            other => Some(format!(
                "expected exactly one user for {}, found {}",
                identity,
                other.len()
            )),
        };

        if let Some(problem) = problem {
            run.advance(ScenarioState::DatabaseMismatch)?;
            return Err(Error::PersistenceMismatch(problem));
        }
        tracing::info!(scenario = run.name(), %identity, "user persisted");
        run.advance(ScenarioState::DatabaseChecked)
    }

    async fn expect_no_user(&self, run: &mut ScenarioRun, identity: &UserIdentity) -> Result<()> {
        let users = self.store.find_users(identity).await?;
        if !users.is_empty() {
            run.advance(ScenarioState::DatabaseMismatch)?;
            return Err(Error::PersistenceMismatch(format!(
                "rejected registration for {} still persisted {} user(s)",
                identity,
                users.len()
            )));
        }
        run.advance(ScenarioState::DatabaseChecked)
    }

    async fn expect_single_vacancy(&self, run: &mut ScenarioRun, form: &VacancyForm) -> Result<VacancyRecord> {
        let key = form.key();
        let mut rows = self.store.find_vacancies(&key).await?;

        if rows.len() != 1 {
            run.advance(ScenarioState::DatabaseMismatch)?;
            return Err(Error::PersistenceMismatch(format!(
                "expected exactly one row for {}, found {}",
                key,
                rows.len()
            )));
        }
        let record = rows.remove(0);
        let diff = form.diff(&record);
        if !diff.is_empty() {
            run.advance(ScenarioState::DatabaseMismatch)?;
            return Err(Error::PersistenceMismatch(format!(
                "{} stored differently: {}",
                key,
                diff.join("; ")
            )));
        }
        tracing::info!(scenario = run.name(), id = record.id, %key, "vacancy persisted");
        run.advance(ScenarioState::DatabaseChecked)?;
        Ok(record)
    }
}
