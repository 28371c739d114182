use crate::error::{Error, Result};
use crate::models::user::UserIdentity;
use crate::models::vacancy::VacancyKey;
use serde::Serialize;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioState {
    Idle,
    FormFilled,
    Submitted,
    AwaitingSignal,
    Verified,
    TimedOut,
    SignalMismatch,
    DatabaseChecked,
    DatabaseMismatch,
    Cleaned,
}

impl ScenarioState {
    pub fn can_advance_to(self, next: ScenarioState) -> bool {
        use ScenarioState::*;
        match (self, next) {
            // cleanup runs on every path
            (_, Cleaned) => self != Cleaned,
            (Idle, FormFilled) => true,
            (FormFilled, Submitted) => true,
            (Submitted, AwaitingSignal) => true,
            (AwaitingSignal, Verified | TimedOut | SignalMismatch) => true,
            (Verified, DatabaseChecked | DatabaseMismatch | FormFilled) => true,
            (DatabaseChecked, FormFilled) => true,
            _ => false,
        }
    }
}

/// A scenario in flight: its state trace plus everything it created.
#[derive(Debug)]
pub struct ScenarioRun {
    name: String,
    started: Instant,
    trace: Vec<ScenarioState>,
    created_users: Vec<UserIdentity>,
    created_vacancies: Vec<VacancyKey>,
}

impl ScenarioRun {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: Instant::now(),
            trace: vec![ScenarioState::Idle],
            created_users: Vec::new(),
            created_vacancies: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn state(&self) -> ScenarioState {
        *self.trace.last().unwrap_or(&ScenarioState::Idle)
    }

    pub fn trace(&self) -> &[ScenarioState] {
        &self.trace
    }

    pub fn advance(&mut self, next: ScenarioState) -> Result<()> {
        let current = self.state();
        if !current.can_advance_to(next) {
            return Err(Error::Internal(format!(
                "scenario {}: illegal transition {:?} -> {:?}",
                self.name, current, next
            )));
        }
        tracing::debug!(scenario = %self.name, from = ?current, to = ?next, "state");
        self.trace.push(next);
        Ok(())
    }

    pub fn record_user(&mut self, identity: UserIdentity) {
        if !self.created_users.contains(&identity) {
            self.created_users.push(identity);
        }
    }

    pub fn record_vacancy(&mut self, key: VacancyKey) {
        if !self.created_vacancies.contains(&key) {
            self.created_vacancies.push(key);
        }
    }

    pub fn created_users(&self) -> &[UserIdentity] {
        &self.created_users
    }

    pub fn created_vacancies(&self) -> &[VacancyKey] {
        &self.created_vacancies
    }
}
