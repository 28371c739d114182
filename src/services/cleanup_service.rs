use serde::Serialize;

use crate::error::Result;
use crate::models::user::UserIdentity;
use crate::models::vacancy::VacancyKey;
use crate::services::record_service::RecordStore;

/// Everything one suite run created in the backend and still owes a delete.
///
/// Owned by the run and handed to cleanup explicitly; entries are kept after
/// cleanup so the final pass can re-check them.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    users: Vec<UserIdentity>,
    vacancies: Vec<VacancyKey>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanupFailure {
    pub target: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TeardownReport {
    pub users_removed: u64,
    pub vacancies_removed: u64,
    pub failures: Vec<CleanupFailure>,
    /// Records still found after teardown; `None` when the re-check itself failed.
    pub remaining: Option<u64>,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.remaining == Some(0)
    }
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_user(&mut self, identity: UserIdentity) {
        if !self.users.contains(&identity) {
            tracing::debug!(%identity, "registered for cleanup");
            self.users.push(identity);
        }
    }

    pub fn register_vacancy(&mut self, key: VacancyKey) {
        if !self.vacancies.contains(&key) {
            tracing::debug!(%key, "registered for cleanup");
            self.vacancies.push(key);
        }
    }

    pub fn users(&self) -> &[UserIdentity] {
        &self.users
    }

    pub fn vacancies(&self) -> &[VacancyKey] {
        &self.vacancies
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.vacancies.is_empty()
    }

    /// Final pass: delete every registered record, then re-query to prove none remain.
    pub async fn teardown(&self, store: &dyn RecordStore) -> TeardownReport {
        if self.is_empty() {
            tracing::info!("nothing registered for teardown");
            return TeardownReport {
                remaining: Some(0),
                ..Default::default()
            };
        }
        let mut report = purge(store, &self.users, &self.vacancies).await;
        report.remaining = match count_remaining(store, &self.users, &self.vacancies).await {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::error!(error = %e, "could not verify teardown");
                report.failures.push(CleanupFailure {
                    target: "teardown verification".to_string(),
                    error: e.to_string(),
                });
                None
            }
        };
        match report.remaining {
            Some(0) => tracing::info!(
                users = report.users_removed,
                vacancies = report.vacancies_removed,
                "teardown complete, no test records remain"
            ),
            Some(n) => tracing::error!(remaining = n, "test records survived teardown"),
            None => {}
        }
        report
    }
}

/// Deletes the given records one by one. A failing delete is logged and
/// recorded, and the rest still run.
pub async fn purge(
    store: &dyn RecordStore,
    users: &[UserIdentity],
    vacancies: &[VacancyKey],
) -> TeardownReport {
    let mut report = TeardownReport::default();
    for identity in users {
        match store.delete_users(identity).await {
            Ok(n) => {
                tracing::info!(%identity, rows = n, "deleted test user");
                report.users_removed += n;
            }
            Err(e) => {
                tracing::warn!(%identity, error = %e, "error deleting test user, continuing");
                report.failures.push(CleanupFailure {
                    target: identity.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }
    for key in vacancies {
        match store.delete_vacancies(key).await {
            Ok(n) => {
                tracing::info!(%key, rows = n, "deleted test vacancy");
                report.vacancies_removed += n;
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "error deleting test vacancy, continuing");
                report.failures.push(CleanupFailure {
                    target: key.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }
    report
}

async fn count_remaining(
    store: &dyn RecordStore,
    users: &[UserIdentity],
    vacancies: &[VacancyKey],
) -> Result<u64> {
    let mut remaining = 0u64;
    for identity in users {
        remaining += store.find_users(identity).await?.len() as u64;
    }
    for key in vacancies {
        remaining += store.find_vacancies(key).await?.len() as u64;
    }
    Ok(remaining)
}
