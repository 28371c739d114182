use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

use crate::error::{Error, FailureKind, Result};
use crate::models::scenario::{ScenarioRun, ScenarioState};
use crate::services::cleanup_service::{CleanupFailure, TeardownReport};
use crate::utils::time::elapsed_ms;
use crate::webdriver::Diagnostics;

#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub kind: FailureKind,
    pub message: String,
    pub current_url: Option<String>,
    pub page_excerpt: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub passed: bool,
    pub duration_ms: u64,
    pub states: Vec<ScenarioState>,
    pub failure: Option<FailureReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cleanup_failures: Vec<CleanupFailure>,
}

impl ScenarioReport {
    pub fn from_run(
        run: &ScenarioRun,
        outcome: &Result<()>,
        diagnostics: Option<&Diagnostics>,
        cleanup: &TeardownReport,
    ) -> Self {
        let failure = outcome.as_ref().err().map(|e| FailureReport {
            kind: e.kind(),
            message: e.to_string(),
            current_url: diagnostics.and_then(|d| d.current_url.clone()),
            page_excerpt: diagnostics.and_then(Diagnostics::page_excerpt),
        });
        Self {
            name: run.name().to_string(),
            passed: failure.is_none(),
            duration_ms: elapsed_ms(run.started()),
            states: run.trace().to_vec(),
            failure,
            cleanup_failures: cleanup.failures.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub scenarios: Vec<ScenarioReport>,
    pub teardown: TeardownReport,
}

impl SuiteReport {
    pub fn new(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        duration_ms: u64,
        scenarios: Vec<ScenarioReport>,
        teardown: TeardownReport,
    ) -> Self {
        let passed = scenarios.iter().filter(|s| s.passed).count();
        Self {
            started_at,
            finished_at,
            total: scenarios.len(),
            passed,
            failed: scenarios.len() - passed,
            duration_ms,
            scenarios,
            teardown,
        }
    }

    /// Every scenario passed. Teardown is judged separately through `teardown.is_clean()`.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioReport> {
        self.scenarios.iter().filter(|s| !s.passed)
    }

    /// Writes the report as pretty JSON, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(self)?;
        std::fs::write(path, body).map_err(|e| {
            Error::Internal(format!("could not write report to {}: {}", path.display(), e))
        })?;
        tracing::info!(path = %path.display(), "report written");
        Ok(())
    }
}
