//! Live runs against a real portal, chromedriver and Postgres. Ignored by default:
//! `cargo test --test portal_e2e_test -- --ignored --test-threads=1`.

use portal_e2e::config::Config;
use portal_e2e::services::record_service::PgRecordStore;
use portal_e2e::webdriver::WebDriverClient;
use portal_e2e::{ScenarioKind, Suite};

async fn run_live(kind: ScenarioKind) {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("portal_e2e=debug"))
        .with_test_writer()
        .try_init();

    let config = Config::from_env().expect("config");
    let launcher = WebDriverClient::from_config(&config).expect("webdriver client");
    let store = PgRecordStore::new(config.database_url.clone());

    let report = Suite::new(&config, &launcher, &store).run(&[kind]).await;

    let scenario = &report.scenarios[0];
    assert!(
        scenario.passed,
        "{} failed: {:?}",
        scenario.name,
        scenario.failure
    );
    assert!(
        report.teardown.is_clean(),
        "teardown left records behind: {:?}",
        report.teardown
    );
}

#[tokio::test]
#[ignore]
async fn register_empty_fields_candidato() {
    run_live(ScenarioKind::RegisterEmptyFieldsCandidato).await;
}

#[tokio::test]
#[ignore]
async fn register_empty_fields_reclutador() {
    run_live(ScenarioKind::RegisterEmptyFieldsReclutador).await;
}

#[tokio::test]
#[ignore]
async fn register_invalid_email() {
    run_live(ScenarioKind::RegisterInvalidEmail).await;
}

#[tokio::test]
#[ignore]
async fn register_candidato() {
    run_live(ScenarioKind::RegisterCandidato).await;
}

#[tokio::test]
#[ignore]
async fn register_reclutador() {
    run_live(ScenarioKind::RegisterReclutador).await;
}

#[tokio::test]
#[ignore]
async fn publish_vacancy_empty_fields() {
    run_live(ScenarioKind::PublishVacancyEmptyFields).await;
}

#[tokio::test]
#[ignore]
async fn publish_two_vacancies() {
    run_live(ScenarioKind::PublishTwoVacancies).await;
}

#[tokio::test]
#[ignore]
async fn backend_is_reachable() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("config");
    let probe = portal_e2e::services::diagnostics_service::probe_backend(&config.database_url)
        .await
        .expect("probe");
    assert!(probe
        .public_tables
        .iter()
        .any(|t| t == "usuarios_usuario"));
}
