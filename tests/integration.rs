// SPDX-License-Identifier: MPL-2.0
use folio_sync::config::{self, Config, PersistenceConfig, RemoteConfig};
use folio_sync::domain::Language;
use folio_sync::persistence::{FileStorage, PersistenceGateway, RehydrateOutcome};
use folio_sync::selectors::{self, Selectors};
use folio_sync::store::{SettlementPolicy, Store};
use folio_sync::sync::spawn_language_sync;
use folio_sync::theming::ThemePreference;
use folio_sync::transport::HttpFetcher;
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn http_store(base_url: String) -> Store {
    let remote = RemoteConfig {
        base_url,
        settlement_policy: SettlementPolicy::LatestDispatched,
    };
    let fetcher = HttpFetcher::new().expect("Failed to build HTTP client");
    Store::new(Arc::new(fetcher), &remote)
}

fn file_gateway(dir: &std::path::Path) -> PersistenceGateway {
    PersistenceGateway::new(
        Arc::new(FileStorage::new(dir)),
        PersistenceConfig::default(),
    )
}

async fn wait_for_profile(store: &Store, name: &str) {
    let mut rx = store.subscribe();
    tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|state| {
            (*state.profile.data)
                .as_ref()
                .is_some_and(|p| p.name == name)
        }),
    )
    .await
    .expect("timed out waiting for profile")
    .expect("store dropped");
}

#[tokio::test]
async fn test_spanish_education_is_fetched_from_language_path() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/es/education.json");
            then.status(200).json_body(json!([
                {"institution": "Universidad de Sevilla", "degree": "Ingeniería", "certificate": "https://cert/1"},
                {"institution": "Coursera", "degree": "Rust"}
            ]));
        })
        .await;

    let store = http_store(server.base_url());
    store.set_language(Language::Es);
    let handle = store.fetch_education(store.settings().language);
    assert!(store.state().education.loading);

    handle.await.expect("fetch task panicked");
    mock.assert_async().await;

    let state = store.state();
    assert!(!state.education.loading);
    assert_eq!(state.education.error, None);
    assert_eq!(state.education.data.len(), 2);
    assert_eq!(state.education.data[0].institution, "Universidad de Sevilla");

    let certified = Selectors::default().education_with_certificates(&state);
    assert_eq!(certified.len(), 1);
}

#[tokio::test]
async fn test_server_error_surfaces_status_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/en/profile.json");
            then.status(500);
        })
        .await;

    let store = http_store(server.base_url());
    store
        .fetch_profile(Language::En)
        .await
        .expect("fetch task panicked");

    let state = store.state();
    assert!(!state.profile.loading);
    assert!(state.profile.data.is_none());
    assert_eq!(
        selectors::select_profile_error(&state),
        Some("Request failed with status code 500")
    );
}

#[tokio::test]
async fn test_failed_refetch_keeps_previous_data() {
    let server = MockServer::start_async().await;
    let mut mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/en/workxp.json");
            then.status(200).json_body(json!([
                {"company": "Acme", "position": "Engineer", "endDate": "Present"}
            ]));
        })
        .await;

    let store = http_store(server.base_url());
    store
        .fetch_work_experience(Language::En)
        .await
        .expect("fetch task panicked");
    assert_eq!(store.state().work_experience.data.len(), 1);

    // With the route gone the host answers 404.
    mock.delete_async().await;
    store
        .fetch_work_experience(Language::En)
        .await
        .expect("fetch task panicked");

    let state = store.state();
    assert!(!state.work_experience.loading);
    assert_eq!(
        state.work_experience.error.as_deref(),
        Some("Request failed with status code 404")
    );
    assert_eq!(state.work_experience.data.len(), 1);
    let current = Selectors::default().current_position(&state);
    assert_eq!(
        (*current).as_ref().map(|job| job.company.as_str()),
        Some("Acme")
    );
}

#[tokio::test]
async fn test_settings_survive_restart_with_file_storage() {
    let dir = tempdir().expect("Failed to create temporary directory");

    // 1. First launch: nothing stored, change both preferences.
    {
        let store = http_store("http://127.0.0.1:9".to_string());
        let gateway = file_gateway(dir.path());
        let (outcome, writer) = gateway.start(&store).await;
        assert_eq!(outcome, RehydrateOutcome::Empty);
        assert!(gateway.gate().is_open());

        store.set_theme(ThemePreference::Dark);
        store.set_language(Language::Es);
        drop(store);
        writer.await.expect("writer panicked");
    }

    // 2. Second launch restores them before the gate opens.
    let store = http_store("http://127.0.0.1:9".to_string());
    let gateway = file_gateway(dir.path());
    let gate = gateway.gate();
    assert!(!gate.is_open());
    let (outcome, _writer) = gateway.start(&store).await;
    gate.wait().await;

    assert_eq!(outcome, RehydrateOutcome::Restored);
    assert_eq!(store.settings().theme, ThemePreference::Dark);
    assert_eq!(store.settings().language, Language::Es);

    // 3. Purge removes the entry; a third launch starts from defaults.
    gateway.purge().await.expect("Failed to purge settings");
    let store = http_store("http://127.0.0.1:9".to_string());
    let (outcome, _writer) = file_gateway(dir.path()).start(&store).await;
    assert_eq!(outcome, RehydrateOutcome::Empty);
    assert_eq!(store.settings().theme, ThemePreference::System);
    assert_eq!(store.settings().language, Language::En);
}

#[tokio::test]
async fn test_language_change_refetches_over_http() {
    let server = MockServer::start_async().await;
    for (lang, name) in [("en", "Ada"), ("es", "Ada ES")] {
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/{lang}/profile.json"));
                then.status(200).json_body(json!({"name": name}));
            })
            .await;
        for resource in ["education", "workxp"] {
            server
                .mock_async(|when, then| {
                    when.method(GET).path(format!("/{lang}/{resource}.json"));
                    then.status(200).json_body(json!([]));
                })
                .await;
        }
    }

    let store = http_store(server.base_url());
    let _sync = spawn_language_sync(&store);

    wait_for_profile(&store, "Ada").await;
    store.set_language(Language::Es);
    wait_for_profile(&store, "Ada ES").await;
}

#[test]
fn test_config_round_trip_through_file() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("folio_sync.toml");

    let mut config = Config::default();
    config.remote.base_url = "https://data.example.org/portfolio".to_string();
    config.remote.settlement_policy = SettlementPolicy::LastSettled;
    config.persistence.rehydrate_timeout_ms = Some(250);
    config::save_to_path(&config, &path).expect("Failed to write config file");

    let loaded = config::load_from_path(&path).expect("Failed to load config from path");
    assert_eq!(loaded.remote.base_url, "https://data.example.org/portfolio");
    assert_eq!(loaded.remote.settlement_policy, SettlementPolicy::LastSettled);
    assert_eq!(
        loaded.persistence.rehydrate_timeout(),
        Some(Duration::from_millis(250))
    );
}
