// ABOUTME: Integration tests for the client entry point in proxy and direct modes
// ABOUTME: Uses a mock relay server and a temporary local persistence directory
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{init_test_logging, recipe_payload, FakeSource, Reply};
use recipe_relay::client::RecipeClient;
use recipe_relay::config::ClientConfig;
use recipe_relay::errors::FailureKind;
use recipe_relay::models::{HitSource, RecipeId, RetrievalOutcome, SearchQuery};
use recipe_relay::retrieval::{OfflineStore, SyntheticSamples};
use recipe_relay_upstream::RecipeSource;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(local_dir: &Path) -> ClientConfig {
    ClientConfig {
        local_dir: local_dir.to_path_buf(),
        ..ClientConfig::default()
    }
}

fn proxy_config(local_dir: &Path, server: &MockServer) -> ClientConfig {
    ClientConfig {
        use_proxy: true,
        proxy_base: format!("{}/api", server.uri()),
        ..config(local_dir)
    }
}

fn samples() -> SyntheticSamples {
    SyntheticSamples::from_json(
        r#"[{"id": 1, "title": "Sample Salad"}, {"id": 2, "title": "Sample Stew"}]"#,
    )
    .unwrap()
}

fn client(config: ClientConfig, source: Option<&Arc<FakeSource>>) -> RecipeClient {
    init_test_logging();
    let source = source.map(|source| -> Arc<dyn RecipeSource> { source.clone() });
    RecipeClient::with_parts(config, reqwest::Client::new(), source, samples())
}

fn id(value: u64) -> RecipeId {
    RecipeId::from(value)
}

async fn mount_info(server: &MockServer, recipe: u64, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/spoonacular/info"))
        .and(query_param("id", recipe.to_string().as_str()))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_proxy_success_saves_local_copy() -> Result<()> {
    let dir = TempDir::new()?;
    let server = MockServer::start().await;
    let payload = recipe_payload(42, "Proxy Paella");
    mount_info(
        &server,
        42,
        ResponseTemplate::new(200)
            .set_body_json(&payload)
            .insert_header("x-recipe-source", "durable"),
    )
    .await;
    let client = client(proxy_config(dir.path(), &server), None);

    let outcome = client.info(&id(42)).await;
    assert_eq!(outcome, RetrievalOutcome::hit(payload.clone(), HitSource::Durable));
    assert_eq!(client.local_store().load(&id(42)).await?, Some(payload));
    assert!(dir.path().join("recipe_cache_42.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_proxy_source_falls_back_to_cache_header() -> Result<()> {
    let dir = TempDir::new()?;
    let server = MockServer::start().await;
    mount_info(
        &server,
        43,
        ResponseTemplate::new(200)
            .set_body_json(json!({"id": 43}))
            .insert_header("x-cache", "HIT"),
    )
    .await;
    let client = client(proxy_config(dir.path(), &server), None);

    assert_eq!(client.info(&id(43)).await.source(), Some(HitSource::Memory));
    Ok(())
}

#[tokio::test]
async fn test_proxy_failure_serves_local_copy() -> Result<()> {
    let dir = TempDir::new()?;
    let server = MockServer::start().await;
    mount_info(&server, 7, ResponseTemplate::new(502).set_body_string("bad gateway")).await;
    let client = client(proxy_config(dir.path(), &server), None);
    let saved = recipe_payload(7, "Saved Soup");
    client.local_store().save(&id(7), &saved).await?;

    let outcome = client.info(&id(7)).await;
    assert_eq!(outcome, RetrievalOutcome::hit(saved, HitSource::OfflineFallback));
    Ok(())
}

#[tokio::test]
async fn test_proxy_html_answer_is_not_trusted() -> Result<()> {
    let dir = TempDir::new()?;
    let server = MockServer::start().await;
    mount_info(
        &server,
        8,
        ResponseTemplate::new(200).set_body_raw("<html>index</html>", "text/html"),
    )
    .await;
    let payload = recipe_payload(8, "Direct Dal");
    let source = FakeSource::new().full(Reply::json(200, &payload)).shared();
    let client = client(proxy_config(dir.path(), &server), Some(&source));

    let outcome = client.info(&id(8)).await;
    assert_eq!(outcome, RetrievalOutcome::hit(payload, HitSource::Upstream));
    assert_eq!(source.full_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_proxy_not_found_is_terminal() -> Result<()> {
    let dir = TempDir::new()?;
    let server = MockServer::start().await;
    mount_info(
        &server,
        404,
        ResponseTemplate::new(404).set_body_json(json!({"error": {"code": "RESOURCE_NOT_FOUND"}})),
    )
    .await;
    let source = FakeSource::new().shared();
    let client = client(proxy_config(dir.path(), &server), Some(&source));

    let outcome = client.info(&id(404)).await;
    assert_eq!(outcome.failure().expect("failure").kind, FailureKind::NotFound);
    assert_eq!(source.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_direct_mode_without_credential_is_misconfigured() -> Result<()> {
    let dir = TempDir::new()?;
    let client = client(config(dir.path()), None);

    let failure = client.info(&id(1)).await.failure().cloned().expect("failure");
    assert_eq!(failure.kind, FailureKind::MisconfiguredDependency);
    assert_eq!(failure.http_status(), 500);
    Ok(())
}

#[tokio::test]
async fn test_direct_mode_uses_local_copy_as_offline_tier() -> Result<()> {
    let dir = TempDir::new()?;
    let source = FakeSource::new().full(Reply::status(429)).shared();
    let client = client(config(dir.path()), Some(&source));
    let saved = recipe_payload(9, "Offline Omelette");
    client.local_store().save(&id(9), &saved).await?;

    let outcome = client.info(&id(9)).await;
    assert_eq!(outcome, RetrievalOutcome::hit(saved, HitSource::OfflineFallback));
    Ok(())
}

#[tokio::test]
async fn test_direct_success_is_saved_locally() -> Result<()> {
    let dir = TempDir::new()?;
    let payload = recipe_payload(10, "Fresh Focaccia");
    let source = FakeSource::new().full(Reply::json(200, &payload)).shared();
    let client = client(config(dir.path()), Some(&source));

    assert_eq!(client.info(&id(10)).await.source(), Some(HitSource::Upstream));
    assert_eq!(client.local_store().load(&id(10)).await?, Some(payload));
    Ok(())
}

#[tokio::test]
async fn test_disabled_upstream_answers_from_local_copy_only() -> Result<()> {
    let dir = TempDir::new()?;
    let source = FakeSource::new().shared();
    let client = client(
        ClientConfig {
            upstream_disabled: true,
            ..config(dir.path())
        },
        Some(&source),
    );

    let missing = client.info(&id(11)).await;
    assert_eq!(
        missing.failure().expect("failure").kind,
        FailureKind::MisconfiguredDependency
    );

    let saved = json!({"id": 11});
    client.local_store().save(&id(11), &saved).await?;
    let found = client.info(&id(11)).await;
    assert_eq!(found, RetrievalOutcome::hit(saved, HitSource::OfflineFallback));
    assert_eq!(source.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_forced_samples_skip_upstream() -> Result<()> {
    let dir = TempDir::new()?;
    let source = FakeSource::new().shared();
    let client = client(
        ClientConfig {
            force_samples: true,
            ..config(dir.path())
        },
        Some(&source),
    );

    let outcome = client
        .search(&SearchQuery {
            number: Some(1),
            ..SearchQuery::text("anything")
        })
        .await;
    assert_eq!(outcome.source(), Some(HitSource::SyntheticFallback));
    let (payload, _) = outcome.into_result()?;
    assert_eq!(payload["results"].as_array().map(Vec::len), Some(1));
    assert_eq!(payload["totalResults"], 2);
    assert_eq!(source.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_search_failure_answers_with_samples() -> Result<()> {
    let dir = TempDir::new()?;
    let source = FakeSource::new().search(Reply::status(402)).shared();
    let client = client(config(dir.path()), Some(&source));

    let outcome = client.search(&SearchQuery::text("ramen")).await;
    assert_eq!(outcome.source(), Some(HitSource::SyntheticFallback));
    assert_eq!(source.search_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_proxy_search_forwards_query() -> Result<()> {
    let dir = TempDir::new()?;
    let server = MockServer::start().await;
    let results: Value = json!({"results": [{"id": 5}], "offset": 0, "number": 1, "totalResults": 1});
    Mock::given(method("GET"))
        .and(path("/api/spoonacular/search"))
        .and(query_param("q", "tacos"))
        .and(query_param("diet", "vegetarian"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&results))
        .expect(1)
        .mount(&server)
        .await;
    let client = client(proxy_config(dir.path(), &server), None);

    let outcome = client
        .search(&SearchQuery {
            diet: "vegetarian".to_owned(),
            ..SearchQuery::text(" tacos ")
        })
        .await;
    assert_eq!(outcome, RetrievalOutcome::hit(results, HitSource::Upstream));
    Ok(())
}
