mod common;

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

use common::spawn;
use nutriseed_core::loader::records_from_value;
use nutriseed_core::{ApiError, BatchLoader, FirestoreStore, SeedKind};

#[derive(Clone, Default)]
struct Mock {
    commits: Arc<Mutex<Vec<Value>>>,
    fail_on: Option<usize>,
    short_ack: bool,
}

impl Mock {
    fn received(&self) -> Vec<Value> {
        self.commits.lock().unwrap().clone()
    }
}

// Firestore's `documents:commit` path does not fit the router's syntax,
// so everything lands in the fallback and the path is checked by hand.
async fn commit(State(mock): State<Mock>, uri: Uri, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if uri.path() != "/v1/projects/fit-app/databases/(default)/documents:commit" {
        return (StatusCode::NOT_FOUND, format!("unexpected path {}", uri.path())).into_response();
    }
    let auth = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
    if auth != Some("Bearer ya29.test") {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let n = {
        let mut commits = mock.commits.lock().unwrap();
        commits.push(body.clone());
        commits.len()
    };
    if mock.fail_on == Some(n) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": {"code": 503, "message": "The service is currently unavailable.", "status": "UNAVAILABLE"}})),
        )
            .into_response();
    }

    let mut acks = body["writes"].as_array().map(|w| w.len()).unwrap_or(0);
    if mock.short_ack {
        acks = acks.saturating_sub(1);
    }
    let results: Vec<Value> = (0..acks).map(|_| json!({"updateTime": "2024-03-01T12:00:00Z"})).collect();
    Json(json!({"writeResults": results, "commitTime": "2024-03-01T12:00:00Z"})).into_response()
}

async fn start(mock: Mock) -> FirestoreStore {
    let router = Router::new().fallback(commit).with_state(mock);
    let base = spawn(router).await;
    FirestoreStore::new("fit-app".into(), "ya29.test".into())
        .unwrap()
        .with_base_url(format!("{}/v1", base))
}

fn exercises(n: usize) -> Vec<nutriseed_core::BatchRecord> {
    let items: Vec<Value> = (0..n)
        .map(|i| json!({"name": format!("Exercise {}", i), "sets": 3, "tags": ["strength"]}))
        .collect();
    records_from_value(Value::Array(items), SeedKind::Exercises).unwrap()
}

#[tokio::test]
async fn test_load_commits_in_bounded_batches() {
    let mock = Mock::default();
    let store = start(mock.clone()).await;
    let loader = BatchLoader::new(100).unwrap();

    let report = loader.load(&store, "exercises", exercises(250)).await.unwrap();
    assert_eq!(report.records, 250);
    assert_eq!(report.batches, 3);

    let commits = mock.received();
    let sizes: Vec<usize> = commits
        .iter()
        .map(|c| c["writes"].as_array().unwrap().len())
        .collect();
    assert_eq!(sizes, vec![100, 100, 50]);

    let first = &commits[0]["writes"][0];
    assert_eq!(
        first["update"]["name"],
        "projects/fit-app/databases/(default)/documents/exercises/exercise-0"
    );
    assert_eq!(first["update"]["fields"]["sets"], json!({"integerValue": "3"}));
    assert!(first["updateMask"]["fieldPaths"].as_array().unwrap().contains(&json!("tags")));
}

#[tokio::test]
async fn test_failed_batch_aborts_the_rest() {
    let mock = Mock {
        fail_on: Some(2),
        ..Default::default()
    };
    let store = start(mock.clone()).await;
    let loader = BatchLoader::new(100).unwrap();

    let err = loader.load(&store, "exercises", exercises(250)).await.unwrap_err();
    assert!(err.to_string().contains("Batch 2 of 3"));
    assert!(err.to_string().contains("100 records already committed"));
    assert_eq!(
        ApiError::find(&err).and_then(ApiError::status),
        Some(StatusCode::SERVICE_UNAVAILABLE)
    );
    // the third batch is never sent
    assert_eq!(mock.received().len(), 2);
}

#[tokio::test]
async fn test_short_acknowledgement_is_invalid_response() {
    let mock = Mock {
        short_ack: true,
        ..Default::default()
    };
    let store = start(mock).await;
    let loader = BatchLoader::new(400).unwrap();

    let err = loader.load(&store, "exercises", exercises(3)).await.unwrap_err();
    assert!(matches!(ApiError::find(&err), Some(ApiError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_wrong_token_is_request_error() {
    let router = Router::new().fallback(commit).with_state(Mock::default());
    let base = spawn(router).await;
    let store = FirestoreStore::new("fit-app".into(), "expired".into())
        .unwrap()
        .with_base_url(format!("{}/v1", base));

    let err = BatchLoader::new(100)
        .unwrap()
        .load(&store, "exercises", exercises(1))
        .await
        .unwrap_err();
    assert_eq!(
        ApiError::find(&err).and_then(ApiError::status),
        Some(StatusCode::UNAUTHORIZED)
    );
}
