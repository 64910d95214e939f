//! API Handlers
//!
//! HTTP request handlers translating each endpoint into one cache call.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::cache::TtlLruCache;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, KeyQuery, KeysResponse, MessageResponse,
    SetRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The cache does its own locking, so handlers share it behind a plain `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<TtlLruCache<Value>>,
}

impl AppState {
    pub fn new(cache: TtlLruCache<Value>) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Starts the cache's reaper, so this must run inside a tokio runtime.
    pub fn from_config(config: &Config) -> Self {
        Self::new(TtlLruCache::new(config.capacity, config.ttl()))
    }
}

fn required_key(query: KeyQuery) -> ApiResult<String> {
    query
        .key()
        .ok_or_else(|| ApiError::BadRequest("Key not provided".to_string()))
}

/// Handler for POST /cache
pub async fn set_handler(
    State(state): State<AppState>,
    body: Result<Json<SetRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SetResponse>)> {
    let Json(req) = body?;

    state.cache.set(req.key.clone(), req.value).await?;

    Ok((StatusCode::CREATED, Json(SetResponse::new(req.key))))
}

/// Handler for GET /cache?key=K
pub async fn get_handler(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> ApiResult<Json<GetResponse>> {
    let key = required_key(query)?;

    let value = state.cache.get(&key).await.inspect_err(|e| {
        if e.is_miss() {
            debug!(key = %key, "cache miss");
        }
    })?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /cache?key=K
pub async fn delete_handler(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> ApiResult<Json<DeleteResponse>> {
    let key = required_key(query)?;

    state.cache.delete(&key).await?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /cache/all
pub async fn delete_all_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.delete_all().await;
    Json(MessageResponse::new("All keys deleted successfully"))
}

/// Handler for GET /cache/all
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    Json(KeysResponse {
        keys: state.cache.get_all_keys().await,
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    Json(StatsResponse::new(stats, state.cache.capacity()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    use crate::error::CacheError;

    fn test_state() -> AppState {
        AppState::new(TtlLruCache::new(100, Duration::from_secs(300)))
    }

    fn key_query(key: &str) -> Query<KeyQuery> {
        Query(KeyQuery {
            key: Some(key.to_string()),
        })
    }

    fn set_body(key: &str, value: Value) -> Result<Json<SetRequest>, JsonRejection> {
        Ok(Json(SetRequest {
            key: key.to_string(),
            value,
        }))
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let (status, _) = set_handler(State(state.clone()), set_body("test_key", json!("test_value")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let response = get_handler(State(state), key_query("test_key")).await.unwrap();
        assert_eq!(response.value, json!("test_value"));
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let result = get_handler(State(test_state()), key_query("nonexistent")).await;
        assert!(matches!(result, Err(ApiError::Cache(CacheError::Miss(_)))));
    }

    #[tokio::test]
    async fn test_get_without_key() {
        let result = get_handler(State(test_state()), Query(KeyQuery::default())).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();
        set_handler(State(state.clone()), set_body("to_delete", json!(1)))
            .await
            .unwrap();

        assert!(delete_handler(State(state.clone()), key_query("to_delete")).await.is_ok());
        assert!(get_handler(State(state), key_query("to_delete")).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_all_and_keys_handlers() {
        let state = test_state();
        set_handler(State(state.clone()), set_body("a", json!(1))).await.unwrap();
        set_handler(State(state.clone()), set_body("b", json!(2))).await.unwrap();

        let mut keys = keys_handler(State(state.clone())).await.0.keys;
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

        delete_all_handler(State(state.clone())).await;
        assert!(keys_handler(State(state)).await.keys.is_empty());
    }

    #[tokio::test]
    async fn test_set_null_value_rejected() {
        let result = set_handler(State(test_state()), set_body("k", Value::Null)).await;
        assert!(matches!(
            result,
            Err(ApiError::Cache(CacheError::InvalidArgument(_)))
        ));
    }

    #[tokio::test]
    async fn test_set_empty_key_rejected() {
        let result = set_handler(State(test_state()), set_body("", json!("value"))).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let response = stats_handler(State(test_state())).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.capacity, 100);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
