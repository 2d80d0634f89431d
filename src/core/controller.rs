use std::sync::Arc;
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};
use tracing::{error, info};
use crate::catalog::domain::CatalogService;
use crate::catalog::factory::create_catalog_service;
use crate::core::command::CommandError;
use crate::core::domain::Configuration;

/// Shared by every handler. The catalog service is built once at start up and cloned per
/// request through its `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub(crate) config: Configuration,
    pub(crate) catalog: Arc<dyn CatalogService>,
}

impl AppState {
    pub async fn build(config: Configuration) -> AppState {
        let catalog = create_catalog_service(&config).await;
        AppState {
            config,
            catalog,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }
}

pub(crate) type ServerError = (StatusCode, Json<Value>);

pub(crate) fn json_to_server_error(err: serde_json::Error) -> ServerError {
    bad_request(format!("Invalid request body: {}", err).as_str(), "serialization")
}

pub(crate) fn bad_request(message: &str, error: &str) -> ServerError {
    info!(message, error, "rejected request");
    (StatusCode::BAD_REQUEST, Json(json!({
        "success": false,
        "message": message,
        "error": error,
    })))
}

fn internal_error(kind: &str, message: &str, cause: &str, orphaned_key: Option<&str>) -> ServerError {
    error!(kind, message, cause, orphaned_key, "request failed");
    let mut body = json!({
        "success": false,
        "kind": kind,
        "message": message,
        "error": cause,
    });
    if let Some(key) = orphaned_key {
        body["orphanedKey"] = json!(key);
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body))
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::NotFound { message } => {
                (StatusCode::BAD_REQUEST, Json(json!({
                    "status": "fail",
                    "message": message,
                })))
            }
            CommandError::Validation { message, reason_code } => {
                let error = reason_code.unwrap_or_else(|| "Validation".to_string());
                bad_request(message.as_str(), error.as_str())
            }
            CommandError::Serialization { message } => {
                bad_request(message.as_str(), "serialization")
            }
            CommandError::Database { message, reason_code, cause, orphaned_key } => {
                internal_error(reason_code.as_deref().unwrap_or("Database"), message.as_str(), cause.as_str(), orphaned_key.as_deref())
            }
            CommandError::Storage { message, reason_code, cause } => {
                internal_error(reason_code.as_deref().unwrap_or("Storage"), message.as_str(), cause.as_str(), None)
            }
            CommandError::Runtime { message, reason_code } => {
                internal_error(reason_code.as_deref().unwrap_or("Runtime"), message.as_str(), message.as_str(), None)
            }
        }
    }
}
