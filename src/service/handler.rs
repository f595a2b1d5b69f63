//! Request handler binding.
//!
//! The orchestrator binds the handler to the execution service, the outbound
//! event router, the root correlation id, and the reporting configuration.
//! The handler turns that into an Axum router; its protocol stays thin.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::config::ReportingConfig;
use crate::service::events::{Event, EventRouter, EventStatus};
use crate::service::exec::{ExecError, ExecutionService};

/// Handler for execution requests.
#[derive(Clone)]
pub struct ExecHandler {
    state: HandlerState,
}

#[derive(Clone)]
struct HandlerState {
    service: Arc<ExecutionService>,
    events: EventRouter,
    root_id: Uuid,
    reporting: ReportingConfig,
}

impl ExecHandler {
    pub fn new(
        service: Arc<ExecutionService>,
        events: EventRouter,
        root_id: Uuid,
        reporting: ReportingConfig,
    ) -> Self {
        Self {
            state: HandlerState {
                service,
                events,
                root_id,
                reporting,
            },
        }
    }

    /// Build the request router.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/execute/{alias}", post(execute))
            .with_state(self.state.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ExecuteRequest {
    #[serde(default)]
    parameters: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
struct ExecuteResponse {
    alias: String,
    host: String,
    success: bool,
    timed_out: bool,
    exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stderr: Option<String>,
}

async fn execute(
    State(state): State<HandlerState>,
    Path(alias): Path<String>,
    body: Bytes,
) -> Response {
    // An empty body means "no parameters"; anything else must be JSON.
    let request: ExecuteRequest = if body.is_empty() {
        ExecuteRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(error) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("invalid request body: {error}") })),
                )
                    .into_response();
            }
        }
    };

    match state
        .service
        .execute(&alias, &request.parameters, state.root_id)
        .await
    {
        Ok(outcome) => {
            let response = ExecuteResponse {
                alias: outcome.alias.clone(),
                host: outcome.host.clone(),
                success: outcome.success(),
                timed_out: outcome.timed_out,
                exit_code: outcome.exit_code,
                stdout: outcome.include_output.then(|| outcome.stdout.clone()),
                stderr: outcome.include_output.then(|| outcome.stderr.clone()),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(error) => {
            report_failure(&state, &alias, &error);
            let status = match &error {
                ExecError::UnknownAlias(_) => StatusCode::NOT_FOUND,
                ExecError::MissingParameter { .. } => StatusCode::BAD_REQUEST,
                ExecError::Closed => StatusCode::SERVICE_UNAVAILABLE,
                ExecError::Spawn { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(json!({ "error": error.to_string() }))).into_response()
        }
    }
}

fn report_failure(state: &HandlerState, alias: &str, error: &ExecError) {
    let body = if state.reporting.add_error_details {
        json!({ "alias": alias, "detail": error.to_string() })
    } else {
        json!({ "alias": alias })
    };
    state.events.publish(Event::child(
        state.root_id,
        format!("{} request failure", state.reporting.root_name),
        EventStatus::Failed,
        body,
    ));
}
