//! Action, catalogue and health handlers.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};

use crate::actions::{error_map, response_map, Action, ActionError, ActionInfo, ErrorKind, Params};
use crate::http::server::AppState;

/// HTTP status for a failed action.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Precondition => StatusCode::CONFLICT,
        ErrorKind::Remote => StatusCode::BAD_GATEWAY,
        ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::UnknownAction => StatusCode::NOT_FOUND,
    }
}

fn failure(action: Option<Action>, error: ActionError) -> Response {
    (status_for(error.kind()), Json(error_map(action, &error))).into_response()
}

/// `POST /v1/actions/{action}`: body is the flat parameter map.
pub async fn invoke_action(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let action = match name.parse::<Action>() {
        Ok(action) => action,
        Err(e) => return failure(None, e),
    };

    let params: Params = if body.iter().all(|b| b.is_ascii_whitespace()) {
        Map::new()
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                return failure(
                    Some(action),
                    ActionError::Validation("Request body must be a JSON object".to_string()),
                );
            }
        }
    };

    match state.skill.dispatch(action, &params).await {
        Ok(output) => (StatusCode::OK, Json(response_map(action, Ok(output)))).into_response(),
        Err(e) => failure(Some(action), e),
    }
}

/// `GET /v1/actions`
pub async fn list_actions() -> Json<Vec<ActionInfo>> {
    Json(Action::ALL.into_iter().map(ActionInfo::from).collect())
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Response {
    let report = state.skill.health().await;
    let status = if report.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report)).into_response()
}
