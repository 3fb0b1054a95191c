use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    response::Json,
    Extension,
};
use tracing::{error, info, warn};

use crate::api::rest::dto::{
    ErrorBody, ListLogsQuery, LogEntryDto, RecordTransitionReq, ResetResponse,
    TransitionResponse, UserDto,
};
use crate::api::rest::error::{map_domain_error, ApiError, Operation, MSG_MALFORMED_BODY};
use crate::contract::model::Action;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

pub const MSG_ENTERED: &str = "入室が記録されました";
pub const MSG_EXITED: &str = "退室が記録されました";
pub const MSG_RESET: &str = "データをリセットしました";

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = [UserDto]),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    match svc.list_users().await {
        Ok(users) => Ok(Json(users.into_iter().map(UserDto::from).collect())),
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(map_domain_error(&e, Operation::ReadUsers))
        }
    }
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    tag = "users",
    params(("user_id" = String, Path, description = "User identifier, e.g. U001")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "Unknown user", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    user_id: Result<Path<String>, PathRejection>,
) -> Result<Json<UserDto>, ApiError> {
    let user_id = path_param(user_id, Operation::ReadUsers)?;
    match svc.get_user(&user_id).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            log_failure(&e, "get user", &user_id);
            Err(map_domain_error(&e, Operation::ReadUsers))
        }
    }
}

/// Activity log, most recent first
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "logs",
    params(ListLogsQuery),
    responses(
        (status = 200, description = "Log entries, most recent first", body = [LogEntryDto]),
        (status = 400, description = "Invalid limit", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn list_logs(
    Extension(svc): Extension<Arc<Service>>,
    query: Result<Query<ListLogsQuery>, QueryRejection>,
) -> Result<Json<Vec<LogEntryDto>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        warn!("Rejected logs query: {}", rejection.body_text());
        ApiError::invalid_parameter(Operation::ReadLogs, rejection.status())
    })?;
    match svc.list_logs(query.limit).await {
        Ok(entries) => Ok(Json(entries.into_iter().map(LogEntryDto::from).collect())),
        Err(e) => {
            error!("Failed to list logs: {}", e);
            Err(map_domain_error(&e, Operation::ReadLogs))
        }
    }
}

/// Record that a user entered the room
#[utoipa::path(
    post,
    path = "/api/users/{user_id}/enter",
    tag = "users",
    params(("user_id" = String, Path, description = "User identifier")),
    request_body(content = RecordTransitionReq, description = "Optional display name and comment"),
    responses(
        (status = 200, description = "Entry recorded", body = TransitionResponse),
        (status = 400, description = "Already in the room or invalid body", body = ErrorBody),
        (status = 404, description = "Unknown user", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn enter(
    Extension(svc): Extension<Arc<Service>>,
    user_id: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<TransitionResponse>, ApiError> {
    record(&svc, user_id, Action::Enter, body).await
}

/// Record that a user left the room
#[utoipa::path(
    post,
    path = "/api/users/{user_id}/exit",
    tag = "users",
    params(("user_id" = String, Path, description = "User identifier")),
    request_body(content = RecordTransitionReq, description = "Optional display name and comment"),
    responses(
        (status = 200, description = "Exit recorded", body = TransitionResponse),
        (status = 400, description = "Already out of the room or invalid body", body = ErrorBody),
        (status = 404, description = "Unknown user", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn exit(
    Extension(svc): Extension<Arc<Service>>,
    user_id: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<TransitionResponse>, ApiError> {
    record(&svc, user_id, Action::Exit, body).await
}

/// Restore the seed data
#[utoipa::path(
    post,
    path = "/api/reset",
    tag = "admin",
    responses(
        (status = 200, description = "Data restored", body = ResetResponse),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn reset(Extension(svc): Extension<Arc<Service>>) -> Result<Json<ResetResponse>, ApiError> {
    match svc.reset().await {
        Ok(()) => Ok(Json(ResetResponse {
            message: MSG_RESET.to_owned(),
        })),
        Err(e) => {
            error!("Failed to reset data: {}", e);
            Err(map_domain_error(&e, Operation::Reset))
        }
    }
}

async fn record(
    svc: &Service,
    user_id: Result<Path<String>, PathRejection>,
    action: Action,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let op = Operation::Record(action);
    let user_id = path_param(user_id, op)?;
    let user_id = user_id.as_str();
    let body = body.map_err(|rejection| {
        warn!("Unreadable {} body for {}: {}", action, user_id, rejection.body_text());
        ApiError::new(rejection.status(), op, MSG_MALFORMED_BODY)
    })?;
    let req = parse_transition_body(&body).map_err(|e| {
        warn!("Rejected {} body for {}: {}", action, user_id, e);
        ApiError::malformed_body(op)
    })?;
    info!("Recording {} for user {}", action, user_id);

    match svc.record_transition(user_id, action, req.into()).await {
        Ok(user) => Ok(Json(TransitionResponse {
            success: true,
            message: match action {
                Action::Enter => MSG_ENTERED,
                Action::Exit => MSG_EXITED,
            }
            .to_owned(),
            user: user.into(),
        })),
        Err(e) => {
            log_failure(&e, action.as_str(), user_id);
            Err(map_domain_error(&e, op))
        }
    }
}

fn path_param(
    param: Result<Path<String>, PathRejection>,
    op: Operation,
) -> Result<String, ApiError> {
    param.map(|Path(value)| value).map_err(|rejection| {
        warn!("Rejected path parameter: {}", rejection.body_text());
        ApiError::invalid_parameter(op, rejection.status())
    })
}

/// The body is optional; an empty one means no name and no comment.
fn parse_transition_body(body: &[u8]) -> Result<RecordTransitionReq, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RecordTransitionReq::default());
    }
    serde_json::from_slice(body)
}

/// Client mistakes are logged at warn, storage failures at error.
fn log_failure(e: &DomainError, what: &str, user_id: &str) {
    match e {
        DomainError::Persistence { .. } => error!("Failed to {} {}: {}", what, user_id, e),
        _ => warn!("Rejected {} for {}: {}", what, user_id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_accepted() {
        let req = parse_transition_body(b"").unwrap();
        assert!(req.user_name.is_none());
        assert!(req.comment.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let req = parse_transition_body(br#"{"userID":"U001","comment":"x"}"#).unwrap();
        assert_eq!(req.comment.as_deref(), Some("x"));
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(parse_transition_body(b"{not json").is_err());
        assert!(parse_transition_body(br#"{"comment": 5}"#).is_err());
    }
}
