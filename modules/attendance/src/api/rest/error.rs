use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::api::rest::dto::ErrorBody;
use crate::contract::model::Action;
use crate::domain::error::DomainError;

pub const MSG_USER_NOT_FOUND: &str = "ユーザーが見つかりません";
pub const MSG_ALREADY_IN: &str = "既に入室中です";
pub const MSG_ALREADY_OUT: &str = "既に退室中です";
pub const MSG_MALFORMED_BODY: &str = "リクエストの形式が正しくありません";
pub const MSG_INVALID_PARAMETER: &str = "リクエストパラメータが正しくありません";

/// Endpoint an error came from; selects the fallback message and the body shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ReadUsers,
    ReadLogs,
    Record(Action),
    Reset,
}

impl Operation {
    fn failure_message(self) -> &'static str {
        match self {
            Operation::ReadUsers => "ユーザー情報の取得に失敗しました",
            Operation::ReadLogs => "ログ情報の取得に失敗しました",
            Operation::Record(Action::Enter) => "入室処理中にエラーが発生しました",
            Operation::Record(Action::Exit) => "退室処理中にエラーが発生しました",
            Operation::Reset => "データのリセットに失敗しました",
        }
    }

    /// Enter/exit responses carry a `success` flag, reads and reset do not.
    fn flags_success(self) -> bool {
        matches!(self, Operation::Record(_))
    }
}

/// JSON error response returned by every handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, op: Operation, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                success: op.flags_success().then_some(false),
                error: message.into(),
            },
        }
    }

    pub fn malformed_body(op: Operation) -> Self {
        Self::new(StatusCode::BAD_REQUEST, op, MSG_MALFORMED_BODY)
    }

    /// Path or query extraction failed; keeps the extractor's status.
    pub fn invalid_parameter(op: Operation, status: StatusCode) -> Self {
        Self::new(status, op, MSG_INVALID_PARAMETER)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Map domain errors to HTTP responses
pub fn map_domain_error(error: &DomainError, op: Operation) -> ApiError {
    match error {
        DomainError::UserNotFound { .. } => {
            ApiError::new(StatusCode::NOT_FOUND, op, MSG_USER_NOT_FOUND)
        }
        DomainError::InvalidTransition { action, .. } => {
            let message = match action {
                Action::Enter => MSG_ALREADY_IN,
                Action::Exit => MSG_ALREADY_OUT,
            };
            ApiError::new(StatusCode::BAD_REQUEST, op, message)
        }
        DomainError::Validation { message, .. } => {
            ApiError::new(StatusCode::BAD_REQUEST, op, message.clone())
        }
        DomainError::Persistence { .. } => {
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, op, op.failure_message())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_errors_carry_success_false() {
        let err = map_domain_error(
            &DomainError::invalid_transition("U001", Action::Exit),
            Operation::Record(Action::Exit),
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body.success, Some(false));
        assert_eq!(err.body.error, MSG_ALREADY_OUT);
    }

    #[test]
    fn read_errors_have_no_success_flag() {
        let err = map_domain_error(
            &DomainError::user_not_found("U404"),
            Operation::ReadUsers,
        );
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.body.success, None);
        assert_eq!(err.body.error, MSG_USER_NOT_FOUND);
    }

    #[test]
    fn invalid_parameter_keeps_status_and_shape() {
        let err = ApiError::invalid_parameter(Operation::ReadLogs, StatusCode::BAD_REQUEST);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body.success, None);
        assert_eq!(err.body.error, MSG_INVALID_PARAMETER);

        let err = ApiError::invalid_parameter(
            Operation::Record(Action::Enter),
            StatusCode::BAD_REQUEST,
        );
        assert_eq!(err.body.success, Some(false));
    }

    #[test]
    fn persistence_hides_the_cause() {
        let err = map_domain_error(
            &DomainError::persistence(anyhow::anyhow!("permission denied")),
            Operation::Reset,
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.error, "データのリセットに失敗しました");
    }
}
