use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use error_stack::Report;
use kernel::KernelError;
use serde::Serialize;
use std::process::{ExitCode, Termination};

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: &'static str,
}

impl ErrorStatus {
    fn status(&self) -> StatusCode {
        match self.0.current_context() {
            KernelError::NotFound => StatusCode::NOT_FOUND,
            KernelError::InvalidInput => StatusCode::BAD_REQUEST,
            KernelError::InsufficientInventory | KernelError::AlreadyCancelled => {
                StatusCode::CONFLICT
            }
            KernelError::Unauthorized => StatusCode::UNAUTHORIZED,
            KernelError::Forbidden => StatusCode::FORBIDDEN,
            KernelError::Concurrency | KernelError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            KernelError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self.0.current_context() {
            KernelError::NotFound => "Not found",
            KernelError::InvalidInput => "Invalid input",
            KernelError::InsufficientInventory => "Not enough seats available",
            KernelError::AlreadyCancelled => "Booking is already cancelled",
            KernelError::Unauthorized => "Unauthorized",
            KernelError::Forbidden => "Forbidden",
            KernelError::Concurrency => "Conflicting update, please retry",
            KernelError::Timeout => "Timed out, please retry",
            KernelError::Internal => "Internal server error",
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::debug!("{:?}", self.0);
        }
        let body = ErrorResponse {
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use error_stack::Report;
    use kernel::KernelError;

    use crate::error::ErrorStatus;

    fn status_of(error: KernelError) -> StatusCode {
        ErrorStatus::from(Report::new(error)).into_response().status()
    }

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(status_of(KernelError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(KernelError::InvalidInput), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(KernelError::InsufficientInventory),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(KernelError::AlreadyCancelled), StatusCode::CONFLICT);
        assert_eq!(status_of(KernelError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(KernelError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(KernelError::Concurrency),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status_of(KernelError::Timeout), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_of(KernelError::Internal),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn attachments_do_not_change_the_status() {
        let report = Report::new(KernelError::InsufficientInventory)
            .attach_printable("Requested 6 seats but only 4 available");
        let response = ErrorStatus::from(report).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
