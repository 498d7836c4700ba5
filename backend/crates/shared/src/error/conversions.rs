//! Database and HTTP adapters for [`AppError`], each behind its feature

use super::app_error::AppError;
#[cfg(any(feature = "sqlx", test))]
use super::kind::ErrorKind;

/// Map a Postgres SQLSTATE to what the client should see
///
/// <https://www.postgresql.org/docs/current/errcodes-appendix.html>
#[cfg(any(feature = "sqlx", test))]
fn classify_sqlstate(code: &str) -> (ErrorKind, &'static str) {
    match code {
        // unique_violation: duplicate email, vote, subscription, identity
        "23505" => (ErrorKind::Conflict, "Resource already exists"),
        // foreign_key_violation: parent deleted concurrently
        "23503" => (ErrorKind::Conflict, "Referenced resource no longer exists"),
        "23502" | "23514" => (ErrorKind::BadRequest, "Invalid value"),
        // insufficient_resources and operator_intervention classes
        c if c.starts_with("53") || c.starts_with("57") => {
            (ErrorKind::ServiceUnavailable, "Database unavailable")
        }
        _ => (ErrorKind::InternalServerError, "Database error"),
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let (kind, message) = match &err {
            sqlx::Error::RowNotFound => (ErrorKind::NotFound, "Record not found"),
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                (ErrorKind::ServiceUnavailable, "Database unavailable")
            }
            sqlx::Error::Database(db) => match db.code() {
                Some(code) => classify_sqlstate(&code),
                None => (ErrorKind::InternalServerError, "Database error"),
            },
            _ => (ErrorKind::InternalServerError, "Database error"),
        };
        AppError::new(kind, message).with_source(err)
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::{Json, http::StatusCode};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut problem = serde_json::json!({
            "type": "about:blank",
            "title": self.kind().reason(),
            "status": self.status_code(),
            "detail": self.message(),
        });
        if let Some(action) = self.action() {
            problem["action"] = action.into();
        }
        if !self.field_errors().is_empty() {
            problem["errors"] = serde_json::to_value(self.field_errors()).unwrap_or_default();
        }

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/problem+json")],
            Json(problem),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_is_conflict() {
        assert_eq!(classify_sqlstate("23505").0, ErrorKind::Conflict);
        assert_eq!(classify_sqlstate("23514").0, ErrorKind::BadRequest);
        assert_eq!(classify_sqlstate("57P01").0, ErrorKind::ServiceUnavailable);
        assert_eq!(classify_sqlstate("42P01").0, ErrorKind::InternalServerError);
    }

    #[cfg(feature = "axum")]
    #[tokio::test]
    async fn test_problem_document_carries_field_errors() {
        use axum::response::IntoResponse;
        use http_body_util::BodyExt;

        let response = AppError::unprocessable("Validation failed")
            .with_field_error("title", "can't be blank")
            .into_response();
        assert_eq!(response.status().as_u16(), 422);
        assert_eq!(
            response.headers()["content-type"],
            "application/problem+json"
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 422);
        assert_eq!(body["errors"][0]["field"], "title");
        assert_eq!(body["errors"][0]["message"], "can't be blank");
    }
}
