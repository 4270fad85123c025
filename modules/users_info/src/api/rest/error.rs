use axum::http::StatusCode;

use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.example.com/{}", code))
        .with_code(code)
        .with_instance(instance);

    let problem = if let Some(id) = tracing::Span::current().id() {
        problem.with_trace_id(id.into_u64().to_string())
    } else {
        problem
    };

    ProblemResponse(problem)
}

/// Malformed multipart body or unreadable upload. `status` is 400, or 413
/// when the body limit was hit.
pub fn bad_upload(status: StatusCode, detail: impl Into<String>, instance: &str) -> ProblemResponse {
    from_parts(
        status,
        "USERS_BAD_UPLOAD",
        "Bad upload",
        detail,
        instance,
    )
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::UserNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "USERS_NOT_FOUND",
            "User not found",
            format!("User with id {} was not found", id),
            instance,
        ),
        DomainError::StoreWrite { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "User store write failed");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "USERS_STORE_WRITE",
                "Internal error",
                "The user store could not be written",
                instance,
            )
        }
        DomainError::ImageWrite { .. } => {
            tracing::error!(error = ?e, "Image write failed");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "USERS_IMAGE_WRITE",
                "Internal error",
                "The uploaded image could not be stored",
                instance,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_with_stable_code() {
        let p = map_domain_error(&DomainError::user_not_found("42"), "/api/users/42").0;
        assert_eq!(p.status, 404);
        assert_eq!(p.code, "USERS_NOT_FOUND");
        assert!(p.detail.contains("42"));
    }

    #[test]
    fn write_failures_hide_internal_details() {
        let p = map_domain_error(
            &DomainError::store_write("EACCES /var/lib/secret/db.json"),
            "/addUser",
        )
        .0;
        assert_eq!(p.status, 500);
        assert_eq!(p.code, "USERS_STORE_WRITE");
        assert!(!p.detail.contains("secret"));

        let p = map_domain_error(&DomainError::image_write("disk full"), "/addUser").0;
        assert_eq!(p.code, "USERS_IMAGE_WRITE");
        assert!(!p.detail.contains("disk"));
    }
}
