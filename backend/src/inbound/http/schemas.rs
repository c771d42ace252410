//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`. The wrappers below mirror their
//! serialised shape so the adapter layer can document them.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Caller-supplied data violates a domain rule.
    #[schema(rename = "invalid_input")]
    InvalidInput,
    /// No contributor identity was supplied.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The contributor lacks a required role.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The review or image does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// Storage failed; details are withheld from clients.
    #[schema(rename = "storage")]
    Storage,
    /// The request did not finish in time.
    #[schema(rename = "timeout")]
    Timeout,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::DomainError`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_input")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "score must be between 1 and 10")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}
