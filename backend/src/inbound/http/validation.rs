//! Shared validation helpers for inbound HTTP adapters.
//!
//! Failures become [`DomainError::invalid_input`] with a `details` object naming the
//! offending field and a machine-readable code.

use actix_web::error::JsonPayloadError;
use actix_web::web;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::{DomainError, ImageId, ReviewId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    InvalidTimestamp,
    InvalidBase64,
    OutOfRange,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidId => "invalid_id",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidBase64 => "invalid_base64",
            Self::OutOfRange => "out_of_range",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String) -> DomainError {
    DomainError::invalid_input(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_value_error(field: FieldName, code: ErrorCode, message: String, value: &str) -> DomainError {
    DomainError::invalid_input(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> DomainError {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

pub(crate) fn parse_review_id(value: &str, field: FieldName) -> Result<ReviewId, DomainError> {
    ReviewId::new(value)
        .map_err(|err| field_value_error(field, ErrorCode::InvalidId, err.to_string(), value))
}

pub(crate) fn parse_image_id(value: &str, field: FieldName) -> Result<ImageId, DomainError> {
    ImageId::new(value)
        .map_err(|err| field_value_error(field, ErrorCode::InvalidId, err.to_string(), value))
}

pub(crate) fn parse_rfc3339_timestamp(
    value: &str,
    field: FieldName,
) -> Result<DateTime<Utc>, DomainError> {
    let name = field.as_str();
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            field_value_error(
                field,
                ErrorCode::InvalidTimestamp,
                format!("{name} must be an RFC 3339 timestamp"),
                value,
            )
        })
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, DomainError> {
    value
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}

/// Decode standard-alphabet base64 image bytes. Empty payloads are rejected.
pub(crate) fn decode_base64_image(value: &str, field: FieldName) -> Result<Vec<u8>, DomainError> {
    let name = field.as_str();
    let bytes = STANDARD.decode(value.trim()).map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidBase64,
            format!("{name} must be base64 encoded"),
        )
    })?;
    if bytes.is_empty() {
        return Err(field_error(
            field,
            ErrorCode::InvalidBase64,
            format!("{name} must not be empty"),
        ));
    }
    Ok(bytes)
}

/// Check `value` against an inclusive range.
pub(crate) fn ensure_in_range(
    value: u32,
    min: u32,
    max: u32,
    field: FieldName,
) -> Result<u32, DomainError> {
    if (min..=max).contains(&value) {
        return Ok(value);
    }
    let name = field.as_str();
    Err(DomainError::invalid_input(format!("{name} must be between {min} and {max}"))
        .with_details(json!({
            "field": name,
            "value": value,
            "code": ErrorCode::OutOfRange.as_str(),
        })))
}

/// JSON extractor settings: bounded bodies, domain error payloads on
/// malformed input.
#[must_use]
pub fn json_config(max_payload_bytes: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(max_payload_bytes)
        .error_handler(|err, _req| match err {
            JsonPayloadError::Deserialize(inner) => {
                DomainError::invalid_input(format!("invalid request body: {inner}")).into()
            }
            JsonPayloadError::ContentType => {
                DomainError::invalid_input("request body must be application/json").into()
            }
            other => other.into(),
        })
}

/// Query-string extractor settings returning domain error payloads.
#[must_use]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        DomainError::invalid_input(format!("invalid query string: {err}")).into()
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;

    const FIELD: FieldName = FieldName::new("image");

    #[rstest]
    fn missing_field_names_the_field() {
        let err = missing_field_error(FieldName::new("film"));
        assert_eq!(err.code(), DomainErrorCode::InvalidInput);
        assert_eq!(err.message(), "missing required field: film");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "film", "code": "missing_field"}))
        );
    }

    #[rstest]
    #[case("")]
    #[case(" r1")]
    fn malformed_ids_are_rejected(#[case] raw: &str) {
        let err = parse_review_id(raw, FieldName::new("id")).expect_err("invalid");
        assert_eq!(err.details().map(|d| &d["code"]), Some(&json!("invalid_id")));
    }

    #[rstest]
    #[case("2024-03-01T20:00:00Z", true)]
    #[case("2024-03-01T21:00:00+01:00", true)]
    #[case("yesterday", false)]
    fn timestamps_must_be_rfc3339(#[case] raw: &str, #[case] ok: bool) {
        let parsed = parse_rfc3339_timestamp(raw, FieldName::new("discussedAt"));
        assert_eq!(parsed.is_ok(), ok);
    }

    #[rstest]
    fn offsets_are_normalised_to_utc() {
        let parsed =
            parse_rfc3339_timestamp("2024-03-01T21:00:00+01:00", FieldName::new("t"))
                .expect("valid timestamp");
        assert_eq!(parsed.to_rfc3339(), "2024-03-01T20:00:00+00:00");
    }

    #[rstest]
    fn base64_images_decode() {
        let bytes = decode_base64_image("iVBORw==", FIELD).expect("valid base64");
        assert_eq!(bytes, vec![0x89, 0x50, 0x4e, 0x47]);
    }

    #[rstest]
    #[case("not base64!")]
    #[case("")]
    fn bad_images_are_rejected(#[case] raw: &str) {
        let err = decode_base64_image(raw, FIELD).expect_err("rejected");
        assert_eq!(
            err.details().map(|d| &d["code"]),
            Some(&json!("invalid_base64"))
        );
    }

    #[rstest]
    #[case(1, true)]
    #[case(100, true)]
    #[case(0, false)]
    #[case(101, false)]
    fn range_checks_are_inclusive(#[case] value: u32, #[case] ok: bool) {
        assert_eq!(
            ensure_in_range(value, 1, 100, FieldName::new("limit")).is_ok(),
            ok
        );
    }
}
