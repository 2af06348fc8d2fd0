//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes `invalid_request` with
//! `details: { field, code }` so clients can highlight the offending input.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    Error, GenerationValidationError, IdeaValidationError, LoginValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    Blank,
    TooLong,
    EmptyPatch,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::Blank => "blank",
            Self::TooLong => "too_long",
            Self::EmptyPatch => "empty_patch",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{name} must be a valid UUID"),
        )
    })
}

pub(crate) fn parse_uuid_list(values: &[String], field: FieldName) -> Result<Vec<Uuid>, Error> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            Uuid::parse_str(value.trim()).map_err(|_| {
                let name = field.as_str();
                Error::invalid_request(format!("{name} must contain valid UUIDs")).with_details(
                    json!({
                        "field": name,
                        "index": index,
                        "code": ErrorCode::InvalidUuid.as_str(),
                    }),
                )
            })
        })
        .collect()
}

pub(crate) fn idea_validation_error(err: &IdeaValidationError) -> Error {
    let (field, code) = match err {
        IdeaValidationError::EmptyTitle => (FieldName::new("title"), ErrorCode::Blank),
        IdeaValidationError::TitleTooLong { .. } => (FieldName::new("title"), ErrorCode::TooLong),
        IdeaValidationError::ContentTooLong { .. } => {
            (FieldName::new("content"), ErrorCode::TooLong)
        }
        IdeaValidationError::EmptyPatch => (FieldName::new("body"), ErrorCode::EmptyPatch),
    };
    field_error(field, code, err.to_string())
}

pub(crate) fn generation_validation_error(err: &GenerationValidationError) -> Error {
    match err {
        GenerationValidationError::EmptyPrompt => {
            field_error(FieldName::new("prompt"), ErrorCode::Blank, err.to_string())
        }
    }
}

pub(crate) fn login_validation_error(err: &LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyUsername => FieldName::new("username"),
        LoginValidationError::EmptyPassword => FieldName::new("password"),
    };
    field_error(field, ErrorCode::Blank, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CONTENT_MAX, ErrorCode as DomainCode, TITLE_MAX};
    use rstest::rstest;

    #[rstest]
    fn parse_uuid_reports_field() {
        let err = parse_uuid("nope", FieldName::new("id")).expect_err("invalid uuid");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "id", "code": "invalid_uuid" }))
        );
    }

    #[rstest]
    fn parse_uuid_list_reports_index() {
        let values = vec![Uuid::nil().to_string(), "bad".to_owned()];
        let err = parse_uuid_list(&values, FieldName::new("planIds")).expect_err("bad entry");
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "planIds", "index": 1, "code": "invalid_uuid" }))
        );
    }

    #[rstest]
    #[case(IdeaValidationError::EmptyTitle, "title", "blank")]
    #[case(IdeaValidationError::TitleTooLong { max: TITLE_MAX }, "title", "too_long")]
    #[case(IdeaValidationError::ContentTooLong { max: CONTENT_MAX }, "content", "too_long")]
    #[case(IdeaValidationError::EmptyPatch, "body", "empty_patch")]
    fn idea_errors_carry_field_and_code(
        #[case] err: IdeaValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mapped = idea_validation_error(&err);
        assert_eq!(mapped.message(), err.to_string());
        assert_eq!(
            mapped.details(),
            Some(&json!({ "field": field, "code": code }))
        );
    }
}
