//! Shared validation helpers for inbound HTTP adapters.
//!
//! Failures become `invalid_request` errors whose details name the JSON
//! field and a stable code, matching what domain validation produces.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Difficulty, Error, UploadFile};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidBase64,
    InvalidDifficulty,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidBase64 => "invalid_base64",
            Self::InvalidDifficulty => "invalid_difficulty",
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

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        Error::invalid_request(format!("{} must be a valid UUID", field.as_str())).with_details(
            json!({
                "field": field.as_str(),
                "value": value,
                "code": ErrorCode::InvalidUuid.as_str(),
            }),
        )
    })
}

/// Parse an optional difficulty label strictly.
pub(crate) fn parse_difficulty(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<Difficulty>, Error> {
    value
        .map(|raw| {
            raw.parse::<Difficulty>().map_err(|err| {
                field_error(field, err.to_string(), ErrorCode::InvalidDifficulty)
            })
        })
        .transpose()
}

/// Base64-encoded file carried inside a JSON body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadBody {
    pub file_name: String,
    pub content_type: Option<String>,
    /// Standard base64 with padding.
    pub data: String,
}

pub(crate) fn decode_upload(body: UploadBody, field: FieldName) -> Result<UploadFile, Error> {
    let bytes = STANDARD.decode(body.data.as_bytes()).map_err(|_| {
        field_error(
            field,
            format!("{} must be base64 encoded", field.as_str()),
            ErrorCode::InvalidBase64,
        )
    })?;
    let file = UploadFile::new(body.file_name, bytes);
    Ok(match body.content_type {
        Some(content_type) => file.with_content_type(content_type),
        None => file,
    })
}

pub(crate) fn decode_uploads(
    bodies: Vec<UploadBody>,
    field: FieldName,
) -> Result<Vec<UploadFile>, Error> {
    bodies
        .into_iter()
        .map(|body| decode_upload(body, field))
        .collect()
}
