//! Incoming request payloads and their validation into domain values.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::{
    PhoneNumber, ProspectEmail, SanitizedText, TypeConstraintError,
};

pub mod commissions;
pub mod guard_duty;
pub mod prospects;
pub mod recordings;
pub mod spcc;
pub mod tenancy;
pub mod training;
pub mod users;
pub mod vehicles;
pub mod zones;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid {0} id")]
    InvalidId(&'static str),

    #[error("{0}")]
    InvalidValue(String),

    #[error("csv row {row}: {message}")]
    CsvRow { row: usize, message: String },

    #[error("csv error: {0}")]
    Csv(String),

    #[error("upload error: {0}")]
    Upload(String),
}

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            TypeConstraintError::InvalidPhone => FormError::InvalidPhoneNumber,
            other => FormError::InvalidValue(other.to_string()),
        }
    }
}

/// Treats blank strings as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn optional_email(value: Option<String>) -> Result<Option<ProspectEmail>, FormError> {
    non_blank(value)
        .map(|email| ProspectEmail::new(email).map_err(|_| FormError::InvalidEmail))
        .transpose()
}

pub(crate) fn optional_phone(value: Option<String>) -> Result<Option<PhoneNumber>, FormError> {
    non_blank(value)
        .map(|phone| PhoneNumber::new(phone).map_err(|_| FormError::InvalidPhoneNumber))
        .transpose()
}

/// Sanitized free text; markup-only input collapses to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<SanitizedText> {
    non_blank(value).and_then(|text| SanitizedText::new(text).ok())
}

/// Converts an optional raw identifier into its newtype.
pub(crate) fn optional_id<T>(
    value: Option<i32>,
    kind: &'static str,
) -> Result<Option<T>, FormError>
where
    T: TryFrom<i32, Error = TypeConstraintError>,
{
    value
        .map(|id| T::try_from(id).map_err(|_| FormError::InvalidId(kind)))
        .transpose()
}
