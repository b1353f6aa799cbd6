//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! normalized/validated email, coordinates within range, non-negative money)
//! so that once a value reaches the domain layer it can be treated as trusted.
use std::ops::Deref;

use phonenumber::{Mode, parse};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Value is outside of the permitted range.
    #[error("{0} is out of range")]
    OutOfRange(&'static str),
    /// Stored enum discriminant is unknown.
    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(AgencyId, "Unique identifier for an agency (the tenant).");
id_newtype!(GroupId, "Unique identifier for a dealership group.");
id_newtype!(BrandId, "Unique identifier for a vehicle brand.");
id_newtype!(UserId, "Unique identifier for a salesperson or manager.");
id_newtype!(ProspectId, "Unique identifier for a prospect.");
id_newtype!(ProspectEventId, "Unique identifier for a prospect event.");
id_newtype!(SpccEvaluationId, "Unique identifier for an SPCC evaluation.");
id_newtype!(VehicleId, "Unique identifier for a catalogue vehicle.");
id_newtype!(ZoneId, "Unique identifier for a proximity zone.");
id_newtype!(RecordingId, "Unique identifier for a recording.");
id_newtype!(CommissionId, "Unique identifier for a commission.");
id_newtype!(CommissionRuleId, "Unique identifier for a commission rule.");
id_newtype!(ScenarioId, "Unique identifier for a training scenario.");
id_newtype!(TrainingSessionId, "Unique identifier for a training session.");

macro_rules! email_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Validates and normalizes an email string.
            pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
                let normalized = normalize_email(email)?;
                Ok(Self(normalized))
            }

            /// Borrow the email as a `&str`.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert into the owned inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

email_newtype!(UserEmail, "Lower-cased and validated salesperson email.");
email_newtype!(ProspectEmail, "Lower-cased and validated prospect contact email.");

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(UserName, "Salesperson display name enforcing non-empty values.");
non_empty_string_newtype!(ProspectName, "Prospect name enforcing non-empty values.");
non_empty_string_newtype!(
    LeadSource,
    "Lead origin such as a campaign, walk-in or referral."
);
non_empty_string_newtype!(GroupName, "Dealership group name.");
non_empty_string_newtype!(BrandName, "Vehicle brand name.");
non_empty_string_newtype!(AgencyName, "Agency (dealership) name.");
non_empty_string_newtype!(VehicleModel, "Catalogue vehicle model.");
non_empty_string_newtype!(ZoneName, "Proximity zone label.");
non_empty_string_newtype!(ScenarioTitle, "Role-play scenario title.");

/// Free text entered by users, sanitized from HTML and trimmed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SanitizedText(String);

impl SanitizedText {
    /// Constructs a sanitized, trimmed, non-empty value.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let sanitized = ammonia::clean(&value.into());
        let inner = NonEmptyString::new(sanitized)?;
        Ok(Self(inner.into_inner()))
    }

    /// Borrow the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for SanitizedText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for SanitizedText {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalizes a phone number string to E.164 format.
pub fn normalize_phone_to_e164(value: &str) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    let parsed = parse(None, trimmed).map_err(|_| TypeConstraintError::InvalidPhone)?;
    Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Normalized phone number wrapper (expected E.164).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Constructs a phone number ensuring it is valid and normalizes to E.164 format.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_phone_to_e164(&value.into())?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for PhoneNumber {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Macro for bounded floating point wrappers (coordinates, radius).
macro_rules! bounded_f64_newtype {
    ($name:ident, $label:expr, $min:expr, $max:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
        pub struct $name(f64);

        impl $name {
            pub const MIN: f64 = $min;
            pub const MAX: f64 = $max;

            /// Ensures the value is finite and within the allowed range.
            pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
                if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::OutOfRange($label))
                }
            }

            pub const fn get(self) -> f64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<f64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

bounded_f64_newtype!(Latitude, "latitude", -90.0, 90.0, "Latitude in degrees.");
bounded_f64_newtype!(Longitude, "longitude", -180.0, 180.0, "Longitude in degrees.");

/// Radius of a proximity zone in metres, positive and at most 50 km.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct RadiusMeters(f64);

impl RadiusMeters {
    pub const MAX: f64 = 50_000.0;

    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && value > 0.0 && value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::OutOfRange("radius"))
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

/// Non-negative amount of money stored as integer cents.
#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
        if value >= 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::OutOfRange("amount"))
        }
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// Adds two amounts saturating at `i64::MAX`.
    #[must_use]
    pub fn saturating_add(self, other: MoneyCents) -> MoneyCents {
        MoneyCents(self.0.saturating_add(other.0))
    }
}

impl Display for MoneyCents {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Percentage expressed in basis points (1 % = 100 bp), within `0..=10_000`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BasisPoints(i32);

impl BasisPoints {
    pub const MAX: i32 = 10_000;

    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if (0..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::OutOfRange("percentage"))
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Score of a single SPCC pillar, `0..=10`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PillarScore(u8);

impl PillarScore {
    pub const MAX: u8 = 10;

    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if (0..=i32::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(TypeConstraintError::OutOfRange("pillar score"))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Score of a role-play training session, `0..=100`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrainingScore(u8);

impl TrainingScore {
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if (0..=100).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(TypeConstraintError::OutOfRange("training score"))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Model year of a catalogue vehicle.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VehicleYear(i32);

impl VehicleYear {
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if (1950..=2100).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::OutOfRange("year"))
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Opaque key of a stored recording file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Generates a fresh random key keeping the given file extension.
    pub fn generate(extension: &str) -> Self {
        let extension = extension
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase();
        if extension.is_empty() {
            Self(Uuid::new_v4().to_string())
        } else {
            Self(format!("{}.{extension}", Uuid::new_v4()))
        }
    }

    /// Accepts a stored key, rejecting anything that could escape the storage root.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = NonEmptyString::new(value)?.into_inner();
        if value.contains('/') || value.contains('\\') || value.starts_with('.') {
            return Err(TypeConstraintError::InvalidValue(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert!(ProspectId::new(1).is_ok());
        assert_eq!(
            ProspectId::new(0),
            Err(TypeConstraintError::NonPositiveId)
        );
        assert_eq!(AgencyId::new(-3), Err(TypeConstraintError::NonPositiveId));
    }

    #[test]
    fn email_is_normalized() {
        let email = UserEmail::new("  Vendedor@Agencia.MX ").unwrap();
        assert_eq!(email.as_str(), "vendedor@agencia.mx");
        assert_eq!(
            ProspectEmail::new("not-an-email"),
            Err(TypeConstraintError::InvalidEmail)
        );
    }

    #[test]
    fn names_are_trimmed_and_non_empty() {
        assert_eq!(ProspectName::new("  Ana  ").unwrap().as_str(), "Ana");
        assert_eq!(ProspectName::new("   "), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn sanitized_text_strips_scripts() {
        let text = SanitizedText::new("<script>alert(1)</script>Llamar mañana").unwrap();
        assert_eq!(text.as_str(), "Llamar mañana");
        assert!(SanitizedText::new("<script>x</script>").is_err());
    }

    #[test]
    fn phone_is_normalized_to_e164() {
        let phone = PhoneNumber::new("+52 55 1234 5678").unwrap();
        assert_eq!(phone.as_str(), "+525512345678");
        assert_eq!(PhoneNumber::new("abc"), Err(TypeConstraintError::InvalidPhone));
    }

    #[test]
    fn coordinates_are_bounded() {
        assert!(Latitude::new(19.43).is_ok());
        assert!(Latitude::new(90.5).is_err());
        assert!(Longitude::new(-180.0).is_ok());
        assert!(Longitude::new(f64::NAN).is_err());
        assert!(RadiusMeters::new(0.0).is_err());
        assert!(RadiusMeters::new(150.0).is_ok());
        assert!(RadiusMeters::new(60_000.0).is_err());
    }

    #[test]
    fn money_and_percentages() {
        assert!(MoneyCents::new(-1).is_err());
        assert_eq!(MoneyCents::new(123_456).unwrap().to_string(), "1234.56");
        assert!(BasisPoints::new(10_001).is_err());
        assert_eq!(BasisPoints::new(250).unwrap().get(), 250);
    }

    #[test]
    fn scores_are_bounded() {
        assert!(PillarScore::new(10).is_ok());
        assert!(PillarScore::new(11).is_err());
        assert!(PillarScore::new(-1).is_err());
        assert!(TrainingScore::new(100).is_ok());
        assert!(TrainingScore::new(101).is_err());
    }

    #[test]
    fn storage_keys_cannot_traverse() {
        let generated = StorageKey::generate(".WebM");
        assert!(generated.as_str().ends_with(".webm"));
        assert!(StorageKey::new(generated.as_str()).is_ok());
        assert!(StorageKey::new("../etc/passwd").is_err());
        assert!(StorageKey::new("a/b").is_err());
    }
}
