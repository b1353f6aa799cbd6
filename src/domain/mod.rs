//! Domain aggregates exposed by the CRM service layer.

/// Declares a fieldless enum persisted as its variant name.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident, $kind:expr, { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Stable textual form used in storage and JSON.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::types::TypeConstraintError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $(stringify!($variant) => Ok($name::$variant),)+
                    _ => Err($crate::domain::types::TypeConstraintError::UnknownVariant {
                        kind: $kind,
                        value: value.to_string(),
                    }),
                }
            }
        }
    };
}

pub mod commission;
pub mod guard_duty;
pub mod prospect;
pub mod prospect_event;
pub mod recording;
pub mod spcc;
pub mod tenancy;
pub mod training;
pub mod types;
pub mod user;
pub mod vehicle;
pub mod zone;
