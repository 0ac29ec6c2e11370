//! Macro for implementing Display and FromStr for wire-named enums
//!
//! Operation verbs and result statuses travel as fixed lowercase strings
//! (`list`, `job-status`, `success`, ...). This macro keeps the enum and its
//! wire spelling in one table.
//!
//! # Example
//!
//! ```rust
//! use erpbridge_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Verb {
//!     List,
//!     JobStatus,
//! }
//!
//! impl_wire_name_conversions!(Verb {
//!     List => "list",
//!     JobStatus => "job-status",
//! });
//!
//! assert_eq!(Verb::JobStatus.to_string(), "job-status");
//! assert_eq!("LIST".parse::<Verb>(), Ok(Verb::List));
//! ```

/// Implements Display, FromStr and `as_str` for wire-named enums
///
/// This macro generates:
/// - `as_str`: the canonical wire spelling
/// - Display trait: writes the wire spelling
/// - FromStr trait: parses case-insensitive strings to enum variants
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical wire spelling of this value.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
