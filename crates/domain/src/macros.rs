//! Macro for implementing Display and FromStr for fieldless domain enums
//!
//! Persisted records and text commands both spell enum values as short
//! lowercase tokens. The macro keeps the canonical spelling in one place and
//! lets older spellings parse through optional aliases.
//!
//! # Example
//!
//! ```rust
//! use watertime_domain::impl_domain_kind_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Platform {
//!     Native,
//!     Web,
//! }
//!
//! impl_domain_kind_conversions!(Platform {
//!     Native => "native" | "ios" | "android",
//!     Web => "web",
//! });
//!
//! assert_eq!(Platform::Native.to_string(), "native");
//! assert_eq!("IOS".parse::<Platform>(), Ok(Platform::Native));
//! ```

/// Implements Display and FromStr for a fieldless enum
///
/// - Display writes the canonical token (the first string of each arm)
/// - FromStr is case-insensitive and also accepts every alias after `|`
#[macro_export]
macro_rules! impl_domain_kind_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Beverage {
        Water,
        Tea,
    }

    impl_domain_kind_conversions!(Beverage {
        Water => "water" | "agua",
        Tea => "tea",
    });

    #[test]
    fn display_uses_canonical_token() {
        assert_eq!(Beverage::Water.to_string(), "water");
        assert_eq!(Beverage::Tea.to_string(), "tea");
    }

    #[test]
    fn parse_is_case_insensitive_and_accepts_aliases() {
        assert_eq!(Beverage::from_str("WATER").unwrap(), Beverage::Water);
        assert_eq!(Beverage::from_str(" Agua ").unwrap(), Beverage::Water);
        assert_eq!(Beverage::from_str("tea").unwrap(), Beverage::Tea);
    }

    #[test]
    fn parse_rejects_unknown_tokens() {
        let err = Beverage::from_str("coffee").unwrap_err();
        assert!(err.contains("Invalid Beverage: coffee"));
        assert!(Beverage::from_str("").is_err());
    }
}
