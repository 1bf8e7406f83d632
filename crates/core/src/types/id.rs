//! Newtype IDs for type-safe catalog references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Catalog IDs are
//! opaque strings (SKUs, slugs, or database keys rendered as text).

/// Errors that can occur when parsing an ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty or only whitespace.
    #[error("id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Maximum length of an ID in bytes.
pub const MAX_ID_LENGTH: usize = 128;

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` as a plain string, validated on the way in
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `parse()` and `as_str()`
/// - `Display`, `FromStr`, `AsRef<str>`, `TryFrom<String>`, and `From<_> for String`
///
/// # Example
///
/// ```rust
/// # use shelfcart_core::define_id;
/// define_id!(SkuId);
/// define_id!(WarehouseId);
///
/// let sku = SkuId::parse("pineapple-1").unwrap();
/// let warehouse = WarehouseId::parse("pineapple-1").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = warehouse;
/// # let _ = (sku, warehouse);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an ID, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns an error if the trimmed input is empty or longer than
            /// the maximum ID length.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::IdError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($crate::IdError::Empty);
                }
                if trimmed.len() > $crate::MAX_ID_LENGTH {
                    return Err($crate::IdError::TooLong {
                        max: $crate::MAX_ID_LENGTH,
                    });
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::core::convert::TryFrom<String> for $name {
            type Error = $crate::IdError;

            fn try_from(s: String) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define catalog IDs
define_id!(ProductId);
define_id!(CategoryId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = ProductId::parse("  p1 ").unwrap();
        assert_eq!(id.as_str(), "p1");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ProductId::parse(""), Err(IdError::Empty));
        assert_eq!(ProductId::parse("   "), Err(IdError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "x".repeat(MAX_ID_LENGTH + 1);
        assert!(matches!(
            ProductId::parse(&long),
            Err(IdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_serde_is_plain_string() {
        let id = ProductId::parse("p1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"p1\"");
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let result: Result<ProductId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let a = CategoryId::parse("apparel").unwrap();
        let b = CategoryId::parse("books").unwrap();
        assert!(a < b);
    }
}
