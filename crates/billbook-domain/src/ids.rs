//! Record identifiers
//!
//! Invoices and providers are keyed by UUIDv7 values. UUIDv7 gives:
//! - Chronological sortability (ids minted later compare greater)
//! - 128-bit uniqueness, so an id is never handed out twice in a session
//! - No coordination required for generation

use std::fmt;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u128);

        impl $name {
            /// Generate a fresh UUIDv7-based identifier
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().as_u128())
            }

            /// Create an identifier from a raw u128 value
            pub fn from_value(value: u128) -> Self {
                Self(value)
            }

            /// Parse an identifier from its hyphenated UUID form
            pub fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s.trim())
                    .map(|u| Self(u.as_u128()))
                    .map_err(|e| format!("Invalid id '{}': {}", s, e))
            }

            /// Get the raw u128 value
            pub fn value(&self) -> u128 {
                self.0
            }

            /// Millisecond timestamp embedded in the UUIDv7
            pub fn timestamp(&self) -> u64 {
                (self.0 >> 80) as u64
            }

            /// Last eight hex digits, for compact display
            ///
            /// The leading digits of a UUIDv7 are its timestamp and repeat
            /// across ids minted in the same minute; the tail is random.
            pub fn short(&self) -> String {
                format!("{:08x}", self.0 as u32)
            }

            /// Whether `hex` (hyphens ignored, any case) ends this id
            pub fn has_suffix(&self, hex: &str) -> bool {
                let hex: String = hex.chars().filter(|c| *c != '-').collect();
                !hex.is_empty() && format!("{:032x}", self.0).ends_with(&hex.to_lowercase())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", uuid::Uuid::from_u128(self.0))
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_string(s)
            }
        }
    };
}

record_id! {
    /// Identifier of an [`Invoice`](crate::Invoice), minted at ingestion time
    ///
    /// # Examples
    ///
    /// ```
    /// use billbook_domain::InvoiceId;
    ///
    /// let id = InvoiceId::new();
    /// let parsed: InvoiceId = id.to_string().parse().unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    InvoiceId
}

record_id! {
    /// Identifier of a [`Provider`](crate::Provider), minted when the provider is first seen
    ProviderId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = InvoiceId::new();
        let b = InvoiceId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_ids_sort_by_creation() {
        let first = ProviderId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = ProviderId::new();
        assert!(first < second);
        assert!(first.timestamp() <= second.timestamp());
    }

    #[test]
    fn test_id_string_round_trip() {
        let id = InvoiceId::new();
        let parsed = InvoiceId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_invalid_id_string() {
        assert!(ProviderId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_short_form() {
        let id = InvoiceId::from_value(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
        assert_eq!(id.short(), "89abcdef");
        assert!(id.has_suffix("89ABCDEF"));
        assert!(id.has_suffix("4567-89ab-cdef"));
        assert!(!id.has_suffix("01234567"));
        assert!(!id.has_suffix(""));
    }
}
