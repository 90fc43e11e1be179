//! Error types for the `topolens-models` crate.
//!
//! All fallible constructors and `FromStr` implementations in this crate
//! return variants of [`ModelError`].

/// Errors produced when constructing or validating model types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A credential's timestamps were inconsistent.
    #[error("invalid credential: {reason}")]
    InvalidCredential {
        /// Human-readable explanation.
        reason: String,
    },

    /// A store-type tag did not name a known data-store kind.
    #[error("unknown data-store type \"{value}\"")]
    UnknownStoreType {
        /// The value that failed to parse.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_credential() {
        let err = ModelError::InvalidCredential {
            reason: "issuedAt is after expiresAt".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid credential: issuedAt is after expiresAt"
        );
    }

    #[test]
    fn error_display_store_type() {
        let err = ModelError::UnknownStoreType {
            value: "tapeDrive".into(),
        };
        assert_eq!(err.to_string(), "unknown data-store type \"tapeDrive\"");
    }
}
