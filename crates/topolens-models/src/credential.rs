//! Session-bound OAuth2 credential.
//!
//! A [`Credential`] is the delegated access/refresh token pair issued by the
//! portal's OAuth2 token endpoint. Exactly one credential exists per session;
//! it is mutated only by the token lifecycle manager and destroyed when the
//! session ends or renewal fails.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Delegated credential used to authenticate every outbound admin call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Short-lived access token presented as the `token` parameter.
    pub access_token: String,
    /// Long-lived refresh token used to renew the access token.
    pub refresh_token: String,
    /// When the access token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the access token expires.
    pub expires_at: DateTime<Utc>,
    /// When the refresh token itself expires.
    pub refresh_expires_at: DateTime<Utc>,
    /// The identity the credential was issued for (portal username).
    pub owner: String,
}

impl Credential {
    /// Construct a credential, enforcing `issued_at <= expires_at`.
    pub fn new(
        access_token: String,
        refresh_token: String,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        refresh_expires_at: DateTime<Utc>,
        owner: String,
    ) -> Result<Self, ModelError> {
        if issued_at > expires_at {
            return Err(ModelError::InvalidCredential {
                reason: "issuedAt is after expiresAt".into(),
            });
        }
        Ok(Self {
            access_token,
            refresh_token,
            issued_at,
            expires_at,
            refresh_expires_at,
            owner,
        })
    }

    /// A credential with no access token is equivalent to "unauthenticated".
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// True when the access token expires within `buffer` from now.
    ///
    /// The lifecycle manager renews the credential whenever this holds for
    /// its 5-minute renewal buffer.
    pub fn expires_within(&self, buffer: Duration) -> bool {
        Utc::now() + buffer >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential_expiring_in(minutes: i64) -> Credential {
        let now = Utc::now();
        Credential::new(
            "tok".into(),
            "refresh".into(),
            now,
            now + Duration::minutes(minutes),
            now + Duration::days(14),
            "admin".into(),
        )
        .unwrap()
    }

    #[test]
    fn issued_after_expiry_is_rejected() {
        let now = Utc::now();
        let result = Credential::new(
            "tok".into(),
            "refresh".into(),
            now,
            now - Duration::seconds(1),
            now,
            "admin".into(),
        );
        assert!(matches!(
            result,
            Err(ModelError::InvalidCredential { .. })
        ));
    }

    #[test]
    fn empty_access_token_is_unauthenticated() {
        let now = Utc::now();
        let cred = Credential::new(
            String::new(),
            "refresh".into(),
            now,
            now + Duration::minutes(30),
            now,
            "admin".into(),
        )
        .unwrap();
        assert!(!cred.is_authenticated());
    }

    #[test]
    fn expiry_buffer_triggers_inside_window() {
        let cred = credential_expiring_in(2);
        assert!(cred.expires_within(Duration::minutes(5)));
    }

    #[test]
    fn expiry_buffer_quiet_outside_window() {
        let cred = credential_expiring_in(30);
        assert!(!cred.expires_within(Duration::minutes(5)));
    }
}
