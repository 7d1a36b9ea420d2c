//! Anti-forgery tokens bound to a user, an action and a time window.

use std::time::Duration;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use time::OffsetDateTime;
use uuid::Uuid;

/// Action every settings panel request is verified against.
pub const SETTINGS_NONCE_ACTION: &str = "erp-settings-nonce";

const TOKEN_LENGTH: usize = 20;

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies nonces.
///
/// A token stays valid for the tick it was issued in and the following one,
/// so its lifetime is between half and all of the configured window.
#[derive(Clone)]
pub struct NonceService {
    secret: Vec<u8>,
    half_life_secs: i64,
}

impl NonceService {
    pub fn new(secret: impl Into<Vec<u8>>, lifetime: Duration) -> Self {
        let half_life_secs = i64::try_from(lifetime.as_secs() / 2)
            .unwrap_or(i64::MAX)
            .max(1);
        Self {
            secret: secret.into(),
            half_life_secs,
        }
    }

    pub fn create(&self, action: &str, user_id: Uuid) -> String {
        self.create_at(action, user_id, OffsetDateTime::now_utc())
    }

    pub fn create_at(&self, action: &str, user_id: Uuid, now: OffsetDateTime) -> String {
        self.token(self.tick(now), action, user_id)
    }

    pub fn verify(&self, token: &str, action: &str, user_id: Uuid) -> bool {
        self.verify_at(token, action, user_id, OffsetDateTime::now_utc())
    }

    pub fn verify_at(&self, token: &str, action: &str, user_id: Uuid, now: OffsetDateTime) -> bool {
        if token.is_empty() {
            return false;
        }
        let tick = self.tick(now);
        [tick, tick - 1].into_iter().any(|candidate| {
            let expected = self.token(candidate, action, user_id);
            bool::from(expected.as_bytes().ct_eq(token.as_bytes()))
        })
    }

    fn tick(&self, now: OffsetDateTime) -> i64 {
        now.unix_timestamp().div_euclid(self.half_life_secs) + 1
    }

    fn token(&self, tick: i64, action: &str, user_id: Uuid) -> String {
        // Any key length is accepted by HMAC.
        let mut mac = match HmacSha256::new_from_slice(&self.secret) {
            Ok(mac) => mac,
            Err(_) => return String::new(),
        };
        mac.update(format!("{tick}|{action}|{user_id}").as_bytes());
        let mut digest = hex::encode(mac.finalize().into_bytes());
        digest.truncate(TOKEN_LENGTH);
        digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn service() -> NonceService {
        NonceService::new("test-secret", Duration::from_secs(86_400))
    }

    #[test]
    fn token_verifies_for_the_same_user_and_action() {
        let svc = service();
        let user = Uuid::new_v4();
        let now = datetime!(2024-05-01 12:00 UTC);
        let token = svc.create_at(SETTINGS_NONCE_ACTION, user, now);

        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(svc.verify_at(&token, SETTINGS_NONCE_ACTION, user, now));
        assert!(!svc.verify_at(&token, "other-action", user, now));
        assert!(!svc.verify_at(&token, SETTINGS_NONCE_ACTION, Uuid::new_v4(), now));
    }

    #[test]
    fn token_survives_one_tick_and_expires_after_two() {
        let svc = service();
        let user = Uuid::nil();
        let issued = datetime!(2024-05-01 00:00 UTC);
        let token = svc.create_at(SETTINGS_NONCE_ACTION, user, issued);

        let next_tick = issued + time::Duration::hours(12);
        let expired = issued + time::Duration::hours(24);
        assert!(svc.verify_at(&token, SETTINGS_NONCE_ACTION, user, next_tick));
        assert!(!svc.verify_at(&token, SETTINGS_NONCE_ACTION, user, expired));
    }

    #[test]
    fn empty_and_foreign_tokens_fail() {
        let svc = service();
        let other = NonceService::new("another-secret", Duration::from_secs(86_400));
        let user = Uuid::nil();
        let now = datetime!(2024-05-01 00:00 UTC);
        let foreign = other.create_at(SETTINGS_NONCE_ACTION, user, now);

        assert!(!svc.verify_at("", SETTINGS_NONCE_ACTION, user, now));
        assert!(!svc.verify_at(&foreign, SETTINGS_NONCE_ACTION, user, now));
    }
}
