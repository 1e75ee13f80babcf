use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{auth::claims::Claims, auth::repo::User, config::JwtConfig, state::AppState};

/// Signing and verification keys derived from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: Duration::from_secs(
                u64::try_from(cfg.ttl_minutes)
                    .unwrap_or(0)
                    .saturating_mul(60),
            ),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn sign(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = TimeDuration::seconds(i64::try_from(self.ttl.as_secs())?);
        let exp = now
            .checked_add(ttl)
            .ok_or_else(|| anyhow::anyhow!("token expiry out of range"))?;
        let claims = Claims {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        self.encode(&claims)
    }

    pub(crate) fn encode(&self, claims: &Claims) -> anyhow::Result<String> {
        let token = encode(&Header::default(), claims, &self.encoding)?;
        debug!(user_id = %claims.user_id, role = %claims.role, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        // HS256 with a required, checked `exp`
        let validation = Validation::default();
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.user_id, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            ttl_minutes: 60,
        })
    }

    fn make_user(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            full_name: Some("A B".into()),
            username: "ab".into(),
            password: "not-a-real-hash".into(),
            role: role.into(),
        }
    }

    #[test]
    fn sign_and_verify_carries_identity_and_role() {
        let keys = make_keys("dev-secret");
        let user = make_user("admin");
        let token = keys.sign(&user).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.username, "ab");
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn token_expires_one_ttl_after_issue() {
        let keys = make_keys("dev-secret");
        let claims = keys.verify(&keys.sign(&make_user("user")).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, 60 * 60);
        assert_eq!(keys.ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn huge_ttl_does_not_overflow() {
        let keys = JwtKeys::new(&JwtConfig {
            secret: "dev-secret".into(),
            ttl_minutes: i64::MAX,
        });
        assert_eq!(keys.ttl(), Duration::from_secs(u64::MAX));
        assert!(keys.sign(&make_user("admin")).is_err());

        let keys = JwtKeys::new(&JwtConfig {
            secret: "dev-secret".into(),
            ttl_minutes: -5,
        });
        assert_eq!(keys.ttl(), Duration::ZERO);
    }

    #[test]
    fn verify_rejects_other_secret() {
        let token = make_keys("secret-a").sign(&make_user("admin")).unwrap();
        assert!(make_keys("secret-b").verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys("dev-secret");
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            user_id: Uuid::new_v4(),
            username: "ab".into(),
            role: "admin".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = keys.encode(&claims).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(make_keys("dev-secret").verify("not.a.jwt").is_err());
    }
}
