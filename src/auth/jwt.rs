use std::time::Duration;

use jsonwebtoken::{encode, EncodingKey, Header};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::auth::{claims::Claims, error::AuthError};
use crate::storage::{App, User};

/// Signs a session token for `user` with `app`'s own secret, valid for `ttl`.
pub fn new_token(user: &User, app: &App, ttl: Duration) -> Result<String, AuthError> {
    let now = OffsetDateTime::now_utc();
    let exp = i64::try_from(ttl.as_secs())
        .ok()
        .and_then(|secs| now.checked_add(TimeDuration::seconds(secs)))
        .ok_or_else(|| AuthError::Signing(format!("token ttl {ttl:?} out of range")))?;
    let claims = Claims {
        uid: user.id,
        email: user.email.clone(),
        app_id: app.id,
        exp: exp.unix_timestamp(),
    };
    let key = EncodingKey::from_secret(app.secret.as_bytes());
    let token = encode(&Header::default(), &claims, &key)
        .map_err(|e| AuthError::Signing(e.to_string()))?;
    debug!(user_id = user.id, app_id = app.id, "jwt signed");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};

    fn user() -> User {
        User {
            id: 42,
            email: "alice@example.com".into(),
            pass_hash: Vec::new(),
        }
    }

    fn app(id: i32, secret: &str) -> App {
        App {
            id,
            name: format!("app-{id}"),
            secret: secret.into(),
        }
    }

    fn decode_with(token: &str, secret: &str) -> jsonwebtoken::errors::Result<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }

    #[test]
    fn token_carries_user_and_app_claims() {
        let ttl = Duration::from_secs(3600);
        let before = OffsetDateTime::now_utc().unix_timestamp();
        let token = new_token(&user(), &app(7, "app-secret"), ttl).expect("sign");
        let after = OffsetDateTime::now_utc().unix_timestamp();

        let claims = decode_with(&token, "app-secret").expect("decode");
        assert_eq!(claims.uid, 42);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.app_id, 7);
        assert!(claims.exp >= before + 3600 && claims.exp <= after + 3600);
    }

    #[test]
    fn token_is_rejected_under_another_apps_secret() {
        let token = new_token(&user(), &app(1, "secret-a"), Duration::from_secs(60)).expect("sign");
        let err = decode_with(&token, "secret-b").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSignature));
    }

    #[test]
    fn oversized_ttl_is_a_signing_error() {
        for ttl in [
            Duration::from_secs(10_000_000_000 * 60),
            Duration::from_secs(u64::MAX),
        ] {
            let err = new_token(&user(), &app(1, "secret"), ttl).unwrap_err();
            assert!(matches!(err, AuthError::Signing(_)));
        }
    }

    #[test]
    fn expired_token_fails_validation() {
        let token = new_token(&user(), &app(1, "secret"), Duration::ZERO).expect("sign");
        let mut validation = Validation::default();
        validation.leeway = 0;
        std::thread::sleep(Duration::from_millis(1100));
        let err = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &validation,
        )
        .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }
}
