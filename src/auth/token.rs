//! Signed bearer token issuance and validation.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use super::{AuthError, Claims};
use crate::config;

/// Issue a signed HS256 token for the given subject, valid for the
/// configured number of hours (24 by default).
pub fn issue_token(subject: &str) -> Result<String, AuthError> {
    issue_token_with_expiry(subject, config::config().security.jwt_expiry_hours)
}

pub fn issue_token_with_expiry(subject: &str, expiry_hours: i64) -> Result<String, AuthError> {
    let security = &config::config().security;
    if security.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: subject.to_string(),
        jti: Uuid::new_v4().to_string(),
        iss: security.jwt_issuer.clone(),
        aud: security.jwt_audience.clone(),
        iat: now,
        exp: now + expiry_hours * 3600,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(security.jwt_secret.as_bytes()),
    )
    .map_err(|e| AuthError::Crypto(format!("JWT encode: {}", e)))
}

/// Decode and verify a bearer token: signature, issuer, audience, and
/// expiry are all checked, with zero clock-skew tolerance. Every failure
/// mode collapses to `AuthError::TokenInvalid`.
pub fn validate_token(token: &str) -> Result<Claims, AuthError> {
    let security = &config::config().security;
    if security.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[&security.jwt_issuer]);
    validation.set_audience(&[&security.jwt_audience]);
    validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(security.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AuthError::TokenInvalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_claims(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn base_claims() -> Claims {
        let security = &config::config().security;
        let now = Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4().to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: security.jwt_issuer.clone(),
            aud: security.jwt_audience.clone(),
            iat: now,
            exp: now + 3600,
        }
    }

    #[test]
    fn issued_token_validates() {
        let token = issue_token("some-user").unwrap();
        let claims = validate_token(&token).unwrap();
        assert_eq!(claims.sub, "some-user");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn tokens_carry_unique_ids() {
        let a = validate_token(&issue_token("u").unwrap()).unwrap();
        let b = validate_token(&issue_token("u").unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = base_claims();
        claims.iat -= 25 * 3600;
        claims.exp = claims.iat + 24 * 3600; // expired one hour ago
        let token = encode_claims(&claims, &config::config().security.jwt_secret);
        assert!(validate_token(&token).is_err());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let token = issue_token("some-user").unwrap();
        // Flip the last character of the signature segment
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });
        assert!(validate_token(&tampered).is_err());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let mut claims = base_claims();
        claims.iss = "someone-else".to_string();
        let token = encode_claims(&claims, &config::config().security.jwt_secret);
        assert!(validate_token(&token).is_err());
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let mut claims = base_claims();
        claims.aud = "someone-else".to_string();
        let token = encode_claims(&claims, &config::config().security.jwt_secret);
        assert!(validate_token(&token).is_err());
    }

    #[test]
    fn wrong_signing_key_is_rejected() {
        let token = encode_claims(&base_claims(), "not-the-real-secret");
        assert!(validate_token(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(validate_token("not-a-jwt").is_err());
    }
}
