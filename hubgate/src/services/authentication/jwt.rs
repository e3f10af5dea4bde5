use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;

use super::error::{Rejection, TokenCheck};
use super::keys::VerificationKeys;

const RSA_ALGORITHMS: [Algorithm; 3] = [Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];

#[derive(Debug, Deserialize)]
struct UnverifiedClaims {
    sub: Option<String>,
    iss: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerifiedClaims {
    exp: f64,
}

/// Verifies registry JWTs locally.
#[derive(Debug, Clone)]
pub struct JwtVerifier {
    keys: VerificationKeys,
}

impl JwtVerifier {
    pub fn new(keys: VerificationKeys) -> Self {
        Self { keys }
    }

    /// Check that `token` is an unexpired RSA-signed JWT whose subject is
    /// `username`.
    pub fn verify(&self, username: &str, token: &str) -> TokenCheck {
        // Subject and issuer only pick the key, nothing is trusted before
        // the signature check below.
        let unverified = match read_unverified_claims(token) {
            Ok(claims) => claims,
            Err(e) => return TokenCheck::Rejected(Rejection::MalformedToken(e.to_string())),
        };

        if unverified.sub.as_deref() != Some(username) {
            return TokenCheck::Rejected(Rejection::SubjectMismatch);
        }

        let (key, source) = self.keys.select(unverified.iss.as_deref());
        debug!(
            "Verifying token for {} with {:?} key (issuer {:?})",
            username, source, unverified.iss
        );

        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = RSA_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.sub = Some(username.to_string());

        let claims = match decode::<VerifiedClaims>(token, key, &validation) {
            Ok(data) => data.claims,
            Err(e) => return TokenCheck::Rejected(rejection_for(e.kind())),
        };

        if claims.exp <= chrono::Utc::now().timestamp() as f64 {
            return TokenCheck::Rejected(Rejection::Expired);
        }

        TokenCheck::Valid
    }
}

fn read_unverified_claims(token: &str) -> Result<UnverifiedClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<UnverifiedClaims>(token, &DecodingKey::from_secret(&[]), &validation).map(|d| d.claims)
}

fn rejection_for(kind: &ErrorKind) -> Rejection {
    match kind {
        ErrorKind::InvalidSignature => Rejection::InvalidSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            Rejection::UnsupportedAlgorithm
        }
        ErrorKind::ExpiredSignature => Rejection::Expired,
        ErrorKind::InvalidSubject => Rejection::SubjectMismatch,
        other => Rejection::InvalidToken(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const INTERNAL_ISSUER: &str = "hub-token-service";
    const INTERNAL_PRIVATE: &[u8] = include_bytes!("../../../tests/fixtures/internal_private.pem");
    const INTERNAL_PUBLIC: &[u8] = include_bytes!("../../../tests/fixtures/internal_public.pem");
    const EXTERNAL_PRIVATE: &[u8] = include_bytes!("../../../tests/fixtures/external_private.pem");
    const EXTERNAL_PUBLIC: &[u8] = include_bytes!("../../../tests/fixtures/external_public.pem");

    fn verifier() -> JwtVerifier {
        JwtVerifier::new(
            VerificationKeys::from_pem(INTERNAL_ISSUER, INTERNAL_PUBLIC, EXTERNAL_PUBLIC).unwrap(),
        )
    }

    fn in_one_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    fn sign(alg: Algorithm, private_pem: &[u8], claims: serde_json::Value) -> String {
        let key = EncodingKey::from_rsa_pem(private_pem).unwrap();
        encode(&Header::new(alg), &claims, &key).unwrap()
    }

    fn internal_token(sub: &str, exp: i64) -> String {
        sign(
            Algorithm::RS256,
            INTERNAL_PRIVATE,
            json!({"sub": sub, "iss": INTERNAL_ISSUER, "exp": exp, "aud": "registry"}),
        )
    }

    #[test]
    fn test_internal_token_round_trip() {
        let token = internal_token("alice", in_one_hour());
        assert_eq!(verifier().verify("alice", &token), TokenCheck::Valid);
    }

    #[test]
    fn test_altered_signature_is_rejected() {
        let token = internal_token("alice", in_one_hour());
        let signature_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        let position = signature_start + 10;
        bytes[position] = if bytes[position] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(
            verifier().verify("alice", &tampered),
            TokenCheck::Rejected(Rejection::InvalidSignature)
        );
    }

    #[test]
    fn test_external_token_uses_external_key() {
        let token = sign(
            Algorithm::RS512,
            EXTERNAL_PRIVATE,
            json!({"sub": "alice", "iss": "https://idp.example.com", "exp": in_one_hour()}),
        );
        assert!(verifier().verify("alice", &token).is_valid());
    }

    #[test]
    fn test_issuer_selects_key() {
        // Signed by the identity provider but claiming the internal issuer.
        let token = sign(
            Algorithm::RS256,
            EXTERNAL_PRIVATE,
            json!({"sub": "alice", "iss": INTERNAL_ISSUER, "exp": in_one_hour()}),
        );
        assert_eq!(
            verifier().verify("alice", &token),
            TokenCheck::Rejected(Rejection::InvalidSignature)
        );
    }

    #[test]
    fn test_subject_must_match_exactly() {
        let token = internal_token("alice", in_one_hour());
        assert_eq!(
            verifier().verify("Alice", &token),
            TokenCheck::Rejected(Rejection::SubjectMismatch)
        );
        assert_eq!(
            verifier().verify("bob", &token),
            TokenCheck::Rejected(Rejection::SubjectMismatch)
        );
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = internal_token("alice", chrono::Utc::now().timestamp() - 10);
        assert_eq!(
            verifier().verify("alice", &token),
            TokenCheck::Rejected(Rejection::Expired)
        );
    }

    #[test]
    fn test_token_without_expiry_is_rejected() {
        let token = sign(
            Algorithm::RS256,
            INTERNAL_PRIVATE,
            json!({"sub": "alice", "iss": INTERNAL_ISSUER}),
        );
        assert!(matches!(
            verifier().verify("alice", &token),
            TokenCheck::Rejected(Rejection::InvalidToken(_))
        ));
    }

    #[test]
    fn test_hmac_token_is_rejected() {
        let claims = json!({"sub": "alice", "iss": INTERNAL_ISSUER, "exp": in_one_hour()});
        // HMAC keyed with the public key bytes: the classic confusion attack.
        let key = EncodingKey::from_secret(INTERNAL_PUBLIC);
        let token = encode(&Header::new(Algorithm::HS256), &claims, &key).unwrap();

        assert_eq!(
            verifier().verify("alice", &token),
            TokenCheck::Rejected(Rejection::UnsupportedAlgorithm)
        );
    }

    #[test]
    fn test_none_algorithm_is_rejected() {
        use base64::Engine;
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let header = engine.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = engine.encode(
            json!({"sub": "alice", "iss": INTERNAL_ISSUER, "exp": in_one_hour()}).to_string(),
        );
        let token = format!("{header}.{payload}.");

        assert!(matches!(
            verifier().verify("alice", &token),
            TokenCheck::Rejected(Rejection::MalformedToken(_))
        ));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            verifier().verify("alice", "not-a-jwt"),
            TokenCheck::Rejected(Rejection::MalformedToken(_))
        ));
    }
}
