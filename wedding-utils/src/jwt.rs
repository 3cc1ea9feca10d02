//! JSON Web Token helpers used by the admin login flow.
use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, Algorithm, DecodingKey, EncodingKey, Header,
    TokenData, Validation,
};
use serde::{de::DeserializeOwned, Serialize};

#[inline]
pub fn encode_jwt<T: Serialize>(
    claims: &T,
    secret: &[u8],
    algorithm: Option<Algorithm>,
) -> Result<String, JwtError> {
    let header = Header::new(algorithm.unwrap_or(Algorithm::HS256));
    encode(&header, claims, &EncodingKey::from_secret(secret))
}

#[inline]
pub fn decode_jwt<T: DeserializeOwned>(
    token: &str,
    secret: &[u8],
    validation: Option<Validation>,
) -> Result<TokenData<T>, JwtError> {
    let validation = validation.unwrap_or_default();
    decode::<T>(token, &DecodingKey::from_secret(secret), &validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestClaims {
        sub: String,
        exp: u64,
    }

    fn in_one_hour() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + 3600
    }

    #[test]
    fn test_encode_then_decode() {
        let claims = TestClaims {
            sub: "admin".into(),
            exp: in_one_hour(),
        };
        let token = encode_jwt(&claims, b"secret", None).unwrap();
        let decoded = decode_jwt::<TestClaims>(&token, b"secret", None).unwrap();
        assert_eq!(decoded.claims, claims);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = TestClaims {
            sub: "admin".into(),
            exp: in_one_hour(),
        };
        let token = encode_jwt(&claims, b"secret", None).unwrap();
        assert!(decode_jwt::<TestClaims>(&token, b"other", None).is_err());
    }
}
