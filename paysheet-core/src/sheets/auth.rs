//! Service-account authentication for the Google APIs.
//!
//! Builds an RS256-signed JWT assertion and exchanges it for a short-lived
//! OAuth access token.

use ring::rand::SystemRandom;
use ring::signature::{RSA_PKCS1_SHA256, RsaKeyPair};
use serde::{Deserialize, Serialize};

use super::SheetError;

pub(crate) const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// A Google service account able to sign its own token requests.
pub struct ServiceAccount {
    email: String,
    key_pair: RsaKeyPair,
    rng: SystemRandom,
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
pub(crate) struct AccessToken {
    pub access_token: String,
    pub expires_in: i64,
}

impl ServiceAccount {
    /// Load a service account from its email and PEM-encoded PKCS#8 key.
    ///
    /// Keys pasted into environment variables often carry literal `\n`
    /// sequences; those are turned back into newlines first.
    pub fn new(email: impl Into<String>, private_key_pem: &str) -> Result<Self, SheetError> {
        let der = decode_pem(&normalize_private_key(private_key_pem))?;
        let key_pair = RsaKeyPair::from_pkcs8(&der)
            .map_err(|e| SheetError::Auth(format!("rejected private key: {e}")))?;
        Ok(Self {
            email: email.into(),
            key_pair,
            rng: SystemRandom::new(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Signed JWT assertion valid for one hour from `now` (unix seconds).
    pub fn assertion(&self, now: i64) -> Result<String, SheetError> {
        let header = fast32::base64::RFC4648_URL_NOPAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let claims = serde_json::to_vec(&Claims {
            iss: &self.email,
            scope: SCOPE,
            aud: TOKEN_URI,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        })
        .map_err(|e| SheetError::Auth(e.to_string()))?;
        let claims = fast32::base64::RFC4648_URL_NOPAD.encode(&claims);

        let signing_input = format!("{header}.{claims}");
        let mut signature = vec![0; self.key_pair.public().modulus_len()];
        self.key_pair
            .sign(
                &RSA_PKCS1_SHA256,
                &self.rng,
                signing_input.as_bytes(),
                &mut signature,
            )
            .map_err(|_| SheetError::Auth("failed to sign assertion".to_string()))?;

        Ok(format!(
            "{signing_input}.{}",
            fast32::base64::RFC4648_URL_NOPAD.encode(&signature)
        ))
    }
}

/// Replace escaped `\n` sequences with real newlines.
pub fn normalize_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// Strip PEM armor and decode the base64 body.
fn decode_pem(pem: &str) -> Result<Vec<u8>, SheetError> {
    let body: String = pem
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("-----"))
        .collect();
    if body.is_empty() {
        return Err(SheetError::Auth("private key is empty".to_string()));
    }
    fast32::base64::RFC4648
        .decode_str(&body)
        .map_err(|_| SheetError::Auth("private key is not valid base64".to_string()))
}
