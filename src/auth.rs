//! Basic-auth credentials shared by the dashboard client and the API server.

use crate::utils::error::{DashboardError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Fixed account name the dashboard authenticates with.
pub const DEFAULT_USERNAME: &str = "multimediafalab";

/// Normalizes a pasted password: NBSP becomes a space, zero-width space and
/// BOM are dropped, surrounding whitespace is trimmed.
pub fn sanitize_password(password: &str) -> String {
    password
        .replace('\u{00A0}', " ")
        .replace(['\u{200B}', '\u{FEFF}'], "")
        .trim()
        .to_string()
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// The password is sanitized on construction.
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        Self {
            username: username.into(),
            password: sanitize_password(password),
        }
    }

    pub fn dashboard(password: &str) -> Self {
        Self::new(DEFAULT_USERNAME, password)
    }

    /// `base64(username:password)`, as used in the `auth` query parameter.
    pub fn token(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.username, self.password))
    }

    pub fn authorization_header(&self) -> String {
        format!("Basic {}", self.token())
    }

    pub fn from_token(token: &str) -> Result<Self> {
        let decoded = STANDARD
            .decode(token.trim())
            .map_err(|e| auth_error(format!("Invalid base64 token: {}", e)))?;
        let decoded =
            String::from_utf8(decoded).map_err(|_| auth_error("Token is not valid UTF-8"))?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| auth_error("Token has no ':' separator"))?;
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn from_authorization_header(header: &str) -> Result<Self> {
        let (scheme, token) = header
            .trim()
            .split_once(' ')
            .ok_or_else(|| auth_error("Malformed Authorization header"))?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(auth_error(format!("Unsupported scheme: {}", scheme)));
        }
        Self::from_token(token)
    }
}

fn auth_error(message: impl Into<String>) -> DashboardError {
    DashboardError::AuthenticationError {
        message: message.into(),
    }
}

/// Server-side check against the configured app password. The username is ignored.
#[derive(Clone)]
pub struct PasswordVerifier {
    expected: String,
    expected_clean: String,
}

impl PasswordVerifier {
    pub fn new(expected: &str) -> Self {
        Self {
            expected: expected.to_string(),
            expected_clean: sanitize_password(expected),
        }
    }

    pub fn matches(&self, password: &str) -> bool {
        if self.expected.is_empty() {
            return false;
        }
        password == self.expected || sanitize_password(password) == self.expected_clean
    }

    pub fn verify(&self, credentials: &Credentials) -> Result<()> {
        if self.matches(&credentials.password) {
            Ok(())
        } else {
            Err(auth_error("Contraseña incorrecta"))
        }
    }

    pub fn verify_header(&self, header: &str) -> Result<()> {
        self.verify(&Credentials::from_authorization_header(header)?)
    }

    pub fn verify_token(&self, token: &str) -> Result<()> {
        self.verify(&Credentials::from_token(token)?)
    }
}

impl std::fmt::Debug for PasswordVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordVerifier(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_password() {
        assert_eq!(sanitize_password("  abcd efgh\u{200B} "), "abcd efgh");
        assert_eq!(sanitize_password("\u{FEFF}ab\u{00A0}cd"), "ab cd");
        assert_eq!(sanitize_password("\u{00A0}\u{200B}"), "");
    }

    #[test]
    fn test_token_round_trip() {
        let creds = Credentials::dashboard(" s3cr3t pass\u{200B}");
        assert_eq!(creds.password, "s3cr3t pass");
        assert_eq!(
            creds.authorization_header(),
            format!("Basic {}", STANDARD.encode("multimediafalab:s3cr3t pass"))
        );
        assert_eq!(Credentials::from_token(&creds.token()).unwrap(), creds);
    }

    #[test]
    fn test_password_with_colon_is_kept_whole() {
        let token = STANDARD.encode("user:pa:ss");
        let creds = Credentials::from_token(&token).unwrap();
        assert_eq!(creds.username, "user");
        assert_eq!(creds.password, "pa:ss");
    }

    #[test]
    fn test_verifier_accepts_raw_or_sanitized_match() {
        let verifier = PasswordVerifier::new("abcd efgh ijkl");

        assert!(verifier.matches("abcd efgh ijkl"));
        assert!(verifier.matches(" abcd\u{00A0}efgh ijkl\u{200B}"));
        assert!(!verifier.matches("abcd"));

        let header = Credentials::new("anyone", "abcd efgh ijkl").authorization_header();
        assert!(verifier.verify_header(&header).is_ok());
        assert!(verifier.verify_header("Bearer xyz").is_err());
        assert!(verifier.verify_header("Basic !!!").is_err());
        assert!(verifier.verify_token(&STANDARD.encode("no-separator")).is_err());
    }

    #[test]
    fn test_verifier_without_configured_password_rejects_everything() {
        let verifier = PasswordVerifier::new("");
        assert!(!verifier.matches(""));
    }
}
