use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::{engine::general_purpose, Engine};

use crate::directory::{AccountDirectory, DirectoryError};
use crate::security::audit_log::AuditLogger;

const BASIC_SCHEME: &str = "Basic ";

/// Why a credential header was refused. Only ever logged; clients always see
/// the same `AuthFailure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingHeader,
    WrongScheme,
    BadEncoding,
    MissingSeparator,
    BadCredentials,
}

impl AuthRejection {
    pub fn reason(self) -> &'static str {
        match self {
            AuthRejection::MissingHeader => "missing authorization header",
            AuthRejection::WrongScheme => "unsupported authorization scheme",
            AuthRejection::BadEncoding => "credentials not valid base64/utf-8",
            AuthRejection::MissingSeparator => "credentials missing ':' separator",
            AuthRejection::BadCredentials => "unknown user or wrong password",
        }
    }
}

/// user_id/password pair carried by a Basic authorization header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub password: String,
}

// Keep the password out of debug output and logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Parse `Basic <base64(user_id:password)>`; the pair is split on the first colon.
    pub fn from_header(value: &str) -> Result<Self, AuthRejection> {
        let token = value
            .strip_prefix(BASIC_SCHEME)
            .ok_or(AuthRejection::WrongScheme)?
            .split_whitespace()
            .next()
            .ok_or(AuthRejection::BadEncoding)?;

        let decoded = general_purpose::STANDARD
            .decode(token)
            .map_err(|_| AuthRejection::BadEncoding)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthRejection::BadEncoding)?;

        let (user_id, password) = decoded
            .split_once(':')
            .ok_or(AuthRejection::MissingSeparator)?;

        Ok(Self {
            user_id: user_id.to_string(),
            password: password.to_string(),
        })
    }

    pub fn from_parts(parts: &Parts) -> Result<Self, AuthRejection> {
        let value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthRejection::MissingHeader)?
            .to_str()
            .map_err(|_| AuthRejection::BadEncoding)?;
        Self::from_header(value)
    }

    pub fn to_header(&self) -> String {
        let raw = format!("{}:{}", self.user_id, self.password);
        format!("{BASIC_SCHEME}{}", general_purpose::STANDARD.encode(raw))
    }
}

/// Identity of a caller whose Basic credentials matched a stored account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AccountDirectory: FromRef<S>,
    AuditLogger: FromRef<S>,
{
    type Rejection = DirectoryError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let audit = AuditLogger::from_ref(state);

        let creds = match Credentials::from_parts(parts) {
            Ok(c) => c,
            Err(rejection) => {
                audit.auth_failure(None, rejection.reason());
                return Err(DirectoryError::AuthFailure);
            }
        };

        let directory = AccountDirectory::from_ref(state);
        if directory.authenticate(&creds.user_id, &creds.password).await.is_err() {
            audit.auth_failure(Some(&creds.user_id), AuthRejection::BadCredentials.reason());
            return Err(DirectoryError::AuthFailure);
        }

        audit.auth_success(&creds.user_id, parts.uri.path());
        Ok(AuthenticatedUser(creds.user_id))
    }
}
