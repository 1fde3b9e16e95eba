//! Dinahosting API credentials.
//!
//! Credentials are read from an INI style file of the form certbot uses for its DNS plugins:
//!
//! ```ini
//! # Dinahosting API credentials used by Certbot
//! dns_dinahosting_username = 0123456789abcdef0123456789abcdef01234567
//! dns_dinahosting_password = 0123456789abcdef0123456789abcdef01234567
//! ```
//!
//! The bare keys `username`/`password` and the `dns_dinahosting_api_` prefixed keys are accepted
//! as well.

use crate::error::Error;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use std::path::Path;

const USERNAME_KEYS: [&str; 3] = [
    "username",
    "dns_dinahosting_username",
    "dns_dinahosting_api_username",
];
const PASSWORD_KEYS: [&str; 3] = [
    "password",
    "dns_dinahosting_password",
    "dns_dinahosting_api_password",
];

/// A Dinahosting API username and password. Immutable once constructed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The HTTP `Authorization` header value for these credentials: `Basic` followed by the
    /// standard BASE64 encoding of `username:password`.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        let pair = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(pair))
    }

    /// Load credentials from the INI file at the given path, or return an Error.
    ///
    /// On Unix a file that is accessible to group or other users is still loaded, but a warning
    /// is logged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IO`] if the path can't be opened or read.
    ///
    /// Returns [`Error::MissingCredential`] if the username or password entry is absent.
    pub async fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let p = p.as_ref();
        warn_if_unsafe(p).await?;
        let contents = tokio::fs::read_to_string(p).await?;
        tracing::debug!("loaded credentials from {}", p.display());
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Self, Error> {
        let mut username = None;
        let mut password = None;
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with(['#', ';', '[']) {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), ini_value(value));
            if USERNAME_KEYS.contains(&key) {
                username = Some(value.to_string());
            } else if PASSWORD_KEYS.contains(&key) {
                password = Some(value.to_string());
            }
        }
        match (username, password) {
            (Some(username), Some(password)) => Ok(Self::new(username, password)),
            (None, _) => Err(Error::MissingCredential("username")),
            (_, None) => Err(Error::MissingCredential("password")),
        }
    }
}

// A value as configobj reads it: one pair of matching quotes is removed, and an unquoted value
// ends at an inline `#` or `;` comment.
fn ini_value(raw: &str) -> &str {
    let raw = raw.trim();
    if let Some(quote) = raw.chars().next().filter(|c| matches!(c, '"' | '\'')) {
        if let Some(end) = raw[1..].find(quote) {
            return &raw[1..=end];
        }
    }
    match raw.find(['#', ';']) {
        Some(comment) => raw[..comment].trim_end(),
        None => raw,
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(unix)]
async fn warn_if_unsafe(p: &Path) -> Result<(), Error> {
    use std::os::unix::fs::PermissionsExt;

    let mode = tokio::fs::metadata(p).await?.permissions().mode() & 0o777;
    if mode & 0o077 != 0 {
        tracing::warn!(
            "unsafe permissions on credentials file {} (mode {mode:o}), should be 0600 or 0400",
            p.display()
        );
    }
    Ok(())
}

#[cfg(not(unix))]
#[allow(clippy::unused_async)]
async fn warn_if_unsafe(_p: &Path) -> Result<(), Error> {
    Ok(())
}
