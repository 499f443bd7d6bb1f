//! OAuth 2.0 for an installed app, with the token cached in a JSON file.
//!
//! The first run prints a consent URL and reads the authorization code from
//! the user. Later runs reuse the cached token and refresh it once expired.

use super::{MailError, Result};
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const MAIL_SCOPE: &str = "https://mail.google.com/";

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_REDIRECT_URI: &str = "http://localhost";

/// Tokens this close to expiry are refreshed.
const EXPIRY_SLACK_SECS: i64 = 10;

/// Client secret as downloaded from the cloud console.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl ClientSecret {
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CredentialsFile =
            serde_json::from_str(json).map_err(|e| MailError::Credentials(e.to_string()))?;
        file.installed.or(file.web).ok_or_else(|| {
            MailError::Credentials("expected an \"installed\" or \"web\" client".to_string())
        })
    }

    pub fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| MailError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn redirect_uri(&self) -> &str {
        self.redirect_uris
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_REDIRECT_URI)
    }
}

/// Cached access and refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Token {
    /// A token without expiry (or with the zero time) never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) if expiry.year() > 1 => {
                expiry <= now + Duration::seconds(EXPIRY_SLACK_SECS)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_token(self, now: DateTime<Utc>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type,
            refresh_token: self.refresh_token,
            expiry: self.expires_in.map(|secs| now + Duration::seconds(secs)),
        }
    }
}

/// The authorization server.
pub trait TokenEndpoint {
    /// URL the user visits to grant access.
    fn auth_url(&self) -> Result<String>;

    fn exchange_code(&self, code: &str) -> Result<Token>;

    fn refresh(&self, refresh_token: &str) -> Result<Token>;
}

/// Token endpoint reached over HTTP.
pub struct Authorizer {
    secret: ClientSecret,
    http: reqwest::blocking::Client,
}

impl Authorizer {
    pub fn new(secret: ClientSecret) -> Self {
        Authorizer {
            secret,
            http: reqwest::blocking::Client::new(),
        }
    }

    fn request_token(&self, params: &[(&str, &str)]) -> Result<Token> {
        let response = self.http.post(&self.secret.token_uri).form(params).send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(MailError::Authorization(format!(
                "token request failed ({}): {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json()?;
        Ok(token.into_token(Utc::now()))
    }
}

impl TokenEndpoint for Authorizer {
    fn auth_url(&self) -> Result<String> {
        let url = reqwest::Url::parse_with_params(
            &self.secret.auth_uri,
            &[
                ("client_id", self.secret.client_id.as_str()),
                ("redirect_uri", self.secret.redirect_uri()),
                ("response_type", "code"),
                ("scope", MAIL_SCOPE),
                ("access_type", "offline"),
                ("state", "state-token"),
            ],
        )
        .map_err(|e| MailError::Credentials(format!("invalid auth_uri: {}", e)))?;
        Ok(url.to_string())
    }

    fn exchange_code(&self, code: &str) -> Result<Token> {
        self.request_token(&[
            ("code", code),
            ("client_id", self.secret.client_id.as_str()),
            ("client_secret", self.secret.client_secret.as_str()),
            ("redirect_uri", self.secret.redirect_uri()),
            ("grant_type", "authorization_code"),
        ])
    }

    fn refresh(&self, refresh_token: &str) -> Result<Token> {
        self.request_token(&[
            ("refresh_token", refresh_token),
            ("client_id", self.secret.client_id.as_str()),
            ("client_secret", self.secret.client_secret.as_str()),
            ("grant_type", "refresh_token"),
        ])
    }
}

/// Token stored as JSON on disk.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenCache { path: path.into() }
    }

    /// The cached token, or `None` if there is no usable cache file.
    pub fn load(&self) -> Option<Token> {
        match self.read() {
            Ok(token) => token,
            Err(e) => {
                log::warn!("Ignoring token cache: {}", e);
                None
            }
        }
    }

    /// The cached token; `Ok(None)` when no cache file exists yet.
    fn read(&self) -> Result<Option<Token>> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No token cache at {}", self.path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(MailError::ReadFile {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| MailError::Decode(format!("{}: {}", self.path.display(), e)))
    }

    /// Write the token, readable only by the owner.
    pub fn save(&self, token: &Token) -> Result<()> {
        log::info!("Saving token to {}", self.path.display());
        let write_err = |source| MailError::WriteFile {
            path: self.path.display().to_string(),
            source,
        };

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let json = serde_json::to_string(token).map_err(|e| MailError::Decode(e.to_string()))?;
        let mut file = options.open(&self.path).map_err(write_err)?;
        file.write_all(json.as_bytes()).map_err(write_err)?;
        Ok(())
    }
}

/// A valid access token: cached, refreshed, or freshly authorized.
///
/// `prompt` is shown the consent URL and returns the authorization code.
pub fn access_token<F>(
    endpoint: &dyn TokenEndpoint,
    cache: &TokenCache,
    now: DateTime<Utc>,
    prompt: F,
) -> Result<Token>
where
    F: FnOnce(&str) -> Result<String>,
{
    if let Some(token) = cache.load() {
        if !token.is_expired(now) {
            log::debug!("Using cached token");
            return Ok(token);
        }
        if let Some(refresh_token) = token.refresh_token.as_deref() {
            log::info!("Refreshing expired token");
            let mut fresh = endpoint.refresh(refresh_token)?;
            if fresh.refresh_token.is_none() {
                fresh.refresh_token = Some(refresh_token.to_string());
            }
            cache.save(&fresh)?;
            return Ok(fresh);
        }
    }

    let url = endpoint.auth_url()?;
    let code = prompt(&url)?;
    let code = code.trim();
    if code.is_empty() {
        return Err(MailError::Authorization(
            "no authorization code entered".to_string(),
        ));
    }
    let token = endpoint.exchange_code(code)?;
    cache.save(&token)?;
    Ok(token)
}
