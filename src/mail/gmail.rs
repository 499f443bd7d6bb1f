//! Gmail REST API client (`users.messages.list` / `users.messages.get`).

use super::{MailClient, MailError, Result};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;

const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

/// Gmail sends `raw` as base64url, with or without padding.
const RAW_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Gmail API message list response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

/// Gmail API message in `raw` format.
#[derive(Debug, Deserialize)]
struct RawMessage {
    raw: String,
}

pub struct GmailClient {
    client: reqwest::blocking::Client,
    access_token: String,
    base_url: String,
}

impl GmailClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        GmailClient {
            client: reqwest::blocking::Client::new(),
            access_token: access_token.into(),
            base_url: GMAIL_API_BASE.to_string(),
        }
    }

    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.access_token))
                .map_err(|e| MailError::Authorization(format!("invalid token: {}", e)))?,
        );
        Ok(headers)
    }

    /// Authenticated GET against the API.
    fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .query(query)
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(MailError::Api { status, body });
        }

        Ok(response.json()?)
    }
}

impl MailClient for GmailClient {
    fn search(&self, query: &str, max_results: u32) -> Result<Vec<String>> {
        let list: MessageListResponse = self.get(
            "/messages",
            &[
                ("q", query.to_string()),
                ("maxResults", max_results.to_string()),
            ],
        )?;
        Ok(list.messages.into_iter().map(|m| m.id).collect())
    }

    fn fetch_raw(&self, id: &str) -> Result<Vec<u8>> {
        let message: RawMessage =
            self.get(&format!("/messages/{}", id), &[("format", "raw".to_string())])?;
        decode_raw(&message.raw)
    }
}

fn decode_raw(raw: &str) -> Result<Vec<u8>> {
    RAW_ENGINE
        .decode(raw.trim())
        .map_err(|e| MailError::Decode(e.to_string()))
}
