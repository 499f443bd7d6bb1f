//! Fetch a payment notification email and convert its body to PDF.
//!
//! The mail account and the HTML renderer are both behind traits: the
//! command wires in [`GmailClient`] and [`Wkhtmltopdf`], tests use fakes.

pub mod gmail;
pub mod mime;
pub mod oauth;
pub mod wkhtml;

pub use gmail::GmailClient;
pub use wkhtml::Wkhtmltopdf;

use std::path::Path;

pub type Result<T> = std::result::Result<T, MailError>;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid credentials file: {0}")]
    Credentials(String),
    #[error("authorization failed: {0}")]
    Authorization(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("mail api error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("no message matches query '{0}'")]
    NoMessage(String),
    #[error("message could not be decoded: {0}")]
    Decode(String),
    #[error("message has no html or text body")]
    NoBody,
    #[error("html renderer failed: {0}")]
    Renderer(String),
}

/// Search and fetch capability of a mail account.
pub trait MailClient {
    /// Message ids matching `query`, newest first.
    fn search(&self, query: &str, max_results: u32) -> Result<Vec<String>>;

    /// The full RFC 822 message.
    fn fetch_raw(&self, id: &str) -> Result<Vec<u8>>;
}

/// Turns an HTML document into a PDF file.
pub trait HtmlToPdf {
    fn render(&self, html: &str, output: &Path) -> Result<()>;
}

/// HTML body of the newest message matching `query`.
pub fn latest_message_html(
    client: &dyn MailClient,
    query: &str,
    max_results: u32,
) -> Result<String> {
    let ids = client.search(query, max_results)?;
    log::info!("{} message(s) match '{}'", ids.len(), query);

    let id = ids
        .first()
        .ok_or_else(|| MailError::NoMessage(query.to_string()))?;
    log::info!("Fetching message {}", id);

    let raw = client.fetch_raw(id)?;
    mime::html_body(&raw)
}
