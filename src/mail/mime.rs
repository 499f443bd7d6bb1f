use super::{MailError, Result};
use mail_parser::MessageParser;

/// Select the HTML body of a raw message by content type.
///
/// Walks nested multiparts and takes the first `text/html` body. A message
/// with only `text/plain` is converted to HTML by the parser.
pub fn html_body(raw: &[u8]) -> Result<String> {
    let message = MessageParser::default()
        .parse(raw)
        .ok_or_else(|| MailError::Decode("not a MIME message".to_string()))?;

    if let Some(subject) = message.subject() {
        log::info!("Subject: {}", subject);
    }

    message
        .body_html(0)
        .map(|html| html.into_owned())
        .ok_or(MailError::NoBody)
}
