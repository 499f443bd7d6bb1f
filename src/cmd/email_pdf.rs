//! Email-pdf command - save the latest matching email as a PDF

use crate::mail::oauth::{self, Authorizer, ClientSecret, TokenCache};
use crate::mail::{self, GmailClient, HtmlToPdf, MailError, Wkhtmltopdf};
use crate::paths;
use anyhow::Context;
use chrono::Utc;
use clap::Args;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct EmailPdfCommand {
    /// Mail search query; the newest match is converted
    #[arg(long, default_value = "from:notify@payments.interac.ca")]
    query: String,

    /// Maximum number of messages to search
    #[arg(long, alias = "max_results", default_value_t = 10)]
    max_results: u32,

    /// OAuth client secret file
    #[arg(long, default_value = "credentials.json")]
    credentials: PathBuf,

    /// Cached OAuth token, created on first use
    #[arg(long, default_value = "token.json")]
    token: PathBuf,

    /// Where to write the PDF
    #[arg(short, long, default_value = "~/Downloads/out.pdf")]
    output: PathBuf,

    /// HTML to PDF converter executable
    #[arg(long, default_value = "wkhtmltopdf")]
    wkhtmltopdf: PathBuf,

    /// Open the PDF once written
    #[arg(long)]
    open: bool,
}

impl EmailPdfCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let credentials = paths::resolve(&self.credentials)?;
        let output = paths::resolve(&self.output)?;
        let cache = TokenCache::new(paths::resolve(&self.token)?);

        let secret = ClientSecret::read(&credentials)?;
        let authorizer = Authorizer::new(secret);
        let token = oauth::access_token(&authorizer, &cache, Utc::now(), prompt_for_code)
            .context("authorizing mail access")?;

        let client = GmailClient::new(token.access_token);
        let html = mail::latest_message_html(&client, &self.query, self.max_results)?;

        Wkhtmltopdf::new(&self.wkhtmltopdf)
            .render(&html, &output)
            .with_context(|| format!("writing {}", output.display()))?;
        log::info!("Converted message body to {}", output.display());
        println!("PDF written to: {}", output.display());

        if self.open {
            opener::open(&output)?;
        }
        Ok(())
    }
}

fn prompt_for_code(url: &str) -> mail::Result<String> {
    println!("Go to the following link in your browser then type the authorization code:");
    println!("{}", url);
    print!("> ");
    let read_err = |e: io::Error| MailError::Authorization(format!("reading code: {}", e));
    io::stdout().flush().map_err(read_err)?;

    let mut code = String::new();
    io::stdin().lock().read_line(&mut code).map_err(read_err)?;
    Ok(code)
}
