use super::{HtmlToPdf, MailError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Renders HTML by piping it into the `wkhtmltopdf` executable.
#[derive(Debug, Clone)]
pub struct Wkhtmltopdf {
    binary: PathBuf,
}

impl Default for Wkhtmltopdf {
    fn default() -> Self {
        Wkhtmltopdf::new("wkhtmltopdf")
    }
}

impl Wkhtmltopdf {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Wkhtmltopdf {
            binary: binary.into(),
        }
    }
}

impl HtmlToPdf for Wkhtmltopdf {
    fn render(&self, html: &str, output: &Path) -> Result<()> {
        log::debug!("{} --quiet - {}", self.binary.display(), output.display());

        let mut child = Command::new(&self.binary)
            .arg("--quiet")
            .arg("-")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                MailError::Renderer(format!("could not start {}: {}", self.binary.display(), e))
            })?;

        // a renderer that dies early closes the pipe; its exit status says more
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(html.as_bytes()),
            None => Ok(()),
        };

        let out = child
            .wait_with_output()
            .map_err(|e| MailError::Renderer(e.to_string()))?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(MailError::Renderer(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                out.status,
                stderr.trim()
            )));
        }
        written.map_err(|e| MailError::Renderer(format!("writing html: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_a_renderer_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Wkhtmltopdf::new(dir.path().join("no-such-wkhtmltopdf"));
        let err = renderer
            .render("<p>hi</p>", &dir.path().join("out.pdf"))
            .unwrap_err();
        assert!(matches!(err, MailError::Renderer(msg) if msg.contains("could not start")));
    }

    #[cfg(unix)]
    #[test]
    fn failing_binary_reports_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Wkhtmltopdf::new("false");
        let err = renderer
            .render("<p>hi</p>", &dir.path().join("out.pdf"))
            .unwrap_err();
        assert!(matches!(err, MailError::Renderer(msg) if msg.contains("exited with")));
    }
}
