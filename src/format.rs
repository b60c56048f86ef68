//! Terminal rendering for section markdown.
//!
//! Every formatter takes raw markdown and returns text ready to print. The
//! caller picks one explicitly through [`FormatterKind`]; a formatter that
//! cannot do its job hands back the markdown unchanged instead of failing the
//! query.

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::LazyLock;

use console::style;
use regex::{Captures, Regex};

pub trait OutputFormatter {
    fn format(&self, markdown: &str) -> String;
}

/// Identity formatter.
pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn format(&self, markdown: &str) -> String {
        markdown.to_string()
    }
}

static HEADING_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("heading pattern is valid"));
static INLINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("inline code pattern is valid"));
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("bold pattern is valid"));
static LIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)([-*]|\d+\.)\s+(.+)$").expect("list pattern is valid")
});
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern is valid"));

/// Line-based colouring with `console`: headings, code, bold, bullets, links.
///
/// Level-1 headings are dropped; in a section they are the document title,
/// which is already printed above the result.
pub struct BasicMarkdownFormatter;

impl OutputFormatter for BasicMarkdownFormatter {
    fn format(&self, markdown: &str) -> String {
        let mut out = String::with_capacity(markdown.len() + markdown.len() / 4);
        let mut in_code_block = false;

        for line in markdown.split('\n') {
            if line.trim().starts_with("```") {
                in_code_block = !in_code_block;
                out.push_str(&style("```").cyan().to_string());
                out.push('\n');
                continue;
            }

            if in_code_block {
                out.push_str(&style(line).cyan().to_string());
                out.push('\n');
                continue;
            }

            if let Some(caps) = HEADING_LINE_RE.captures(line) {
                let hashes = &caps[1];
                let text = &caps[2];
                match hashes.len() {
                    1 => continue,
                    2 => out.push_str(
                        &style(format!("## {}", text)).magenta().bold().to_string(),
                    ),
                    _ => out.push_str(&style(format!("{} {}", hashes, text)).magenta().to_string()),
                }
                out.push('\n');
                continue;
            }

            let line = INLINE_CODE_RE.replace_all(line, |caps: &Captures| {
                style(format!("`{}`", &caps[1])).cyan().to_string()
            });
            let line = BOLD_RE.replace_all(&line, |caps: &Captures| {
                style(format!("**{}**", &caps[1])).bold().to_string()
            });

            if let Some(caps) = LIST_RE.captures(&line) {
                out.push_str(&caps[1]);
                out.push_str(&style(&caps[2]).yellow().to_string());
                out.push(' ');
                out.push_str(&caps[3]);
                out.push('\n');
                continue;
            }

            let line = LINK_RE.replace_all(&line, |caps: &Captures| {
                format!(
                    "[{}]({})",
                    style(&caps[1]).blue(),
                    style(&caps[2]).blue()
                )
            });

            if !line.trim().is_empty() {
                out.push_str(&line);
            }
            out.push('\n');
        }

        out
    }
}

/// Pipes markdown through the external `glow` renderer.
pub struct GlowFormatter {
    program: String,
    args: Vec<String>,
}

impl Default for GlowFormatter {
    fn default() -> Self {
        Self {
            program: "glow".to_string(),
            args: vec!["--style=dark".to_string(), "--width=120".to_string()],
        }
    }
}

impl GlowFormatter {
    /// Use a different renderer binary. Arguments are passed as given and the
    /// markdown arrives on stdin.
    pub fn with_program(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn render(&self, markdown: &str) -> std::io::Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        // Feed stdin from its own thread while stdout is drained here, so a
        // renderer that streams output never blocks on a full pipe.
        let stdin = child.stdin.take();
        let input = markdown.to_owned();
        let writer = std::thread::spawn(move || match stdin {
            Some(mut stdin) => stdin.write_all(input.as_bytes()),
            None => Ok(()),
        });

        let output = child.wait_with_output()?;
        match writer.join() {
            Ok(Ok(())) => {}
            // The renderer may stop reading early; its exit status decides.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(std::io::Error::other("stdin writer panicked")),
        }
        if !output.status.success() {
            return Err(std::io::Error::other(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OutputFormatter for GlowFormatter {
    fn format(&self, markdown: &str) -> String {
        match self.render(markdown) {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::warn!("{} unavailable, printing raw markdown: {}", self.program, e);
                markdown.to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatterKind {
    Plain,
    Basic,
    Glow,
}

impl FormatterKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "plain" => Some(FormatterKind::Plain),
            "basic" => Some(FormatterKind::Basic),
            "glow" => Some(FormatterKind::Glow),
            _ => None,
        }
    }

    pub fn build(&self) -> Box<dyn OutputFormatter> {
        match self {
            FormatterKind::Plain => Box::new(PlainFormatter),
            FormatterKind::Basic => Box::new(BasicMarkdownFormatter),
            FormatterKind::Glow => Box::new(GlowFormatter::default()),
        }
    }
}
