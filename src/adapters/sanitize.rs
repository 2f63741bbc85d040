//! Log redaction for clinical values and credentials.
//!
//! Formatted log lines pass through [`SanitizingMakeWriter`] before reaching
//! the sink. Any registered form field followed by a value (`age=45`,
//! `"age":45`, `age: 45`) has the value replaced, as do credentials that may
//! appear in endpoint URLs or headers.
//!
//! Input larger than `HEARTRISK_SANITIZE_MAX_BYTES` (default 16 KiB) is
//! truncated before scanning.

use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

use crate::domain::fields;

static PATTERNS: OnceLock<Vec<Redaction>> = OnceLock::new();

const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct Redaction {
    regex: Regex,
    replacement: &'static str,
}

fn max_sanitize_bytes() -> usize {
    std::env::var("HEARTRISK_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn patterns() -> &'static [Redaction] {
    PATTERNS.get_or_init(|| {
        let names = fields::all()
            .iter()
            .map(|spec| regex::escape(spec.name))
            .collect::<Vec<_>>()
            .join("|");

        vec![
            // Field/value pairs: keep the name, drop the value.
            Redaction {
                regex: Regex::new(&format!(
                    r#"(?P<key>"?\b(?:{names})\b"?\s*[:=]\s*)(?:"[^"]*"|[^\s,}}\]]+)"#
                ))
                .expect("Valid regex"),
                replacement: "${key}[REDACTED]",
            },
            // userinfo in URLs
            Redaction {
                regex: Regex::new(r"(?P<scheme>https?://)[^/\s:@]+:[^/\s@]+@")
                    .expect("Valid regex"),
                replacement: "${scheme}[REDACTED]@",
            },
            // Bearer tokens
            Redaction {
                regex: Regex::new(r"(?i)\bbearer\s+[A-Za-z0-9._~+/-]+=*").expect("Valid regex"),
                replacement: "Bearer [REDACTED]",
            },
            // Query-string or header secrets
            Redaction {
                regex: Regex::new(
                    r"(?i)(?P<key>\b(?:api[_-]?key|access[_-]?token|token|secret|password)\b\s*[:=]\s*)[^\s&,]+",
                )
                .expect("Valid regex"),
                replacement: "${key}[REDACTED]",
            },
        ]
    })
}

/// Redact clinical values and credentials from a string.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for pattern in patterns() {
        if pattern.regex.is_match(&result) {
            result = pattern
                .regex
                .replace_all(&result, pattern.replacement)
                .into_owned();
        }
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// A `tracing_subscriber` writer wrapper that sanitizes formatted log output
/// line by line before it is written to the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

pub struct SanitizingWriter<W: std::io::Write> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }

    fn write_sanitized(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        self.inner.write_all(sanitize(&text).as_bytes())
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_sanitized(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A single enormous line is flushed whole instead of buffered forever.
        if self.buffer.len() > max_sanitize_bytes().saturating_mul(2) {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
            self.inner.write_all(b"\n")?;
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}
