//! Log sanitization for key material and other secrets.
//!
//! Every formatted log line passes through `SanitizingMakeWriter`, which
//! redacts:
//! - Raw private keys and seeds (bare 64+ hex digit runs)
//! - Contextual secrets (`private_key=...`, `seed: ...`, `mnemonic=...`)
//! - Long base64 blobs such as serialized ciphertexts, proofs and seeds
//! - Seed phrases introduced by a label
//! - JWTs and PEM private key blocks
//!
//! Public on-chain identifiers (`0x`-prefixed addresses, handles and
//! transaction hashes) are left intact so logs stay traceable.
//!
//! # Performance / DoS
//!
//! `sanitize()` only scans a bounded prefix of each line (see
//! `MYSTERYBOX_SANITIZE_MAX_BYTES`); the rest is replaced by a marker.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static SECRET_PATTERNS: OnceLock<SecretPatterns> = OnceLock::new();

/// Default number of bytes scanned per line (16 KiB).
const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct SecretPattern {
    regex: Regex,
    replacement: &'static str,
}

struct SecretPatterns {
    fast_set: RegexSet,
    fast_patterns: Vec<SecretPattern>,
    pem_pattern: SecretPattern,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_sanitize_bytes() -> usize {
    std::env::var("MYSTERYBOX_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn get_patterns() -> &'static SecretPatterns {
    SECRET_PATTERNS.get_or_init(|| {
        // Order matters: labelled rules run before the broad ones so the
        // more specific marker wins.
        let fast_rules: Vec<(&'static str, &'static str)> = vec![
            // Labelled seed phrases (12 to 24 lowercase words)
            (
                r"(?i)\b(?:mnemonic|seed[_ -]?phrase|recovery[_ -]?phrase)\b\s*[:=]\s*(?:[a-z]+\s+){11,23}[a-z]+",
                "[REDACTED-MNEMONIC]",
            ),
            // Labelled secrets in hex (with or without 0x)
            (
                r"(?i)\b(?:private[_-]?key|secret[_-]?key|signing[_-]?key|seed|secret|password|passwd|token)\b\s*[:=]\s*(?:0x)?[0-9a-fA-F]{16,}\b",
                "[REDACTED-SECRET]",
            ),
            // Labelled secrets in base64
            (
                r"(?i)\b(?:private[_-]?key|secret[_-]?key|signing[_-]?key|seed|secret|password|passwd|token)\b\s*[:=]\s*[A-Za-z0-9+/]{24,}={0,2}",
                "[REDACTED-SECRET]",
            ),
            // JWTs
            (
                r"\beyJ[a-zA-Z0-9_-]{10,}\.[a-zA-Z0-9_-]{10,}\.[a-zA-Z0-9_-]{10,}\b",
                "[REDACTED-JWT]",
            ),
            // Bare 32-byte-or-longer hex runs; `0x` identifiers never match
            // because `x` and the first digit share a word
            (r"\b[0-9a-fA-F]{64,}\b", "[REDACTED-KEY]"),
            // Long base64 blobs (serialized ciphertexts, proofs)
            (r"[A-Za-z0-9+/]{88,}={0,2}", "[REDACTED-BLOB]"),
        ];

        let pem_pattern = SecretPattern {
            regex: Regex::new(
                r"(?s)-----BEGIN [A-Z0-9 ]{0,40}PRIVATE KEY-----[\s\S]{0,8192}-----END [A-Z0-9 ]{0,40}PRIVATE KEY-----",
            )
            .expect("Valid regex"),
            replacement: "[REDACTED-PEM-PRIVATE-KEY]",
        };

        let fast_set =
            RegexSet::new(fast_rules.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let fast_patterns = fast_rules
            .into_iter()
            .map(|(pattern, replacement)| SecretPattern {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        SecretPatterns {
            fast_set,
            fast_patterns,
            pem_pattern,
        }
    })
}

/// Replace secret material in `input` with redaction markers.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.fast_set.matches(prefix).into_iter() {
        let pattern = &patterns.fast_patterns[idx];
        result = pattern
            .regex
            .replace_all(&result, pattern.replacement)
            .to_string();
    }

    if result.contains("-----BEGIN ") && patterns.pem_pattern.regex.is_match(&result) {
        result = patterns
            .pem_pattern
            .regex
            .replace_all(&result, patterns.pem_pattern.replacement)
            .to_string();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Whether `input` holds anything `sanitize()` would redact.
#[must_use]
pub fn contains_secret(input: &str) -> bool {
    let patterns = get_patterns();
    let (prefix, _truncated) = truncate_to_char_boundary(input, max_sanitize_bytes());
    patterns.fast_set.is_match(prefix)
        || (prefix.contains("-----BEGIN ") && patterns.pem_pattern.regex.is_match(prefix))
}

/// A `tracing_subscriber` writer that sanitizes each formatted line before
/// it reaches the underlying sink.
#[derive(Debug)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<M: Clone> Clone for SanitizingMakeWriter<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Line-buffering writer produced by `SanitizingMakeWriter`.
pub struct SanitizingWriter<W> {
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

        // A single huge line is flushed early instead of buffered forever.
        let hard_cap = max_sanitize_bytes().saturating_mul(2);
        if self.buffer.len() > hard_cap {
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

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}
