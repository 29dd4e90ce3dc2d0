//! Media URL Extraction
//!
//! Locates a downloadable media URL inside arbitrary provider payloads.
//! Providers return wildly different completion shapes — structured JSON,
//! chat-style responses with the URL buried in rendered text, or raw text —
//! so extraction runs a prioritized strategy list and accepts only absolute
//! http(s) URLs carrying an expected file extension.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use super::job::MediaKind;

// =============================================================================
// Constants
// =============================================================================

/// Maximum depth for the recursive object-graph scan
const MAX_SCAN_DEPTH: usize = 10;

/// Exact key paths checked first, in priority order.
/// Numeric segments index into arrays.
const KNOWN_URL_PATHS: &[&str] = &[
    "assets.0.url",
    "output.video_url",
    "output.url",
    "video_url",
    "url",
    "result.url",
    "data.video_url",
    "outputs.0",
];

/// Key-name fragments whose string values are URL candidates during the
/// recursive scan (matched case-insensitively).
const KEY_MARKERS: &[&str] = &["video", "url", "mp4"];

/// Paths that may hold chat-style rendered text worth scanning.
const TEXT_BLOB_PATHS: &[&str] = &[
    "choices.0.message.content",
    "choices.0.text",
    "message.content",
    "content",
];

/// Punctuation and brackets stripped from the end of a candidate before
/// validation.
const TRAILING_JUNK: &[char] = &[
    ')', ']', '}', '>', '.', ',', ';', ':', '!', '?', '\'', '"',
];

// =============================================================================
// MediaUrlExtractor
// =============================================================================

/// Extracts media URLs from provider status payloads.
///
/// The expected media kind fixes which file extensions are accepted
/// (video → mp4/webm/mov, image → png/jpg/jpeg/webp).
#[derive(Debug, Clone, Copy)]
pub struct MediaUrlExtractor {
    kind: MediaKind,
}

impl MediaUrlExtractor {
    /// Create an extractor for the given media kind
    pub fn new(kind: MediaKind) -> Self {
        Self { kind }
    }

    /// Extract the first valid media URL from a payload.
    ///
    /// Returns `None` when no candidate is found — the expected result while
    /// a job is still pending, not a failure. Malformed JSON is never an
    /// error: the text scan runs on the raw payload instead.
    pub fn extract(&self, payload: &str) -> Option<String> {
        match serde_json::from_str::<Value>(payload) {
            Ok(root) => self
                .extract_known_paths(&root)
                .or_else(|| self.scan_value(&root, 0))
                .or_else(|| self.extract_text_blobs(&root))
                .or_else(|| self.scan_text(payload)),
            Err(_) => self.scan_text(payload),
        }
    }

    /// Strategy 1: exact key paths in priority order
    fn extract_known_paths(&self, root: &Value) -> Option<String> {
        for path in KNOWN_URL_PATHS {
            if let Some(Value::String(s)) = lookup_path(root, path) {
                if let Some(url) = self.validate_candidate(s) {
                    return Some(url);
                }
            }
        }
        None
    }

    /// Strategy 2: bounded recursive scan for URL-ish keys
    fn scan_value(&self, value: &Value, depth: usize) -> Option<String> {
        if depth > MAX_SCAN_DEPTH {
            return None;
        }

        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    match child {
                        Value::String(s) if key_matches(key) => {
                            if let Some(url) = self.validate_candidate(s) {
                                return Some(url);
                            }
                        }
                        Value::Object(_) | Value::Array(_) => {
                            if let Some(url) = self.scan_value(child, depth + 1) {
                                return Some(url);
                            }
                        }
                        _ => {}
                    }
                }
                None
            }
            Value::Array(items) => items
                .iter()
                .find_map(|item| self.scan_value(item, depth + 1)),
            _ => None,
        }
    }

    /// Strategy 3a: chat-style text blobs embedded in the JSON
    fn extract_text_blobs(&self, root: &Value) -> Option<String> {
        for path in TEXT_BLOB_PATHS {
            if let Some(Value::String(text)) = lookup_path(root, path) {
                if let Some(url) = self.scan_text(text) {
                    return Some(url);
                }
            }
        }
        None
    }

    /// Strategy 3b: regex scan over rendered or raw text, most specific
    /// pattern first
    fn scan_text(&self, text: &str) -> Option<String> {
        for pattern in text_patterns(self.kind) {
            if let Some(caps) = pattern.captures(text) {
                let matched = caps.get(1).or_else(|| caps.get(0));
                if let Some(m) = matched {
                    if let Some(url) = self.validate_candidate(m.as_str()) {
                        return Some(url);
                    }
                }
            }
        }
        None
    }

    /// Accept a candidate only if it is an absolute http(s) URL whose path
    /// ends in an expected extension. Trailing punctuation is stripped first.
    fn validate_candidate(&self, raw: &str) -> Option<String> {
        let candidate = raw.trim().trim_end_matches(TRAILING_JUNK);
        if candidate.is_empty() {
            return None;
        }

        let parsed = reqwest::Url::parse(candidate).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return None;
        }

        let path = parsed.path().to_ascii_lowercase();
        let has_expected_extension = self
            .kind
            .extensions()
            .iter()
            .any(|ext| path.ends_with(&format!(".{}", ext)));

        if has_expected_extension {
            Some(candidate.to_string())
        } else {
            None
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Walk a dotted key path; numeric segments index arrays.
fn lookup_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let index = segment.parse::<usize>().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

fn key_matches(key: &str) -> bool {
    let lowered = key.to_ascii_lowercase();
    KEY_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Compiled text-scan patterns for a media kind, most specific first:
/// markdown link, anchor word followed by URL, then bare URL.
fn text_patterns(kind: MediaKind) -> &'static [Regex] {
    static VIDEO_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    static IMAGE_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

    let cell = match kind {
        MediaKind::Video => &VIDEO_PATTERNS,
        MediaKind::Image => &IMAGE_PATTERNS,
    };
    cell.get_or_init(|| compile_patterns(kind.extensions()))
}

fn compile_patterns(extensions: &[&str]) -> Vec<Regex> {
    let exts = extensions.join("|");
    let sources = [
        format!(r"(?i)\[[^\]]*\]\((https?://[^\s)]+\.(?:{}))\)", exts),
        format!(
            r#"(?i)(?:video|image|download|watch|result)[^\r\n]{{0,120}}?(https?://[^\s"'<>]+\.(?:{}))"#,
            exts
        ),
        format!(r#"(?i)https?://[^\s"'<>]+\.(?:{})"#, exts),
    ];

    sources
        .iter()
        .filter_map(|source| Regex::new(source).ok())
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
