//! Protection of spans that size-driven windowing must never cut.
//!
//! Fenced code and table runs are swapped for short placeholder tokens
//! before windowing and swapped back afterwards. Tokens are delimited by
//! private-use characters, so a token never contains a space or a newline.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';

static FENCED_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ms)^[ \t]*```[^\n]*\n.*?^[ \t]*```[^\n]*$").expect("fenced code regex")
});

static TABLE_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*\|[^\n]*(?:\n[ \t]*\|[^\n]*)*").expect("table run regex")
});

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x{E000}(\d+)\x{E001}").expect("placeholder regex"));

/// Text with preserved spans replaced by placeholder tokens
#[derive(Debug, Clone, Default)]
pub struct ProtectedText {
    text: String,
    spans: Vec<String>,
}

impl ProtectedText {
    /// Replace fenced code (if `code`) and table runs (if `tables`) with
    /// placeholders.
    #[must_use]
    pub fn protect(source: &str, code: bool, tables: bool) -> Self {
        if source.contains([OPEN, CLOSE]) {
            log::warn!("Document contains placeholder sentinels; span preservation disabled");
            return Self::unprotected(source);
        }

        let mut spans = Vec::new();
        let mut text = source.to_string();
        if code {
            text = substitute(&text, &FENCED_CODE, &mut spans);
        }
        if tables {
            text = substitute(&text, &TABLE_RUN, &mut spans);
        }

        if !spans.is_empty() {
            log::debug!("Protected {} span(s) from windowing", spans.len());
        }
        Self { text, spans }
    }

    #[must_use]
    pub fn unprotected(source: &str) -> Self {
        Self {
            text: source.to_string(),
            spans: Vec::new(),
        }
    }

    /// The placeholder-substituted text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Put original spans back into a fragment of [`ProtectedText::text`]
    #[must_use]
    pub fn restore(&self, fragment: &str) -> String {
        if self.spans.is_empty() {
            return fragment.to_string();
        }
        PLACEHOLDER
            .replace_all(fragment, |caps: &Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| self.spans.get(idx))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Byte range of the placeholder token strictly containing `pos`, if any
    #[must_use]
    pub fn token_around(&self, pos: usize) -> Option<Range<usize>> {
        if self.spans.is_empty() || pos == 0 || pos >= self.text.len() {
            return None;
        }
        let before = &self.text[..pos];
        let open = before.rfind(OPEN)?;
        if before[open..].contains(CLOSE) {
            return None;
        }
        let close = self.text[pos..].find(CLOSE)? + pos;
        Some(open..close + CLOSE.len_utf8())
    }

    /// End offset of the last complete placeholder in `range`, if any
    #[must_use]
    pub fn last_token_end(&self, range: Range<usize>) -> Option<usize> {
        if self.spans.is_empty() {
            return None;
        }
        self.text[range.clone()]
            .rfind(CLOSE)
            .map(|idx| range.start + idx + CLOSE.len_utf8())
    }
}

fn substitute(text: &str, pattern: &Regex, spans: &mut Vec<String>) -> String {
    pattern
        .replace_all(text, |caps: &Captures<'_>| {
            let token = format!("{OPEN}{}{CLOSE}", spans.len());
            spans.push(caps[0].to_string());
            token
        })
        .into_owned()
}
