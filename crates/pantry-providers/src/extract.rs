//! Response extraction: recover a JSON object from free-form model text.
//!
//! Models are asked for bare JSON but often wrap it in a fenced block or a
//! sentence of prose. Three strategies are tried in order and the first one
//! that yields a JSON **object** wins:
//!
//! 1. [`Strategy::Direct`]: the whole trimmed text.
//! 2. [`Strategy::FencedBlock`]: the interior of the first ```` ```json ```` fence.
//! 3. [`Strategy::BraceSpan`]: the greedy span from the first `{` to the last `}`.
//!
//! The brace span is not a parser: text holding two separate objects yields a
//! span covering both, which does not parse, and extraction fails.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// A parsed model answer.
pub type ExtractedResult = Map<String, Value>;

/// One extraction strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Direct,
    FencedBlock,
    BraceSpan,
}

impl Strategy {
    /// Order in which strategies are attempted.
    pub const ORDER: [Strategy; 3] = [Strategy::Direct, Strategy::FencedBlock, Strategy::BraceSpan];

    /// Short name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Direct => "direct",
            Strategy::FencedBlock => "fenced_block",
            Strategy::BraceSpan => "brace_span",
        }
    }

    /// Try this strategy alone.
    pub fn apply(self, text: &str) -> Option<ExtractedResult> {
        let candidate = match self {
            Strategy::Direct => Some(text.trim().to_string()),
            Strategy::FencedBlock => fenced_block(text),
            Strategy::BraceSpan => brace_span(text),
        }?;
        parse_object(&candidate)
    }
}

/// Successful extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct Extraction {
    pub value: ExtractedResult,
    pub strategy: Strategy,
}

/// Run the strategies in order; `None` means the text is a parse failure.
pub fn extract_json(text: &str) -> Option<Extraction> {
    Strategy::ORDER.iter().find_map(|&strategy| {
        strategy
            .apply(text)
            .map(|value| Extraction { value, strategy })
    })
}

fn parse_object(candidate: &str) -> Option<ExtractedResult> {
    match serde_json::from_str::<Value>(candidate).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

static FENCED_JSON: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.*?)```").ok());

static BRACE_SPAN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").ok());

fn fenced_block(text: &str) -> Option<String> {
    FENCED_JSON
        .as_ref()?
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn brace_span(text: &str) -> Option<String> {
    BRACE_SPAN
        .as_ref()?
        .find(text)
        .map(|m| m.as_str().to_string())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
