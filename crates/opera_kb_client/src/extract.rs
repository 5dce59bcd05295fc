//! Splits a raw answer into its body and the trailing source citations the
//! model appends. Total: worst case the text comes back untouched with no
//! sources.

use std::sync::LazyLock;

use regex::Regex;

/// Result of splitting an answer: body text plus cited source names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    pub clean_text: String,
    pub sources: Vec<String>,
}

/// Upstream tool name that leaks into citation blocks; never a real source.
const TOOL_PLACEHOLDER: &str = "Search_Knowledge_Base Tool";

/// Generic non-citation the inline form also filters out. The inline list is
/// intentionally wider than the block list; keep them separate.
const GENERIC_PLACEHOLDER: &str = "Opera knowledge base documents";

// Trailing `Sources:` / `**Sources**:` section header, capturing the block.
static SOURCE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\n*\*{0,2}sources?\*{0,2}:\s*\n([\s\S]*?)$").expect("valid source block regex")
});

// One bullet line inside the block: `- *name*`, `- name`, or `* name`.
static SOURCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-*]\s*\*?([^*\n]+)\*?\s*").expect("valid source line regex"));

// Inline `Source: <name>.` on the final line, optional trailing period.
static INLINE_SOURCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\n*source:\s*(.+?)\.?\s*$").expect("valid inline source regex"));

type Matcher = fn(&str) -> Option<ExtractionResult>;

// Tried in order; the block form takes precedence over the inline form.
const MATCHERS: [Matcher; 2] = [match_source_block, match_inline_source];

/// Extract cited source names from the tail of `text`.
///
/// `clean_text` is always a prefix of `text` (right-trimmed when a citation
/// section matched): extraction only truncates, it never rewrites the body.
pub fn extract(text: &str) -> ExtractionResult {
    for matcher in MATCHERS {
        if let Some(result) = matcher(text) {
            return result;
        }
    }
    ExtractionResult {
        clean_text: text.to_string(),
        sources: Vec::new(),
    }
}

fn match_source_block(text: &str) -> Option<ExtractionResult> {
    let caps = SOURCE_BLOCK.captures(text)?;
    let whole = caps.get(0)?;
    let block = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    let clean_text = text[..whole.start()].trim_end().to_string();

    let mut sources = Vec::new();
    for line in SOURCE_LINE.captures_iter(block) {
        let name = line[1].trim();
        if !name.is_empty() && name != TOOL_PLACEHOLDER {
            sources.push(name.to_string());
        }
    }
    Some(ExtractionResult { clean_text, sources })
}

fn match_inline_source(text: &str) -> Option<ExtractionResult> {
    let caps = INLINE_SOURCE.captures(text)?;
    let whole = caps.get(0)?;
    let name = caps[1].trim();
    // The truncation happens even when the name is filtered out.
    let clean_text = text[..whole.start()].trim_end().to_string();

    let mut sources = Vec::new();
    if !name.is_empty() && name != TOOL_PLACEHOLDER && name != GENERIC_PLACEHOLDER {
        sources.push(name.to_string());
    }
    Some(ExtractionResult { clean_text, sources })
}
