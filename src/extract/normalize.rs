use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("TAG_RE should compile"));

/// Plain text recovered from a posting body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub text: String,
    /// The parser lost content it should not have, so `text` is the raw input.
    pub degraded: bool,
}

/// Strip markup from a posting body.
///
/// Text nodes are joined as-is, so spacing between words survives exactly as
/// the source wrote it. Never fails: if parsing swallows real content (an
/// unclosed tag eating the rest of the body, say) the input comes back
/// unchanged with `degraded` set.
pub fn normalize(raw: &str) -> NormalizedText {
    let fragment = Html::parse_fragment(raw);
    let text: String = fragment.root_element().text().collect();

    if text.trim().is_empty() && !TAG_RE.replace_all(raw, "").trim().is_empty() {
        tracing::warn!("Markup parse dropped all text, falling back to raw description");
        return NormalizedText {
            text: raw.to_string(),
            degraded: true,
        };
    }

    NormalizedText {
        text,
        degraded: false,
    }
}
