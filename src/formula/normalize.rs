//! Formula source cleanup
//!
//! Authors paste formulas with their surrounding `$`/`$$` delimiters, copy
//! HTML-escaped source out of other pages, or use numbered environments that
//! would make the typesetter print equation numbers inside a sentence. The
//! normalizer fixes those before the source reaches the renderer.

use once_cell::sync::Lazy;
use regex::Regex;

/// Environments rewritten to their starred (unnumbered) form
pub const NUMBERED_ENVIRONMENTS: [&str; 4] = ["align", "gather", "equation", "multline"];

/// Delimiter pairs, longest first; at most one layer is stripped
const DELIMITERS: [&str; 2] = ["$$", "$"];

/// Entity decoding table, applied in this order
const ENTITIES: [(&str, &str); 5] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

static NUMBERED_BEGIN: Lazy<Regex> = Lazy::new(|| environment_marker("begin"));
static NUMBERED_END: Lazy<Regex> = Lazy::new(|| environment_marker("end"));

fn environment_marker(kind: &str) -> Regex {
    let names = NUMBERED_ENVIRONMENTS.join("|");
    // Only the unstarred spelling matches, so starred input is untouched
    Regex::new(&format!(r"\\{kind}\{{({names})\}}")).expect("environment pattern is valid")
}

/// Normalize raw formula source for rendering.
///
/// Steps: trim, strip one delimiter layer, decode the common HTML entities,
/// star the numbered environments.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let unwrapped = strip_delimiters(trimmed);
    let decoded = decode_entities(unwrapped);
    star_environments(&decoded)
}

/// Strip a single `$$…$$` or `$…$` wrapper and re-trim.
///
/// A string made only of delimiter characters strips to empty.
pub fn strip_delimiters(source: &str) -> &str {
    for marker in DELIMITERS {
        if source.starts_with(marker) && source.ends_with(marker) {
            let end = source.len().saturating_sub(marker.len());
            return source.get(marker.len()..end).unwrap_or("").trim();
        }
    }
    source
}

/// Literal substitution of the fixed entity table; not a general decoder
pub fn decode_entities(source: &str) -> String {
    ENTITIES
        .iter()
        .fold(source.to_string(), |acc, (entity, literal)| {
            if acc.contains(entity) {
                acc.replace(entity, literal)
            } else {
                acc
            }
        })
}

/// Rewrite `\begin{align}` to `\begin{align*}` (and the matching `\end`)
pub fn star_environments(source: &str) -> String {
    let begun = NUMBERED_BEGIN.replace_all(source, r"\begin{${1}*}");
    NUMBERED_END
        .replace_all(&begun, r"\end{${1}*}")
        .into_owned()
}
