//! Display-mode selection
//!
//! Multi-line environments only typeset correctly in display (block) mode.
//! Everything else renders inline, including `\frac` or `\sum`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Environments that need block layout, starred or not
pub const BLOCK_ENVIRONMENTS: [&str; 6] = ["align", "gather", "alignat", "equation", "multline", "split"];

static BLOCK_BEGIN: Lazy<Regex> = Lazy::new(|| {
    let names = BLOCK_ENVIRONMENTS.join("|");
    Regex::new(&format!(r"\\begin\{{({names})\*?\}}")).expect("block environment pattern is valid")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Inline,
    Block,
}

impl DisplayMode {
    /// Pick the layout for already-normalized source
    pub fn for_source(normalized: &str) -> Self {
        if needs_block_layout(normalized) {
            DisplayMode::Block
        } else {
            DisplayMode::Inline
        }
    }

    pub fn is_block(self) -> bool {
        self == DisplayMode::Block
    }
}

/// True iff the source opens one of the block environments
pub fn needs_block_layout(normalized: &str) -> bool {
    BLOCK_BEGIN.is_match(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starred_align_is_block() {
        assert!(needs_block_layout("\\begin{align*}a\\end{align*}"));
    }

    #[test]
    fn test_plain_source_is_inline() {
        assert!(!needs_block_layout("x^2"));
        assert!(!needs_block_layout("\\frac{1}{2} + \\sum_i x_i"));
        assert!(!needs_block_layout(""));
    }

    #[test]
    fn test_every_block_environment_detected() {
        for env in BLOCK_ENVIRONMENTS {
            assert!(needs_block_layout(&format!("\\begin{{{env}}}x\\end{{{env}}}")), "{env}");
            assert!(needs_block_layout(&format!("\\begin{{{env}*}}x\\end{{{env}*}}")), "{env}*");
        }
    }

    #[test]
    fn test_other_environments_stay_inline() {
        assert!(!needs_block_layout("\\begin{pmatrix}1\\end{pmatrix}"));
        assert!(!needs_block_layout("\\begin{cases}a\\end{cases}"));
        // only an opening marker counts
        assert!(!needs_block_layout("\\end{align}"));
    }

    #[test]
    fn test_display_mode_for_source() {
        assert_eq!(DisplayMode::for_source("\\begin{split}a\\end{split}"), DisplayMode::Block);
        assert_eq!(DisplayMode::for_source("a+b"), DisplayMode::Inline);
        assert!(DisplayMode::Block.is_block());
    }
}
