//! Reply post-processing applied before display.
//!
//! Replies are requested as plain text, but the model still slips in
//! lightweight markdown. An ordered rule chain strips the common artifacts:
//!
//! 1. `####` header markers are removed;
//! 2. `###` header markers are removed;
//! 3. every hyphen becomes a bullet glyph — globally and unconditionally,
//!    so hyphens inside ordinary words or numbers are replaced too (a known
//!    cosmetic side effect, kept as-is);
//! 4. `**bold**` markers unwrap to their inner text;
//! 5. backticks are removed.
//!
//! The transform is pure and stateless; text matching no pattern passes
//! through unchanged.

use regex::Regex;
use std::sync::LazyLock;

static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"####\s?", ""),
        (r"###\s?", ""),
        (r"-", "\u{2022}"),
        (r"\*\*(.*?)\*\*", "$1"),
        (r"`", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("formatting rule pattern must compile"),
            replacement,
        )
    })
    .collect()
});

/// Strip lightweight markdown artifacts from a reply string.
pub fn strip_markdown(reply: &str) -> String {
    RULES
        .iter()
        .fold(reply.to_string(), |text, (pattern, replacement)| {
            pattern.replace_all(&text, *replacement).into_owned()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_bold_and_removes_backticks() {
        assert_eq!(strip_markdown("**bold** and `code`"), "bold and code");
    }

    #[test]
    fn strips_headers_and_bullets_list_items() {
        assert_eq!(strip_markdown("### Header\n- item"), "Header\n\u{2022} item");
    }

    #[test]
    fn strips_level_four_headers() {
        assert_eq!(strip_markdown("#### Details\ntext"), "Details\ntext");
    }

    #[test]
    fn hyphen_replacement_is_global_and_unconditional() {
        assert_eq!(
            strip_markdown("follow-up in 2-3 weeks"),
            "follow\u{2022}up in 2\u{2022}3 weeks"
        );
    }

    #[test]
    fn plain_text_passes_through_unchanged() {
        assert_eq!(strip_markdown("nothing to strip here"), "nothing to strip here");
    }

    #[test]
    fn unmatched_bold_marker_is_left_alone() {
        assert_eq!(strip_markdown("**dangling"), "**dangling");
    }
}
