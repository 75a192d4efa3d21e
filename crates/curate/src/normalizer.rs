use regex::Regex;
use std::sync::LazyLock;

/// Embedded machine annotations such as `[%eval 0.3]` or `[%clk 0:05:00]`
static ANNOTATION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[%.*?\]").expect("annotation tag pattern"));

/// Remove every `[%...]` marker, including ones exposed by an earlier removal
/// (`[[%a]%b]` collapses to nothing).
pub fn strip_annotation_tags(text: &str) -> String {
    let mut stripped = text.to_string();
    while ANNOTATION_TAG.is_match(&stripped) {
        stripped = ANNOTATION_TAG.replace_all(&stripped, "").into_owned();
    }
    stripped
}

/// Strip annotation tags and brace delimiters, then collapse whitespace.
pub fn clean_comment(comment: &str) -> String {
    // Braces go first so that `[{%x]` cannot turn into a tag after cleaning.
    let without_braces = comment.replace(['{', '}'], "");
    let without_tags = strip_annotation_tags(&without_braces);

    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_braces() {
        assert_eq!(
            clean_comment("{ Strong move [%eval 0.35] [%clk 0:05:00] }"),
            "Strong move"
        );
        assert_eq!(clean_comment("the {inner} idea"), "the inner idea");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean_comment("  a\n\tb   c  "), "a b c");
        assert_eq!(clean_comment("   "), "");
    }

    #[test]
    fn test_no_annotation_left() {
        let samples = [
            "[%eval 1.2] text",
            "[[%a]%b] nested",
            "[{%x] brace inside",
            "multi [%cal Ge2e4,\nRd1d8] line",
            "[%unterminated text",
        ];
        for sample in samples {
            let cleaned = clean_comment(sample);
            assert!(
                !ANNOTATION_TAG.is_match(&cleaned),
                "{:?} -> {:?}",
                sample,
                cleaned
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "  White   {wins} [%eval #3] a pawn ",
            "[[%a]%b]c",
            "[{%x]",
            "{[%}x]",
            "plain text already clean",
        ];
        for sample in samples {
            let once = clean_comment(sample);
            assert_eq!(clean_comment(&once), once, "input {:?}", sample);
        }
    }
}
