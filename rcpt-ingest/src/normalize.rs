//! Clean up extracted PDF text before it goes into a prompt.

use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("blank run regex"));

/// Trim trailing whitespace on every line, turn form feeds (page breaks)
/// into newlines, and collapse long runs of blank lines into one.
pub fn normalize_text(raw: &str) -> String {
    let joined = raw
        .replace("\r\n", "\n")
        .replace(['\u{000C}', '\r'], "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");

    BLANK_RUN_RE
        .replace_all(joined.trim_matches('\n'), "\n\n")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_collapses() {
        let raw = "\n\nACME STORE   \n\n\n\n\nTotal   $12.00  \r\nThank you\n\n";
        assert_eq!(normalize_text(raw), "ACME STORE\n\nTotal   $12.00\nThank you");
    }

    #[test]
    fn test_form_feed_is_page_break() {
        assert_eq!(normalize_text("page one\u{000C}page two"), "page one\npage two");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize_text(" \n \n"), "");
    }
}
