//! Text normalization applied to every extracted document

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));
static NON_PRINTABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\x20-\x7E\n\r\t]").expect("valid regex"));
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("valid regex"));

/// Normalize extracted text.
///
/// Whitespace runs become a single space, runs of three or more newlines
/// become two, characters outside printable ASCII (plus `\n`, `\r`, `\t`)
/// are dropped and the result is trimmed. Spaces left adjacent by a dropped
/// character are collapsed again.
pub fn clean_text(text: &str) -> String {
    let text = WHITESPACE_RUN.replace_all(text, " ");
    let text = NEWLINE_RUN.replace_all(&text, "\n\n");
    let text = NON_PRINTABLE.replace_all(&text, "");
    let text = SPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}
