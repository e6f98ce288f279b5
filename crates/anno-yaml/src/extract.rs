//! Annotation extraction from raw source text
//!
//! Two independent sweeps over the same line list produce the ordered
//! comment runs and blank-line runs. Each carries the positional
//! metadata (anchor key, occurrence count, adjacent structural line)
//! the merge engine needs to splice it back into the parsed tree.
//! A line is blank XOR a comment XOR ordinary content.

use std::sync::LazyLock;

use regex::Regex;

use crate::node::{Anchor, BreakLine, Comment, Mapping};
use crate::occurrence::count_occurrences;

/// Inline trailing comment: a `#` not preceded by a word character,
/// followed by a quote-free run to end of line. The regex crate has no
/// lookbehind, so the pre-marker character is captured and restored.
static INLINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(^|[^\w])#[^"']*$"#).unwrap());

/// Scan `raw` and return the ordered comment runs and blank-line runs,
/// anchored against `original` (the annotation-free parsed tree).
pub fn extract(raw: &str, original: &Mapping) -> (Vec<Comment>, Vec<BreakLine>) {
    let lines: Vec<&str> = raw.lines().collect();
    (
        extract_comments(&lines, original),
        extract_breaks(&lines, original),
    )
}

fn extract_comments(lines: &[&str], original: &Mapping) -> Vec<Comment> {
    let mut comments = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if !is_comment_line(lines[i]) {
            i += 1;
            continue;
        }

        // Accumulate the run of consecutive comment lines
        let indent = indent_width(lines[i]) / 2;
        let mut text_lines = Vec::new();
        while i < lines.len() && is_comment_line(lines[i]) {
            text_lines.push(comment_body(lines[i]));
            i += 1;
        }

        // Anchor off the next structural line, skipping blanks and any
        // following comment runs (which anchor independently)
        let trailing = lines[i..]
            .iter()
            .find(|l| !l.trim().is_empty() && !is_comment_line(l))
            .map(|l| strip_inline_comment(l));
        let anchor = match &trailing {
            Some(line) => anchor_for_line(line, original),
            None => Anchor::none(),
        };

        comments.push(Comment {
            text: text_lines.join("\n"),
            indent,
            anchor,
            trailing_line: trailing,
        });
    }
    comments
}

fn extract_breaks(lines: &[&str], original: &Mapping) -> Vec<BreakLine> {
    let mut breaks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if !lines[i].trim().is_empty() {
            i += 1;
            continue;
        }

        let start = i;
        while i < lines.len() && lines[i].trim().is_empty() {
            i += 1;
        }

        // Blank lines visually follow content, so anchoring looks
        // backward, unlike comments which look forward
        let preceding = (start > 0).then(|| strip_inline_comment(lines[start - 1]));
        let anchor = match &preceding {
            Some(line) if !is_comment_line(line) => anchor_for_line(line, original),
            _ => Anchor::none(),
        };

        breaks.push(BreakLine {
            count: i - start,
            anchor,
            preceding_line: preceding,
        });
    }
    breaks
}

/// Derive an anchor from a structural line: the candidate key is the
/// text before the first colon (leading `- ` list marker stripped), the
/// depth is the leading-space count in two-space units, and the
/// occurrence count fingerprints the key at that depth.
pub(crate) fn anchor_for_line(line: &str, original: &Mapping) -> Anchor {
    let depth = indent_width(line) / 2;
    let content = line.trim_start();
    let content = content.strip_prefix("- ").unwrap_or(content);
    match content.split_once(':') {
        Some((key, _)) => {
            let key = key.trim();
            Anchor::keyed(key, count_occurrences(original, key, depth))
        }
        None => Anchor::none(),
    }
}

pub(crate) fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Comment text of a `#` line: marker stripped, one following space
/// eaten.
pub(crate) fn comment_body(line: &str) -> String {
    let trimmed = line.trim_start();
    let body = trimmed.strip_prefix('#').unwrap_or(trimmed);
    body.strip_prefix(' ').unwrap_or(body).to_string()
}

/// Drop an inline trailing comment from a structural line. Lines that
/// are themselves comments are returned untouched.
fn strip_inline_comment(line: &str) -> String {
    if is_comment_line(line) {
        return line.to_string();
    }
    INLINE_COMMENT
        .replace(line, "$1")
        .trim_end()
        .to_string()
}

/// The raw value portion of a `key: value` line (text after the first
/// colon, trimmed), with a leading `- ` list marker tolerated.
pub(crate) fn raw_line_value(line: &str) -> Option<String> {
    let content = line.trim_start();
    let content = content.strip_prefix("- ").unwrap_or(content);
    content
        .split_once(':')
        .map(|(_, rest)| rest.trim().to_string())
}

/// The value of a bare `- item` sequence line.
pub(crate) fn seq_item_value(line: &str) -> Option<String> {
    line.trim()
        .strip_prefix("- ")
        .map(|v| unquote(v.trim()).to_string())
}

/// Strip one layer of surrounding quotes, either style.
pub(crate) fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(s)
}
