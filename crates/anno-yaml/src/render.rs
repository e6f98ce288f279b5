//! Serializer: annotated tree back to text
//!
//! Depth-first render into one growable buffer. Indentation is
//! two-space units; a sequence-item mapping puts `- ` on its first key
//! and indents the rest one level deeper; comments inside sequence
//! items get one extra level. Multi-line strings come out as literal
//! block scalars, plain strings stay unquoted unless the text would
//! reparse as something else.

use crate::node::{Entry, Item, Mapping, Node, Scalar, Sequence};

/// Render the tree to text.
pub fn render(map: &Mapping) -> String {
    let mut out = String::new();
    render_mapping(&mut out, map, 0, false);
    out
}

fn render_mapping(out: &mut String, map: &Mapping, depth: usize, seq_item: bool) {
    let mut first_pair = true;
    for entry in map.entries() {
        match entry {
            Entry::Comment(comment) => {
                let indent = (depth + usize::from(seq_item)).max(comment.indent);
                render_comment(out, &comment.text, indent);
            }
            Entry::Break(run) => {
                for _ in 0..run.count {
                    out.push('\n');
                }
            }
            Entry::Pair { key, value } => {
                let hyphen = seq_item && first_pair;
                first_pair = false;
                push_indent(out, if seq_item && !hyphen { depth + 1 } else { depth });
                if hyphen {
                    out.push_str("- ");
                }
                out.push_str(key);
                out.push(':');

                // The hyphen implies one extra nesting level
                let child_depth = if seq_item { depth + 2 } else { depth + 1 };
                match value {
                    Node::Mapping(m) if m.is_empty() => out.push_str(" {}\n"),
                    Node::Mapping(m) => {
                        out.push('\n');
                        render_mapping(out, m, child_depth, false);
                    }
                    Node::Sequence(s) if s.is_empty() => out.push_str(" []\n"),
                    Node::Sequence(s) => {
                        out.push('\n');
                        render_sequence(out, s, child_depth);
                    }
                    Node::Scalar(Scalar::Null) => out.push('\n'),
                    Node::Scalar(Scalar::Str(s)) if s.contains('\n') => {
                        out.push(' ');
                        render_block_scalar(out, s, child_depth);
                    }
                    Node::Scalar(scalar) => {
                        out.push(' ');
                        out.push_str(&format_scalar(scalar));
                        out.push('\n');
                    }
                }
            }
        }
    }
}

fn render_sequence(out: &mut String, seq: &Sequence, depth: usize) {
    for item in seq.items() {
        match item {
            Item::Comment(comment) => {
                render_comment(out, &comment.text, depth.max(comment.indent));
            }
            Item::Break(run) => {
                for _ in 0..run.count {
                    out.push('\n');
                }
            }
            Item::Node(node) => match node {
                Node::Mapping(m) if m.is_empty() => {
                    push_indent(out, depth);
                    out.push_str("- {}\n");
                }
                Node::Mapping(m) => render_mapping(out, m, depth, true),
                Node::Sequence(s) if s.is_empty() => {
                    push_indent(out, depth);
                    out.push_str("- []\n");
                }
                Node::Sequence(s) => {
                    push_indent(out, depth);
                    out.push_str("-\n");
                    render_sequence(out, s, depth + 1);
                }
                Node::Scalar(Scalar::Null) => {
                    push_indent(out, depth);
                    out.push_str("-\n");
                }
                Node::Scalar(Scalar::Str(s)) if s.contains('\n') => {
                    push_indent(out, depth);
                    out.push_str("- ");
                    render_block_scalar(out, s, depth + 1);
                }
                Node::Scalar(scalar) => {
                    push_indent(out, depth);
                    out.push_str("- ");
                    out.push_str(&format_scalar(scalar));
                    out.push('\n');
                }
            },
        }
    }
}

fn render_comment(out: &mut String, text: &str, indent: usize) {
    if text.is_empty() {
        push_indent(out, indent);
        out.push_str("#\n");
        return;
    }
    for line in text.lines() {
        push_indent(out, indent);
        if line.is_empty() {
            out.push_str("#\n");
        } else {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
    }
}

/// Literal block scalar: indicator line, content one level deeper,
/// per-line trailing whitespace trimmed. `|` keeps the final newline,
/// `|-` strips it, so the reparsed string equals the original.
fn render_block_scalar(out: &mut String, s: &str, content_depth: usize) {
    out.push_str(if s.ends_with('\n') { "|" } else { "|-" });
    out.push('\n');
    for line in s.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            out.push('\n');
        } else {
            push_indent(out, content_depth);
            out.push_str(line);
            out.push('\n');
        }
    }
}

/// Single-line scalar token.
pub(crate) fn format_scalar(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Null => String::new(),
        Scalar::Bool(_) | Scalar::Int(_) | Scalar::Float(_) => scalar.plain(),
        Scalar::Str(s) => {
            if needs_quotes(s) {
                format!("\"{}\"", s.replace('"', "\\\""))
            } else {
                s.clone()
            }
        }
    }
}

/// Whether a plain rendering of `s` would be ambiguous: block-indicator
/// or structural lead characters, text that reparses as another scalar
/// type, or whitespace the parser would eat.
fn needs_quotes(s: &str) -> bool {
    if s.is_empty() || s != s.trim() {
        return true;
    }
    let first = s.chars().next().expect("non-empty");
    if matches!(
        first,
        '|' | '>' | '&' | '*' | '!' | '%' | '@' | '`' | '#' | '-' | '?' | ':' | '['
            | ']' | '{' | '}' | ',' | '\'' | '"'
    ) {
        return true;
    }
    if s.contains(": ") || s.ends_with(':') || s.contains(" #") {
        return true;
    }
    looks_like_other_scalar(s)
}

fn looks_like_other_scalar(s: &str) -> bool {
    if s.parse::<i64>().is_ok() || s.parse::<f64>().is_ok() {
        return true;
    }
    matches!(
        s.to_ascii_lowercase().as_str(),
        "null" | "~" | "true" | "false" | "yes" | "no" | "on" | "off"
    )
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}
