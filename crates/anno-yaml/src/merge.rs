//! Merge engine: splice extracted annotations into the parsed tree
//!
//! Comments are merged first, then blank-line runs are merged into the
//! comment-merged result, because a blank run whose preceding line is a
//! comment must attach after that Comment entry. Each annotation is
//! consumed at most once (first unconsumed match in extraction order
//! wins), so repeated structurally-identical entries cannot place the
//! same annotation twice. Annotations that never find a home are
//! dropped with a warning, never an error.

use crate::extract::{comment_body, is_comment_line, raw_line_value, seq_item_value, unquote};
use crate::node::{BreakLine, Comment, Entry, Item, Mapping, Node, Scalar, Sequence};
use crate::occurrence::count_occurrences;

/// Merge `comments` and `breaks` into `tree`, returning the annotated
/// tree. `tree` is the annotation-free canonical tree the occurrence
/// counts were computed against.
pub fn merge(tree: &Mapping, comments: Vec<Comment>, breaks: Vec<BreakLine>) -> Mapping {
    let mut comment_pool = Pool::new(comments);
    let mut out = comments_into_mapping(tree, tree, 0, &mut comment_pool);

    // Trailing annotation case: a comment at the very end of the
    // document, anchored to nothing
    if let Some(trailing) =
        comment_pool.take(|c| c.anchor.key.is_none() && c.trailing_line.is_none())
    {
        out.push_comment(trailing);
    }

    let mut break_pool = Pool::new(breaks);
    let mut merged = breaks_into_mapping(&out, tree, 0, &mut break_pool);
    if let Some(trailing) =
        break_pool.take(|b| b.anchor.key.is_none() && b.preceding_line.is_none())
    {
        merged.push_break(trailing);
    }

    for comment in comment_pool.remaining() {
        tracing::warn!(text = %comment.text, "Comment did not anchor anywhere; dropping");
    }
    for run in break_pool.remaining() {
        tracing::warn!(count = run.count, "Blank-line run did not anchor anywhere; dropping");
    }

    merged
}

/// Working list with take-at-most-once semantics. Replaces shared
/// mutable "used" flags on the annotations themselves.
struct Pool<T>(Vec<Option<T>>);

impl<T> Pool<T> {
    fn new(items: Vec<T>) -> Self {
        Self(items.into_iter().map(Some).collect())
    }

    /// Take the first unconsumed item matching `pred`, in extraction
    /// order.
    fn take(&mut self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.0
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|item| pred(item)))?
            .take()
    }

    fn remaining(self) -> impl Iterator<Item = T> {
        self.0.into_iter().flatten()
    }
}

/// Whether an annotation recorded against `line` matches `value`.
/// Structural values (mappings, sequences) and nulls match by anchor
/// alone; scalars additionally require the line's value portion to
/// equal the scalar's plain form, ignoring quote characters. A block
/// scalar indicator on the line matches any string.
fn value_matches(line: Option<&str>, value: &Node) -> bool {
    match value {
        Node::Mapping(_) | Node::Sequence(_) => true,
        Node::Scalar(Scalar::Null) => true,
        Node::Scalar(scalar) => {
            let Some(line) = line else { return false };
            let Some(raw) = raw_line_value(line) else {
                return false;
            };
            if raw.starts_with('|') || raw.starts_with('>') {
                return matches!(scalar, Scalar::Str(_));
            }
            unquote(&raw) == scalar.plain()
        }
    }
}

fn comments_into_mapping(
    map: &Mapping,
    root: &Mapping,
    depth: usize,
    pool: &mut Pool<Comment>,
) -> Mapping {
    let mut out = Mapping::new();
    for entry in map.entries() {
        let Entry::Pair { key, value } = entry else {
            out.push_entry(entry.clone());
            continue;
        };
        let occ = count_occurrences(root, key, depth);
        if let Some(comment) = pool.take(|c| {
            c.anchor.key.as_deref() == Some(key)
                && c.anchor.occurrence == occ
                && value_matches(c.trailing_line.as_deref(), value)
        }) {
            out.push_comment(comment);
        }
        out.push_entry(Entry::Pair {
            key: key.clone(),
            value: comments_into_value(value, root, depth + 1, pool),
        });
    }
    out
}

fn comments_into_value(
    value: &Node,
    root: &Mapping,
    depth: usize,
    pool: &mut Pool<Comment>,
) -> Node {
    match value {
        Node::Mapping(map) => Node::Mapping(comments_into_mapping(map, root, depth, pool)),
        Node::Sequence(seq) => Node::Sequence(comments_into_sequence(seq, root, depth, pool)),
        Node::Scalar(scalar) => Node::Scalar(scalar.clone()),
    }
}

fn comments_into_sequence(
    seq: &Sequence,
    root: &Mapping,
    depth: usize,
    pool: &mut Pool<Comment>,
) -> Sequence {
    let mut out = Sequence::new();
    for item in seq.items() {
        let Item::Node(node) = item else {
            out.push_item(item.clone());
            continue;
        };
        match node {
            Node::Mapping(_) | Node::Sequence(_) => {
                out.push_item(Item::Node(comments_into_value(node, root, depth, pool)));
            }
            Node::Scalar(scalar) => {
                // A bare sequence scalar matches a keyless comment by
                // its rendered form, leading "- " stripped
                let plain = scalar.plain();
                if let Some(comment) = pool.take(|c| {
                    c.anchor.key.is_none()
                        && c.trailing_line
                            .as_deref()
                            .and_then(seq_item_value)
                            .is_some_and(|v| v == plain)
                }) {
                    out.push_item(Item::Comment(comment));
                }
                out.push_item(Item::Node(node.clone()));
            }
        }
    }
    out
}

fn breaks_into_mapping(
    map: &Mapping,
    root: &Mapping,
    depth: usize,
    pool: &mut Pool<BreakLine>,
) -> Mapping {
    let mut out = Mapping::new();
    for entry in map.entries() {
        match entry {
            Entry::Comment(comment) => {
                out.push_comment(comment.clone());
                // Blank lines directly under a comment anchor off the
                // comment's own last line
                if let Some(run) = pool.take(|b| {
                    b.anchor.key.is_none()
                        && b.preceding_line
                            .as_deref()
                            .is_some_and(|l| break_follows_comment(l, comment))
                }) {
                    out.push_break(run);
                }
            }
            Entry::Break(run) => out.push_break(run.clone()),
            Entry::Pair { key, value } => {
                let occ = count_occurrences(root, key, depth);
                out.push_entry(Entry::Pair {
                    key: key.clone(),
                    value: breaks_into_value(value, root, depth + 1, pool),
                });
                if let Some(run) = pool.take(|b| {
                    b.anchor.key.as_deref() == Some(key)
                        && b.anchor.occurrence == occ
                        && value_matches(b.preceding_line.as_deref(), value)
                }) {
                    out.push_break(run);
                }
            }
        }
    }
    out
}

fn breaks_into_value(
    value: &Node,
    root: &Mapping,
    depth: usize,
    pool: &mut Pool<BreakLine>,
) -> Node {
    match value {
        Node::Mapping(map) => Node::Mapping(breaks_into_mapping(map, root, depth, pool)),
        Node::Sequence(seq) => Node::Sequence(breaks_into_sequence(seq, root, depth, pool)),
        Node::Scalar(scalar) => Node::Scalar(scalar.clone()),
    }
}

fn breaks_into_sequence(
    seq: &Sequence,
    root: &Mapping,
    depth: usize,
    pool: &mut Pool<BreakLine>,
) -> Sequence {
    let mut out = Sequence::new();
    for item in seq.items() {
        match item {
            Item::Comment(comment) => {
                out.push_item(Item::Comment(comment.clone()));
                if let Some(run) = pool.take(|b| {
                    b.anchor.key.is_none()
                        && b.preceding_line
                            .as_deref()
                            .is_some_and(|l| break_follows_comment(l, comment))
                }) {
                    out.push_item(Item::Break(run));
                }
            }
            Item::Break(run) => out.push_item(Item::Break(run.clone())),
            Item::Node(node) => match node {
                Node::Mapping(_) | Node::Sequence(_) => {
                    out.push_item(Item::Node(breaks_into_value(node, root, depth, pool)));
                }
                Node::Scalar(scalar) => {
                    out.push_item(Item::Node(node.clone()));
                    let plain = scalar.plain();
                    if let Some(run) = pool.take(|b| {
                        b.anchor.key.is_none()
                            && b.preceding_line
                                .as_deref()
                                .and_then(seq_item_value)
                                .is_some_and(|v| v == plain)
                    }) {
                        out.push_item(Item::Break(run));
                    }
                }
            },
        }
    }
    out
}

/// Whether a raw comment line is the last line of `comment`.
fn break_follows_comment(line: &str, comment: &Comment) -> bool {
    if !is_comment_line(line) {
        return false;
    }
    comment_body(line) == comment.text.lines().last().unwrap_or(&comment.text)
}
