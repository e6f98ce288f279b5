//! Tagged value tree with first-class annotations
//!
//! [`Node`] is the structural value type. [`Mapping`] and [`Sequence`]
//! carry their annotations inline: a mapping holds an ordered list of
//! [`Entry`] values (key/value pairs interleaved with comments and
//! blank-line runs), a sequence holds an ordered list of [`Item`]
//! values. Ordering is explicit and deterministic; no synthetic keys
//! are involved.

use std::fmt;

/// Leaf value of the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// The unquoted text form of this scalar, as it appears after `key:`
    /// in source text. Used for anchoring annotations to values.
    pub fn plain(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format_float(*f),
            Self::Str(s) => s.clone(),
        }
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        ".nan".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { ".inf" } else { "-.inf" }.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain())
    }
}

/// Structural value: scalar, mapping, or sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Mapping(Mapping),
    Sequence(Sequence),
}

impl Node {
    pub fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(Scalar::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Scalar(Scalar::Float(f)) => Some(*f),
            Self::Scalar(Scalar::Int(i)) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match self {
            Self::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Deep copy with all Comment/Break entries removed.
    pub fn strip_annotations(&self) -> Node {
        match self {
            Self::Scalar(s) => Self::Scalar(s.clone()),
            Self::Mapping(m) => Self::Mapping(m.strip_annotations()),
            Self::Sequence(s) => Self::Sequence(s.strip_annotations()),
        }
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::Str(s))
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Self::Scalar(Scalar::Int(i))
    }
}

impl From<f64> for Node {
    fn from(f: f64) -> Self {
        Self::Scalar(Scalar::Float(f))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl From<Mapping> for Node {
    fn from(m: Mapping) -> Self {
        Self::Mapping(m)
    }
}

impl From<Sequence> for Node {
    fn from(s: Sequence) -> Self {
        Self::Sequence(s)
    }
}

/// The (key, occurrence-count) pair used to re-attach an annotation to a
/// tree position after parsing. `key: None` anchors to a bare sequence
/// scalar or to the end of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub key: Option<String>,
    pub occurrence: usize,
}

impl Anchor {
    pub fn none() -> Self {
        Self {
            key: None,
            occurrence: 0,
        }
    }

    pub fn keyed(key: impl Into<String>, occurrence: usize) -> Self {
        Self {
            key: Some(key.into()),
            occurrence,
        }
    }
}

/// A comment run: one or more consecutive `#` lines, joined by `\n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Comment text without the `#` markers.
    pub text: String,
    /// Indentation of the first line, in two-space units.
    pub indent: usize,
    pub anchor: Anchor,
    /// The structural line the comment sits above, inline comments
    /// stripped. `None` for a comment trailing the whole document.
    pub trailing_line: Option<String>,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            indent: 0,
            anchor: Anchor::none(),
            trailing_line: None,
        }
    }
}

/// A run of consecutive blank lines.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakLine {
    /// Number of blank lines, at least 1.
    pub count: usize,
    pub anchor: Anchor,
    /// The non-blank line preceding the run, kept raw when it is itself
    /// a comment line. `None` when the document starts with blank lines.
    pub preceding_line: Option<String>,
}

impl BreakLine {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            anchor: Anchor::none(),
            preceding_line: None,
        }
    }
}

/// One entry in a mapping: an ordinary key/value pair, or an annotation
/// occupying its own position in the entry order.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Pair { key: String, value: Node },
    Comment(Comment),
    Break(BreakLine),
}

/// Ordered key -> value container. Ordinary keys are unique; insertion
/// order is preserved across edits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: Vec<Entry>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ordinary key/value pairs (annotations not counted).
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut Vec<Entry> {
        &mut self.entries
    }

    pub fn push_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find_map(|e| match e {
            Entry::Pair { key: k, value } if k == key => Some(value),
            _ => None,
        })
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.iter_mut().find_map(|e| match e {
            Entry::Pair { key: k, value } if k == key => Some(value),
            _ => None,
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set `key` to `value`, replacing in place when the key exists and
    /// appending otherwise. Keeps key uniqueness and entry order.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) {
        let key = key.into();
        let value = value.into();
        if let Some(existing) = self.get_mut(&key) {
            *existing = value;
        } else {
            self.entries.push(Entry::Pair { key, value });
        }
    }

    /// Remove the pair for `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        let index = self.entries.iter().position(
            |e| matches!(e, Entry::Pair { key: k, .. } if k == key),
        )?;
        match self.entries.remove(index) {
            Entry::Pair { value, .. } => Some(value),
            _ => unreachable!("position matched a Pair entry"),
        }
    }

    pub fn push_comment(&mut self, comment: Comment) {
        self.entries.push(Entry::Comment(comment));
    }

    pub fn push_break(&mut self, break_line: BreakLine) {
        self.entries.push(Entry::Break(break_line));
    }

    /// Insert a comment immediately before the pair for `key`. Appends
    /// at the end when the key is absent.
    pub fn insert_comment_before(&mut self, key: &str, comment: Comment) {
        let index = self
            .entries
            .iter()
            .position(|e| matches!(e, Entry::Pair { key: k, .. } if k == key))
            .unwrap_or(self.entries.len());
        self.entries.insert(index, Entry::Comment(comment));
    }

    /// Iterate over ordinary key/value pairs, skipping annotations.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Pair { key, value } => Some((key.as_str(), value)),
            _ => None,
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(k, _)| k)
    }

    /// Deep copy with all Comment/Break entries removed.
    pub fn strip_annotations(&self) -> Mapping {
        let mut out = Mapping::new();
        for entry in &self.entries {
            if let Entry::Pair { key, value } = entry {
                out.push_entry(Entry::Pair {
                    key: key.clone(),
                    value: value.strip_annotations(),
                });
            }
        }
        out
    }
}

/// One item in a sequence: a structural value or an annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Node(Node),
    Comment(Comment),
    Break(BreakLine),
}

/// Ordered list of values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sequence {
    items: Vec<Item>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of structural values (annotations not counted).
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }

    pub fn push(&mut self, value: impl Into<Node>) {
        self.items.push(Item::Node(value.into()));
    }

    pub fn push_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Iterate over structural values, skipping annotations.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.items.iter().filter_map(|i| match i {
            Item::Node(n) => Some(n),
            _ => None,
        })
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.iter().nth(index)
    }

    /// Deep copy with all Comment/Break items removed.
    pub fn strip_annotations(&self) -> Sequence {
        let mut out = Sequence::new();
        for item in &self.items {
            if let Item::Node(n) = item {
                out.push_item(Item::Node(n.strip_annotations()));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut map = Mapping::new();
        map.insert("b", 2i64);
        map.insert("a", 1i64);
        map.insert("c", 3i64);
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_insert_existing_replaces_in_place() {
        let mut map = Mapping::new();
        map.insert("a", 1i64);
        map.insert("b", 2i64);
        map.insert("a", 10i64);
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map.get("a").and_then(Node::as_i64), Some(10));
    }

    #[test]
    fn test_remove_returns_value() {
        let mut map = Mapping::new();
        map.insert("a", "x");
        assert_eq!(map.remove("a").and_then(|n| n.as_str().map(String::from)), Some("x".to_string()));
        assert!(map.remove("a").is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_len_skips_annotations() {
        let mut map = Mapping::new();
        map.push_comment(Comment::new("note"));
        map.insert("a", 1i64);
        map.push_break(BreakLine::new(2));
        assert_eq!(map.len(), 1);
        assert_eq!(map.entries().len(), 3);
    }

    #[test]
    fn test_insert_comment_before_key() {
        let mut map = Mapping::new();
        map.insert("a", 1i64);
        map.insert("b", 2i64);
        map.insert_comment_before("b", Comment::new("note"));
        assert!(matches!(
            map.entries()[1],
            Entry::Comment(ref c) if c.text == "note"
        ));
    }

    #[test]
    fn test_strip_annotations_recurses() {
        let mut inner = Mapping::new();
        inner.push_comment(Comment::new("inner note"));
        inner.insert("x", 1i64);

        let mut map = Mapping::new();
        map.push_comment(Comment::new("outer note"));
        map.insert("nested", inner);

        let stripped = map.strip_annotations();
        assert_eq!(stripped.entries().len(), 1);
        let nested = stripped.get("nested").and_then(Node::as_mapping).unwrap();
        assert_eq!(nested.entries().len(), 1);
    }

    #[test]
    fn test_scalar_plain_forms() {
        assert_eq!(Scalar::Null.plain(), "");
        assert_eq!(Scalar::Bool(true).plain(), "true");
        assert_eq!(Scalar::Int(-3).plain(), "-3");
        assert_eq!(Scalar::Float(1.0).plain(), "1.0");
        assert_eq!(Scalar::Float(0.25).plain(), "0.25");
        assert_eq!(Scalar::Str("hi".into()).plain(), "hi");
    }

    #[test]
    fn test_sequence_iter_skips_annotations() {
        let mut seq = Sequence::new();
        seq.push("a");
        seq.push_item(Item::Comment(Comment::new("note")));
        seq.push("b");
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.get(1).and_then(Node::as_str), Some("b"));
    }
}
