//! Editable document with format preservation
//!
//! A [`Document`] pairs the live, caller-editable tree with the
//! annotation-free snapshot the parser produced. The snapshot stays
//! immutable for the document's lifetime; the merge that produced the
//! live tree happened once, at load time.

use std::path::{Path, PathBuf};

use crate::convert::parse_tree;
use crate::error::{Error, Result};
use crate::extract::extract;
use crate::merge::merge;
use crate::node::{Anchor, BreakLine, Comment, Mapping, Node};
use crate::render::render;

/// Placement options for [`Document::add_comment`].
#[derive(Debug, Clone, Default)]
pub struct CommentOptions {
    /// Indentation in two-space units.
    pub indent: usize,
    /// Insert immediately before this top-level key instead of
    /// appending at the end.
    pub before: Option<String>,
}

/// A loaded document: source path, live tree, and the clean parsed
/// snapshot.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    root: Mapping,
    original: Mapping,
    loaded_text: String,
}

impl Document {
    /// Create an empty document that will save to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            root: Mapping::new(),
            original: Mapping::new(),
            loaded_text: String::new(),
        }
    }

    /// Read `path` and build the merged, editable tree.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let text = anno_fs::read_text(&path)?;
        Self::from_text(&text, path)
    }

    /// Build a document from in-memory text. `path` is where a later
    /// [`save`](Self::save) will write.
    pub fn from_text(text: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let original = parse_tree(text)?;
        let (comments, breaks) = extract(text, &original);
        let root = merge(&original, comments, breaks);
        Ok(Self {
            path: path.into(),
            root,
            original,
            loaded_text: text.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The live, editable tree.
    pub fn root(&self) -> &Mapping {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Mapping {
        &mut self.root
    }

    /// The annotation-free snapshot from the parser.
    pub fn original(&self) -> &Mapping {
        &self.original
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.root.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.root.get_mut(key)
    }

    /// Set a top-level key, replacing in place or appending.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Node>) {
        self.root.insert(key, value);
    }

    /// Remove a top-level key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.root.remove(key)
    }

    /// Add a comment at the top level.
    pub fn add_comment(&mut self, text: impl Into<String>, options: CommentOptions) {
        let comment = Comment {
            text: text.into(),
            indent: options.indent,
            anchor: Anchor::none(),
            trailing_line: None,
        };
        match options.before {
            Some(key) => self.root.insert_comment_before(&key, comment),
            None => self.root.push_comment(comment),
        }
    }

    /// Add a run of blank lines at the top level.
    pub fn add_break_line(&mut self, count: usize) -> Result<()> {
        if count == 0 {
            return Err(Error::configuration(
                "break line count must be at least 1",
            ));
        }
        self.root.push_break(BreakLine::new(count));
        Ok(())
    }

    /// Render the current tree to text without touching storage.
    pub fn to_text(&self) -> String {
        render(&self.root)
    }

    /// Whether the tree no longer renders to what was loaded.
    pub fn is_modified(&self) -> bool {
        self.to_text() != self.loaded_text
    }

    /// Render and write atomically to the document's path, returning
    /// the rendered text.
    pub fn save(&self) -> Result<String> {
        let text = self.to_text();
        anno_fs::write_atomic(&self.path, text.as_bytes())?;
        Ok(text)
    }
}
