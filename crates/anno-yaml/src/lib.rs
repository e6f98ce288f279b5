//! Format-preserving document model for `#`-commented YAML
//!
//! Parses raw text into an editable tree that keeps comments and
//! blank-line runs as first-class entries, lets callers mutate it
//! freely, and re-renders text that matches the original formatting
//! as closely as possible.
//!
//! The pipeline: raw text is handed to `serde_yaml` for the canonical
//! structure, the same text is scanned line-by-line for comments and
//! blank-line runs ([`extract`]), the two are recombined by anchoring
//! each annotation to a (key, occurrence, depth) position ([`merge`]),
//! and the result renders back out ([`render`]).

pub mod convert;
pub mod document;
pub mod error;
pub mod extract;
pub mod merge;
pub mod node;
pub mod occurrence;
pub mod render;

pub use document::{CommentOptions, Document};
pub use error::{Error, Result};
pub use node::{Anchor, BreakLine, Comment, Entry, Item, Mapping, Node, Scalar, Sequence};
