//! Filesystem collaborator for yamlanno
//!
//! Reading is a plain `read_to_string`; writing goes through an atomic
//! temp-then-rename sequence so a crashed save never leaves a
//! half-written target behind.

pub mod error;
pub mod io;

pub use error::{Error, Result};
pub use io::{read_text, write_atomic};
