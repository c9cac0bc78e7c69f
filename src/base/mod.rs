//! Foundation types for the pbts toolchain.
//!
//! This module provides fundamental types used throughout the generator:
//! - [`FileKey`] - Identifiers of `.proto` sources and their derived names
//! - [`LineCol`], [`LineIndex`] - Byte offset to line/column conversion
//!
//! This module has NO dependencies on other pbts modules.

mod file_key;
mod span;

pub use file_key::{FileKey, SOURCE_EXT, TARGET_EXT};
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
