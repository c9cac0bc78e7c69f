//! Per-file orchestration for one run.
//!
//! A [`CompileSession`] owns the shared [`ScopeTree`](crate::scope::ScopeTree)
//! and the [`CompletionCache`]. Each file moves through
//! `NotStarted → InProgress → Done`; dependencies are compiled depth-first
//! before the importing file renders, and an import that reaches a file still
//! `InProgress` returns [`FileOutput::Pending`] instead of recursing.

mod cache;
mod session;
mod source;

pub use cache::{Completion, CompletionCache, FileOutput};
pub use session::{CompileSession, SessionOptions};
pub use source::{SourceProvider, SourceSet};
