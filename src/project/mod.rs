//! Project-level glue: configuration and whole-directory compilation.

mod config;
mod workspace;

pub use config::CompileOptions;
pub use workspace::{WorkspaceReport, compile_workspace, discover_sources, load_sources};
