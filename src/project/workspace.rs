//! Compiling a whole input directory into an output directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};
use walkdir::WalkDir;

use super::config::CompileOptions;
use crate::base::FileKey;
use crate::driver::{CompileSession, FileOutput, SourceSet};
use crate::error::{PbtsError, Result};
use crate::syntax::ProtoFileParser;

/// Files written by [`compile_workspace`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkspaceReport {
    /// Generated files, in write order.
    pub written: Vec<PathBuf>,
}

/// All `.proto` files under `input`, as keys relative to it, sorted.
///
/// Sorting fixes the order files register into the root scope, which decides
/// the order of colliding exports.
pub fn discover_sources(input: &Path) -> Result<Vec<FileKey>> {
    if !input.is_dir() {
        return Err(PbtsError::Io {
            path: input.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "input directory not found"),
        });
    }

    let mut keys = Vec::new();
    for entry in WalkDir::new(input).follow_links(true) {
        let entry = entry.map_err(|source| PbtsError::Walk { path: input.to_path_buf(), source })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(input) else {
            continue;
        };
        let key = FileKey::new(relative.to_string_lossy());
        if key.is_source() {
            keys.push(key);
        }
    }
    keys.sort();
    Ok(keys)
}

/// Read `keys` from `input` in parallel into a [`SourceSet`].
pub fn load_sources(input: &Path, keys: &[FileKey]) -> Result<SourceSet> {
    let loaded: Vec<(FileKey, String)> = keys
        .par_iter()
        .map(|key| {
            let path = input.join(key.as_str());
            fs::read_to_string(&path)
                .map(|contents| (key.clone(), contents))
                .map_err(|source| PbtsError::Io { path, source })
        })
        .collect::<Result<_>>()?;

    let sources = SourceSet::new();
    for (key, contents) in loaded {
        sources.insert(key, contents);
    }
    Ok(sources)
}

/// Compile every `.proto` under `options.input` and write the generated
/// `.ts` files to the same relative paths under `options.output`.
///
/// Stops at the first error. Files already written stay in place.
pub fn compile_workspace(options: &CompileOptions) -> Result<WorkspaceReport> {
    let keys = discover_sources(&options.input)?;
    let sources = load_sources(&options.input, &keys)?;
    info!(files = keys.len(), input = %options.input.display(), "compiling workspace");

    let mut session = CompileSession::new(ProtoFileParser, &sources, options.session_options());
    let mut report = WorkspaceReport::default();

    for key in &keys {
        let text = match session.compile(key)? {
            FileOutput::Complete(text) => text,
            FileOutput::Pending => {
                warn!(file = %key, "output still pending after compile");
                continue;
            }
        };

        let target = options.output.join(key.target_path());
        write_output(&target, &text)?;
        report.written.push(target);
    }

    info!(written = report.written.len(), output = %options.output.display(), "workspace done");
    Ok(report)
}

fn write_output(target: &Path, text: &str) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .map_err(|source| PbtsError::Io { path: parent.to_path_buf(), source })?;
    }
    fs::write(target, text).map_err(|source| PbtsError::Io { path: target.to_path_buf(), source })
}
