//! The compilation session: one run's shared state and the per-file
//! state machine.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use super::cache::{Completion, CompletionCache, FileOutput};
use super::source::SourceProvider;
use crate::base::FileKey;
use crate::emit::{EmitOptions, Emitter, render_header, render_imports};
use crate::error::{PbtsError, Result};
use crate::schema::ParseOptions;
use crate::scope::{ScopeId, ScopeTree, build_scope, register_file};
use crate::syntax::ProtoParser;

/// Options for one compilation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub parse: ParseOptions,
    pub emit: EmitOptions,
}

/// State of one compilation run.
///
/// Holds the root scope every packaged file registers into and the
/// completion cache. Create a fresh session per run: cross-file bindings
/// from an earlier run would otherwise leak into the next one.
pub struct CompileSession<P, S> {
    parser: P,
    sources: S,
    options: SessionOptions,
    tree: ScopeTree,
    cache: CompletionCache,
    file_scopes: FxHashMap<FileKey, ScopeId>,
}

impl<P: ProtoParser, S: SourceProvider> CompileSession<P, S> {
    pub fn new(parser: P, sources: S, options: SessionOptions) -> Self {
        Self {
            parser,
            sources,
            options,
            tree: ScopeTree::new(),
            cache: CompletionCache::new(),
            file_scopes: FxHashMap::default(),
        }
    }

    /// Generate the declarations for `file`, compiling its imports first.
    ///
    /// Returns cached text when the file is already done, and
    /// [`FileOutput::Pending`] when the request closes an import cycle.
    pub fn compile(&mut self, file: &FileKey) -> Result<FileOutput> {
        match self.cache.get(file) {
            Some(Completion::Done(text)) => {
                debug!(%file, "cache hit");
                return Ok(FileOutput::Complete(text.clone()));
            }
            Some(Completion::InProgress) => {
                debug!(%file, "import cycle, leaving back edge pending");
                return Ok(FileOutput::Pending);
            }
            None => {}
        }
        self.cache.mark_in_progress(file.clone());

        let source = self.sources.read(file)?;
        let parsed = self
            .parser
            .parse(&source, self.options.parse)
            .map_err(|source| PbtsError::Parse { path: file.clone(), source })?;
        let nested = parsed.unwrapped_nested();

        if nested.is_empty() {
            debug!(%file, "no declarations");
            return Ok(self.finish(file, String::new()));
        }

        let scope = build_scope(&mut self.tree, nested);
        self.file_scopes.insert(file.clone(), scope);
        if let Some(package) = &parsed.package {
            register_file(&mut self.tree, package, scope, file);
        }

        for import in &parsed.imports {
            let dependency = FileKey::new(import.as_str());
            if !dependency.is_source() {
                debug!(%file, %dependency, "skipping non-proto import");
                continue;
            }
            self.compile(&dependency)?;
        }

        let body = Emitter::new(&self.tree, &parsed.imports, &self.options.emit)
            .render_nested(nested, scope)
            .map_err(|source| PbtsError::UnresolvedType { path: file.clone(), source })?;

        let body = if parsed.imports.is_empty() {
            body
        } else {
            render_imports(&parsed.imports, &body)
        };
        let output = render_header(&self.options.emit.suppressions, &body);

        Ok(self.finish(file, output))
    }

    fn finish(&mut self, file: &FileKey, output: String) -> FileOutput {
        let text: Arc<str> = output.into();
        self.cache.finish(file.clone(), text.clone());
        info!(%file, target = %file.target_path(), bytes = text.len(), "generated");
        FileOutput::Complete(text)
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn scope_tree(&self) -> &ScopeTree {
        &self.tree
    }

    pub fn cache(&self) -> &CompletionCache {
        &self.cache
    }

    /// Top-level scope built for `file`, once it has been compiled.
    pub fn file_scope(&self, file: &FileKey) -> Option<ScopeId> {
        self.file_scopes.get(file).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::SourceSet;
    use crate::syntax::ProtoFileParser;

    fn session(sources: &SourceSet) -> CompileSession<ProtoFileParser, &SourceSet> {
        CompileSession::new(ProtoFileParser, sources, SessionOptions::default())
    }

    #[test]
    fn test_single_file() {
        let sources = SourceSet::new();
        sources.insert("a.proto", "package a;\nmessage A { int32 x = 1; }");

        let mut session = session(&sources);
        let out = session.compile(&FileKey::new("a.proto")).unwrap();

        assert_eq!(out.text(), Some("export interface A {\n  x: number;\n}\n"));
        assert!(session.cache().is_done(&FileKey::new("a.proto")));
    }

    #[test]
    fn test_file_scope_registered_under_package() {
        let sources = SourceSet::new();
        sources.insert("a.proto", "package shop;\nmessage A {}");

        let mut session = session(&sources);
        let key = FileKey::new("a.proto");
        session.compile(&key).unwrap();

        let scope = session.file_scope(&key).unwrap();
        let tree = session.scope_tree();
        assert_eq!(tree.get(tree.root()).child("shop"), Some(scope));
    }

    #[test]
    fn test_empty_file_renders_nothing() {
        let sources = SourceSet::new();
        sources.insert("empty.proto", "syntax = \"proto3\";\npackage nothing;\n");

        let mut session = session(&sources);
        let out = session.compile(&FileKey::new("empty.proto")).unwrap();
        assert_eq!(out.text(), Some(""));
    }

    #[test]
    fn test_missing_import_fails() {
        let sources = SourceSet::new();
        sources.insert("a.proto", "import \"gone.proto\";\nmessage A {}");

        let err = session(&sources).compile(&FileKey::new("a.proto")).unwrap_err();
        assert!(matches!(
            err,
            PbtsError::SourceNotFound { ref path } if path.as_str() == "gone.proto"
        ));
    }

    #[test]
    fn test_parse_error_names_file() {
        let sources = SourceSet::new();
        sources.insert("bad.proto", "message {");

        let err = session(&sources).compile(&FileKey::new("bad.proto")).unwrap_err();
        assert!(matches!(err, PbtsError::Parse { ref path, .. } if path.as_str() == "bad.proto"));
        assert!(err.to_string().starts_with("bad.proto:1:9"), "{err}");
    }

    #[test]
    fn test_in_progress_file_is_pending() {
        let sources = SourceSet::new();
        sources.insert("a.proto", "package a;\nmessage A {}");

        let mut session = session(&sources);
        let key = FileKey::new("a.proto");
        session.cache.mark_in_progress(key.clone());

        assert_eq!(session.compile(&key).unwrap(), FileOutput::Pending);
        assert!(session.file_scope(&key).is_none());
    }
}
