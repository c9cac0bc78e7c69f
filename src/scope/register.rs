//! Root registration: exposes a packaged file's top-level names.

use smol_str::{SmolStr, format_smolstr};
use tracing::debug;

use super::tree::{ScopeId, ScopeTree};
use crate::base::FileKey;

/// Attach `file_scope` to the root under `package` and export each of its
/// top-level names from the root as `<file alias>.<name>`.
///
/// A bare name exported by several files accumulates every qualified name in
/// registration order; the resolver settles the ambiguity per importer.
pub fn register_file(tree: &mut ScopeTree, package: &str, file_scope: ScopeId, file: &FileKey) {
    let root = tree.root();

    if let Some(displaced) = tree.attach(root, SmolStr::new(package), file_scope) {
        if displaced != file_scope {
            debug!(%file, package, ?displaced, "package scope replaced by later file");
        }
    }

    let alias = file.alias();
    let names: Vec<SmolStr> = tree
        .get(file_scope)
        .exports()
        .map(|(name, _)| name.clone())
        .collect();

    for name in names {
        let qualified = format_smolstr!("{alias}.{name}");
        tree.add_export(root, name, qualified);
    }

    debug!(%file, package, "registered file exports in root scope");
}
