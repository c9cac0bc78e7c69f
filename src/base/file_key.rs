//! File keys for tracking `.proto` sources.

use smol_str::SmolStr;
use std::fmt;

/// Extension of interface-definition sources.
pub const SOURCE_EXT: &str = ".proto";

/// Extension of generated declaration files.
pub const TARGET_EXT: &str = ".ts";

/// Identifier of a source file, relative to the input root.
///
/// Import statements name files the same way (`common/user.proto`), so a
/// `FileKey` built from an import and one built from a discovered path compare
/// equal. Separators are normalized to `/` and a leading `./` is dropped.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileKey(SmolStr);

impl FileKey {
    /// Create a key from a relative path.
    pub fn new(path: impl AsRef<str>) -> Self {
        let normalized = path.as_ref().replace('\\', "/");
        let trimmed = normalized.strip_prefix("./").unwrap_or(&normalized);
        Self(SmolStr::new(trimmed))
    }

    /// The key as written.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key names an interface-definition source.
    pub fn is_source(&self) -> bool {
        self.0.ends_with(SOURCE_EXT)
    }

    /// The key with the source extension removed (`common/user`).
    pub fn without_extension(&self) -> &str {
        self.0.strip_suffix(SOURCE_EXT).unwrap_or(&self.0)
    }

    /// The file name with directories and source extension removed (`user`).
    pub fn stem(&self) -> &str {
        let path = self.without_extension();
        match path.rfind('/') {
            Some(idx) => &path[idx + 1..],
            None => path,
        }
    }

    /// The module binding used for this file in generated imports.
    ///
    /// Every character that cannot appear in a TypeScript identifier becomes
    /// `_`, so `user-info.proto` is imported as `user_info`.
    pub fn alias(&self) -> SmolStr {
        let mut alias: String = self
            .stem()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
            .collect();
        if alias.is_empty() || alias.starts_with(|c: char| c.is_ascii_digit()) {
            alias.insert(0, '_');
        }
        SmolStr::new(alias)
    }

    /// Relative path of the generated file (`common/user.ts`).
    pub fn target_path(&self) -> String {
        format!("{}{}", self.without_extension(), TARGET_EXT)
    }
}

impl fmt::Debug for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileKey({})", self.0)
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileKey {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for FileKey {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}
