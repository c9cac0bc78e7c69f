//! Compile options, loadable from a JSON config file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::driver::SessionOptions;
use crate::emit::EmitOptions;
use crate::error::{PbtsError, Result};
use crate::schema::ParseOptions;

/// Options for compiling a directory of `.proto` files.
///
/// Keys are camelCase in JSON (`isHump`, `eslintIgnoreList`); missing keys
/// take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Directory scanned recursively for `.proto` files.
    pub input: PathBuf,
    /// Directory receiving the generated `.ts` tree.
    pub output: PathBuf,
    /// Camel-case field names.
    pub is_hump: bool,
    /// Make every interface field optional.
    pub is_optional: bool,
    /// Lint rules disabled at the top of each generated file.
    pub eslint_ignore_list: Vec<String>,
    /// Name suffix that makes a message's fields optional.
    pub request_suffix: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from("./input/"),
            output: PathBuf::from("./output/"),
            is_hump: true,
            is_optional: false,
            eslint_ignore_list: vec![
                "@typescript-eslint/no-unused-vars".to_string(),
                "@typescript-eslint/no-empty-interface".to_string(),
                "@typescript-eslint/no-namespace".to_string(),
                "max-len".to_string(),
            ],
            request_suffix: "Req".to_string(),
        }
    }
}

impl CompileOptions {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .map_err(|source| PbtsError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&json)
            .map_err(|source| PbtsError::Config { path: path.to_path_buf(), source })
    }

    /// Parser and emitter settings for a session.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            parse: ParseOptions { keep_case: !self.is_hump },
            emit: EmitOptions {
                force_optional: self.is_optional,
                request_suffix: SmolStr::new(&self.request_suffix),
                suppressions: self.eslint_ignore_list.clone(),
                ..EmitOptions::default()
            },
        }
    }
}
