//! Block renderers. Each returns a block ending in a blank line, so blocks
//! concatenate directly.

use std::fmt::Write;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::warn;

use crate::base::FileKey;
use crate::schema::Enum;

use super::ResolvedMember;

/// Render a comment as `//` lines, each prefixed with `indent`.
pub fn render_comment(comment: &str, indent: &str) -> String {
    comment
        .split('\n')
        .map(|line| comment_line(indent, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn comment_line(indent: &str, line: &str) -> String {
    let line = line.trim_end();
    if line.is_empty() {
        format!("{indent}//")
    } else {
        format!("{indent}// {line}")
    }
}

/// A comment placed after a member on the same line; continuation lines
/// start on their own lines at the member's indentation.
fn trailing_comment(comment: Option<&str>, indent: &str) -> String {
    let Some(comment) = comment else {
        return String::new();
    };
    let mut lines = comment.split('\n');
    let mut out = String::new();
    if let Some(first) = lines.next() {
        out.push(' ');
        out.push_str(comment_line("", first).as_str());
    }
    for line in lines {
        out.push('\n');
        out.push_str(&comment_line(indent, line));
    }
    out
}

fn leading_comment(comment: Option<&str>) -> String {
    comment.map_or_else(String::new, |c| format!("{}\n", render_comment(c, "")))
}

/// `export interface Name { ... }`
pub fn render_interface(
    name: &str,
    comment: Option<&str>,
    members: &[ResolvedMember],
    optional: bool,
    indent: &str,
) -> String {
    let marker = if optional { "?" } else { "" };
    let mut out = leading_comment(comment);
    let _ = writeln!(out, "export interface {name} {{");
    for member in members {
        let _ = writeln!(
            out,
            "{indent}{}{marker}: {};{}",
            member.name,
            member.rendered_type(),
            trailing_comment(member.comment.as_deref(), indent),
        );
    }
    out.push_str("}\n\n");
    out
}

/// `export enum Name { ... }`
pub fn render_enum(name: &str, e: &Enum, indent: &str) -> String {
    let mut out = leading_comment(e.comment.as_deref());
    let _ = writeln!(out, "export enum {name} {{");
    for (member, value) in &e.values {
        let _ = writeln!(
            out,
            "{indent}{member} = {},{}",
            value.value,
            trailing_comment(value.comment.as_deref(), indent),
        );
    }
    out.push_str("}\n\n");
    out
}

/// One `export type Method = (params: Req) => Promise<Res>;` per rpc,
/// separated by blank lines.
pub fn render_service(methods: &[ResolvedMember]) -> String {
    methods
        .iter()
        .map(|method| {
            format!(
                "{}export type {} = {};\n\n",
                leading_comment(method.comment.as_deref()),
                method.name,
                method.ty,
            )
        })
        .collect()
}

/// Wrap rendered content in `export namespace Name { ... }`, indenting every
/// line one level, blank ones included. The indent left dangling after the
/// final newline is dropped so the closing brace sits at column zero.
pub fn render_namespace(name: &str, content: &str, indent: &str) -> String {
    let mut body = String::new();
    if !content.is_empty() {
        body.push_str(indent);
        body.push_str(&content.replace('\n', &format!("\n{indent}")));
        if body.ends_with(&format!("\n{indent}")) {
            body.truncate(body.len() - indent.len());
        } else {
            body.push('\n');
        }
    }

    format!("export namespace {name} {{\n{body}}}\n\n")
}

/// `import * as alias from './path';` per import, then a blank line, then
/// `content`.
///
/// Imports whose stems coincide produce the same alias; each clash is
/// logged at `warn` level.
pub fn render_imports(imports: &[impl AsRef<str>], content: &str) -> String {
    for (alias, first, second) in alias_collisions(imports) {
        warn!(%alias, first, second, "imports share an alias");
    }

    let mut out = String::new();
    for import in imports {
        let key = FileKey::new(import.as_ref());
        let _ = writeln!(out, "import * as {} from './{}';", key.alias(), key.without_extension());
    }
    out.push('\n');
    out.push_str(content);
    out
}

/// Pairs of imports that map to the same alias, as `(alias, earlier, later)`.
pub(crate) fn alias_collisions<'a>(
    imports: &'a [impl AsRef<str>],
) -> Vec<(SmolStr, &'a str, &'a str)> {
    let mut seen: FxHashMap<SmolStr, &str> = FxHashMap::default();
    let mut collisions = Vec::new();
    for import in imports {
        let import = import.as_ref();
        let alias = FileKey::new(import).alias();
        if let Some(&earlier) = seen.get(&alias) {
            collisions.push((alias, earlier, import));
        } else {
            seen.insert(alias, import);
        }
    }
    collisions
}

/// Prefix `content` with one `eslint-disable` directive per rule.
pub fn render_header(suppressions: &[String], content: &str) -> String {
    if suppressions.is_empty() {
        return content.to_string();
    }
    let mut out = String::new();
    for rule in suppressions {
        let _ = writeln!(out, "/* eslint-disable {rule} */");
    }
    out.push_str(content);
    out
}
