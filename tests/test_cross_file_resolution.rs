//! Resolution of type references across files sharing one session.

use std::sync::atomic::{AtomicUsize, Ordering};

use pbts::{
    CompileSession, FileKey, FileOutput, ParseError, ParseOptions, ParsedFile, PbtsError,
    ProtoFileParser, ProtoParser, SessionOptions, SourceSet,
};

/// Counts how often the parser runs.
#[derive(Default)]
struct CountingParser {
    calls: AtomicUsize,
}

impl ProtoParser for CountingParser {
    fn parse(&self, source: &str, options: ParseOptions) -> Result<ParsedFile, ParseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ProtoFileParser.parse(source, options)
    }
}

fn compile(session: &mut CompileSession<ProtoFileParser, &SourceSet>, file: &str) -> String {
    match session.compile(&FileKey::new(file)).unwrap() {
        FileOutput::Complete(text) => text.to_string(),
        FileOutput::Pending => panic!("{file} unexpectedly pending"),
    }
}

fn session(sources: &SourceSet) -> CompileSession<ProtoFileParser, &SourceSet> {
    CompileSession::new(ProtoFileParser, sources, SessionOptions::default())
}

#[test]
fn test_import_settles_colliding_name() {
    let sources = SourceSet::new();
    sources.insert("c.proto", "package c;\nmessage Foo { string x = 1; }");
    sources.insert("b.proto", "package b;\nmessage Foo { int32 y = 1; }");
    sources.insert("a.proto", "package a;\nimport \"b.proto\";\nmessage A { Foo foo = 1; }");

    let mut session = session(&sources);
    compile(&mut session, "c.proto");
    let out = compile(&mut session, "a.proto");

    assert_eq!(
        out,
        "import * as b from './b';\n\nexport interface A {\n  foo: b.Foo;\n}\n"
    );
}

#[test]
fn test_unique_name_from_import() {
    let sources = SourceSet::new();
    sources.insert("common/money.proto", "package common;\nmessage Money { int64 cents = 1; }");
    sources.insert(
        "shop/order.proto",
        "package shop;\nimport \"common/money.proto\";\nmessage Order { repeated Money items = 1; }",
    );

    let out = compile(&mut session(&sources), "shop/order.proto");

    assert_eq!(
        out,
        "import * as money from './common/money';\n\nexport interface Order {\n  items: money.Money[];\n}\n"
    );
}

#[test]
fn test_nested_reference_through_import() {
    let sources = SourceSet::new();
    sources.insert("b.proto", "package b;\nmessage Outer { message Inner {} }");
    sources.insert("a.proto", "package a;\nimport \"b.proto\";\nmessage A { Outer.Inner i = 1; }");

    let out = compile(&mut session(&sources), "a.proto");
    assert!(out.contains("  i: b.Outer.Inner;\n"), "{out}");
}

#[test]
fn test_local_declaration_shadows_import() {
    let sources = SourceSet::new();
    sources.insert("b.proto", "package b;\nmessage Foo {}");
    sources.insert(
        "a.proto",
        "package a;\nimport \"b.proto\";\nmessage Foo {}\nmessage A { Foo foo = 1; }",
    );

    let out = compile(&mut session(&sources), "a.proto");
    assert!(out.contains("  foo: Foo;\n"), "{out}");
}

#[test]
fn test_same_file_parsed_once() {
    let sources = SourceSet::new();
    sources.insert("b.proto", "package b;\nmessage B {}");
    sources.insert("a.proto", "package a;\nimport \"b.proto\";\nmessage A { B b = 1; }");

    let parser = CountingParser::default();
    let mut session = CompileSession::new(&parser, &sources, SessionOptions::default());

    let first = session.compile(&FileKey::new("b.proto")).unwrap();
    session.compile(&FileKey::new("a.proto")).unwrap();
    let second = session.compile(&FileKey::new("b.proto")).unwrap();

    assert_eq!(first, second);
    assert_eq!(parser.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_import_cycle_terminates() {
    let sources = SourceSet::new();
    sources.insert("a.proto", "package a;\nimport \"b.proto\";\nmessage A { B b = 1; }");
    sources.insert("b.proto", "package b;\nimport \"a.proto\";\nmessage B { A a = 1; }");

    let mut session = session(&sources);
    let a = compile(&mut session, "a.proto");
    let b = compile(&mut session, "b.proto");

    assert_eq!(a, "import * as b from './b';\n\nexport interface A {\n  b: b.B;\n}\n");
    assert_eq!(b, "import * as a from './a';\n\nexport interface B {\n  a: a.A;\n}\n");
}

#[test]
fn test_cycle_completes_both_files() {
    let sources = SourceSet::new();
    sources.insert("a.proto", "package a;\nimport \"b.proto\";\nmessage A {}");
    sources.insert("b.proto", "package b;\nimport \"a.proto\";\nmessage B {}");

    let mut session = session(&sources);
    compile(&mut session, "a.proto");

    assert!(session.cache().is_done(&FileKey::new("a.proto")));
    assert!(session.cache().is_done(&FileKey::new("b.proto")));
    assert_eq!(session.cache().len(), 2);
}

#[test]
fn test_unknown_type_fails_run() {
    let sources = SourceSet::new();
    sources.insert("a.proto", "package a;\nmessage A { Bogus b = 1; }");

    let err = session(&sources).compile(&FileKey::new("a.proto")).unwrap_err();
    assert!(matches!(
        err,
        PbtsError::UnresolvedType { ref path, ref source }
            if path.as_str() == "a.proto" && source.token == "Bogus"
    ));
}

#[test]
fn test_ambiguous_name_without_import_fails() {
    let sources = SourceSet::new();
    sources.insert("b.proto", "package b;\nmessage Foo {}");
    sources.insert("c.proto", "package c;\nmessage Foo {}");
    sources.insert("a.proto", "package a;\nmessage A { Foo foo = 1; }");

    let mut session = session(&sources);
    compile(&mut session, "b.proto");
    compile(&mut session, "c.proto");

    let err = session.compile(&FileKey::new("a.proto")).unwrap_err();
    assert_eq!(err.unresolved_token(), Some("Foo"));
}

#[test]
fn test_file_without_package_stays_private() {
    let sources = SourceSet::new();
    sources.insert("b.proto", "message Hidden {}");
    sources.insert("a.proto", "package a;\nimport \"b.proto\";\nmessage A { Hidden h = 1; }");

    let err = session(&sources).compile(&FileKey::new("a.proto")).unwrap_err();
    assert_eq!(err.unresolved_token(), Some("Hidden"));
}

#[test]
fn test_non_proto_import_is_not_compiled() {
    let sources = SourceSet::new();
    sources.insert("a.proto", "package a;\nimport \"google/api/annotations\";\nmessage A {}");

    let out = compile(&mut session(&sources), "a.proto");
    assert_eq!(
        out,
        "import * as annotations from './google/api/annotations';\n\nexport interface A {\n}\n"
    );
}
