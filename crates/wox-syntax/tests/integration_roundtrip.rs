//! Round-trip integration tests.
//!
//! Parsing, pretty-printing, parsing again and printing again must give
//! the same text as the first print.

use wox_syntax::diagnostic::DiagnosticSink;
use wox_syntax::pretty::PrettyPrinter;
use wox_syntax::{keywords, scan_and_parse};

/// Parse `source` and print it canonically.
fn print_canonical(source: &str) -> String {
    let mut interner = keywords::interner();
    let mut sink = DiagnosticSink::new();
    let program = scan_and_parse(source, &mut interner, &mut sink);
    assert!(
        !sink.has_errors(),
        "parse of {source:?} failed: {:?}",
        sink.diagnostics()
    );
    PrettyPrinter::new(&interner).print_program(&program)
}

fn test_roundtrip(source: &str) {
    let first = print_canonical(source);
    let second = print_canonical(&first);
    assert_eq!(first, second, "round-trip changed the printed form");
}

#[test]
fn test_roundtrip_empty_program() {
    test_roundtrip("");
}

#[test]
fn test_roundtrip_arithmetic() {
    test_roundtrip("print 1 + 2 * 3 - -4 / (5 - 6);");
    test_roundtrip("print (1 + 2) * 3;");
    test_roundtrip("print 0.5 + 10 + 1234.125;");
}

#[test]
fn test_roundtrip_scoping_forms() {
    test_roundtrip("print let x = 3 in x + 1;");
    test_roundtrip("print do { 1; 2; 3 }; print do {};");
    test_roundtrip("print if a and !b then \"yes\" else \"no\";");
}

#[test]
fn test_roundtrip_collections() {
    test_roundtrip("var t = (1, \"two\", nil); var v = [1, [2, 3], []]; print ();");
}

#[test]
fn test_roundtrip_case() {
    test_roundtrip(
        "print case x of { () then 0, (a, _) if a > 0 then a, [b] then b, n @ -1 then n, _ then 1 };",
    );
}

#[test]
fn test_roundtrip_declarations() {
    test_roundtrip(
        r#"
class Point {
    init(x, y) { this.x = x; this.y = y; }
    sum() { return this.x + this.y; }
}
class Point3 < Point {
    init(x, y, z) { super.init(x, y); this.z = z; }
    sum() { return super.sum() + this.z; }
}
class Empty {}
fn make(a) { fn inner() { return a; } return inner; }
var p = Point3(1, 2, 3);
print p.sum();
"#,
    );
}

#[test]
fn test_roundtrip_loops() {
    test_roundtrip(
        "var i = 0; while i < 3 { i = i + 1; } loop { return; } for (var j = 0; j < 2; j = j + 1) print j; for (;;) {}",
    );
    test_roundtrip("for (i = 0; i < 1;) { print i; i = i + 1; }");
}

#[test]
fn test_roundtrip_multiline_string() {
    test_roundtrip("print \"line one\nline two\";");
}

#[test]
fn test_canonical_form_is_stable() {
    assert_eq!(
        print_canonical("fn f(a,b){return a++b;}"),
        "fn f(a, b) {\n    return a ++ b;\n}\n"
    );
}
