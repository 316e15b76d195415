//! Integration tests for end-to-end parsing.
//!
//! Tests the full pipeline: source -> lexer -> parser -> AST

use wox_syntax::ast::{BinaryOp, Expr, Literal, Pattern, Program, Stmt};
use wox_syntax::diagnostic::DiagnosticSink;
use wox_syntax::{keywords, scan_and_parse};

fn parse_source(source: &str) -> (Program, DiagnosticSink) {
    let mut interner = keywords::interner();
    let mut sink = DiagnosticSink::new();
    let program = scan_and_parse(source, &mut interner, &mut sink);
    (program, sink)
}

fn parse_clean(source: &str) -> Program {
    let (program, sink) = parse_source(source);
    assert!(
        !sink.has_errors(),
        "unexpected diagnostics: {:?}",
        sink.diagnostics()
    );
    program
}

#[test]
fn test_parse_empty_program() {
    assert!(parse_clean("").is_empty());
    assert!(parse_clean("// nothing but a comment\n").is_empty());
}

#[test]
fn test_parse_script() {
    let source = r#"
class Animal {
    init(name) {
        this.name = name;
    }

    speak() {
        return this.name ++ " makes a sound";
    }
}

class Dog < Animal {
    speak() {
        return super.speak() ++ " (woof)";
    }
}

fn describe(v) {
    return case v of {
        () then "unit",
        (a, b) if a == b then "pair of equals",
        (a, b) then "pair",
        [] then "empty",
        [x] then "singleton",
        all @ [_, _] then "two",
        _ then "something else",
    };
}

var d = Dog("rex");
print d.speak();
print describe((1, 1));
"#;

    let program = parse_clean(source);
    assert_eq!(program.statements.len(), 6);
    assert!(matches!(program.statements[0], Stmt::Class { superclass: None, .. }));
    assert!(matches!(program.statements[1], Stmt::Class { superclass: Some(_), .. }));
    assert!(matches!(program.statements[2], Stmt::Function(_)));
    assert!(matches!(program.statements[3], Stmt::Var { .. }));
}

#[test]
fn test_parse_expression_forms() {
    let program = parse_clean(
        "let x = 3 in x + 1; do { 1; 2; 3 }; if a then b else c; (1, 2); [1, 2, 3]; ();",
    );
    let exprs: Vec<&Expr> = program
        .statements
        .iter()
        .map(|stmt| match stmt {
            Stmt::Expression { expr } => expr,
            other => panic!("expected expression statement, got {other:?}"),
        })
        .collect();

    assert!(matches!(exprs[0], Expr::Let { .. }));
    assert!(matches!(exprs[1], Expr::Do { body, .. } if body.len() == 3));
    assert!(matches!(exprs[2], Expr::If { .. }));
    assert!(matches!(exprs[3], Expr::Tuple { elements, .. } if elements.len() == 2));
    assert!(matches!(exprs[4], Expr::Vector { elements, .. } if elements.len() == 3));
    assert!(matches!(
        exprs[5],
        Expr::Literal {
            value: Literal::Nil,
            ..
        }
    ));
}

#[test]
fn test_precedence_ladder() {
    let program = parse_clean("a = b or c and d == e < f + g * -h;");
    let Stmt::Expression {
        expr: Expr::Assign { value, .. },
    } = &program.statements[0]
    else {
        panic!("expected assignment");
    };

    let mut ops = Vec::new();
    let mut current = value.as_ref();
    while let Expr::Binary { op, right, .. } = current {
        ops.push(*op);
        current = right.as_ref();
    }
    assert_eq!(
        ops,
        vec![
            BinaryOp::Or,
            BinaryOp::And,
            BinaryOp::Eq,
            BinaryOp::Lt,
            BinaryOp::Add,
            BinaryOp::Mul,
        ]
    );
    assert!(matches!(current, Expr::Unary { .. }));
}

#[test]
fn test_nested_patterns() {
    let program = parse_clean("case v of { outer @ (a, [b, _], -2.5) then a }");
    let Stmt::Expression {
        expr: Expr::Case { arms, .. },
    } = &program.statements[0]
    else {
        panic!("expected case");
    };
    let Pattern::At { pattern, .. } = &arms[0].pattern else {
        panic!("expected as-pattern");
    };
    let Pattern::Tuple { elements, .. } = pattern.as_ref() else {
        panic!("expected tuple pattern");
    };
    assert!(matches!(elements[0], Pattern::Var { .. }));
    assert!(matches!(elements[1], Pattern::Vector { ref elements, .. } if elements.len() == 2));
    assert!(matches!(
        elements[2],
        Pattern::Literal {
            value: Literal::Number(n),
            ..
        } if n == -2.5
    ));
}

#[test]
fn test_lexer_and_parser_errors_both_reported() {
    let (program, sink) = parse_source("print 1 # 2;\nprint \"open");
    assert!(sink.had_syntax_error());
    assert!(!sink.had_runtime_error());

    let codes: Vec<_> = sink
        .diagnostics()
        .iter()
        .filter_map(|d| d.code.as_deref())
        .collect();
    assert_eq!(codes, vec!["E0101", "E0102", "E0202"]);
    assert_eq!(program.statements.len(), 2);
}

#[test]
fn test_recovery_keeps_later_declarations() {
    let (program, sink) = parse_source(
        "fn broken( { }\nvar ok = 1;\nclass { }\nprint ok;\nfn fine() { return ok; }",
    );
    assert!(sink.had_syntax_error());
    let kinds: Vec<_> = program
        .statements
        .iter()
        .map(|stmt| match stmt {
            Stmt::Var { .. } => "var",
            Stmt::Print { .. } => "print",
            Stmt::Function(_) => "fn",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["var", "print", "fn"]);
}

#[test]
fn test_error_positions() {
    let (_, sink) = parse_source("print 1;\nprint 2 +;\n");
    let diagnostic = &sink.diagnostics()[0];
    assert_eq!(diagnostic.code.as_deref(), Some("E0202"));
    assert_eq!((diagnostic.span.line, diagnostic.span.column), (2, 10));
}

#[test]
fn test_interner_is_shared_across_units() {
    let mut interner = keywords::interner();
    let mut sink = DiagnosticSink::new();

    let first = scan_and_parse("var counter = 0;", &mut interner, &mut sink);
    let second = scan_and_parse("counter = counter + 1;", &mut interner, &mut sink);

    let Stmt::Var { name, .. } = &first.statements[0] else {
        panic!("expected var");
    };
    let Stmt::Expression {
        expr: Expr::Assign { name: assigned, .. },
    } = &second.statements[0]
    else {
        panic!("expected assignment");
    };
    assert_eq!(name.name, assigned.name);
}
