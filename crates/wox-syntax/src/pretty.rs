//! Printers that turn an AST back into text.
//!
//! - [`PrettyPrinter`] writes canonical wox source. Parsing its output and
//!   printing again gives the same text, which is what the round-trip tests
//!   rely on.
//! - [`SexprPrinter`] writes a fully parenthesized prefix form, handy for
//!   seeing exactly how an expression was grouped.
//!
//! ```
//! use wox_syntax::{keywords, lexer::Lexer, parser::Parser};
//! use wox_syntax::pretty::SexprPrinter;
//!
//! let source = "1 + 2 * 3";
//! let mut interner = keywords::interner();
//! let (tokens, _) = Lexer::new(source, &mut interner).lex();
//! let expr = Parser::new(tokens, source).parse_expression().unwrap();
//!
//! assert_eq!(SexprPrinter::new(&interner).print_expr(&expr), "(+ 1 (* 2 3))");
//! ```

use crate::ast::{CaseArm, Expr, FunctionDecl, Ident, Literal, Pattern, Program, Stmt};
use wox_mem::{StringInterner, Symbol};

/// Configuration for pretty-printing.
#[derive(Debug, Clone)]
pub struct PrettyConfig {
    /// Indentation string (e.g., "  " or "\t")
    pub indent: String,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
        }
    }
}

fn resolve(interner: &StringInterner, sym: Symbol) -> &str {
    interner.resolve(sym).unwrap_or("<unknown>")
}

fn literal_text(interner: &StringInterner, literal: Literal) -> String {
    match literal {
        Literal::Number(n) => n.to_string(),
        Literal::Str(sym) => format!("\"{}\"", resolve(interner, sym)),
        Literal::Bool(b) => b.to_string(),
        Literal::Nil => "nil".to_string(),
    }
}

/// Writes an AST as canonical wox source.
pub struct PrettyPrinter<'a> {
    /// String interner for resolving symbols
    interner: &'a StringInterner,
    /// Configuration
    config: PrettyConfig,
    /// Current indentation level
    indent_level: usize,
}

impl<'a> PrettyPrinter<'a> {
    /// Creates a printer with the default configuration.
    #[must_use]
    pub fn new(interner: &'a StringInterner) -> Self {
        Self {
            interner,
            config: PrettyConfig::default(),
            indent_level: 0,
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: PrettyConfig) -> Self {
        self.config = config;
        self
    }

    fn current_indent(&self) -> String {
        self.config.indent.repeat(self.indent_level)
    }

    fn name(&self, ident: Ident) -> &'a str {
        resolve(self.interner, ident.name)
    }

    /// Prints a whole program, one top-level statement per line.
    pub fn print_program(&mut self, program: &Program) -> String {
        let mut out = String::new();
        for stmt in &program.statements {
            out.push_str(&self.print_stmt(stmt));
            out.push('\n');
        }
        out
    }

    /// Prints a statement at the current indentation level.
    ///
    /// The first line is not indented; nested lines are.
    pub fn print_stmt(&mut self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression { expr } => format!("{};", self.print_expr(expr)),
            Stmt::Print { expr, .. } => format!("print {};", self.print_expr(expr)),
            Stmt::Var { name, initializer } => match initializer {
                Some(init) => format!("var {} = {};", self.name(*name), self.print_expr(init)),
                None => format!("var {};", self.name(*name)),
            },
            Stmt::Block { statements, .. } => self.print_block(statements),
            Stmt::Function(decl) => format!("fn {}", self.print_function(decl)),
            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                let mut out = format!("class {}", self.name(*name));
                if let Some(superclass) = superclass {
                    out.push_str(" < ");
                    out.push_str(self.name(*superclass));
                }
                if methods.is_empty() {
                    out.push_str(" {}");
                    return out;
                }

                out.push_str(" {\n");
                self.indent_level += 1;
                for method in methods {
                    out.push_str(&self.current_indent());
                    out.push_str(&self.print_function(method));
                    out.push('\n');
                }
                self.indent_level -= 1;
                out.push_str(&self.current_indent());
                out.push('}');
                out
            }
            Stmt::Return { value, .. } => match value {
                Some(value) => format!("return {};", self.print_expr(value)),
                None => "return;".to_string(),
            },
            Stmt::While {
                condition, body, ..
            } => format!("while {} {}", self.print_expr(condition), self.print_stmt(body)),
            Stmt::Loop { body, .. } => format!("loop {}", self.print_block(body)),
            Stmt::For {
                initializer,
                condition,
                increment,
                body,
                ..
            } => {
                let init = match initializer {
                    Some(init) => self.print_stmt(init),
                    None => ";".to_string(),
                };
                let mut header = init;
                if let Some(condition) = condition {
                    header.push(' ');
                    header.push_str(&self.print_expr(condition));
                }
                header.push(';');
                if let Some(increment) = increment {
                    header.push(' ');
                    header.push_str(&self.print_expr(increment));
                }
                format!("for ({header}) {}", self.print_stmt(body))
            }
        }
    }

    /// Prints `name(params) { body }` without the `fn` keyword.
    fn print_function(&mut self, decl: &FunctionDecl) -> String {
        let params = decl
            .params
            .iter()
            .map(|param| self.name(*param))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{}({params}) {}",
            self.name(decl.name),
            self.print_block(&decl.body)
        )
    }

    fn print_block(&mut self, statements: &[Stmt]) -> String {
        if statements.is_empty() {
            return "{}".to_string();
        }

        let mut out = "{\n".to_string();
        self.indent_level += 1;
        for stmt in statements {
            out.push_str(&self.current_indent());
            out.push_str(&self.print_stmt(stmt));
            out.push('\n');
        }
        self.indent_level -= 1;
        out.push_str(&self.current_indent());
        out.push('}');
        out
    }

    fn print_list(&mut self, exprs: &[Expr]) -> String {
        exprs
            .iter()
            .map(|expr| self.print_expr(expr))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Prints an expression on one line.
    pub fn print_expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Literal { value, .. } => literal_text(self.interner, *value),
            Expr::Grouping { inner, .. } => format!("({})", self.print_expr(inner)),
            Expr::Unary { op, operand, .. } => format!("{op}{}", self.print_expr(operand)),
            Expr::Binary {
                left, op, right, ..
            } => format!("{} {op} {}", self.print_expr(left), self.print_expr(right)),
            Expr::Variable { name } => self.name(*name).to_string(),
            Expr::Assign { name, value } => {
                format!("{} = {}", self.name(*name), self.print_expr(value))
            }
            Expr::Call { callee, args, .. } => {
                format!("{}({})", self.print_expr(callee), self.print_list(args))
            }
            Expr::Get { object, name } => format!("{}.{}", self.print_expr(object), self.name(*name)),
            Expr::Set {
                object,
                name,
                value,
            } => format!(
                "{}.{} = {}",
                self.print_expr(object),
                self.name(*name),
                self.print_expr(value)
            ),
            Expr::This { .. } => "this".to_string(),
            Expr::Super { method, .. } => format!("super.{}", self.name(*method)),
            Expr::Let {
                name,
                definition,
                body,
                ..
            } => format!(
                "let {} = {} in {}",
                self.name(*name),
                self.print_expr(definition),
                self.print_expr(body)
            ),
            Expr::Do { body, .. } => {
                if body.is_empty() {
                    "do {}".to_string()
                } else {
                    let parts = body
                        .iter()
                        .map(|expr| self.print_expr(expr))
                        .collect::<Vec<_>>()
                        .join("; ");
                    format!("do {{ {parts} }}")
                }
            }
            Expr::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => format!(
                "if {} then {} else {}",
                self.print_expr(condition),
                self.print_expr(then_branch),
                self.print_expr(else_branch)
            ),
            Expr::Tuple { elements, .. } => format!("({})", self.print_list(elements)),
            Expr::Vector { elements, .. } => format!("[{}]", self.print_list(elements)),
            Expr::Case {
                scrutinee, arms, ..
            } => {
                let arms = arms
                    .iter()
                    .map(|arm| self.print_arm(arm))
                    .collect::<Vec<_>>()
                    .join(", ");
                if arms.is_empty() {
                    format!("case {} of {{}}", self.print_expr(scrutinee))
                } else {
                    format!("case {} of {{ {arms} }}", self.print_expr(scrutinee))
                }
            }
        }
    }

    fn print_arm(&mut self, arm: &CaseArm) -> String {
        let pattern = self.print_pattern(&arm.pattern);
        let body = self.print_expr(&arm.body);
        match &arm.guard {
            Some(guard) => format!("{pattern} if {} then {body}", self.print_expr(guard)),
            None => format!("{pattern} then {body}"),
        }
    }

    /// Prints a pattern.
    pub fn print_pattern(&self, pattern: &Pattern) -> String {
        match pattern {
            Pattern::Unit { .. } => "()".to_string(),
            Pattern::Var { name } => self.name(*name).to_string(),
            Pattern::Literal { value, .. } => literal_text(self.interner, *value),
            Pattern::Wild { .. } => "_".to_string(),
            Pattern::At { name, pattern } => {
                format!("{} @ {}", self.name(*name), self.print_pattern(pattern))
            }
            Pattern::Tuple { elements, .. } => format!("({})", self.print_patterns(elements)),
            Pattern::Vector { elements, .. } => format!("[{}]", self.print_patterns(elements)),
        }
    }

    fn print_patterns(&self, patterns: &[Pattern]) -> String {
        patterns
            .iter()
            .map(|pattern| self.print_pattern(pattern))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Writes an AST in parenthesized prefix form, one line per top-level statement.
pub struct SexprPrinter<'a> {
    interner: &'a StringInterner,
}

impl<'a> SexprPrinter<'a> {
    /// Creates a printer.
    #[must_use]
    pub const fn new(interner: &'a StringInterner) -> Self {
        Self { interner }
    }

    fn name(&self, ident: Ident) -> &'a str {
        resolve(self.interner, ident.name)
    }

    fn parenthesize<'e>(&self, head: &str, exprs: impl IntoIterator<Item = &'e Expr>) -> String {
        let mut out = format!("({head}");
        for expr in exprs {
            out.push(' ');
            out.push_str(&self.print_expr(expr));
        }
        out.push(')');
        out
    }

    /// Prints a whole program.
    #[must_use]
    pub fn print_program(&self, program: &Program) -> String {
        let mut out = String::new();
        for stmt in &program.statements {
            out.push_str(&self.print_stmt(stmt));
            out.push('\n');
        }
        out
    }

    /// Prints a statement.
    #[must_use]
    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression { expr } => self.parenthesize("expr", [expr]),
            Stmt::Print { expr, .. } => self.parenthesize("print", [expr]),
            Stmt::Var { name, initializer } => {
                self.parenthesize(&format!("var {}", self.name(*name)), initializer)
            }
            Stmt::Block { statements, .. } => self.print_stmts("block", statements),
            Stmt::Function(decl) => self.print_function("fn", decl),
            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                let mut out = format!("(class {}", self.name(*name));
                if let Some(superclass) = superclass {
                    out.push_str(" < ");
                    out.push_str(self.name(*superclass));
                }
                for method in methods {
                    out.push(' ');
                    out.push_str(&self.print_function("method", method));
                }
                out.push(')');
                out
            }
            Stmt::Return { value, .. } => self.parenthesize("return", value),
            Stmt::While {
                condition, body, ..
            } => format!("(while {} {})", self.print_expr(condition), self.print_stmt(body)),
            Stmt::Loop { body, .. } => self.print_stmts("loop", body),
            Stmt::For {
                initializer,
                condition,
                increment,
                body,
                ..
            } => {
                let part = |expr: &Option<Expr>| {
                    expr.as_ref()
                        .map_or_else(|| "()".to_string(), |expr| self.print_expr(expr))
                };
                let init = initializer
                    .as_ref()
                    .map_or_else(|| "()".to_string(), |init| self.print_stmt(init));
                format!(
                    "(for {init} {} {} {})",
                    part(condition),
                    part(increment),
                    self.print_stmt(body)
                )
            }
        }
    }

    fn print_stmts(&self, head: &str, statements: &[Stmt]) -> String {
        let mut out = format!("({head}");
        for stmt in statements {
            out.push(' ');
            out.push_str(&self.print_stmt(stmt));
        }
        out.push(')');
        out
    }

    fn print_function(&self, head: &str, decl: &FunctionDecl) -> String {
        let params = decl
            .params
            .iter()
            .map(|param| self.name(*param))
            .collect::<Vec<_>>()
            .join(" ");
        let mut out = format!("({head} {} ({params})", self.name(decl.name));
        for stmt in &decl.body {
            out.push(' ');
            out.push_str(&self.print_stmt(stmt));
        }
        out.push(')');
        out
    }

    /// Prints an expression.
    #[must_use]
    pub fn print_expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal { value, .. } => literal_text(self.interner, *value),
            Expr::Grouping { inner, .. } => self.parenthesize("group", [inner.as_ref()]),
            Expr::Unary { op, operand, .. } => {
                self.parenthesize(&op.to_string(), [operand.as_ref()])
            }
            Expr::Binary {
                left, op, right, ..
            } => self.parenthesize(&op.to_string(), [left.as_ref(), right.as_ref()]),
            Expr::Variable { name } => self.name(*name).to_string(),
            Expr::Assign { name, value } => {
                self.parenthesize(&format!("= {}", self.name(*name)), [value.as_ref()])
            }
            Expr::Call { callee, args, .. } => {
                self.parenthesize("call", std::iter::once(callee.as_ref()).chain(args))
            }
            Expr::Get { object, name } => {
                format!("(. {} {})", self.print_expr(object), self.name(*name))
            }
            Expr::Set {
                object,
                name,
                value,
            } => format!(
                "(.= {} {} {})",
                self.print_expr(object),
                self.name(*name),
                self.print_expr(value)
            ),
            Expr::This { .. } => "this".to_string(),
            Expr::Super { method, .. } => format!("(super {})", self.name(*method)),
            Expr::Let {
                name,
                definition,
                body,
                ..
            } => self.parenthesize(
                &format!("let {}", self.name(*name)),
                [definition.as_ref(), body.as_ref()],
            ),
            Expr::Do { body, .. } => self.parenthesize("do", body),
            Expr::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => self.parenthesize(
                "if",
                [
                    condition.as_ref(),
                    then_branch.as_ref(),
                    else_branch.as_ref(),
                ],
            ),
            Expr::Tuple { elements, .. } => self.parenthesize("tuple", elements),
            Expr::Vector { elements, .. } => self.parenthesize("vector", elements),
            Expr::Case {
                scrutinee, arms, ..
            } => {
                let mut out = format!("(case {}", self.print_expr(scrutinee));
                for arm in arms {
                    out.push_str(" (");
                    out.push_str(&self.print_pattern(&arm.pattern));
                    if let Some(guard) = &arm.guard {
                        out.push_str(" if ");
                        out.push_str(&self.print_expr(guard));
                    }
                    out.push(' ');
                    out.push_str(&self.print_expr(&arm.body));
                    out.push(')');
                }
                out.push(')');
                out
            }
        }
    }

    /// Prints a pattern.
    #[must_use]
    pub fn print_pattern(&self, pattern: &Pattern) -> String {
        let list = |head: &str, elements: &[Pattern]| {
            let mut out = format!("({head}");
            for element in elements {
                out.push(' ');
                out.push_str(&self.print_pattern(element));
            }
            out.push(')');
            out
        };

        match pattern {
            Pattern::Unit { .. } => "()".to_string(),
            Pattern::Var { name } => self.name(*name).to_string(),
            Pattern::Literal { value, .. } => literal_text(self.interner, *value),
            Pattern::Wild { .. } => "_".to_string(),
            Pattern::At { name, pattern } => {
                format!("(@ {} {})", self.name(*name), self.print_pattern(pattern))
            }
            Pattern::Tuple { elements, .. } => list("tuple", elements),
            Pattern::Vector { elements, .. } => list("vector", elements),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn parse(source: &str, interner: &mut StringInterner) -> Program {
        let (tokens, _) = Lexer::new(source, interner).lex();
        let mut parser = Parser::new(tokens, source);
        let program = parser.parse_program();
        assert!(!parser.has_errors(), "{:?}", parser.errors());
        program
    }

    fn pretty(source: &str) -> String {
        let mut interner = keywords::interner();
        let program = parse(source, &mut interner);
        PrettyPrinter::new(&interner).print_program(&program)
    }

    fn sexpr(source: &str) -> String {
        let mut interner = keywords::interner();
        let program = parse(source, &mut interner);
        SexprPrinter::new(&interner).print_program(&program)
    }

    #[test]
    fn test_pretty_expressions() {
        assert_eq!(pretty("1+2*3"), "1 + 2 * 3;\n");
        assert_eq!(pretty("(1+2)*3"), "(1 + 2) * 3;\n");
        assert_eq!(pretty("-x"), "-x;\n");
        assert_eq!(pretty("a++\"b\""), "a ++ \"b\";\n");
        assert_eq!(pretty("f(1,2).g"), "f(1, 2).g;\n");
        assert_eq!(pretty("let x=1 in x"), "let x = 1 in x;\n");
        assert_eq!(pretty("do{1;2;}"), "do { 1; 2 };\n");
        assert_eq!(pretty("do{}"), "do {};\n");
        assert_eq!(pretty("(1,2.5)"), "(1, 2.5);\n");
        assert_eq!(pretty("[ ]"), "[];\n");
        assert_eq!(pretty("()"), "nil;\n");
    }

    #[test]
    fn test_pretty_case() {
        assert_eq!(
            pretty("case v of{(a,_) if a>1 then a,[x]then x,n@-1 then n,}"),
            "case v of { (a, _) if a > 1 then a, [x] then x, n @ -1 then n };\n"
        );
    }

    #[test]
    fn test_pretty_statements() {
        let source = "class B<A{init(x){this.x=x;}m(){}} fn f(a,b){(a);print b;return;}";
        assert_eq!(
            pretty(source),
            "class B < A {\n    init(x) {\n        this.x = x;\n    }\n    m() {}\n}\n\
             fn f(a, b) {\n    (a);\n    print b;\n    return;\n}\n"
        );
    }

    #[test]
    fn test_pretty_loops() {
        assert_eq!(
            pretty("for(var i=0;i<3;i=i+1)print i; for(;;){} while x {x=false;}"),
            "for (var i = 0; i < 3; i = i + 1) print i;\nfor (;;) {}\nwhile x {\n    x = false;\n}\n"
        );
    }

    #[test]
    fn test_pretty_custom_indent() {
        let mut interner = keywords::interner();
        let program = parse("loop { return 1; }", &mut interner);
        let text = PrettyPrinter::new(&interner)
            .with_config(PrettyConfig {
                indent: "\t".to_string(),
            })
            .print_program(&program);
        assert_eq!(text, "loop {\n\treturn 1;\n}\n");
    }

    #[test]
    fn test_sexpr_expressions() {
        assert_eq!(sexpr("1 + 2 * 3"), "(expr (+ 1 (* 2 3)))\n");
        assert_eq!(sexpr("(1 + 2) * 3"), "(expr (* (group (+ 1 2)) 3))\n");
        assert_eq!(sexpr("(1, \"a\", nil)"), "(expr (tuple 1 \"a\" nil))\n");
        assert_eq!(sexpr("f(x)"), "(expr (call f x))\n");
        assert_eq!(sexpr("a.b = !c"), "(expr (.= a b (! c)))\n");
    }

    #[test]
    fn test_sexpr_statements() {
        assert_eq!(sexpr("var x = 1;"), "(var x 1)\n");
        assert_eq!(sexpr("var x;"), "(var x)\n");
        assert_eq!(sexpr("fn f(a, b) { return a; }"), "(fn f (a b) (return a))\n");
        assert_eq!(
            sexpr("case p of { (x, _) then x }"),
            "(expr (case p ((tuple x _) x)))\n"
        );
    }
}
