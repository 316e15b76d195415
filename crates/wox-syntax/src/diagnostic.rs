//! Diagnostic collection and rendering.
//!
//! Scanner, parser and evaluator never print. They hand their errors to a
//! [`DiagnosticSink`], which keeps them in order together with two sticky
//! flags the driver uses to pick an exit status. An [`Emitter`] renders the
//! collected diagnostics with the offending source line underlined.

use crate::error::{LexerError, ParserError, SyntaxError};
use crate::span::{Span, Spanned};
use std::fmt;
use std::io::{self, Write};

/// A diagnostic message (error, warning, note, or help).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic level
    pub level: DiagnosticLevel,
    /// Error code (e.g. "E0201")
    pub code: Option<String>,
    /// Primary message
    pub message: String,
    /// Source span
    pub span: Span,
    /// Optional suggestions
    pub suggestions: Vec<String>,
    /// Related notes
    pub notes: Vec<DiagnosticNote>,
}

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// Error: the current unit does not run (or stops running)
    Error,
    /// Warning: suspicious code
    Warning,
    /// Note: additional information
    Note,
    /// Help: suggestion for fixing the issue
    Help,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Note => write!(f, "note"),
            Self::Help => write!(f, "help"),
        }
    }
}

impl DiagnosticLevel {
    /// Returns the ANSI color code for this level.
    #[must_use]
    pub const fn color_code(&self) -> &'static str {
        match self {
            Self::Error => "\x1b[31m",
            Self::Warning => "\x1b[33m",
            Self::Note => "\x1b[36m",
            Self::Help => "\x1b[32m",
        }
    }

    /// Returns the reset ANSI code.
    #[must_use]
    pub const fn reset_code() -> &'static str {
        "\x1b[0m"
    }

    /// Formats this level with colors if enabled.
    #[must_use]
    pub fn format_colored(&self, use_colors: bool) -> String {
        if use_colors {
            format!("{}{}{}", self.color_code(), self, Self::reset_code())
        } else {
            self.to_string()
        }
    }
}

/// A note attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticNote {
    /// Note message
    pub message: String,
    /// Source span
    pub span: Span,
}

/// Builder for creating diagnostics.
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    /// Creates a new diagnostic builder.
    #[must_use]
    pub fn new(level: DiagnosticLevel, message: impl Into<String>, span: Span) -> Self {
        Self {
            diagnostic: Diagnostic {
                level,
                code: None,
                message: message.into(),
                span,
                suggestions: Vec::new(),
                notes: Vec::new(),
            },
        }
    }

    /// Shorthand for an error-level builder.
    #[must_use]
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticLevel::Error, message, span)
    }

    /// Adds an error code to the diagnostic.
    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.diagnostic.code = Some(code.into());
        self
    }

    /// Adds a suggestion to the diagnostic.
    #[must_use]
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.diagnostic.suggestions.push(suggestion.into());
        self
    }

    /// Adds a note to the diagnostic.
    #[must_use]
    pub fn note(mut self, message: impl Into<String>, span: Span) -> Self {
        self.diagnostic.notes.push(DiagnosticNote {
            message: message.into(),
            span,
        });
        self
    }

    /// Builds the diagnostic.
    #[must_use]
    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }
}

/// Conversion of an error value into a [`Diagnostic`].
///
/// Implemented here for the syntax errors and by the interpreter for its
/// runtime errors, so one sink serves both phases.
pub trait IntoDiagnostic {
    /// Builds the diagnostic describing `self`.
    fn to_diagnostic(&self) -> Diagnostic;
}

impl IntoDiagnostic for LexerError {
    fn to_diagnostic(&self) -> Diagnostic {
        DiagnosticBuilder::error(self.to_string(), self.span())
            .code(self.code())
            .build()
    }
}

impl IntoDiagnostic for ParserError {
    fn to_diagnostic(&self) -> Diagnostic {
        let builder = DiagnosticBuilder::error(self.to_string(), self.span()).code(self.code());
        let builder = match self {
            Self::InvalidAssignmentTarget { .. } => {
                builder.suggest("only a variable or a property can be assigned to")
            }
            Self::TooManyItems { .. } => builder.suggest("group related values in a tuple or vector"),
            _ => builder,
        };
        builder.build()
    }
}

impl IntoDiagnostic for SyntaxError {
    fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Lexer(err) => err.to_diagnostic(),
            Self::Parser(err) => err.to_diagnostic(),
        }
    }
}

/// Ordered record of everything reported while handling one unit of source.
///
/// The two flags are sticky: once set they stay set until [`reset`](Self::reset),
/// which the REPL calls after every line.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    had_syntax_error: bool,
    had_runtime_error: bool,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a scanner error.
    pub fn report_lexer(&mut self, error: &LexerError) {
        self.had_syntax_error = true;
        self.push(error.to_diagnostic());
    }

    /// Records a parser error.
    pub fn report_parser(&mut self, error: &ParserError) {
        self.had_syntax_error = true;
        self.push(error.to_diagnostic());
    }

    /// Records a runtime error.
    pub fn report_runtime(&mut self, error: &impl IntoDiagnostic) {
        self.had_runtime_error = true;
        self.push(error.to_diagnostic());
    }

    /// Records a diagnostic without touching either flag.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        wox_log::debug!("diagnostic: {}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    /// Returns `true` once a scanner or parser error has been reported.
    #[must_use]
    pub const fn had_syntax_error(&self) -> bool {
        self.had_syntax_error
    }

    /// Returns `true` once a runtime error has been reported.
    #[must_use]
    pub const fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Returns `true` if either flag is set.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.had_syntax_error || self.had_runtime_error
    }

    /// Everything reported so far, in order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Removes and returns the recorded diagnostics, leaving the flags set.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Clears both flags and all recorded diagnostics.
    pub fn reset(&mut self) {
        self.diagnostics.clear();
        self.had_syntax_error = false;
        self.had_runtime_error = false;
    }
}

/// Renders diagnostics with source highlighting.
///
/// ```
/// use wox_syntax::diagnostic::{DiagnosticBuilder, Emitter};
/// use wox_syntax::span::Span;
///
/// let diagnostic = DiagnosticBuilder::error("unbound variable 'y'", Span::new(6, 7, 1, 7))
///     .code("E0301")
///     .build();
///
/// let mut out = Vec::new();
/// Emitter::new(false).emit(&diagnostic, "print y;", &mut out).unwrap();
/// let text = String::from_utf8(out).unwrap();
///
/// assert!(text.starts_with("[line 1, column 7] error[E0301]: unbound variable 'y'"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Emitter {
    use_colors: bool,
}

impl Emitter {
    /// Creates an emitter.
    #[must_use]
    pub const fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Writes one diagnostic.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn emit(&self, diagnostic: &Diagnostic, source: &str, out: &mut impl Write) -> io::Result<()> {
        let span = diagnostic.span;
        let level = diagnostic.level.format_colored(self.use_colors);

        match &diagnostic.code {
            Some(code) => writeln!(out, "[{span}] {level}[{code}]: {}", diagnostic.message)?,
            None => writeln!(out, "[{span}] {level}: {}", diagnostic.message)?,
        }

        self.emit_source_highlight(diagnostic.level, span, source, out)?;

        for suggestion in &diagnostic.suggestions {
            let help = DiagnosticLevel::Help.format_colored(self.use_colors);
            writeln!(out, "     = {help}: {suggestion}")?;
        }

        for note in &diagnostic.notes {
            let prefix = DiagnosticLevel::Note.format_colored(self.use_colors);
            writeln!(out, "     = {prefix} at {}: {}", note.span, note.message)?;
        }

        Ok(())
    }

    /// Writes every diagnostic in order.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn emit_all<'a>(
        &self,
        diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
        source: &str,
        out: &mut impl Write,
    ) -> io::Result<()> {
        for diagnostic in diagnostics {
            self.emit(diagnostic, source, out)?;
        }
        Ok(())
    }

    /// Writes the line containing the start of `span` and underlines the
    /// span's first line.
    fn emit_source_highlight(
        &self,
        level: DiagnosticLevel,
        span: Span,
        source: &str,
        out: &mut impl Write,
    ) -> io::Result<()> {
        let Some(line) = source.lines().nth(span.line.saturating_sub(1)) else {
            return Ok(());
        };

        writeln!(out, "{:4} | {line}", span.line)?;

        let indent = span.column.saturating_sub(1);
        let remaining = line.chars().count().saturating_sub(indent);
        let highlighted = source
            .get(span.start..span.end)
            .map_or(0, |text| text.lines().next().map_or(0, |first| first.chars().count()));
        let width = highlighted.min(remaining).max(1);

        let carets = "^".repeat(width);
        if self.use_colors {
            writeln!(
                out,
                "     | {}{}{carets}{}",
                " ".repeat(indent),
                level.color_code(),
                DiagnosticLevel::reset_code()
            )
        } else {
            writeln!(out, "     | {}{carets}", " ".repeat(indent))
        }
    }
}
