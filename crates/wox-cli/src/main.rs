//! `wox`: run a wox script, or start a REPL when no script is given.
//!
//! Exit status follows `sysexits.h`: 64 for bad usage, 65 when the script
//! has a syntax error, 70 when it fails at runtime, 74 when it cannot be
//! read.

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use wox_interpreter::Interpreter;
use wox_log::Level;
use wox_syntax::diagnostic::{DiagnosticSink, Emitter};
use wox_syntax::pretty::{PrettyPrinter, SexprPrinter};
use wox_syntax::scan_and_parse;

const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;
const EX_SOFTWARE: u8 = 70;
const EX_IOERR: u8 = 74;

/// wox is a small expression-oriented scripting language with classes,
/// closures and pattern matching.
#[derive(Parser, Debug)]
#[command(name = "wox", version, about, long_about = None)]
struct Args {
    /// Script to run. Starts an interactive prompt when omitted.
    script: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace. Overrides WOX_LOG.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<Level>,

    /// Disable colored diagnostics. NO_COLOR in the environment does the same.
    #[arg(long)]
    no_color: bool,

    /// Print the parsed program instead of running it.
    #[arg(long, value_enum, value_name = "FORMAT")]
    dump_ast: Option<AstFormat>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum AstFormat {
    /// Canonical wox source
    Pretty,
    /// Parenthesized prefix form
    Sexpr,
}

/// One interpreter and its diagnostics, shared by every unit of input.
struct Session {
    interp: Interpreter<io::Stdout>,
    sink: DiagnosticSink,
    emitter: Emitter,
    dump_ast: Option<AstFormat>,
}

impl Session {
    fn new(emitter: Emitter, dump_ast: Option<AstFormat>) -> Self {
        Self {
            interp: Interpreter::new(io::stdout()),
            sink: DiagnosticSink::new(),
            emitter,
            dump_ast,
        }
    }

    fn run(&mut self, source: &str) {
        match self.dump_ast {
            Some(format) => self.dump(source, format),
            None => self.interp.run(source, &mut self.sink),
        }
        self.report(source);
    }

    fn dump(&mut self, source: &str, format: AstFormat) {
        let program = scan_and_parse(source, self.interp.interner_mut(), &mut self.sink);
        let interner = self.interp.interner();
        let text = match format {
            AstFormat::Pretty => PrettyPrinter::new(interner).print_program(&program),
            AstFormat::Sexpr => SexprPrinter::new(interner).print_program(&program),
        };
        print!("{text}");
        if !text.ends_with('\n') && !text.is_empty() {
            println!();
        }
    }

    /// Renders and drops the diagnostics collected so far. The error flags
    /// stay set.
    fn report(&mut self, source: &str) {
        let diagnostics = self.sink.take();
        if diagnostics.is_empty() {
            return;
        }
        let mut stderr = io::stderr().lock();
        if let Err(err) = self.emitter.emit_all(&diagnostics, source, &mut stderr) {
            wox_log::error!("failed to write diagnostics: {err}");
        }
    }
}

fn run_file(path: &Path, mut session: Session) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read '{}': {err}", path.display());
            return ExitCode::from(EX_IOERR);
        }
    };

    wox_log::info!("running {}", path.display());
    session.run(&source);

    if session.sink.had_syntax_error() {
        ExitCode::from(EX_DATAERR)
    } else if session.sink.had_runtime_error() {
        ExitCode::from(EX_SOFTWARE)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_prompt(mut session: Session) -> ExitCode {
    wox_log::info!("starting interactive session");
    let mut lines = io::stdin().lock().lines();

    loop {
        print!("> ");
        if let Err(err) = io::stdout().flush() {
            wox_log::error!("cannot write prompt: {err}");
            return ExitCode::from(EX_IOERR);
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(err)) => {
                eprintln!("error: {err}");
                return ExitCode::from(EX_IOERR);
            }
            None => {
                println!();
                break;
            }
        };

        if line.starts_with(":q") || line.starts_with(":Q") {
            println!("Quitting...");
            break;
        }

        session.run(&line);
        session.sink.reset();
    }

    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EX_USAGE),
            };
        }
    };

    wox_log::init_from_env();
    if let Some(level) = args.log_level {
        wox_log::set_level(level);
    }

    let use_colors = !args.no_color && std::env::var_os("NO_COLOR").is_none();
    wox_log::get_logger().set_colors(use_colors);

    let session = Session::new(Emitter::new(use_colors), args.dump_ast);
    match &args.script {
        Some(path) => run_file(path, session),
        None => run_prompt(session),
    }
}
