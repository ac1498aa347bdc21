use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::error::ErrorKind;
use clap::Parser as ClapParser;
use log::info;

use lox::ast_printer::AstPrinter;
use lox::interpreter::Interpreter;
use lox::parser::Parser;
use lox::resolver::Resolver;
use lox::scanner::Scanner;
use lox::stmt::Stmt;
use lox::token::Token;

#[derive(ClapParser, Debug)]
#[command(
    name = "lox",
    version,
    about = "Tree-walking interpreter for the Lox scripting language"
)]
pub struct Cli {
    /// Script to run; starts a REPL when omitted
    script: Option<PathBuf>,

    /// Print the script's syntax tree instead of running it
    #[arg(long)]
    ast: bool,
}

enum RunStatus {
    Ok,
    StaticError,
    RuntimeError,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,

        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            return Ok(());
        }

        Err(_) => {
            eprintln!("Usage: lox [script]");
            process::exit(64);
        }
    };

    match cli.script {
        Some(path) => run_file(&path, cli.ast),
        None => run_prompt(),
    }
}

fn run_file(path: &Path, ast_only: bool) -> anyhow::Result<()> {
    info!("Running file {}", path.display());

    let source = match std::fs::read(path) {
        Ok(bytes) => bytes,

        Err(e) => {
            eprintln!("Failed to read file: {}", e);
            process::exit(64);
        }
    };

    if ast_only {
        let Some(statements) = front_end(source) else {
            process::exit(65);
        };
        println!("{}", AstPrinter::print_program(&statements));
        return Ok(());
    }

    let mut interpreter = Interpreter::new();
    match run(source, &mut interpreter) {
        RunStatus::Ok => Ok(()),
        RunStatus::StaticError => process::exit(65),
        RunStatus::RuntimeError => process::exit(70),
    }
}

fn run_prompt() -> anyhow::Result<()> {
    // One interpreter for the whole session: definitions persist across lines.
    let mut interpreter = Interpreter::new();
    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        // Errors were already reported; the prompt continues regardless.
        let _ = run(line.into_bytes(), &mut interpreter);
    }

    Ok(())
}

/// Scan and parse, reporting every lexical and syntax error to stderr.
/// Returns `None` if any stage reported an error.
fn front_end(source: Vec<u8>) -> Option<Vec<Stmt>> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut had_error = false;

    for result in Scanner::new(source) {
        match result {
            Ok(token) => tokens.push(token),

            Err(e) => {
                eprintln!("{}", e);
                had_error = true;
            }
        }
    }

    if had_error {
        return None;
    }

    let (statements, errors) = Parser::new(tokens).parse();

    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{}", e);
        }
        return None;
    }

    Some(statements)
}

/// One full pipeline pass: scan → parse → resolve → interpret.  Each stage
/// only runs if the previous one was clean.
fn run(source: Vec<u8>, interpreter: &mut Interpreter) -> RunStatus {
    let Some(statements) = front_end(source) else {
        return RunStatus::StaticError;
    };

    if let Err(e) = Resolver::new(interpreter).resolve(&statements) {
        eprintln!("{}", e);
        return RunStatus::StaticError;
    }

    if let Err(e) = interpreter.interpret(&statements) {
        eprintln!("{}", e);
        return RunStatus::RuntimeError;
    }

    RunStatus::Ok
}
