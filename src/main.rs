use std::{env, fs, process};

// Declaring crate-level modules
mod bytecode;
mod checker;
mod compiler;
mod errors;
mod lexer;
mod parser;
mod types;
mod virtual_machine;

#[cfg(test)]
mod tests;

use checker::TypeChecker;
use compiler::symbols::SymbolTable;
use compiler::Compiler;
use errors::CompilePhase;
use lexer::Lexer;
use parser::Parser;
use types::TypeRegistry;
use virtual_machine::VirtualMachine;

/// The types of results the interpreter can return.
pub enum InterpretResult {
    Ok,
    ParseError,
    CompileError,
    RuntimeError,
}

fn main() {
    // structure: tern <filename>
    let args = env::args().collect::<Vec<String>>();

    match args.as_slice() {
        [_, file] => run_file(file),
        _ => {
            eprintln!("Usage: tern <filename>");
            process::exit(64);
        }
    }
}

fn run_file(filename: &str) {
    let source = match fs::read_to_string(filename) {
        Ok(src) => src,
        Err(error) => {
            eprintln!("Could not read file '{}': {}.", filename, error);
            process::exit(70);
        }
    };

    // Exit the interpreter with the appropriate code.
    match interpret(&source) {
        InterpretResult::Ok => process::exit(0),
        InterpretResult::ParseError => process::exit(65),
        InterpretResult::CompileError => process::exit(65),
        InterpretResult::RuntimeError => process::exit(70),
    }
}

/// Runs the whole pipeline over one source text: scan, parse, type check,
/// compile, execute.
fn interpret(source: &str) -> InterpretResult {
    let tokens = match Lexer::lex(source) {
        Ok(tokens) => tokens,
        Err(report) => {
            errors::report_compile_error(CompilePhase::Lexing, &report, source);
            return InterpretResult::ParseError;
        }
    };

    let mut program = match Parser::parse(tokens) {
        Ok(program) => program,
        Err(report) => {
            errors::report_compile_error(CompilePhase::Parsing, &report, source);
            return InterpretResult::ParseError;
        }
    };

    // The checker and the compiler resolve names through the same symbol
    // table: the checker fills it in, the compiler reads it back.
    let registry = TypeRegistry::default();
    let mut symbols = SymbolTable::new();

    if let Err(report) = TypeChecker::check(&mut program, &registry, &mut symbols) {
        errors::report_compile_error(CompilePhase::TypeChecking, &report, source);
        return InterpretResult::CompileError;
    }

    let code = match Compiler::compile(&program, &registry, &symbols) {
        Ok(code) => code,
        Err(report) => {
            errors::report_compile_error(CompilePhase::CodeGeneration, &report, source);
            return InterpretResult::CompileError;
        }
    };

    let mut vm = VirtualMachine::new(code);

    match vm.run() {
        Ok(()) => InterpretResult::Ok,
        Err(error) => {
            errors::report_runtime_error(error.error, &error.message);
            InterpretResult::RuntimeError
        }
    }
}
