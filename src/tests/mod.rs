use crate::bytecode::Code;
use crate::checker::TypeChecker;
use crate::compiler::symbols::SymbolTable;
use crate::compiler::Compiler;
use crate::errors::ErrorReport;
use crate::lexer::Lexer;
use crate::parser::ast::{BlockNode, Expr, Stmt};
use crate::parser::Parser;
use crate::types::TypeRegistry;
use crate::virtual_machine::{RuntimeError, VirtualMachine};

mod bytecode;
mod checker;
mod parser;
mod vm;

/// Scans and parses one source text.
fn parse_source(src: &str) -> Result<BlockNode, ErrorReport> {
    Parser::parse(Lexer::lex(src)?)
}

/// Scans, parses, and type checks one source text.
fn check_source(src: &str) -> Result<(BlockNode, TypeRegistry, SymbolTable), ErrorReport> {
    let mut program = parse_source(src)?;
    let registry = TypeRegistry::default();
    let mut symbols = SymbolTable::new();

    TypeChecker::check(&mut program, &registry, &mut symbols)?;
    Ok((program, registry, symbols))
}

/// Runs the whole front end over one source text, producing bytecode.
fn compile_source(src: &str) -> Result<(Code, SymbolTable), ErrorReport> {
    let (program, registry, symbols) = check_source(src)?;
    let code = Compiler::compile(&program, &registry, &symbols)?;
    Ok((code, symbols))
}

/// Compiles and executes one source text, capturing everything `print`
/// produced. Panics when the front end rejects the program.
fn run_source(src: &str) -> (String, Result<(), RuntimeError>, usize) {
    let (code, _) = match compile_source(src) {
        Ok(x) => x,
        Err(e) => panic!("Front end rejected the program: {}", e.message),
    };

    let mut vm = VirtualMachine::with_output(code, Vec::new());
    let result = vm.run();
    let depth = vm.stack_depth();
    let output = String::from_utf8(vm.into_output()).expect("Printed output is UTF-8.");

    (output, result, depth)
}

/// Parses `src` as a single expression statement and hands back the
/// expression tree.
fn first_expr(src: &str) -> Expr {
    let program = match parse_source(&format!("{{ {}; }}", src)) {
        Ok(p) => p,
        Err(e) => panic!("Could not parse expression '{}': {}", src, e.message),
    };

    match program.body.into_iter().next() {
        Some(Stmt::Expression(stmt)) => stmt.expr,
        _ => panic!("Expected a single expression statement."),
    }
}
