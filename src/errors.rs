use crate::lexer::tokens::Token;

/// A single diagnostic generated by one of the compilation phases.
/// The pipeline stops at the first error, so a report is always fatal.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    /// The line where the offending token starts.
    pub line: usize,
    /// The column where the offending token starts.
    pub column: usize,
    /// The length of the offending lexeme.
    pub lexeme_len: usize,
    /// The error message to be displayed.
    pub message: String,
}

impl ErrorReport {
    /// Creates a report anchored at the given token.
    pub fn at_token(tok: &Token, message: String) -> ErrorReport {
        ErrorReport {
            line: tok.line_num,
            column: tok.column_start,
            lexeme_len: tok.lexeme.len().max(1),
            message,
        }
    }
}

/// The compilation phase a diagnostic originated from. Selects the
/// error-name header and the prologue sentence of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilePhase {
    Lexing,
    Parsing,
    TypeChecking,
    CodeGeneration,
}

impl CompilePhase {
    fn error_name(&self) -> &'static str {
        match self {
            CompilePhase::Lexing => "LexicalError",
            CompilePhase::Parsing => "ParseError",
            CompilePhase::TypeChecking => "TypeError",
            CompilePhase::CodeGeneration => "EmitError",
        }
    }

    fn prologue(&self) -> &'static str {
        match self {
            CompilePhase::Lexing => "There was an error while the source was being scanned.",
            CompilePhase::Parsing => "There was an error while parsing.",
            CompilePhase::TypeChecking => "There was an error while types were being checked.",
            CompilePhase::CodeGeneration => "There was an error while bytecode was being generated.",
        }
    }
}

/// The types of errors the virtual machine can raise while executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorType {
    StackUnderflow,
    UnknownInstruction,
    ZeroDivision,
    SegmentationFault,
    TypeError,
    Internal,
}

impl RuntimeErrorType {
    fn error_name(&self) -> &'static str {
        match self {
            RuntimeErrorType::StackUnderflow => "StackUnderflowError",
            RuntimeErrorType::UnknownInstruction => "UnknownInstructionError",
            RuntimeErrorType::ZeroDivision => "ZeroDivisionError",
            RuntimeErrorType::SegmentationFault => "SegmentationFault",
            RuntimeErrorType::TypeError => "TypeError",
            RuntimeErrorType::Internal => "InternalError",
        }
    }
}

/// Reports a compile-time diagnostic to the console.
///
/// # Parameters
/// - `phase`: The phase the error originated from.
/// - `report`: The generated diagnostic.
/// - `source`: The program's source text, used to print a snippet.
pub fn report_compile_error(phase: CompilePhase, report: &ErrorReport, source: &str) {
    eprintln!("{}", phase.prologue());
    eprintln!(
        "\x1b[31;1m{}\x1b[0m\x1b[1m at [{}:{}]: {}\x1b[0m",
        phase.error_name(),
        report.line,
        report.column,
        report.message
    );

    print_error_snippet(report, source);
}

/// Reports a runtime error to the console.
///
/// # Parameters
/// - `error`: The generated error.
/// - `message`: The error message to be displayed.
pub fn report_runtime_error(error: RuntimeErrorType, message: &str) {
    eprintln!("There was an error while the virtual machine was executing.");
    eprintln!(
        "\x1b[31;1m{}:\x1b[0m\x1b[1m {}\x1b[0m",
        error.error_name(),
        message
    );
    eprintln!("\n\x1b[31;1mERROR:\x1b[0m Aborted execution due to previous errors.");
}

/// Prints the offending source line with a caret marker under the
/// reported lexeme.
fn print_error_snippet(report: &ErrorReport, source: &str) {
    let line = match source.split('\n').nth(report.line.saturating_sub(1)) {
        Some(l) => l,
        None => return,
    };

    let line_label = format!("{:>4} | ", report.line);
    eprintln!("{}{}", line_label, line);
    eprintln!(
        "{}\x1b[31;1m{}\x1b[0m",
        " ".repeat(line_label.len() + report.column),
        "^".repeat(report.lexeme_len.min(line.len().saturating_sub(report.column).max(1)))
    );
}
