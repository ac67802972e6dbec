use std::io::{self, Write};

use crate::bytecode::Code;
use crate::errors::RuntimeErrorType;
use crate::virtual_machine::memory_cell::{CellOprError, MemoryCell};

// Submodules
pub mod memory_cell;
mod run;

/// The size of the variable area in bytes.
pub const VARIABLE_AREA_SIZE: usize = 65536;

/// A fatal error raised while the virtual machine was executing.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub message: String,
}

impl RuntimeError {
    fn new(error: RuntimeErrorType, message: String) -> RuntimeError {
        RuntimeError { error, message }
    }
}

impl From<CellOprError> for RuntimeError {
    fn from(err: CellOprError) -> Self {
        match err {
            CellOprError::TypeError(message) => {
                RuntimeError::new(RuntimeErrorType::TypeError, message)
            }
            CellOprError::ZeroDivision(message) => {
                RuntimeError::new(RuntimeErrorType::ZeroDivision, message)
            }
        }
    }
}

/// Represents a virtual machine executing one compiled program against an
/// operand stack of tagged cells and a byte-addressable variable area.
/// Everything `print` produces is written to the machine's output sink,
/// which is standard output in the driver.
pub struct VirtualMachine<W: Write> {
    /// The program to execute.
    code: Code,
    /// The operand stack.
    stack: Vec<MemoryCell>,
    /// The variable area. Declared variables live here at statically
    /// assigned offsets.
    memory: Vec<u8>,
    /// The position of the next instruction word to execute.
    pc: usize,
    /// Where `PRINT` output goes.
    out: W,
}

impl VirtualMachine<io::Stdout> {
    /// Creates a virtual machine that prints to standard output.
    pub fn new(code: Code) -> Self {
        VirtualMachine::with_output(code, io::stdout())
    }
}

impl<W: Write> VirtualMachine<W> {
    /// Creates a virtual machine printing into the given sink.
    pub fn with_output(code: Code, out: W) -> Self {
        VirtualMachine {
            code,
            stack: Vec::with_capacity(256),
            memory: vec![0u8; VARIABLE_AREA_SIZE],
            pc: 0,
            out,
        }
    }

    /// Consumes the machine and hands back its output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// The current operand-stack depth.
    #[cfg(test)]
    pub(crate) fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Pops the top cell off the operand stack.
    fn pop_stack(&mut self) -> Result<MemoryCell, RuntimeError> {
        match self.stack.pop() {
            Some(cell) => Ok(cell),
            None => Err(RuntimeError::new(
                RuntimeErrorType::StackUnderflow,
                String::from("Cannot pop from the operand stack, because it is empty."),
            )),
        }
    }

    /// Reads the top cell of the operand stack without popping it.
    fn top_stack(&self) -> Result<MemoryCell, RuntimeError> {
        match self.stack.last() {
            Some(cell) => Ok(*cell),
            None => Err(RuntimeError::new(
                RuntimeErrorType::StackUnderflow,
                String::from("Cannot read the top of the operand stack, because it is empty."),
            )),
        }
    }

    /// Pushes a cell onto the operand stack.
    fn push_stack(&mut self, cell: MemoryCell) {
        self.stack.push(cell);
    }

    /// Fetches the next instruction word and advances past it.
    fn next_word(&mut self) -> Result<i64, RuntimeError> {
        if self.pc >= self.code.bytes.len() {
            return Err(RuntimeError::new(
                RuntimeErrorType::SegmentationFault,
                String::from("Not enough words in the program."),
            ));
        }

        let word = self.code.bytes[self.pc];
        self.pc += 1;
        Ok(word)
    }

    /// Pops the top cell, which must be a raw pointer, and bounds-checks
    /// an access of `size` bytes through it.
    fn pop_address(&mut self, size: usize) -> Result<usize, RuntimeError> {
        let ptr = match self.pop_stack()? {
            MemoryCell::RawPtr(offset) => offset,
            cell => {
                return Err(RuntimeError::new(
                    RuntimeErrorType::TypeError,
                    format!(
                        "Expected a raw pointer on the operand stack, found a value of type '{}'.",
                        cell.tag_name()
                    ),
                ));
            }
        };

        if ptr + size > self.memory.len() {
            return Err(RuntimeError::new(
                RuntimeErrorType::SegmentationFault,
                format!(
                    "Address {} is outside the {}-byte variable area.",
                    ptr,
                    self.memory.len()
                ),
            ));
        }

        Ok(ptr)
    }

    /// Resolves a jump immediate through the lookup table into a byte
    /// position inside the program.
    fn resolve_jump_target(&mut self) -> Result<usize, RuntimeError> {
        let slot = self.next_word()?;

        let target = match usize::try_from(slot)
            .ok()
            .and_then(|s| self.code.lookup_table.get(s))
        {
            Some(target) => *target,
            None => {
                return Err(RuntimeError::new(
                    RuntimeErrorType::SegmentationFault,
                    format!("Jump slot {} is outside the lookup table.", slot),
                ));
            }
        };

        if target > self.code.bytes.len() {
            return Err(RuntimeError::new(
                RuntimeErrorType::SegmentationFault,
                format!("Jump target {} is outside the program.", target),
            ));
        }

        Ok(target)
    }
}
