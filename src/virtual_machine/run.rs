use std::io::Write;

use num_traits::FromPrimitive;

use crate::bytecode::OpCode;
use crate::errors::RuntimeErrorType;
use crate::virtual_machine::memory_cell::MemoryCell;
use crate::virtual_machine::{RuntimeError, VirtualMachine};

impl<W: Write> VirtualMachine<W> {
    /// Executes the instructions in the program. Execution ends when the
    /// instruction pointer runs off the end of the program, or with the
    /// first runtime error.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        while self.pc < self.code.bytes.len() {
            let word = self.next_word()?;

            let instruction = match OpCode::from_i64(word) {
                Some(op) => op,
                None => {
                    return Err(RuntimeError::new(
                        RuntimeErrorType::UnknownInstruction,
                        format!("Unsupported instruction: {}.", word),
                    ));
                }
            };

            match instruction {
                OpCode::Print => self.op_print()?,
                OpCode::Duplicate => {
                    let top = self.top_stack()?;
                    self.push_stack(top);
                }
                OpCode::Swap => {
                    let a = self.pop_stack()?;
                    let b = self.pop_stack()?;
                    self.push_stack(a);
                    self.push_stack(b);
                }

                OpCode::Jump => {
                    self.pc = self.resolve_jump_target()?;
                }
                OpCode::JumpIf => self.op_jump_if()?,

                OpCode::Add
                | OpCode::Subtract
                | OpCode::Multiply
                | OpCode::Divide
                | OpCode::Modulo
                | OpCode::Or
                | OpCode::And
                | OpCode::Xor
                | OpCode::Smaller
                | OpCode::SmallerEqual
                | OpCode::Bigger
                | OpCode::BiggerEqual
                | OpCode::Equal
                | OpCode::NotEqual => self.binary_operation(instruction)?,

                OpCode::Negate => {
                    let a = self.pop_stack()?;
                    self.push_stack(a.negate()?);
                }
                OpCode::Not => {
                    let a = self.pop_stack()?;
                    self.push_stack(a.not()?);
                }

                OpCode::Int64Load => {
                    let value = self.next_word()?;
                    self.push_stack(MemoryCell::Int64(value));
                }
                OpCode::BoolLoad => {
                    let value = self.next_word()?;
                    self.push_stack(MemoryCell::Bool(value != 0));
                }
                OpCode::StackPtrLoad => self.op_stack_ptr_load()?,

                OpCode::Int64ToBool => {
                    let a = self.pop_stack()?;
                    self.push_stack(a.int64_to_bool()?);
                }
                OpCode::BoolToInt64 => {
                    let a = self.pop_stack()?;
                    self.push_stack(a.bool_to_int64()?);
                }

                OpCode::Int64LoadFromAddress => self.op_int64_load_from_address()?,
                OpCode::Int64LoadIntoAddress => self.op_int64_load_into_address()?,
                OpCode::BoolLoadFromAddress => self.op_bool_load_from_address()?,
                OpCode::BoolLoadIntoAddress => self.op_bool_load_into_address()?,
            }
        }

        Ok(())
    }

    /// Executes a two-operand instruction: pops the right operand, then
    /// the left, and pushes the result.
    fn binary_operation(&mut self, instruction: OpCode) -> Result<(), RuntimeError> {
        let a = self.pop_stack()?;
        let b = self.pop_stack()?;

        let result = match instruction {
            OpCode::Add => b.add(a),
            OpCode::Subtract => b.subtract(a),
            OpCode::Multiply => b.multiply(a),
            OpCode::Divide => b.divide(a),
            OpCode::Modulo => b.modulo(a),
            OpCode::Or => b.or(a),
            OpCode::And => b.and(a),
            OpCode::Xor => b.xor(a),
            OpCode::Smaller => b.smaller(a),
            OpCode::SmallerEqual => b.smaller_equal(a),
            OpCode::Bigger => b.bigger(a),
            OpCode::BiggerEqual => b.bigger_equal(a),
            OpCode::Equal => b.equal(a),
            OpCode::NotEqual => b.not_equal(a),
            _ => unreachable!("Instruction {:?} is not a binary operation.", instruction),
        }?;

        self.push_stack(result);
        Ok(())
    }

    /// Executes the instruction to print the top of the operand stack,
    /// without popping it, followed by a newline.
    fn op_print(&mut self) -> Result<(), RuntimeError> {
        let top = self.top_stack()?;

        if let Err(e) = writeln!(self.out, "{}", top) {
            return Err(RuntimeError::new(
                RuntimeErrorType::Internal,
                format!("Could not write to the output stream: {}.", e),
            ));
        }

        Ok(())
    }

    /// Executes the instruction to pop a boolean and jump to the resolved
    /// target when it is true.
    fn op_jump_if(&mut self) -> Result<(), RuntimeError> {
        let target = self.resolve_jump_target()?;

        let condition = match self.pop_stack()? {
            MemoryCell::Bool(c) => c,
            cell => {
                return Err(RuntimeError::new(
                    RuntimeErrorType::TypeError,
                    format!(
                        "A conditional jump expects a boolean condition, found a value of type '{}'.",
                        cell.tag_name()
                    ),
                ));
            }
        };

        if condition {
            self.pc = target;
        }

        Ok(())
    }

    /// Executes the instruction to turn an integer offset on the operand
    /// stack into a raw pointer into the variable area.
    fn op_stack_ptr_load(&mut self) -> Result<(), RuntimeError> {
        let offset = match self.pop_stack()? {
            MemoryCell::Int64(offset) => offset,
            cell => {
                return Err(RuntimeError::new(
                    RuntimeErrorType::TypeError,
                    format!(
                        "A pointer load expects an integer offset, found a value of type '{}'.",
                        cell.tag_name()
                    ),
                ));
            }
        };

        let offset = match usize::try_from(offset) {
            Ok(o) if o < self.memory.len() => o,
            _ => {
                return Err(RuntimeError::new(
                    RuntimeErrorType::SegmentationFault,
                    format!(
                        "Offset {} is outside the {}-byte variable area.",
                        offset,
                        self.memory.len()
                    ),
                ));
            }
        };

        self.push_stack(MemoryCell::RawPtr(offset));
        Ok(())
    }

    /// Executes the instruction to read an integer through a raw pointer.
    fn op_int64_load_from_address(&mut self) -> Result<(), RuntimeError> {
        let ptr = self.pop_address(8)?;

        let mut word = [0u8; 8];
        word.copy_from_slice(&self.memory[ptr..ptr + 8]);

        self.push_stack(MemoryCell::Int64(i64::from_le_bytes(word)));
        Ok(())
    }

    /// Executes the instruction to write an integer through a raw pointer.
    fn op_int64_load_into_address(&mut self) -> Result<(), RuntimeError> {
        let ptr = self.pop_address(8)?;

        let value = match self.pop_stack()? {
            MemoryCell::Int64(v) => v,
            cell => {
                return Err(RuntimeError::new(
                    RuntimeErrorType::TypeError,
                    format!(
                        "An integer store expects an integer value, found a value of type '{}'.",
                        cell.tag_name()
                    ),
                ));
            }
        };

        self.memory[ptr..ptr + 8].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Executes the instruction to read a boolean through a raw pointer.
    fn op_bool_load_from_address(&mut self) -> Result<(), RuntimeError> {
        let ptr = self.pop_address(1)?;
        self.push_stack(MemoryCell::Bool(self.memory[ptr] != 0));
        Ok(())
    }

    /// Executes the instruction to write a boolean through a raw pointer.
    fn op_bool_load_into_address(&mut self) -> Result<(), RuntimeError> {
        let ptr = self.pop_address(1)?;

        let value = match self.pop_stack()? {
            MemoryCell::Bool(v) => v,
            cell => {
                return Err(RuntimeError::new(
                    RuntimeErrorType::TypeError,
                    format!(
                        "A boolean store expects a boolean value, found a value of type '{}'.",
                        cell.tag_name()
                    ),
                ));
            }
        };

        self.memory[ptr] = value as u8;
        Ok(())
    }
}
