use std::fmt::Write as FmtWrite;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;

/// The placeholder value held by a reserved lookup-table slot until the
/// slot is patched with a real byte position.
pub const UNPATCHED_SLOT: usize = usize::MAX;

/// The set of instructions supported by the virtual machine. Every
/// instruction is one 64-bit word; instructions that carry an immediate
/// consume exactly one additional word.
///
/// **NOTE:** Changing the order in which members are declared creates
/// incompatibilities between serialized programs of different versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(i64)]
pub enum OpCode {
    // Stack and control flow.
    Print,
    Duplicate,
    Swap,
    Jump,
    JumpIf,

    // Arithmetic and logic. Operand types are pre-validated by the
    // type checker.
    Add,
    Subtract,
    Negate,
    Multiply,
    Divide,
    Modulo,
    Or,
    And,
    Xor,
    Not,
    Smaller,
    SmallerEqual,
    Bigger,
    BiggerEqual,
    Equal,
    NotEqual,

    // Loading.
    Int64Load,
    BoolLoad,
    StackPtrLoad,

    // Casts.
    Int64ToBool,
    BoolToInt64,

    // Memory.
    Int64LoadFromAddress,
    Int64LoadIntoAddress,
    BoolLoadFromAddress,
    BoolLoadIntoAddress,
}

impl OpCode {
    /// Whether this instruction consumes one additional immediate word.
    pub fn has_immediate(&self) -> bool {
        matches!(
            self,
            OpCode::Jump | OpCode::JumpIf | OpCode::Int64Load | OpCode::BoolLoad
        )
    }

    /// The wire-contract mnemonic of this instruction.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            OpCode::Print => "PRINT",
            OpCode::Duplicate => "DUPLICATE",
            OpCode::Swap => "SWAP",
            OpCode::Jump => "JUMP",
            OpCode::JumpIf => "JUMP_IF",
            OpCode::Add => "ADD",
            OpCode::Subtract => "SUBTRACT",
            OpCode::Negate => "NEGATE",
            OpCode::Multiply => "MULTIPLY",
            OpCode::Divide => "DIVIDE",
            OpCode::Modulo => "MODULO",
            OpCode::Or => "OR",
            OpCode::And => "AND",
            OpCode::Xor => "XOR",
            OpCode::Not => "NOT",
            OpCode::Smaller => "SMALLER",
            OpCode::SmallerEqual => "SMALLER_EQUAL",
            OpCode::Bigger => "BIGGER",
            OpCode::BiggerEqual => "BIGGER_EQUAL",
            OpCode::Equal => "EQUAL",
            OpCode::NotEqual => "NOT_EQUAL",
            OpCode::Int64Load => "INT64_LOAD",
            OpCode::BoolLoad => "BOOL_LOAD",
            OpCode::StackPtrLoad => "STACK_PTR_LOAD",
            OpCode::Int64ToBool => "INT64_TO_BOOL",
            OpCode::BoolToInt64 => "BOOL_TO_INT64",
            OpCode::Int64LoadFromAddress => "INT64_LOAD_FROM_ADDRESS",
            OpCode::Int64LoadIntoAddress => "INT64_LOAD_INTO_ADDRESS",
            OpCode::BoolLoadFromAddress => "BOOL_LOAD_FROM_ADDRESS",
            OpCode::BoolLoadIntoAddress => "BOOL_LOAD_INTO_ADDRESS",
        }
    }
}

/// Contains all the necessary information about the instructions to be
/// executed: the instruction words themselves, and the jump lookup table.
///
/// `Jump`/`JumpIf` immediates are indices into the lookup table rather than
/// byte positions. The indirection lets a forward jump be emitted with a
/// freshly reserved slot whose target byte position is patched in once the
/// jump destination has been emitted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Code {
    /// The instruction words of this program.
    pub bytes: Vec<i64>,
    /// Jump targets, as positions into `bytes`, addressed by slot index.
    pub lookup_table: Vec<usize>,
}

/// Magic bytes opening a serialized program.
pub const CODE_MAGIC: [u8; 4] = *b"TERN";
/// Version of the serialized format.
pub const CODE_VERSION: u32 = 1;

impl Code {
    /// Creates a new, empty code buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of instruction words emitted so far. This is also the
    /// byte position the next emitted instruction will have.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Checks whether the instruction list is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Adds an instruction word to the instruction list.
    pub fn push_op(&mut self, op: OpCode) {
        self.bytes.push(op as i64);
    }

    /// Adds a raw immediate word to the instruction list.
    pub fn push_word(&mut self, word: i64) {
        self.bytes.push(word);
    }

    /// Reserves a fresh lookup-table slot holding a placeholder target.
    ///
    /// # Returns
    /// - `usize`: The index of the reserved slot. The caller must patch the
    ///   slot with `patch_slot` before the code is executed.
    pub fn reserve_slot(&mut self) -> usize {
        self.lookup_table.push(UNPATCHED_SLOT);
        self.lookup_table.len() - 1
    }

    /// Patches a reserved lookup-table slot with a real byte position.
    pub fn patch_slot(&mut self, slot: usize, target: usize) {
        self.lookup_table[slot] = target;
    }

    /// Decodes the instruction word at the given position.
    pub fn get_op(&self, pos: usize) -> Option<OpCode> {
        OpCode::from_i64(self.bytes[pos])
    }

    /// Disassembles the program, rendering each instruction and its
    /// operand, with jump immediates resolved through the lookup table.
    pub fn disassemble(&self) -> String {
        let mut output = String::new();
        let mut pos = 0;

        while pos < self.bytes.len() {
            let op = match self.get_op(pos) {
                Some(op) => op,
                None => {
                    let _ = writeln!(output, "{:>04} ??? ({})", pos, self.bytes[pos]);
                    pos += 1;
                    continue;
                }
            };

            let _ = write!(output, "{:>04} {}", pos, op.mnemonic());

            if op.has_immediate() {
                pos += 1;
                let operand = self.bytes.get(pos).copied().unwrap_or(0);

                match op {
                    OpCode::Jump | OpCode::JumpIf => {
                        let target = self
                            .lookup_table
                            .get(operand as usize)
                            .copied()
                            .unwrap_or(UNPATCHED_SLOT);
                        let _ = write!(output, " slot {} -> {:>04}", operand, target);
                    }
                    _ => {
                        let _ = write!(output, " {}", operand);
                    }
                }
            }

            let _ = writeln!(output);
            pos += 1;
        }

        output
    }

    /// Serializes the program: a magic+version header, the two section
    /// lengths, then the instruction words and the lookup table, all
    /// little-endian 64-bit.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(24 + 8 * (self.bytes.len() + self.lookup_table.len()));

        data.extend_from_slice(&CODE_MAGIC);
        data.extend_from_slice(&CODE_VERSION.to_le_bytes());
        data.extend_from_slice(&(self.bytes.len() as u64).to_le_bytes());
        data.extend_from_slice(&(self.lookup_table.len() as u64).to_le_bytes());

        for word in self.bytes.iter() {
            data.extend_from_slice(&word.to_le_bytes());
        }

        for target in self.lookup_table.iter() {
            data.extend_from_slice(&(*target as u64).to_le_bytes());
        }

        data
    }

    /// Deserializes a program previously produced by `to_bytes`,
    /// validating the header and the section lengths.
    pub fn from_bytes(data: &[u8]) -> Result<Code, String> {
        if data.len() < 24 {
            return Err(String::from("Program file is truncated."));
        }

        if data[0..4] != CODE_MAGIC {
            return Err(String::from("Not a Tern program file."));
        }

        let version = u32::from_le_bytes(data[4..8].try_into().unwrap());
        if version != CODE_VERSION {
            return Err(format!("Unsupported program version: {}.", version));
        }

        let bytes_len = u64::from_le_bytes(data[8..16].try_into().unwrap()) as usize;
        let table_len = u64::from_le_bytes(data[16..24].try_into().unwrap()) as usize;

        let expected = 24 + 8 * (bytes_len + table_len);
        if data.len() != expected {
            return Err(format!(
                "Program file has {} bytes but its header describes {}.",
                data.len(),
                expected
            ));
        }

        let mut code = Code::new();
        let mut cursor = 24;

        for _ in 0..bytes_len {
            code.bytes
                .push(i64::from_le_bytes(data[cursor..cursor + 8].try_into().unwrap()));
            cursor += 8;
        }

        for _ in 0..table_len {
            code.lookup_table
                .push(u64::from_le_bytes(data[cursor..cursor + 8].try_into().unwrap()) as usize);
            cursor += 8;
        }

        Ok(code)
    }
}
