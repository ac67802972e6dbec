use std::fmt;

/// A single tagged value on the virtual machine's operand stack. The
/// `RawPtr` variant holds an offset into the VM's variable area rather
/// than a native pointer, so a stale or corrupt cell can never reach
/// outside the VM's own memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryCell {
    Bool(bool),
    Int64(i64),
    RawPtr(usize),
}

/// The types of errors a memory-cell operation can produce. The VM
/// converts these into runtime errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellOprError {
    TypeError(String),
    ZeroDivision(String),
}

impl fmt::Display for MemoryCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryCell::Bool(true) => write!(f, "true"),
            MemoryCell::Bool(false) => write!(f, "false"),
            MemoryCell::Int64(x) => write!(f, "{}", x),
            MemoryCell::RawPtr(x) => write!(f, "{}", x),
        }
    }
}

/// Builds the type-mismatch error for a binary operation.
fn binary_type_error(op: &str, a: &MemoryCell, b: &MemoryCell) -> CellOprError {
    CellOprError::TypeError(format!(
        "Operation {} is not defined for operands of type '{}' and '{}'.",
        op,
        a.tag_name(),
        b.tag_name()
    ))
}

impl MemoryCell {
    /// The name of the tag this cell carries, for diagnostics.
    pub fn tag_name(&self) -> &'static str {
        match self {
            MemoryCell::Bool(_) => "bool",
            MemoryCell::Int64(_) => "int64",
            MemoryCell::RawPtr(_) => "raw pointer",
        }
    }

    /// Addition. Integer arithmetic wraps on overflow.
    pub fn add(self, rhs: MemoryCell) -> Result<MemoryCell, CellOprError> {
        match (self, rhs) {
            (MemoryCell::Int64(a), MemoryCell::Int64(b)) => Ok(MemoryCell::Int64(a.wrapping_add(b))),
            (a, b) => Err(binary_type_error("addition", &a, &b)),
        }
    }

    /// Subtraction. Integer arithmetic wraps on overflow.
    pub fn subtract(self, rhs: MemoryCell) -> Result<MemoryCell, CellOprError> {
        match (self, rhs) {
            (MemoryCell::Int64(a), MemoryCell::Int64(b)) => Ok(MemoryCell::Int64(a.wrapping_sub(b))),
            (a, b) => Err(binary_type_error("subtraction", &a, &b)),
        }
    }

    /// Multiplication. Integer arithmetic wraps on overflow.
    pub fn multiply(self, rhs: MemoryCell) -> Result<MemoryCell, CellOprError> {
        match (self, rhs) {
            (MemoryCell::Int64(a), MemoryCell::Int64(b)) => Ok(MemoryCell::Int64(a.wrapping_mul(b))),
            (a, b) => Err(binary_type_error("multiplication", &a, &b)),
        }
    }

    /// Division, truncating toward zero. Division by zero is an error.
    pub fn divide(self, rhs: MemoryCell) -> Result<MemoryCell, CellOprError> {
        match (self, rhs) {
            (MemoryCell::Int64(_), MemoryCell::Int64(0)) => Err(CellOprError::ZeroDivision(
                String::from("Cannot divide by zero."),
            )),
            (MemoryCell::Int64(a), MemoryCell::Int64(b)) => Ok(MemoryCell::Int64(a.wrapping_div(b))),
            (a, b) => Err(binary_type_error("division", &a, &b)),
        }
    }

    /// Remainder of truncating division. Modulo by zero is an error.
    pub fn modulo(self, rhs: MemoryCell) -> Result<MemoryCell, CellOprError> {
        match (self, rhs) {
            (MemoryCell::Int64(_), MemoryCell::Int64(0)) => Err(CellOprError::ZeroDivision(
                String::from("Cannot take a remainder modulo zero."),
            )),
            (MemoryCell::Int64(a), MemoryCell::Int64(b)) => Ok(MemoryCell::Int64(a.wrapping_rem(b))),
            (a, b) => Err(binary_type_error("modulo", &a, &b)),
        }
    }

    /// Bitwise or on integers, logical or on booleans.
    pub fn or(self, rhs: MemoryCell) -> Result<MemoryCell, CellOprError> {
        match (self, rhs) {
            (MemoryCell::Int64(a), MemoryCell::Int64(b)) => Ok(MemoryCell::Int64(a | b)),
            (MemoryCell::Bool(a), MemoryCell::Bool(b)) => Ok(MemoryCell::Bool(a | b)),
            (a, b) => Err(binary_type_error("or", &a, &b)),
        }
    }

    /// Bitwise and on integers, logical and on booleans.
    pub fn and(self, rhs: MemoryCell) -> Result<MemoryCell, CellOprError> {
        match (self, rhs) {
            (MemoryCell::Int64(a), MemoryCell::Int64(b)) => Ok(MemoryCell::Int64(a & b)),
            (MemoryCell::Bool(a), MemoryCell::Bool(b)) => Ok(MemoryCell::Bool(a & b)),
            (a, b) => Err(binary_type_error("and", &a, &b)),
        }
    }

    /// Bitwise xor on integers, logical xor on booleans.
    pub fn xor(self, rhs: MemoryCell) -> Result<MemoryCell, CellOprError> {
        match (self, rhs) {
            (MemoryCell::Int64(a), MemoryCell::Int64(b)) => Ok(MemoryCell::Int64(a ^ b)),
            (MemoryCell::Bool(a), MemoryCell::Bool(b)) => Ok(MemoryCell::Bool(a ^ b)),
            (a, b) => Err(binary_type_error("xor", &a, &b)),
        }
    }

    /// Bitwise not on integers, logical not on booleans.
    pub fn not(self) -> Result<MemoryCell, CellOprError> {
        match self {
            MemoryCell::Int64(a) => Ok(MemoryCell::Int64(!a)),
            MemoryCell::Bool(a) => Ok(MemoryCell::Bool(!a)),
            a => Err(CellOprError::TypeError(format!(
                "Operation not is not defined for operand of type '{}'.",
                a.tag_name()
            ))),
        }
    }

    /// Arithmetic negation. Wraps on the most negative integer.
    pub fn negate(self) -> Result<MemoryCell, CellOprError> {
        match self {
            MemoryCell::Int64(a) => Ok(MemoryCell::Int64(a.wrapping_neg())),
            a => Err(CellOprError::TypeError(format!(
                "Operation negation is not defined for operand of type '{}'.",
                a.tag_name()
            ))),
        }
    }

    /// Less-than comparison of integers.
    pub fn smaller(self, rhs: MemoryCell) -> Result<MemoryCell, CellOprError> {
        match (self, rhs) {
            (MemoryCell::Int64(a), MemoryCell::Int64(b)) => Ok(MemoryCell::Bool(a < b)),
            (a, b) => Err(binary_type_error("smaller", &a, &b)),
        }
    }

    /// Less-than-or-equal comparison of integers.
    pub fn smaller_equal(self, rhs: MemoryCell) -> Result<MemoryCell, CellOprError> {
        match (self, rhs) {
            (MemoryCell::Int64(a), MemoryCell::Int64(b)) => Ok(MemoryCell::Bool(a <= b)),
            (a, b) => Err(binary_type_error("smaller or equal", &a, &b)),
        }
    }

    /// Greater-than comparison of integers.
    pub fn bigger(self, rhs: MemoryCell) -> Result<MemoryCell, CellOprError> {
        match (self, rhs) {
            (MemoryCell::Int64(a), MemoryCell::Int64(b)) => Ok(MemoryCell::Bool(a > b)),
            (a, b) => Err(binary_type_error("bigger", &a, &b)),
        }
    }

    /// Greater-than-or-equal comparison of integers.
    pub fn bigger_equal(self, rhs: MemoryCell) -> Result<MemoryCell, CellOprError> {
        match (self, rhs) {
            (MemoryCell::Int64(a), MemoryCell::Int64(b)) => Ok(MemoryCell::Bool(a >= b)),
            (a, b) => Err(binary_type_error("bigger or equal", &a, &b)),
        }
    }

    /// Equality of two cells of the same tag.
    pub fn equal(self, rhs: MemoryCell) -> Result<MemoryCell, CellOprError> {
        match (self, rhs) {
            (MemoryCell::Int64(a), MemoryCell::Int64(b)) => Ok(MemoryCell::Bool(a == b)),
            (MemoryCell::Bool(a), MemoryCell::Bool(b)) => Ok(MemoryCell::Bool(a == b)),
            (a, b) => Err(binary_type_error("equal", &a, &b)),
        }
    }

    /// Inequality of two cells of the same tag.
    pub fn not_equal(self, rhs: MemoryCell) -> Result<MemoryCell, CellOprError> {
        match (self, rhs) {
            (MemoryCell::Int64(a), MemoryCell::Int64(b)) => Ok(MemoryCell::Bool(a != b)),
            (MemoryCell::Bool(a), MemoryCell::Bool(b)) => Ok(MemoryCell::Bool(a != b)),
            (a, b) => Err(binary_type_error("not equal", &a, &b)),
        }
    }

    /// Explicit cast from an integer to a boolean: zero is false,
    /// everything else is true.
    pub fn int64_to_bool(self) -> Result<MemoryCell, CellOprError> {
        match self {
            MemoryCell::Int64(a) => Ok(MemoryCell::Bool(a != 0)),
            a => Err(CellOprError::TypeError(format!(
                "Cannot cast a value of type '{}' to bool.",
                a.tag_name()
            ))),
        }
    }

    /// Explicit cast from a boolean to an integer: false is 0, true is 1.
    pub fn bool_to_int64(self) -> Result<MemoryCell, CellOprError> {
        match self {
            MemoryCell::Bool(a) => Ok(MemoryCell::Int64(a as i64)),
            a => Err(CellOprError::TypeError(format!(
                "Cannot cast a value of type '{}' to int64.",
                a.tag_name()
            ))),
        }
    }
}
