// =============================================================================
// OPCODE - Intcode instruction set
// =============================================================================

/// Supported opcodes, keyed by the two least-significant digits of an
/// instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `mem[dst] = a + b`
    Add = 1,
    /// `mem[dst] = a * b`
    Mul = 2,
    /// `mem[dst] = next input`
    Input = 3,
    /// emit `a`
    Output = 4,
    /// `if a != 0 { ip = b }`
    JumpIfTrue = 5,
    /// `if a == 0 { ip = b }`
    JumpIfFalse = 6,
    /// `mem[dst] = (a < b) as i64`
    LessThan = 7,
    /// `mem[dst] = (a == b) as i64`
    Equals = 8,
    /// `relative_base += a`
    AdjustBase = 9,
    Halt = 99,
}

/// Largest arity of any opcode.
pub const MAX_PARAMS: usize = 3;

impl Opcode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Opcode::Add),
            2 => Some(Opcode::Mul),
            3 => Some(Opcode::Input),
            4 => Some(Opcode::Output),
            5 => Some(Opcode::JumpIfTrue),
            6 => Some(Opcode::JumpIfFalse),
            7 => Some(Opcode::LessThan),
            8 => Some(Opcode::Equals),
            9 => Some(Opcode::AdjustBase),
            99 => Some(Opcode::Halt),
            _ => None,
        }
    }

    /// Number of parameter words following the instruction word.
    pub const fn arity(self) -> usize {
        match self {
            Opcode::Add | Opcode::Mul | Opcode::LessThan | Opcode::Equals => 3,
            Opcode::JumpIfTrue | Opcode::JumpIfFalse => 2,
            Opcode::Input | Opcode::Output | Opcode::AdjustBase => 1,
            Opcode::Halt => 0,
        }
    }

    /// Index of the parameter that names a write destination, if any.
    pub const fn destination(self) -> Option<usize> {
        match self {
            Opcode::Add | Opcode::Mul | Opcode::LessThan | Opcode::Equals => Some(2),
            Opcode::Input => Some(0),
            _ => None,
        }
    }

    pub fn is_jump(self) -> bool {
        matches!(self, Opcode::JumpIfTrue | Opcode::JumpIfFalse)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Mul => "MUL",
            Opcode::Input => "IN",
            Opcode::Output => "OUT",
            Opcode::JumpIfTrue => "JNZ",
            Opcode::JumpIfFalse => "JZ",
            Opcode::LessThan => "LT",
            Opcode::Equals => "EQ",
            Opcode::AdjustBase => "ARB",
            Opcode::Halt => "HALT",
        }
    }
}

// =============================================================================
// PARAMETERS
// =============================================================================

/// Per-parameter addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// The value is an absolute memory address.
    #[default]
    Position,
    /// The value is the operand itself.
    Immediate,
    /// The value is an offset from the relative base.
    Relative,
}

impl Mode {
    pub fn from_digit(digit: i64) -> Option<Self> {
        match digit {
            0 => Some(Mode::Position),
            1 => Some(Mode::Immediate),
            2 => Some(Mode::Relative),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Parameter {
    pub value: i64,
    pub mode: Mode,
}

impl Parameter {
    pub fn new(value: i64, mode: Mode) -> Self {
        Self { value, mode }
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mode {
            Mode::Position => write!(f, "[{}]", self.value),
            Mode::Immediate => write!(f, "#{}", self.value),
            Mode::Relative if self.value < 0 => write!(f, "rb{}", self.value),
            Mode::Relative => write!(f, "rb+{}", self.value),
        }
    }
}

/// A decoded instruction: opcode plus exactly `opcode.arity()` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    params: [Parameter; MAX_PARAMS],
}

impl Instruction {
    /// Build an instruction; `params` must hold exactly `opcode.arity()` items.
    pub fn new(opcode: Opcode, params: &[Parameter]) -> Self {
        debug_assert_eq!(params.len(), opcode.arity());
        let mut slots = [Parameter::default(); MAX_PARAMS];
        slots[..params.len()].copy_from_slice(params);
        Self {
            opcode,
            params: slots,
        }
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params[..self.opcode.arity()]
    }

    pub fn param(&self, index: usize) -> Parameter {
        self.params()[index]
    }

    /// Total words occupied, including the instruction word.
    pub fn width(&self) -> usize {
        1 + self.opcode.arity()
    }

    pub fn is_terminal(&self) -> bool {
        self.opcode == Opcode::Halt
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.opcode.mnemonic())?;
        for (i, param) in self.params().iter().enumerate() {
            if i == 0 {
                write!(f, " {}", param)?;
            } else {
                write!(f, ", {}", param)?;
            }
        }
        Ok(())
    }
}
