use thiserror::Error;

/// Coarse classification of runtime failures.
///
/// Every failure is fatal to the instance that raised it; the kind only
/// tells a caller which family of problem it is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedProgram,
    InvalidAddressingMode,
    OutOfBoundsAccess,
    Input,
    Limit,
    Pipeline,
    Snapshot,
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unknown opcode {opcode} (word {word}) at address {address}")]
    UnknownOpcode { opcode: i64, word: i64, address: usize },

    #[error("invalid addressing mode {mode} for parameter {param} at address {address}")]
    InvalidMode { mode: i64, param: usize, address: usize },

    #[error("write destination in immediate mode (parameter {param}) at address {address}")]
    ImmediateDestination { param: usize, address: usize },

    #[error("address {address} out of range (memory size {size})")]
    OutOfBounds { address: i64, size: usize },

    #[error("memory for {words} words with {multiplier}x scratch exceeds {limit} cells")]
    MemoryTooLarge {
        words: usize,
        multiplier: usize,
        limit: usize,
    },

    #[error("input exhausted at address {address}")]
    InputExhausted { address: usize },

    #[error("interactive input {byte:#04x} is not an ASCII digit")]
    InvalidInteractiveInput { byte: u8 },

    #[error("failed to read interactive input")]
    Io(#[from] std::io::Error),

    #[error("execution step limit exceeded ({limit})")]
    StepLimitExceeded { limit: u64 },

    #[error("amplifier pipeline needs at least one phase setting")]
    EmptyPipeline,

    #[error("amplifier pipeline halted without producing a signal")]
    NoSignal,

    #[error("snapshot encoding failed")]
    Snapshot(#[from] postcard::Error),
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::UnknownOpcode { .. } | RuntimeError::ImmediateDestination { .. } => {
                ErrorKind::MalformedProgram
            }
            RuntimeError::InvalidMode { .. } => ErrorKind::InvalidAddressingMode,
            RuntimeError::OutOfBounds { .. } => ErrorKind::OutOfBoundsAccess,
            RuntimeError::InputExhausted { .. }
            | RuntimeError::InvalidInteractiveInput { .. }
            | RuntimeError::Io(_) => ErrorKind::Input,
            RuntimeError::StepLimitExceeded { .. } | RuntimeError::MemoryTooLarge { .. } => {
                ErrorKind::Limit
            }
            RuntimeError::EmptyPipeline | RuntimeError::NoSignal => ErrorKind::Pipeline,
            RuntimeError::Snapshot(_) => ErrorKind::Snapshot,
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_identifies_opcode_and_address() {
        let err = RuntimeError::UnknownOpcode {
            opcode: 42,
            word: 1042,
            address: 7,
        };
        assert_eq!(err.to_string(), "unknown opcode 42 (word 1042) at address 7");
        assert_eq!(err.kind(), ErrorKind::MalformedProgram);
    }

    #[test]
    fn test_kinds() {
        let oob = RuntimeError::OutOfBounds {
            address: -1,
            size: 10,
        };
        assert_eq!(oob.kind(), ErrorKind::OutOfBoundsAccess);

        let mode = RuntimeError::InvalidMode {
            mode: 3,
            param: 0,
            address: 0,
        };
        assert_eq!(mode.kind(), ErrorKind::InvalidAddressingMode);
        assert!(mode.to_string().contains("mode 3"));

        assert_eq!(RuntimeError::NoSignal.kind(), ErrorKind::Pipeline);
    }
}
