//! Intcode virtual machine
//!
//! An interpreter for programs encoded as a flat list of integers.
//!
//! # Architecture
//!
//! - **Loader**: comma-separated program text to a [`Program`]
//! - **Decoder**: instruction word to opcode plus addressed parameters
//! - **Engine**: run to halt, or pause after each output and resume later
//! - **Amplifiers**: several machines chained in a ring, interleaved on
//!   one thread by pausing and resuming
//!
//! # Example Usage
//!
//! ```
//! use intcode::{Machine, Program};
//!
//! let program = Program::parse("3,0,4,0,99").unwrap();
//! let mut machine = Machine::new(&program).unwrap();
//! assert_eq!(machine.run_to_halt(&[42]).unwrap(), vec![42]);
//! ```

pub mod bytecode;
pub mod frontend;
pub mod runtime;

pub use bytecode::{Instruction, Mode, Opcode, Parameter};
pub use frontend::{LoadError, ParseError, Program};
pub use runtime::{
    AmplifierPipeline, ErrorKind, InputFallback, Machine, Memory, MemoryPolicy, RunMode,
    RunOutcome, RuntimeError, Snapshot, Status, VmConfig, execute,
};
