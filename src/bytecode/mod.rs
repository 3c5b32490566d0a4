pub mod decode;
pub mod disasm;
pub mod op;

pub use decode::decode;
pub use op::{Instruction, Mode, Opcode, Parameter};
