use tracing::trace;

use crate::bytecode::op::{Instruction, MAX_PARAMS, Mode, Opcode, Parameter};
use crate::runtime::memory::Memory;
use crate::runtime::runtime_error::{Result, RuntimeError};

/// Decode the instruction starting at `address`.
///
/// The instruction word is read as `ABCDE`: `DE` is the opcode and `C`,
/// `B`, `A` are the modes of parameters one to three. Missing digits mean
/// position mode. Only the declared parameters are validated, so digits
/// above the opcode's arity are ignored.
pub fn decode(memory: &Memory, address: usize) -> Result<Instruction> {
    let word = memory.read(address as i64)?;
    let opcode = Opcode::from_code(word % 100)
        .filter(|_| word >= 0)
        .ok_or(RuntimeError::UnknownOpcode {
            opcode: word % 100,
            word,
            address,
        })?;

    let mut params = [Parameter::default(); MAX_PARAMS];
    let mut modes = word / 100;

    for (index, slot) in params.iter_mut().take(opcode.arity()).enumerate() {
        let digit = modes % 10;
        modes /= 10;

        let mode = Mode::from_digit(digit).ok_or(RuntimeError::InvalidMode {
            mode: digit,
            param: index,
            address,
        })?;

        if mode == Mode::Immediate && opcode.destination() == Some(index) {
            return Err(RuntimeError::ImmediateDestination {
                param: index,
                address,
            });
        }

        let value = memory.read((address + 1 + index) as i64)?;
        *slot = Parameter::new(value, mode);
    }

    let instruction = Instruction::new(opcode, &params[..opcode.arity()]);
    trace!(address, word, %instruction, "decoded");
    Ok(instruction)
}
