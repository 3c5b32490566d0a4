use std::io::{self, BufRead, Write};

use tracing::{debug, trace};

use crate::bytecode::decode::decode;
use crate::bytecode::op::{Instruction, Mode, Opcode, Parameter};
use crate::frontend::Program;
use crate::runtime::memory::{Memory, MemoryPolicy};
use crate::runtime::runtime_error::{Result, RuntimeError};

/// Where opcode 3 takes a value from once the supplied inputs run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFallback {
    /// Prompt on stdout and read a single ASCII digit from stdin.
    #[default]
    Stdin,
    /// Fail with `InputExhausted`.
    Fail,
}

#[derive(Debug, Clone)]
pub struct VmConfig {
    /// Zero cells appended per program word when memory is loaded.
    pub scratch_multiplier: usize,
    pub memory_policy: MemoryPolicy,
    /// Instruction budget for a single `run` invocation.
    pub max_steps: Option<u64>,
    pub input_fallback: InputFallback,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            scratch_multiplier: 10,
            memory_policy: MemoryPolicy::Fixed,
            max_steps: None,
            input_fallback: InputFallback::Stdin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    RunToHalt,
    /// Return to the caller right after the first output of the invocation.
    PauseOnOutput,
}

/// Result of a single `execute` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Outputs emitted during this invocation only.
    pub outputs: Vec<i64>,
    pub ip: usize,
    pub bp: i64,
    /// `true` when the run stopped after an output, `false` on halt.
    pub paused: bool,
}

/// Run `memory` from `(ip, bp)` until halt, or until the first output when
/// `mode` is `PauseOnOutput`.
///
/// `inputs` are consumed in order by opcode 3; once exhausted the
/// configured fallback supplies values. The returned `(ip, bp)` always
/// point at the next unexecuted instruction, so feeding them back in
/// continues exactly where this call stopped.
pub fn execute(
    memory: &mut Memory,
    inputs: &[i64],
    mode: RunMode,
    ip: usize,
    bp: i64,
    config: &VmConfig,
) -> Result<RunOutcome> {
    let mut cpu = Cpu {
        memory,
        ip,
        bp,
        inputs,
        consumed: 0,
        fallback: config.input_fallback,
    };
    let mut outputs = Vec::new();
    let mut steps: u64 = 0;

    loop {
        if let Some(limit) = config.max_steps {
            if steps >= limit {
                return Err(RuntimeError::StepLimitExceeded { limit });
            }
        }
        steps += 1;

        let instruction = decode(cpu.memory, cpu.ip)?;
        if instruction.is_terminal() {
            debug!(ip = cpu.ip, bp = cpu.bp, steps, "halted");
            return Ok(RunOutcome {
                outputs,
                ip: cpu.ip,
                bp: cpu.bp,
                paused: false,
            });
        }

        if let Some(value) = cpu.step(&instruction)? {
            debug!(value, ip = cpu.ip, "output");
            outputs.push(value);

            if mode == RunMode::PauseOnOutput {
                debug!(ip = cpu.ip, bp = cpu.bp, "paused after output");
                return Ok(RunOutcome {
                    outputs,
                    ip: cpu.ip,
                    bp: cpu.bp,
                    paused: true,
                });
            }
        }
    }
}

/// Register file plus borrowed memory for one `execute` call.
struct Cpu<'a> {
    memory: &'a mut Memory,
    ip: usize,
    bp: i64,
    inputs: &'a [i64],
    consumed: usize,
    fallback: InputFallback,
}

impl Cpu<'_> {
    /// Execute one non-terminal instruction and advance `ip`.
    /// Returns the emitted value for opcode 4.
    fn step(&mut self, instruction: &Instruction) -> Result<Option<i64>> {
        let mut next_ip = self.ip + instruction.width();
        let mut output = None;

        match instruction.opcode {
            Opcode::Add => {
                let a = self.load(instruction.param(0))?;
                let b = self.load(instruction.param(1))?;
                self.store(instruction.param(2), a.wrapping_add(b))?;
            }
            Opcode::Mul => {
                let a = self.load(instruction.param(0))?;
                let b = self.load(instruction.param(1))?;
                self.store(instruction.param(2), a.wrapping_mul(b))?;
            }
            Opcode::Input => {
                let value = self.next_input()?;
                debug!(value, ip = self.ip, "input");
                self.store(instruction.param(0), value)?;
            }
            Opcode::Output => {
                output = Some(self.load(instruction.param(0))?);
            }
            Opcode::JumpIfTrue | Opcode::JumpIfFalse => {
                let cond = self.load(instruction.param(0))?;
                let taken = (cond != 0) == (instruction.opcode == Opcode::JumpIfTrue);
                if taken {
                    let target = self.load(instruction.param(1))?;
                    next_ip = usize::try_from(target).map_err(|_| RuntimeError::OutOfBounds {
                        address: target,
                        size: self.memory.len(),
                    })?;
                }
            }
            Opcode::LessThan => {
                let a = self.load(instruction.param(0))?;
                let b = self.load(instruction.param(1))?;
                self.store(instruction.param(2), (a < b) as i64)?;
            }
            Opcode::Equals => {
                let a = self.load(instruction.param(0))?;
                let b = self.load(instruction.param(1))?;
                self.store(instruction.param(2), (a == b) as i64)?;
            }
            Opcode::AdjustBase => {
                let delta = self.load(instruction.param(0))?;
                self.bp = self.bp.wrapping_add(delta);
            }
            // halt leaves ip on itself
            Opcode::Halt => return Ok(None),
        }

        trace!(ip = self.ip, next_ip, bp = self.bp, "executed");
        self.ip = next_ip;
        Ok(output)
    }

    fn load(&self, param: Parameter) -> Result<i64> {
        match param.mode {
            Mode::Immediate => Ok(param.value),
            Mode::Position | Mode::Relative => self.memory.read(self.address(param)),
        }
    }

    fn store(&mut self, param: Parameter, value: i64) -> Result<()> {
        let address = self.address(param);
        self.memory.write(address, value)
    }

    /// Resolve the memory address a non-immediate parameter names.
    fn address(&self, param: Parameter) -> i64 {
        match param.mode {
            Mode::Relative => self.bp.wrapping_add(param.value),
            Mode::Position | Mode::Immediate => param.value,
        }
    }

    fn next_input(&mut self) -> Result<i64> {
        if let Some(value) = self.inputs.get(self.consumed) {
            self.consumed += 1;
            return Ok(*value);
        }

        match self.fallback {
            InputFallback::Fail => Err(RuntimeError::InputExhausted { address: self.ip }),
            InputFallback::Stdin => {
                read_digit(&mut io::stdin().lock(), &mut io::stdout(), self.ip)
            }
        }
    }
}

/// Write a `> ` prompt, read one line and take its first non-blank byte as
/// a digit. The rest of the line is discarded.
fn read_digit(reader: &mut impl BufRead, prompt: &mut impl Write, ip: usize) -> Result<i64> {
    write!(prompt, "> ")?;
    prompt.flush()?;

    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Err(RuntimeError::InputExhausted { address: ip });
    }

    let first = line
        .iter()
        .copied()
        .find(|b| !b.is_ascii_whitespace())
        .unwrap_or(b'\n');

    match first {
        b @ b'0'..=b'9' => Ok(i64::from(b - b'0')),
        byte => Err(RuntimeError::InvalidInteractiveInput { byte }),
    }
}

// =============================================================================
// MACHINE - resumable execution state
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Loaded and not yet run.
    Ready,
    Paused,
    Halted,
}

/// One Intcode instance: its memory plus the registers needed to resume.
///
/// Each machine owns its memory outright; two machines built from the same
/// program never share cells.
#[derive(Debug, Clone)]
pub struct Machine {
    pub(crate) memory: Memory,
    pub(crate) ip: usize,
    pub(crate) bp: i64,
    pub(crate) status: Status,
    pub(crate) config: VmConfig,
}

impl Machine {
    pub fn new(program: &Program) -> Result<Self> {
        Self::with_config(program, VmConfig::default())
    }

    pub fn with_config(program: &Program, config: VmConfig) -> Result<Self> {
        let memory = Memory::load(
            program.words(),
            config.scratch_multiplier,
            config.memory_policy,
        )?;
        Ok(Self {
            memory,
            ip: 0,
            bp: 0,
            status: Status::Ready,
            config,
        })
    }

    /// Run from the saved registers and store the new ones.
    ///
    /// On error the registers are left where they were before the call;
    /// memory may already reflect instructions executed up to the failure.
    pub fn run(&mut self, inputs: &[i64], mode: RunMode) -> Result<RunOutcome> {
        let outcome = execute(
            &mut self.memory,
            inputs,
            mode,
            self.ip,
            self.bp,
            &self.config,
        )?;
        self.ip = outcome.ip;
        self.bp = outcome.bp;
        self.status = if outcome.paused {
            Status::Paused
        } else {
            Status::Halted
        };
        Ok(outcome)
    }

    /// Run until halt and return every output.
    pub fn run_to_halt(&mut self, inputs: &[i64]) -> Result<Vec<i64>> {
        Ok(self.run(inputs, RunMode::RunToHalt)?.outputs)
    }

    /// Run until the next output or halt.
    pub fn resume(&mut self, inputs: &[i64]) -> Result<RunOutcome> {
        self.run(inputs, RunMode::PauseOnOutput)
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn relative_base(&self) -> i64 {
        self.bp
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_halted(&self) -> bool {
        self.status == Status::Halted
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }
}
