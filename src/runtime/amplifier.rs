use tracing::{debug, info, instrument};

use crate::frontend::Program;
use crate::runtime::runtime_error::{Result, RuntimeError};
use crate::runtime::vm::{Machine, VmConfig};

/// One stage of the pipeline.
#[derive(Debug, Clone)]
struct Amplifier {
    phase: i64,
    machine: Machine,
    /// Whether the phase setting has been delivered.
    primed: bool,
}

/// A chain of machines running the same program, each with its own phase
/// setting and private memory.
///
/// Everything runs on the caller's thread; amplifiers take turns by
/// pausing after each output and being resumed in ring order.
#[derive(Debug, Clone)]
pub struct AmplifierPipeline {
    program: Program,
    config: VmConfig,
    amplifiers: Vec<Amplifier>,
}

impl AmplifierPipeline {
    pub fn new(program: &Program, phases: &[i64], config: VmConfig) -> Result<Self> {
        if phases.is_empty() {
            return Err(RuntimeError::EmptyPipeline);
        }

        let amplifiers = phases
            .iter()
            .map(|&phase| {
                Ok(Amplifier {
                    phase,
                    machine: Machine::with_config(program, config.clone())?,
                    primed: false,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            program: program.clone(),
            config,
            amplifiers,
        })
    }

    pub fn phases(&self) -> Vec<i64> {
        self.amplifiers.iter().map(|a| a.phase).collect()
    }

    pub fn len(&self) -> usize {
        self.amplifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplifiers.is_empty()
    }

    /// Run the amplifiers as a feedback ring.
    ///
    /// Amplifier `p mod k` gets its phase on its first turn only, the
    /// first amplifier additionally gets `seed` on its first turn, and
    /// every turn appends the signal carried from the previous turn. The
    /// ring stops as soon as an amplifier halts instead of pausing; the
    /// signal carried at that point is the result.
    ///
    /// Every call starts from freshly loaded machines, so the ring can be
    /// run again with a different seed.
    #[instrument(level = "debug", skip(self))]
    pub fn run_feedback(&mut self, seed: i64) -> Result<i64> {
        self.reload()?;
        let k = self.amplifiers.len();
        let mut carried: Vec<i64> = Vec::new();

        for turn in 0.. {
            let index = turn % k;
            let amp = &mut self.amplifiers[index];

            let mut inputs = Vec::with_capacity(carried.len() + 2);
            if !amp.primed {
                inputs.push(amp.phase);
                if index == 0 {
                    inputs.push(seed);
                }
                amp.primed = true;
            }
            inputs.extend_from_slice(&carried);

            let outcome = amp.machine.resume(&inputs)?;
            debug!(
                turn,
                amplifier = index,
                ?inputs,
                outputs = ?outcome.outputs,
                paused = outcome.paused,
                "amplifier turn"
            );

            if !outcome.outputs.is_empty() {
                carried = outcome.outputs;
            }

            if !outcome.paused {
                break;
            }
        }

        let signal = carried.last().copied().ok_or(RuntimeError::NoSignal)?;
        info!(phases = ?self.phases(), signal, "feedback loop complete");
        Ok(signal)
    }

    fn reload(&mut self) -> Result<()> {
        for amp in &mut self.amplifiers {
            amp.machine = Machine::with_config(&self.program, self.config.clone())?;
            amp.primed = false;
        }
        Ok(())
    }

    /// Run each amplifier once, to halt, passing the last output of one
    /// stage to the next as `[phase, signal]`.
    ///
    /// Fresh machines are used so the pipeline can be run repeatedly.
    #[instrument(level = "debug", skip(self))]
    pub fn run_serial(&self, seed: i64) -> Result<i64> {
        let mut signal = seed;

        for (index, amp) in self.amplifiers.iter().enumerate() {
            let mut machine = Machine::with_config(&self.program, self.config.clone())?;
            let outputs = machine.run_to_halt(&[amp.phase, signal])?;
            signal = outputs.last().copied().ok_or(RuntimeError::NoSignal)?;
            debug!(amplifier = index, phase = amp.phase, signal, "amplifier stage");
        }

        info!(phases = ?self.phases(), signal, "serial chain complete");
        Ok(signal)
    }
}
