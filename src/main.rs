//! Command-line front end for the Intcode VM.
//!
//! Usage: `intcode <run|amplify|disasm|snapshot|resume> <file> [options]`

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use intcode::bytecode::disasm::print_listing;
use intcode::{
    AmplifierPipeline, InputFallback, Machine, MemoryPolicy, Program, RunMode, Snapshot, VmConfig,
};

#[derive(Parser, Debug)]
#[command(name = "intcode")]
#[command(about = "Run Intcode programs")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    vm: VmArgs,
}

#[derive(Args, Debug)]
struct VmArgs {
    /// Grow memory on demand instead of failing past the scratch area
    #[arg(long, global = true)]
    grow: bool,

    /// Zero cells appended per program word
    #[arg(long, global = true, default_value_t = 10)]
    scratch: usize,

    /// Abort a run after this many instructions
    #[arg(long = "max-steps", global = true)]
    max_steps: Option<u64>,

    /// Fail instead of prompting on stdin when inputs run out
    #[arg(long = "no-stdin", global = true)]
    no_stdin: bool,
}

impl VmArgs {
    fn config(&self) -> VmConfig {
        VmConfig {
            scratch_multiplier: self.scratch,
            memory_policy: if self.grow {
                MemoryPolicy::Grow
            } else {
                MemoryPolicy::Fixed
            },
            max_steps: self.max_steps,
            input_fallback: if self.no_stdin {
                InputFallback::Fail
            } else {
                InputFallback::Stdin
            },
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a program to halt and print its outputs
    Run {
        file: PathBuf,
        /// Comma-separated input values
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        input: Vec<i64>,
    },
    /// Run a chain of amplifiers and print the final signal
    Amplify {
        file: PathBuf,
        /// Comma-separated phase settings, one per amplifier
        #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
        phases: Vec<i64>,
        /// Single pass instead of a feedback loop
        #[arg(long)]
        serial: bool,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        seed: i64,
    },
    /// Print a disassembly listing
    Disasm { file: PathBuf },
    /// Run until the first output, then save the paused machine
    Snapshot {
        file: PathBuf,
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        input: Vec<i64>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Resume a saved machine and run it to halt
    Resume {
        snapshot: PathBuf,
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        input: Vec<i64>,
    },
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("intcode=warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let config = cli.vm.config();

    if let Err(e) = dispatch(cli.command, config) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn dispatch(command: Command, config: VmConfig) -> Result<()> {
    match command {
        Command::Run { file, input } => {
            let mut machine = Machine::with_config(&load(&file)?, config)?;
            let outputs = machine.run_to_halt(&input).context("program failed")?;
            print_outputs(&outputs);
        }
        Command::Amplify {
            file,
            phases,
            serial,
            seed,
        } => {
            let mut pipeline = AmplifierPipeline::new(&load(&file)?, &phases, config)?;
            let signal = if serial {
                pipeline.run_serial(seed)
            } else {
                pipeline.run_feedback(seed)
            }
            .with_context(|| format!("amplifier pipeline {:?} failed", phases))?;
            println!("{}", signal);
        }
        Command::Disasm { file } => {
            let machine = Machine::with_config(&load(&file)?, config)?;
            print_listing(machine.memory());
        }
        Command::Snapshot { file, input, out } => {
            let mut machine = Machine::with_config(&load(&file)?, config)?;
            let outcome = machine
                .run(&input, RunMode::PauseOnOutput)
                .context("program failed")?;
            print_outputs(&outcome.outputs);

            let bytes = machine.snapshot().to_bytes()?;
            fs::write(&out, &bytes)
                .with_context(|| format!("failed to write '{}'", out.display()))?;
            info!(
                path = %out.display(),
                bytes = bytes.len(),
                paused = outcome.paused,
                "snapshot saved"
            );
        }
        Command::Resume { snapshot, input } => {
            let mut machine = Machine::restore(read_snapshot(&snapshot)?, config);
            let outputs = machine.run_to_halt(&input).context("program failed")?;
            print_outputs(&outputs);
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<Program> {
    Ok(Program::from_file(path)?)
}

fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
    Snapshot::from_bytes(&bytes)
        .with_context(|| format!("'{}' is not a machine snapshot", path.display()))
}

fn print_outputs(outputs: &[i64]) {
    for value in outputs {
        println!("{}", value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("intcode-cli-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_missing_program_keeps_io_cause() {
        let err = load(Path::new("/nonexistent/intcode.txt")).unwrap_err();
        let message = format!("{:#}", err);
        assert!(
            message.starts_with("failed to read '/nonexistent/intcode.txt': "),
            "{}",
            message
        );
        assert!(err.chain().count() >= 2);
    }

    #[test]
    fn test_garbage_snapshot_keeps_decode_cause() {
        let path = temp_path("garbage.snap");
        fs::write(&path, [0xff]).unwrap();
        let err = read_snapshot(&path).unwrap_err();
        fs::remove_file(&path).ok();

        let message = format!("{:#}", err);
        assert!(
            message.contains("is not a machine snapshot: snapshot encoding failed"),
            "{}",
            message
        );
        assert!(err.chain().count() >= 3);
    }

    #[test]
    fn test_runtime_failure_reports_opcode() {
        let path = temp_path("bad.txt");
        fs::write(&path, "1,0,0,0,42\n").unwrap();
        let command = Command::Run {
            file: path.clone(),
            input: Vec::new(),
        };
        let err = dispatch(command, VmConfig::default()).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(
            format!("{:#}", err),
            "program failed: unknown opcode 42 (word 42) at address 4"
        );
    }
}
