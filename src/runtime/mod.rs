pub mod amplifier;
pub mod memory;
pub mod runtime_error;
pub mod snapshot;
pub mod vm;

pub use amplifier::AmplifierPipeline;
pub use memory::{Memory, MemoryPolicy};
pub use runtime_error::{ErrorKind, RuntimeError};
pub use snapshot::Snapshot;
pub use vm::{InputFallback, Machine, RunMode, RunOutcome, Status, VmConfig, execute};
