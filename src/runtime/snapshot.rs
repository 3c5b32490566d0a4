use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::runtime::memory::Memory;
use crate::runtime::runtime_error::Result;
use crate::runtime::vm::{Machine, Status, VmConfig};

/// A serializable capture of a machine between runs.
///
/// Restoring a snapshot and resuming it behaves exactly like resuming the
/// machine it was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub memory: Vec<i64>,
    pub ip: usize,
    pub bp: i64,
    pub halted: bool,
}

impl Snapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(postcard::from_bytes(bytes)?)
    }
}

impl Machine {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            memory: self.memory.as_slice().to_vec(),
            ip: self.ip,
            bp: self.bp,
            halted: self.is_halted(),
        }
    }

    /// Rebuild a machine from a snapshot. The snapshot's memory is used
    /// as-is; only the memory policy and limits come from `config`.
    pub fn restore(snapshot: Snapshot, config: VmConfig) -> Self {
        debug!(
            ip = snapshot.ip,
            bp = snapshot.bp,
            cells = snapshot.memory.len(),
            "restoring snapshot"
        );
        let status = if snapshot.halted {
            Status::Halted
        } else {
            Status::Paused
        };
        Self {
            memory: Memory::new(snapshot.memory, config.memory_policy),
            ip: snapshot.ip,
            bp: snapshot.bp,
            status,
            config,
        }
    }
}
