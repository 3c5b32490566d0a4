use super::runtime_error::{Result, RuntimeError};

/// Upper bound on cells any memory may hold, loaded or grown.
pub const MAX_CELLS: usize = 1 << 24;

/// What happens when an access lands past the allocated cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryPolicy {
    /// The buffer never changes size; out-of-range access is an error.
    #[default]
    Fixed,
    /// Reads past the end yield 0; writes past the end grow the buffer.
    Grow,
}

/// Addressable Intcode memory. Negative addresses are always rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Vec<i64>,
    policy: MemoryPolicy,
}

impl Memory {
    pub fn new(cells: Vec<i64>, policy: MemoryPolicy) -> Self {
        Self { cells, policy }
    }

    /// Copy `program` and append `program.len() * scratch_multiplier` zero cells.
    ///
    /// Fails when the total would exceed `MAX_CELLS`.
    pub fn load(
        program: &[i64],
        scratch_multiplier: usize,
        policy: MemoryPolicy,
    ) -> Result<Self> {
        let total = program
            .len()
            .checked_mul(scratch_multiplier)
            .and_then(|scratch| scratch.checked_add(program.len()))
            .filter(|&total| total <= MAX_CELLS)
            .ok_or(RuntimeError::MemoryTooLarge {
                words: program.len(),
                multiplier: scratch_multiplier,
                limit: MAX_CELLS,
            })?;

        let mut cells = Vec::with_capacity(total);
        cells.extend_from_slice(program);
        cells.resize(total, 0);
        Ok(Self { cells, policy })
    }

    pub fn policy(&self) -> MemoryPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<i64> {
        self.cells
    }

    pub fn read(&self, address: i64) -> Result<i64> {
        let index = self.index(address)?;
        match self.cells.get(index) {
            Some(value) => Ok(*value),
            None => match self.policy {
                MemoryPolicy::Grow if index < MAX_CELLS => Ok(0),
                _ => Err(self.out_of_bounds(address)),
            },
        }
    }

    pub fn write(&mut self, address: i64, value: i64) -> Result<()> {
        let index = self.index(address)?;
        if index >= self.cells.len() {
            match self.policy {
                MemoryPolicy::Grow if index < MAX_CELLS => {
                    self.cells.resize(index + 1, 0);
                }
                _ => return Err(self.out_of_bounds(address)),
            }
        }
        self.cells[index] = value;
        Ok(())
    }

    fn index(&self, address: i64) -> Result<usize> {
        usize::try_from(address).map_err(|_| self.out_of_bounds(address))
    }

    fn out_of_bounds(&self, address: i64) -> RuntimeError {
        RuntimeError::OutOfBounds {
            address,
            size: self.cells.len(),
        }
    }
}
