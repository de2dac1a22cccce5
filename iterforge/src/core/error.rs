//! Rule violations raised by the pure record layer.

use thiserror::Error;

use crate::core::result::RunStatus;

/// A request the run records refuse to apply.
///
/// Storage failures are not represented here; the I/O layer reports those
/// through `anyhow` with path context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("invalid run config: {0}")]
    InvalidConfig(String),

    #[error("iteration {got} appended out of sequence (expected {expected})")]
    OutOfSequence { expected: u32, got: u32 },

    #[error("iteration {got} exceeds the budget of {max_iterations}")]
    BudgetExceeded { max_iterations: u32, got: u32 },

    #[error("run already finished with status {status}")]
    AlreadyFinished { status: RunStatus },

    #[error("cannot finish a run with non-terminal status {0}")]
    NotTerminal(RunStatus),

    #[error("manifest already completed")]
    ManifestFinalized,
}
