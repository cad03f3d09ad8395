//! Fault isolation for single kernel calls.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use mesh_kernel::{KernelError, KernelResult};

/// Why a pipeline stage produced nothing usable.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StageError {
    #[error("{stage}: {source}")]
    Kernel {
        stage: &'static str,
        source: KernelError,
    },

    #[error("{stage}: kernel panicked: {message}")]
    Panicked { stage: &'static str, message: String },
}

impl StageError {
    pub fn stage(&self) -> &'static str {
        match self {
            StageError::Kernel { stage, .. } | StageError::Panicked { stage, .. } => *stage,
        }
    }

    /// True when the kernel simply lacks the operation.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, StageError::Kernel { source, .. } if source.is_not_supported())
    }
}

/// Run one kernel call, turning both its error and any panic into a
/// `StageError`.
pub fn run_stage<T>(
    stage: &'static str,
    f: impl FnOnce() -> KernelResult<T>,
) -> Result<T, StageError> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(StageError::Kernel { stage, source }),
        Err(payload) => Err(StageError::Panicked {
            stage,
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
