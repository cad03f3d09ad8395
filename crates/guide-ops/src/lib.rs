//! Guide mesh operations: preprocessing for stable booleans and the
//! boolean-difference orchestrator with channel-only fallback.
//!
//! Nothing in this crate returns a geometry error to its caller. Kernel
//! failures and kernel panics are caught per stage, logged, and turned into
//! fallback behavior or a conservative default.

pub mod boolean;
pub mod failure;
pub mod preprocess;
pub mod stage;
pub mod types;

pub use boolean::BooleanOrchestrator;
pub use failure::{FailureBundle, FailureStore, DEFAULT_FAILURE_ROOT};
pub use preprocess::{
    detect_self_intersections, is_watertight, mesh_qc, preprocess, preprocess_optional,
    preprocess_with_report, MeshQc, PreprocessParams, Stage, StageOutcome,
};
pub use stage::{run_stage, StageError};
pub use types::*;
