//! Manufacturing quality checks for surgical guide meshes.
//!
//! Four independent checks, each callable on its own, and [`qc_summary`]
//! which runs all four and passes only if every check passes. Checks never
//! fail: missing geometry or a failing kernel yields a defined default.

pub mod check;
pub mod collision;
pub mod config;
pub mod orientation;
pub mod summary;
pub mod thickness;
pub mod undercut;

pub use check::QcCheck;
pub use collision::{sleeve_collision_check, Collision, CollisionResult};
pub use config::QcConfig;
pub use orientation::{printable_orientation_score, OrientationResult};
pub use summary::{qc_summary, QcSummary};
pub use thickness::{minimum_thickness, ThicknessResult};
pub use undercut::{undercut_detection, UndercutResult};
