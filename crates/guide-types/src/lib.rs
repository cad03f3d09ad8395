pub mod implant;
pub mod mesh;
pub mod primitives;

pub use implant::*;
pub use mesh::*;
