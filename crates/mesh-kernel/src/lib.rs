//! Geometry kernel capability interface for the guide pipeline.
//!
//! The pipeline only talks to [`MeshKernel`]. Which implementation backs it is
//! decided once at startup by [`default_kernel`]: the truck/csgrs-backed
//! [`NativeKernel`] when the `native` feature is enabled, otherwise the
//! identity [`NullKernel`]. A missing capability is then an ordinary
//! `NotSupported` error rather than a special case at every call site.

#[cfg(feature = "native")]
pub mod native;
pub mod null_kernel;
pub mod traits;
pub mod types;

#[cfg(feature = "native")]
pub use native::NativeKernel;
pub use null_kernel::NullKernel;
pub use traits::MeshKernel;
pub use types::*;

/// The best kernel compiled into this build.
pub fn default_kernel() -> Box<dyn MeshKernel> {
    #[cfg(feature = "native")]
    let kernel: Box<dyn MeshKernel> = Box::new(NativeKernel::new());
    #[cfg(not(feature = "native"))]
    let kernel: Box<dyn MeshKernel> = Box::new(NullKernel::new());

    tracing::info!(kernel = kernel.name(), "geometry kernel selected");
    kernel
}
