//! Accelerator session and its backends.
//!
//! This module is responsible for:
//! - creating the compute context and device (wgpu GPU, or the rayon CPU accelerator)
//! - owning the surface's device-side pixel memory
//! - launching kernels over the (pixel × draw call) index space and waiting for them

mod cpu;
mod gpu;
mod init;
mod session;

pub(crate) use cpu::CpuDevice;
pub(crate) use gpu::GpuDevice;
pub use init::{AcceleratorInit, CPU_THREADS_ENV};
pub use session::{AcceleratorSession, DeviceKind};
