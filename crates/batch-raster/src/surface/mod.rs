//! Dual-resident pixel surface.

mod pixel_surface;
mod target;

pub use pixel_surface::{HostWritePolicy, PixelSurface};
pub use target::DeviceTarget;
