//! Batched 2D rasterizer over an accelerator-resident pixel surface.
//!
//! Draw calls (lines, triangles, rectangles, circles; stroke or fill) are
//! queued per primitive kind and rasterized on [`Engine::flush`] by per-pixel
//! kernels running on a wgpu compute device, or on the rayon-backed CPU
//! accelerator. The pixel surface lives on both the host and the device and
//! synchronises lazily in whichever direction is stale.
//!
//! ```no_run
//! use batch_raster::{Engine, paint::color};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut engine = Engine::new(4, 4, true)?;
//! engine.fill(color::BLACK)?;
//! engine.enqueue_rectangle_stroke(0, 0, 3, 3, color::WHITE);
//! engine.flush()?;
//! assert_eq!(engine.get_pixel(1, 1)?, color::BLACK);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod device;
pub mod kernels;
pub mod logging;
pub mod paint;
pub mod surface;

mod engine;

pub use batch::{DrawCall, Mode, PrimitiveKind};
pub use device::{AcceleratorInit, DeviceKind};
pub use engine::{Engine, EngineConfig, EngineState};
pub use paint::Argb;
pub use surface::HostWritePolicy;
