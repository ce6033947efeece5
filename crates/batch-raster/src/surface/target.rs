/// Proof that a surface's device copy is current and about to be written.
///
/// Only [`PixelSurface::acquire_for_device_write`](super::PixelSurface::acquire_for_device_write)
/// hands these out to the engine, so every kernel launch goes through it first.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeviceTarget {
    width: u32,
    height: u32,
}

impl DeviceTarget {
    pub(crate) const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel count.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
