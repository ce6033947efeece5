use anyhow::{Context, Result};

use crate::device::AcceleratorSession;
use crate::paint::Argb;

use super::DeviceTarget;

/// How a host write treats a device copy that holds unread kernel output.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum HostWritePolicy {
    /// Pull the device copy before writing, so kernel output survives the
    /// next upload.
    #[default]
    Coherent,
    /// Write the host array as-is. If a kernel ran since the last readback,
    /// the next device launch uploads the stale host array over its output.
    Legacy,
}

/// A `width × height` ARGB raster kept in two places: a host array and the
/// session's device memory.
///
/// - `device_stale`: the host array has writes the device has not seen.
/// - `host_stale`: the device has kernel output the host has not seen.
///
/// Whichever side is read synchronises from the other first. Both flags start
/// clear, with both copies zeroed.
#[derive(Debug)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    host: Vec<u32>,
    device_stale: bool,
    host_stale: bool,
    policy: HostWritePolicy,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32, policy: HostWritePolicy) -> Self {
        Self {
            width,
            height,
            host: vec![0; width as usize * height as usize],
            device_stale: false,
            host_stale: false,
            policy,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.host.len()
    }

    pub fn is_empty(&self) -> bool {
        self.host.is_empty()
    }

    pub fn policy(&self) -> HostWritePolicy {
        self.policy
    }

    pub fn device_stale(&self) -> bool {
        self.device_stale
    }

    pub fn host_stale(&self) -> bool {
        self.host_stale
    }

    /// Row-major index of `(x, y)`.
    ///
    /// # Panics
    /// If `(x, y)` lies outside the surface.
    pub fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} surface",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    /// Inverse of [`PixelSurface::index`].
    pub fn position(&self, i: usize) -> (u32, u32) {
        let w = self.width as usize;
        ((i % w) as u32, (i / w) as u32)
    }

    /// Reads element `i`, pulling the device copy first if the host is stale.
    pub fn read(&mut self, session: &mut AcceleratorSession, i: usize) -> Result<Argb> {
        self.sync_host(session)?;
        Ok(self.host[i])
    }

    /// The whole host array, pulled from the device first if stale.
    pub fn snapshot(&mut self, session: &mut AcceleratorSession) -> Result<&[Argb]> {
        self.sync_host(session)?;
        Ok(&self.host)
    }

    /// Stores `color` at element `i` of the host array.
    pub fn write(&mut self, session: &mut AcceleratorSession, i: usize, color: Argb) -> Result<()> {
        if self.policy == HostWritePolicy::Coherent {
            self.sync_host(session)?;
        }
        self.host[i] = color;
        self.device_stale = true;
        Ok(())
    }

    /// Makes the device copy current and marks the host stale, since the
    /// caller is about to launch a kernel that writes device memory.
    pub fn acquire_for_device_write(
        &mut self,
        session: &mut AcceleratorSession,
    ) -> Result<DeviceTarget> {
        if self.device_stale {
            session
                .upload(&self.host)
                .context("failed to push host pixels to the device")?;
            self.device_stale = false;
            log::trace!("surface pushed to device");
        }
        self.host_stale = true;
        Ok(DeviceTarget::new(self.width, self.height))
    }

    fn sync_host(&mut self, session: &mut AcceleratorSession) -> Result<()> {
        if self.host_stale {
            session
                .download(&mut self.host)
                .context("failed to pull device pixels to the host")?;
            self.host_stale = false;
            log::trace!("surface pulled from device");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::AcceleratorInit;

    const RED: Argb = 0xFFFF_0000;
    const BLUE: Argb = 0xFF00_00FF;

    fn setup(policy: HostWritePolicy) -> (PixelSurface, AcceleratorSession) {
        let init = AcceleratorInit { cpu_threads: Some(1), ..AcceleratorInit::cpu() };
        let session = AcceleratorSession::new(&init, 2, 2).unwrap();
        (PixelSurface::new(2, 2, policy), session)
    }

    #[test]
    fn index_and_position_are_inverse() {
        let surface = PixelSurface::new(3, 2, HostWritePolicy::default());
        assert_eq!(surface.index(2, 1), 5);
        assert_eq!(surface.position(5), (2, 1));
        for i in 0..surface.len() {
            let (x, y) = surface.position(i);
            assert_eq!(surface.index(x, y), i);
        }
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn index_out_of_bounds_panics() {
        PixelSurface::new(2, 2, HostWritePolicy::default()).index(2, 0);
    }

    #[test]
    fn write_marks_device_stale_and_acquire_pushes() {
        let (mut surface, mut session) = setup(HostWritePolicy::Coherent);
        surface.write(&mut session, 1, RED).unwrap();
        assert!(surface.device_stale());
        assert!(!surface.host_stale());

        let target = surface.acquire_for_device_write(&mut session).unwrap();
        assert_eq!(target.len(), 4);
        assert!(!surface.device_stale());
        assert!(surface.host_stale());

        // The pushed value comes back on the next pull.
        assert_eq!(surface.read(&mut session, 1).unwrap(), RED);
        assert!(!surface.host_stale());
    }

    #[test]
    fn read_pulls_kernel_output() {
        let (mut surface, mut session) = setup(HostWritePolicy::Coherent);
        let target = surface.acquire_for_device_write(&mut session).unwrap();
        session.fill(target, BLUE).unwrap();
        assert_eq!(surface.snapshot(&mut session).unwrap(), &[BLUE; 4]);
    }

    #[test]
    fn coherent_write_keeps_kernel_output() {
        let (mut surface, mut session) = setup(HostWritePolicy::Coherent);
        let target = surface.acquire_for_device_write(&mut session).unwrap();
        session.fill(target, BLUE).unwrap();

        surface.write(&mut session, 0, RED).unwrap();
        surface.acquire_for_device_write(&mut session).unwrap();

        assert_eq!(surface.snapshot(&mut session).unwrap(), &[RED, BLUE, BLUE, BLUE]);
    }

    #[test]
    fn legacy_write_discards_kernel_output() {
        let (mut surface, mut session) = setup(HostWritePolicy::Legacy);
        let target = surface.acquire_for_device_write(&mut session).unwrap();
        session.fill(target, BLUE).unwrap();

        // The host array never saw the fill, and the next acquire uploads it.
        surface.write(&mut session, 0, RED).unwrap();
        surface.acquire_for_device_write(&mut session).unwrap();

        assert_eq!(surface.snapshot(&mut session).unwrap(), &[RED, 0, 0, 0]);
    }
}
