use std::fmt;

use anyhow::{Context, Result};

use crate::batch::{DrawRecord, PrimitiveKind};
use crate::paint::Argb;
use crate::surface::DeviceTarget;

use super::{AcceleratorInit, CpuDevice, GpuDevice};

/// Which accelerator a session runs its kernels on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// The rayon-backed CPU accelerator.
    Cpu,
    /// A wgpu compute device.
    Gpu,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeviceKind::Cpu => "cpu",
            DeviceKind::Gpu => "gpu",
        })
    }
}

enum Backend {
    Cpu(CpuDevice),
    Gpu(GpuDevice),
}

/// Compute context plus one device holding the surface's device-side pixels.
///
/// Every operation is synchronous: it returns only once the device finished
/// and its writes are visible to the next operation.
///
/// Using a session after [`AcceleratorSession::dispose`] panics.
pub struct AcceleratorSession {
    backend: Option<Backend>,
    kind: DeviceKind,
    width: u32,
    height: u32,
}

impl AcceleratorSession {
    /// Opens a session and allocates a zeroed `width * height` device block.
    pub fn new(init: &AcceleratorInit, width: u32, height: u32) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "surface has zero size ({width}x{height})");
        width
            .checked_mul(height)
            .with_context(|| format!("{width}x{height} surface exceeds u32 pixel indexing"))?;

        let backend = if init.prefer_cpu {
            Backend::Cpu(CpuDevice::new(init, width, height)?)
        } else {
            match GpuDevice::new(init, width, height) {
                Ok(gpu) => Backend::Gpu(gpu),
                Err(err) if init.allow_cpu_fallback => {
                    log::warn!("GPU accelerator unavailable, falling back to CPU: {err:#}");
                    Backend::Cpu(CpuDevice::new(init, width, height)?)
                }
                Err(err) => return Err(err.context("GPU accelerator required but unavailable")),
            }
        };

        let kind = match backend {
            Backend::Cpu(_) => DeviceKind::Cpu,
            Backend::Gpu(_) => DeviceKind::Gpu,
        };
        log::debug!("accelerator session opened on {kind}");

        Ok(Self { backend: Some(backend), kind, width, height })
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_disposed(&self) -> bool {
        self.backend.is_none()
    }

    /// Copies the full host array to device memory.
    pub(crate) fn upload(&mut self, host: &[u32]) -> Result<()> {
        self.check_len(host.len());
        match self.backend() {
            Backend::Cpu(cpu) => {
                cpu.upload(host);
                Ok(())
            }
            Backend::Gpu(gpu) => gpu.upload(host).context("upload to GPU failed"),
        }
    }

    /// Copies device memory over the full host array.
    pub(crate) fn download(&mut self, host: &mut [u32]) -> Result<()> {
        self.check_len(host.len());
        match self.backend() {
            Backend::Cpu(cpu) => {
                cpu.download(host);
                Ok(())
            }
            Backend::Gpu(gpu) => gpu.download(host).context("download from GPU failed"),
        }
    }

    /// Launches `kind`'s kernel over (every pixel of `target`) × (every record).
    pub(crate) fn run(
        &mut self,
        kind: PrimitiveKind,
        target: DeviceTarget,
        records: &[DrawRecord],
    ) -> Result<()> {
        self.check_target(target);
        if records.is_empty() {
            return Ok(());
        }
        log::trace!("launch {kind}: {} pixels x {} calls", target.len(), records.len());
        match self.backend() {
            Backend::Cpu(cpu) => {
                cpu.run(kind, records);
                Ok(())
            }
            Backend::Gpu(gpu) => gpu
                .run(kind, records)
                .with_context(|| format!("{kind} launch failed")),
        }
    }

    /// Overwrites every pixel of `target` with `color`.
    pub(crate) fn fill(&mut self, target: DeviceTarget, color: Argb) -> Result<()> {
        self.check_target(target);
        log::trace!("launch fill: {} pixels, color {color:#010x}", target.len());
        match self.backend() {
            Backend::Cpu(cpu) => {
                cpu.fill(color);
                Ok(())
            }
            Backend::Gpu(gpu) => gpu.fill(color).context("fill launch failed"),
        }
    }

    /// Overwrites `target` with `source`, optionally forcing alpha to 0xFF.
    pub(crate) fn copy_raw(
        &mut self,
        target: DeviceTarget,
        source: &[u32],
        force_opaque: bool,
    ) -> Result<()> {
        self.check_target(target);
        anyhow::ensure!(
            source.len() == target.len(),
            "copy source has {} pixels, surface has {}",
            source.len(),
            target.len()
        );
        log::trace!("launch copy_raw: {} pixels, force_opaque={force_opaque}", source.len());
        match self.backend() {
            Backend::Cpu(cpu) => {
                cpu.copy_raw(source, force_opaque);
                Ok(())
            }
            Backend::Gpu(gpu) => gpu
                .copy_raw(source, force_opaque)
                .context("copy launch failed"),
        }
    }

    /// Releases device memory, the device and the context. Idempotent.
    pub fn dispose(&mut self) {
        let Some(backend) = self.backend.take() else {
            return;
        };
        match backend {
            Backend::Cpu(cpu) => cpu.release(),
            Backend::Gpu(gpu) => gpu.release(),
        }
        log::debug!("accelerator session on {} disposed", self.kind);
    }

    fn backend(&mut self) -> &mut Backend {
        match self.backend.as_mut() {
            Some(backend) => backend,
            None => panic!("accelerator session used after dispose"),
        }
    }

    fn check_len(&self, len: usize) {
        assert_eq!(
            len,
            self.width as usize * self.height as usize,
            "host array does not match the {}x{} device block",
            self.width,
            self.height
        );
    }

    fn check_target(&self, target: DeviceTarget) {
        assert!(
            target.width() == self.width && target.height() == self.height,
            "device target {}x{} does not match the {}x{} session",
            target.width(),
            target.height(),
            self.width,
            self.height
        );
    }
}

impl Drop for AcceleratorSession {
    fn drop(&mut self) {
        self.dispose();
    }
}
