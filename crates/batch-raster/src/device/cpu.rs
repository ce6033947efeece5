use anyhow::{Context, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::batch::{DrawRecord, PrimitiveKind};
use crate::kernels;
use crate::paint::color;

use super::AcceleratorInit;

/// CPU accelerator: a dedicated rayon pool plus its own "device" pixel memory.
///
/// Device memory is a separate allocation from the surface's host array, so
/// uploads and downloads are real copies, exactly as on a discrete GPU.
///
/// A launch covers the (pixel × call) index space by splitting the pixel
/// dimension across workers; each pixel walks the call dimension itself. No
/// two workers ever touch the same pixel.
pub(crate) struct CpuDevice {
    memory: Vec<u32>,
    width: u32,
    pool: ThreadPool,
}

impl CpuDevice {
    pub(crate) fn new(init: &AcceleratorInit, width: u32, height: u32) -> Result<Self> {
        let threads = init.resolved_cpu_threads()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("batch-raster-cpu-{i}"))
            .build()
            .context("failed to build CPU accelerator thread pool")?;

        log::info!(
            "CPU accelerator ready ({} workers, {}x{} surface)",
            pool.current_num_threads(),
            width,
            height
        );

        Ok(Self {
            memory: vec![0; width as usize * height as usize],
            width,
            pool,
        })
    }

    pub(crate) fn upload(&mut self, host: &[u32]) {
        self.memory.copy_from_slice(host);
    }

    pub(crate) fn download(&self, host: &mut [u32]) {
        host.copy_from_slice(&self.memory);
    }

    /// Runs one primitive kernel over every (pixel, record) pair. Blocks until done.
    pub(crate) fn run(&mut self, kind: PrimitiveKind, records: &[DrawRecord]) {
        let test = kernels::predicate(kind);
        let width = self.width as usize;
        let Self { memory, pool, .. } = self;

        pool.install(|| {
            memory.par_iter_mut().enumerate().for_each(|(i, px)| {
                let (x, y) = ((i % width) as i32, (i / width) as i32);
                for record in records {
                    if test(x, y, record) {
                        *px = record.color;
                    }
                }
            });
        });
    }

    pub(crate) fn fill(&mut self, value: u32) {
        let Self { memory, pool, .. } = self;
        pool.install(|| memory.par_iter_mut().for_each(|px| *px = value));
    }

    pub(crate) fn copy_raw(&mut self, source: &[u32], force_opaque: bool) {
        let Self { memory, pool, .. } = self;
        pool.install(|| {
            memory
                .par_iter_mut()
                .zip(source.par_iter())
                .for_each(|(px, &src)| *px = if force_opaque { color::opaque(src) } else { src });
        });
    }

    /// Releases device memory first, then the worker pool.
    pub(crate) fn release(self) {
        let Self { memory, pool, .. } = self;
        drop(memory);
        log::debug!("CPU accelerator memory released");
        drop(pool);
        log::debug!("CPU accelerator pool released");
    }
}
