use std::sync::mpsc;

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::batch::{DrawRecord, PrimitiveKind};

use super::AcceleratorInit;

/// Invocations per workgroup along x. Must match `@workgroup_size` in the shaders.
const WORKGROUP_SIZE: u32 = 64;

const FLAG_FORCE_OPAQUE: u32 = 1;

/// Per-dispatch parameters (32 bytes). Must match `Params` in the shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LaunchParams {
    width: u32,
    height: u32,
    pixel_base: u32,
    pixel_end: u32,
    call_base: u32,
    call_end: u32,
    value: u32,
    flags: u32,
}

/// Compute pipelines, compiled once at construction.
struct Kernels {
    bind_group_layout: wgpu::BindGroupLayout,
    /// Indexed by [`PrimitiveKind::index`].
    primitives: [wgpu::ComputePipeline; PrimitiveKind::COUNT],
    fill: wgpu::ComputePipeline,
    copy_raw: wgpu::ComputePipeline,
}

/// Device-resident buffers of one surface.
struct Memory {
    /// The surface's device copy (`STORAGE | COPY_SRC | COPY_DST`).
    pixels: wgpu::Buffer,
    /// Mappable staging buffer for device → host copies.
    readback: wgpu::Buffer,
    /// Bound at binding 2 when a kernel has no real source.
    placeholder: wgpu::Buffer,
}

/// GPU accelerator backed by wgpu compute.
///
/// Owns the wgpu core objects:
/// - Instance (context) / Adapter / Device / Queue
/// - the compute pipelines for every kernel
/// - the surface's device buffer and its readback staging buffer
pub(crate) struct GpuDevice {
    instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    kernels: Kernels,
    memory: Memory,

    width: u32,
    height: u32,
    pixel_count: u32,
    max_groups: u32,
    /// Largest draw-call batch a single storage binding can hold.
    max_calls_per_binding: usize,
}

impl GpuDevice {
    /// Creates a GPU accelerator with a zeroed `width * height` device buffer.
    ///
    /// Blocks on wgpu's asynchronous adapter/device acquisition.
    pub(crate) fn new(init: &AcceleratorInit, width: u32, height: u32) -> Result<Self> {
        pollster::block_on(Self::new_async(init, width, height))
    }

    async fn new_async(init: &AcceleratorInit, width: u32, height: u32) -> Result<Self> {
        let pixel_count = width
            .checked_mul(height)
            .context("surface has more pixels than a GPU launch can index")?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: init.force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("batch-raster device"),
                required_features: wgpu::Features::empty(),
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let byte_len = u64::from(pixel_count) * 4;
        let limits = device.limits();
        anyhow::ensure!(
            byte_len <= u64::from(limits.max_storage_buffer_binding_size),
            "{width}x{height} surface needs {byte_len} bytes; device storage binding limit is {}",
            limits.max_storage_buffer_binding_size
        );

        let kernels = Kernels::new(&device);
        let memory = Memory::new(&device, byte_len);

        let info = adapter.get_info();
        log::info!(
            "GPU accelerator ready: {} ({:?}, {:?}), {}x{} surface",
            info.name,
            info.device_type,
            info.backend,
            width,
            height
        );

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            kernels,
            memory,
            width,
            height,
            pixel_count,
            max_groups: limits.max_compute_workgroups_per_dimension.max(1),
            max_calls_per_binding: max_calls_per_binding(&limits),
        })
    }

    /// Host → device copy of the whole surface. Blocks until visible.
    pub(crate) fn upload(&mut self, host: &[u32]) -> Result<()> {
        self.queue
            .write_buffer(&self.memory.pixels, 0, bytemuck::cast_slice(host));
        let index = self.queue.submit(std::iter::empty());
        self.wait(index)
    }

    /// Device → host copy of the whole surface. Blocks until complete.
    pub(crate) fn download(&mut self, host: &mut [u32]) -> Result<()> {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("batch-raster readback encoder"),
            });
        encoder.copy_buffer_to_buffer(
            &self.memory.pixels,
            0,
            &self.memory.readback,
            0,
            self.memory.pixels.size(),
        );
        let index = self.queue.submit(std::iter::once(encoder.finish()));

        let (sender, receiver) = mpsc::channel();
        self.memory
            .readback
            .slice(..)
            .map_async(wgpu::MapMode::Read, move |result| {
                // The receiver only disappears if this function already bailed out.
                let _ = sender.send(result);
            });
        let mapped = self.wait(index).and_then(|()| {
            receiver
                .recv()
                .context("readback map callback was dropped")?
                .context("failed to map readback buffer")
        });
        if let Err(err) = mapped {
            self.abandon_readback();
            return Err(err);
        }

        {
            let view = self.memory.readback.slice(..).get_mapped_range();
            host.copy_from_slice(bytemuck::cast_slice(&view[..]));
        }
        self.memory.readback.unmap();
        Ok(())
    }

    /// Swaps in a fresh staging buffer after a readback that never completed,
    /// so the next download does not find the old one still map-pending.
    fn abandon_readback(&mut self) {
        log::warn!("GPU readback abandoned; recreating staging buffer");
        let fresh = Memory::readback_buffer(&self.device, self.memory.readback.size());
        let stale = std::mem::replace(&mut self.memory.readback, fresh);
        stale.destroy();
    }

    /// Runs one primitive kernel over (every pixel × every record). Blocks until done.
    ///
    /// Batches larger than one storage binding are uploaded and launched in
    /// consecutive slices.
    pub(crate) fn run(&mut self, kind: PrimitiveKind, records: &[DrawRecord]) -> Result<()> {
        let pipeline = &self.kernels.primitives[kind.index()];
        for slice in records.chunks(self.max_calls_per_binding) {
            let calls = u32::try_from(slice.len())
                .context("draw-call batch is larger than a GPU launch can index")?;
            let source = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("batch-raster draw calls"),
                    contents: bytemuck::cast_slice(slice),
                    usage: wgpu::BufferUsages::STORAGE,
                });
            self.dispatch(kind.entry_point(), pipeline, &source, calls, 0, 0)?;
        }
        Ok(())
    }

    pub(crate) fn fill(&mut self, value: u32) -> Result<()> {
        self.dispatch("fill", &self.kernels.fill, &self.memory.placeholder, 1, value, 0)
    }

    pub(crate) fn copy_raw(&mut self, source: &[u32], force_opaque: bool) -> Result<()> {
        let source = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("batch-raster copy source"),
                contents: bytemuck::cast_slice(source),
                usage: wgpu::BufferUsages::STORAGE,
            });
        let flags = if force_opaque { FLAG_FORCE_OPAQUE } else { 0 };
        self.dispatch("copy_raw", &self.kernels.copy_raw, &source, 1, 0, flags)
    }

    /// Releases device memory, then the device and its pipelines, then the instance.
    pub(crate) fn release(self) {
        let Self { instance, adapter, device, queue, kernels, memory, .. } = self;

        memory.pixels.destroy();
        memory.readback.destroy();
        drop(memory);
        log::debug!("GPU accelerator memory released");

        drop(kernels);
        drop(queue);
        device.destroy();
        drop(device);
        drop(adapter);
        log::debug!("GPU accelerator device released");

        drop(instance);
        log::debug!("GPU accelerator context released");
    }

    /// Encodes the (pixels × calls) launch, split into chunks whenever a
    /// dimension exceeds the device's workgroup-count limit, and waits for it.
    fn dispatch(
        &self,
        label: &str,
        pipeline: &wgpu::ComputePipeline,
        source: &wgpu::Buffer,
        calls: u32,
        value: u32,
        flags: u32,
    ) -> Result<()> {
        let pixel_span = self.max_groups.saturating_mul(WORKGROUP_SIZE);

        let mut launches = Vec::new();
        for (pixel_base, pixel_end) in spans(self.pixel_count, pixel_span) {
            for (call_base, call_end) in spans(calls, self.max_groups) {
                let params = LaunchParams {
                    width: self.width,
                    height: self.height,
                    pixel_base,
                    pixel_end,
                    call_base,
                    call_end,
                    value,
                    flags,
                };
                let groups_x = (pixel_end - pixel_base).div_ceil(WORKGROUP_SIZE);
                let groups = (groups_x, call_end - call_base);
                launches.push((self.bind(&params, source), groups));
            }
        }
        log::trace!(
            "{label}: {} dispatch(es) for {} pixels x {} calls",
            launches.len(),
            self.pixel_count,
            calls
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("batch-raster launch encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(label),
                timestamp_writes: None,
            });
            pass.set_pipeline(pipeline);
            for (bind_group, (groups_x, groups_y)) in &launches {
                pass.set_bind_group(0, bind_group, &[]);
                pass.dispatch_workgroups(*groups_x, *groups_y, 1);
            }
        }
        let index = self.queue.submit(std::iter::once(encoder.finish()));
        self.wait(index)
    }

    fn bind(&self, params: &LaunchParams, source: &wgpu::Buffer) -> wgpu::BindGroup {
        let params_ubo = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("batch-raster launch params"),
                contents: bytemuck::bytes_of(params),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("batch-raster launch bind group"),
            layout: &self.kernels.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: self.memory.pixels.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: source.as_entire_binding(),
                },
            ],
        })
    }

    /// Blocks until the given submission has finished on the device.
    fn wait(&self, index: wgpu::SubmissionIndex) -> Result<()> {
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: Some(index),
                timeout: None,
            })
            .context("GPU device failed while waiting for a submission")?;
        Ok(())
    }
}

/// Splits `0..total` into consecutive `(start, end)` ranges of at most `step`.
fn spans(total: u32, step: u32) -> impl Iterator<Item = (u32, u32)> {
    let step = step.max(1);
    (0..total.div_ceil(step)).map(move |i| {
        let start = i * step;
        (start, start.saturating_add(step).min(total))
    })
}

fn max_calls_per_binding(limits: &wgpu::Limits) -> usize {
    let bytes = u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size);
    let calls = bytes / std::mem::size_of::<DrawRecord>() as u64;
    usize::try_from(calls).unwrap_or(usize::MAX).max(1)
}

impl Kernels {
    fn new(device: &wgpu::Device) -> Self {
        let raster = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("batch-raster primitive kernels"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/raster.wgsl").into()),
        });
        let pixel = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("batch-raster pixel kernels"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/pixel.wgsl").into()),
        });

        let storage = |read_only| wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("batch-raster bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<LaunchParams>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: storage(false),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: storage(true),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("batch-raster pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let compile = |module: &wgpu::ShaderModule, entry_point: &str| {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(entry_point),
                layout: Some(&pipeline_layout),
                module,
                entry_point: Some(entry_point),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            })
        };

        Self {
            primitives: PrimitiveKind::FLUSH_ORDER.map(|kind| compile(&raster, kind.entry_point())),
            fill: compile(&pixel, "fill"),
            copy_raw: compile(&pixel, "copy_raw"),
            bind_group_layout,
        }
    }
}

impl Memory {
    fn new(device: &wgpu::Device, byte_len: u64) -> Self {
        // wgpu zero-initialises new buffers, matching the zeroed host array.
        let pixels = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("batch-raster surface"),
            size: byte_len,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let readback = Self::readback_buffer(device, byte_len);
        let placeholder = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("batch-raster placeholder source"),
            size: std::mem::size_of::<DrawRecord>() as u64,
            usage: wgpu::BufferUsages::STORAGE,
            mapped_at_creation: false,
        });
        Self { pixels, readback, placeholder }
    }

    fn readback_buffer(device: &wgpu::Device, byte_len: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("batch-raster readback"),
            size: byte_len,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }
}
