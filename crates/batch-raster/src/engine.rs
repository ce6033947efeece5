use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::batch::shapes::{CircleCall, LineCall, RectCall, TriangleCall};
use crate::batch::{DrawCall, DrawQueues, Mode, PrimitiveKind};
use crate::device::{AcceleratorInit, AcceleratorSession, DeviceKind};
use crate::paint::Argb;
use crate::surface::{HostWritePolicy, PixelSurface};

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub accelerator: AcceleratorInit,
    pub host_write_policy: HostWritePolicy,
}

impl EngineConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            accelerator: AcceleratorInit::default(),
            host_write_policy: HostWritePolicy::default(),
        }
    }
}

/// Lifecycle state of an [`Engine`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineState {
    /// No pending draw calls.
    Idle,
    /// At least one draw call waits for the next flush.
    Accumulating,
    /// Inside [`Engine::flush`].
    Flushing,
    /// Resources released; any further use panics.
    Disposed,
}

/// Batched rasterizer over one pixel surface.
///
/// Draw calls are queued per primitive kind and only rasterized by
/// [`Engine::flush`], which runs the queues in [`PrimitiveKind::FLUSH_ORDER`].
/// Later kinds therefore paint over earlier ones; within one kind, which of two
/// overlapping calls wins a pixel is unspecified.
///
/// `fill`, `fill_random`, `copy_from` and the `draw_*_now` family run on the
/// device right away and do not touch the queues.
pub struct Engine {
    surface: PixelSurface,
    session: AcceleratorSession,
    queues: DrawQueues,
    state: EngineState,
}

impl Engine {
    /// Creates a `width × height` engine with the default configuration.
    ///
    /// `prefer_cpu` selects the CPU accelerator; otherwise a GPU is requested
    /// and the CPU is used only if none is available.
    pub fn new(width: u32, height: u32, prefer_cpu: bool) -> Result<Self> {
        let mut config = EngineConfig::new(width, height);
        config.accelerator.prefer_cpu = prefer_cpu;
        Self::with_config(config)
    }

    pub fn with_config(config: EngineConfig) -> Result<Self> {
        let EngineConfig { width, height, accelerator, host_write_policy } = config;

        let session = AcceleratorSession::new(&accelerator, width, height)
            .with_context(|| format!("failed to create {width}x{height} engine"))?;
        let surface = PixelSurface::new(width, height, host_write_policy);

        log::debug!(
            "engine ready: {width}x{height} on {}, {host_write_policy:?} host writes",
            session.kind()
        );

        Ok(Self {
            surface,
            session,
            queues: DrawQueues::new(),
            state: EngineState::Idle,
        })
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn device_kind(&self) -> DeviceKind {
        self.session.kind()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_disposed(&self) -> bool {
        self.state == EngineState::Disposed
    }

    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    /// Number of queued calls of `kind`.
    pub fn pending(&self, kind: PrimitiveKind) -> usize {
        self.queues.len(kind)
    }

    pub fn pending_total(&self) -> usize {
        self.queues.total()
    }

    pub fn enqueue_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Argb) {
        self.begin_enqueue();
        self.queues.push_line(x0, y0, x1, y1, color);
    }

    /// Queues a triangle. Returns `false` if it was dropped because all three
    /// vertices share one `y`.
    #[allow(clippy::too_many_arguments)]
    pub fn enqueue_triangle(
        &mut self,
        mode: Mode,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Argb,
    ) -> bool {
        self.begin_enqueue();
        let queued = self.queues.push_triangle(mode, (x0, y0), (x1, y1), (x2, y2), color);
        self.settle_idle();
        queued
    }

    #[allow(clippy::too_many_arguments)]
    pub fn enqueue_triangle_stroke(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Argb,
    ) -> bool {
        self.enqueue_triangle(Mode::Stroke, x0, y0, x1, y1, x2, y2, color)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn enqueue_triangle_fill(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Argb,
    ) -> bool {
        self.enqueue_triangle(Mode::Fill, x0, y0, x1, y1, x2, y2, color)
    }

    /// Queues the rectangle with opposite corners `(x0, y0)` and `(x1, y1)`.
    pub fn enqueue_rectangle(&mut self, mode: Mode, x0: i32, y0: i32, x1: i32, y1: i32, color: Argb) {
        self.begin_enqueue();
        self.queues.push_rectangle(mode, x0, y0, x1, y1, color);
    }

    pub fn enqueue_rectangle_stroke(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Argb) {
        self.enqueue_rectangle(Mode::Stroke, x0, y0, x1, y1, color);
    }

    pub fn enqueue_rectangle_fill(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Argb) {
        self.enqueue_rectangle(Mode::Fill, x0, y0, x1, y1, color);
    }

    pub fn enqueue_circle(&mut self, mode: Mode, cx: i32, cy: i32, radius: i32, color: Argb) {
        self.begin_enqueue();
        self.queues.push_circle(mode, cx, cy, radius, color);
    }

    pub fn enqueue_circle_stroke(&mut self, cx: i32, cy: i32, radius: i32, color: Argb) {
        self.enqueue_circle(Mode::Stroke, cx, cy, radius, color);
    }

    pub fn enqueue_circle_fill(&mut self, cx: i32, cy: i32, radius: i32, color: Argb) {
        self.enqueue_circle(Mode::Fill, cx, cy, radius, color);
    }

    /// Rasterizes every queued call, one kind at a time in flush order.
    ///
    /// Each kind's launch completes before the next begins. On error the
    /// failing kind and every later kind stay queued.
    pub fn flush(&mut self) -> Result<()> {
        self.assert_live();
        if self.queues.is_empty() {
            return Ok(());
        }

        self.state = EngineState::Flushing;
        let result = self.flush_queues();
        self.state = EngineState::Idle;
        self.settle_idle();
        result
    }

    fn flush_queues(&mut self) -> Result<()> {
        for kind in PrimitiveKind::FLUSH_ORDER {
            if self.queues.len(kind) == 0 {
                continue;
            }
            let records = self.queues.records(kind);
            log::debug!("flush {kind}: {} call(s)", records.len());

            let target = self.surface.acquire_for_device_write(&mut self.session)?;
            self.session
                .run(kind, target, &records)
                .with_context(|| format!("flush of {kind} failed"))?;
            self.queues.clear(kind);
        }
        Ok(())
    }

    /// Rasterizes one call immediately, as a single-call launch.
    ///
    /// The call is normalised exactly as on enqueue. Pending queues are left
    /// alone, so their calls still land on top at the next flush. Returns
    /// `false` if the call was dropped (a flat triangle).
    pub fn draw_now(&mut self, mode: Mode, call: DrawCall) -> Result<bool> {
        self.assert_live();
        let Some(call) = call.normalized() else {
            log::trace!("immediate draw dropped: {call:?}");
            return Ok(false);
        };
        let kind = call.kind(mode);

        let target = self.surface.acquire_for_device_write(&mut self.session)?;
        self.session
            .run(kind, target, &[call.to_record()])
            .with_context(|| format!("immediate {kind} draw failed"))?;
        Ok(true)
    }

    pub fn draw_line_now(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Argb) -> Result<()> {
        let line = DrawCall::Line(LineCall::new(x0, y0, x1, y1, color));
        self.draw_now(Mode::Stroke, line).map(drop)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_triangle_stroke_now(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Argb,
    ) -> Result<bool> {
        let triangle = DrawCall::Triangle(TriangleCall::new(x0, y0, x1, y1, x2, y2, color));
        self.draw_now(Mode::Stroke, triangle)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_triangle_fill_now(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Argb,
    ) -> Result<bool> {
        let triangle = DrawCall::Triangle(TriangleCall::new(x0, y0, x1, y1, x2, y2, color));
        self.draw_now(Mode::Fill, triangle)
    }

    pub fn draw_rectangle_stroke_now(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Argb,
    ) -> Result<()> {
        let rect = DrawCall::Rectangle(RectCall::new(x0, y0, x1, y1, color));
        self.draw_now(Mode::Stroke, rect).map(drop)
    }

    pub fn draw_rectangle_fill_now(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Argb,
    ) -> Result<()> {
        let rect = DrawCall::Rectangle(RectCall::new(x0, y0, x1, y1, color));
        self.draw_now(Mode::Fill, rect).map(drop)
    }

    pub fn draw_circle_stroke_now(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        color: Argb,
    ) -> Result<()> {
        let circle = DrawCall::Circle(CircleCall::new(cx, cy, radius, color));
        self.draw_now(Mode::Stroke, circle).map(drop)
    }

    pub fn draw_circle_fill_now(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        color: Argb,
    ) -> Result<()> {
        let circle = DrawCall::Circle(CircleCall::new(cx, cy, radius, color));
        self.draw_now(Mode::Fill, circle).map(drop)
    }

    /// Overwrites the whole surface with `color` on the device, immediately.
    pub fn fill(&mut self, color: Argb) -> Result<()> {
        self.assert_live();
        let target = self.surface.acquire_for_device_write(&mut self.session)?;
        self.session.fill(target, color)
    }

    /// Overwrites the whole surface with random opaque colors drawn from `seed`.
    pub fn fill_random(&mut self, seed: u64) -> Result<()> {
        self.assert_live();
        let mut noise = vec![0u32; self.surface.len()];
        StdRng::seed_from_u64(seed).fill(noise.as_mut_slice());

        let target = self.surface.acquire_for_device_write(&mut self.session)?;
        self.session.copy_raw(target, &noise, true)
    }

    /// Overwrites the whole surface with a row-major `width * height` raster.
    pub fn copy_from(&mut self, pixels: &[Argb]) -> Result<()> {
        self.assert_live();
        anyhow::ensure!(
            pixels.len() == self.surface.len(),
            "copy_from expects {} pixels ({}x{}), got {}",
            self.surface.len(),
            self.width(),
            self.height(),
            pixels.len()
        );
        let target = self.surface.acquire_for_device_write(&mut self.session)?;
        self.session.copy_raw(target, pixels, false)
    }

    /// Writes one pixel on the host side.
    ///
    /// # Panics
    /// If `(x, y)` lies outside the surface, or after [`Engine::dispose`].
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Argb) -> Result<()> {
        self.assert_live();
        let i = self.surface.index(x, y);
        self.surface.write(&mut self.session, i, color)
    }

    /// Reads one pixel, pulling device output first if needed.
    ///
    /// Queued calls are not flushed.
    ///
    /// # Panics
    /// If `(x, y)` lies outside the surface, or after [`Engine::dispose`].
    pub fn get_pixel(&mut self, x: u32, y: u32) -> Result<Argb> {
        self.assert_live();
        let i = self.surface.index(x, y);
        self.surface.read(&mut self.session, i)
    }

    /// The whole surface in row-major order, pulling device output first if needed.
    pub fn get_row_major_array(&mut self) -> Result<&[Argb]> {
        self.assert_live();
        self.surface.snapshot(&mut self.session)
    }

    /// Drops pending calls and releases the accelerator. Idempotent.
    pub fn dispose(&mut self) {
        if self.state == EngineState::Disposed {
            return;
        }
        let dropped = self.queues.total();
        if dropped > 0 {
            log::debug!("dispose: discarding {dropped} pending draw call(s)");
        }
        self.queues.clear_all();
        self.session.dispose();
        self.state = EngineState::Disposed;
        log::debug!("engine disposed");
    }

    fn assert_live(&self) {
        assert!(
            self.state != EngineState::Disposed,
            "engine used after dispose"
        );
    }

    fn begin_enqueue(&mut self) {
        self.assert_live();
        self.state = EngineState::Accumulating;
    }

    fn settle_idle(&mut self) {
        if self.state == EngineState::Accumulating || self.state == EngineState::Idle {
            self.state = if self.queues.is_empty() {
                EngineState::Idle
            } else {
                EngineState::Accumulating
            };
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.dispose();
    }
}
