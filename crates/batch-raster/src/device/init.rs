use anyhow::{Context, Result};

/// Environment override for the CPU accelerator's worker count.
pub const CPU_THREADS_ENV: &str = "BATCH_RASTER_CPU_THREADS";

/// Initialization parameters for the accelerator session.
///
/// Keep this structure small. Add flags only when a concrete backend
/// requirement exists.
#[derive(Debug, Clone)]
pub struct AcceleratorInit {
    /// Run kernels on the CPU accelerator instead of asking wgpu for a GPU.
    pub prefer_cpu: bool,

    /// When no GPU adapter can be created, fall back to the CPU accelerator
    /// instead of failing construction.
    pub allow_cpu_fallback: bool,

    /// Adapter selection hint for the GPU path.
    pub power_preference: wgpu::PowerPreference,

    /// Ask wgpu for its software fallback adapter (e.g. llvmpipe, WARP).
    pub force_fallback_adapter: bool,

    /// Worker threads for the CPU accelerator.
    ///
    /// `None` reads [`CPU_THREADS_ENV`]; if that is unset too, rayon picks
    /// (one worker per logical core).
    pub cpu_threads: Option<usize>,

    /// Limits requested from the GPU adapter/device.
    ///
    /// Must allow a storage buffer of `width * height * 4` bytes.
    pub required_limits: wgpu::Limits,
}

impl Default for AcceleratorInit {
    fn default() -> Self {
        Self {
            prefer_cpu: false,
            allow_cpu_fallback: true,
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            cpu_threads: None,
            required_limits: wgpu::Limits::default(),
        }
    }
}

impl AcceleratorInit {
    /// CPU accelerator, no GPU probing.
    pub fn cpu() -> Self {
        Self { prefer_cpu: true, ..Self::default() }
    }

    /// GPU only; construction fails when no adapter is found.
    pub fn gpu_only() -> Self {
        Self { prefer_cpu: false, allow_cpu_fallback: false, ..Self::default() }
    }

    /// Resolves the CPU worker count. `0` lets rayon choose.
    pub(crate) fn resolved_cpu_threads(&self) -> Result<usize> {
        if let Some(threads) = self.cpu_threads {
            return Ok(threads);
        }
        match std::env::var(CPU_THREADS_ENV) {
            Ok(raw) => {
                let raw = raw.trim();
                anyhow::ensure!(!raw.is_empty(), "{CPU_THREADS_ENV} is set but empty");
                raw.parse::<usize>()
                    .with_context(|| format!("{CPU_THREADS_ENV}={raw:?} is not a valid thread count"))
            }
            Err(std::env::VarError::NotPresent) => Ok(0),
            Err(err) => Err(err).with_context(|| format!("failed to read {CPU_THREADS_ENV}")),
        }
    }
}
