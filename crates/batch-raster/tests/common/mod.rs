#![allow(dead_code)]

use batch_raster::{AcceleratorInit, Engine, EngineConfig, HostWritePolicy};

pub const BLACK: u32 = 0xFF00_0000;
pub const WHITE: u32 = 0xFFFF_FFFF;
pub const RED: u32 = 0xFFFF_0000;
pub const GREEN: u32 = 0xFF00_FF00;
pub const BLUE: u32 = 0xFF00_00FF;

pub fn cpu_engine(width: u32, height: u32) -> Engine {
    cpu_engine_with(width, height, HostWritePolicy::default())
}

pub fn cpu_engine_with(width: u32, height: u32, policy: HostWritePolicy) -> Engine {
    let config = EngineConfig {
        accelerator: AcceleratorInit { cpu_threads: Some(2), ..AcceleratorInit::cpu() },
        host_write_policy: policy,
        ..EngineConfig::new(width, height)
    };
    Engine::with_config(config).expect("CPU engine")
}

/// Coordinates of every pixel whose value is `color`.
pub fn pixels_of(engine: &mut Engine, color: u32) -> Vec<(u32, u32)> {
    let w = engine.width();
    engine
        .get_row_major_array()
        .expect("readback")
        .iter()
        .enumerate()
        .filter(|&(_, &p)| p == color)
        .map(|(i, _)| (i as u32 % w, i as u32 / w))
        .collect()
}
