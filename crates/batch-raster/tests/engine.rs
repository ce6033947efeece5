mod common;

use batch_raster::{
    AcceleratorInit, DeviceKind, Engine, EngineConfig, EngineState, HostWritePolicy, PrimitiveKind,
};
use common::*;

#[test]
fn end_to_end_rectangle_stroke_on_black() {
    let mut engine = cpu_engine(4, 4);
    engine.fill(BLACK).unwrap();
    engine.enqueue_rectangle_stroke(0, 0, 3, 3, WHITE);
    engine.flush().unwrap();

    for y in 0..4 {
        for x in 0..4 {
            let border = x == 0 || x == 3 || y == 0 || y == 3;
            let expected = if border { WHITE } else { BLACK };
            assert_eq!(engine.get_pixel(x, y).unwrap(), expected, "({x}, {y})");
        }
    }
}

#[test]
fn constructor_honours_prefer_cpu() {
    let engine = Engine::new(3, 2, true).unwrap();
    assert_eq!(engine.device_kind(), DeviceKind::Cpu);
    assert_eq!((engine.width(), engine.height()), (3, 2));
}

#[test]
fn zero_sized_engine_fails() {
    assert!(Engine::new(0, 5, true).is_err());
}

#[test]
fn later_kinds_dominate_earlier_ones() {
    let mut engine = cpu_engine(10, 10);
    engine.enqueue_line(2, 5, 7, 5, RED);
    engine.enqueue_rectangle_fill(1, 4, 8, 6, BLUE);
    engine.flush().unwrap();

    assert!(pixels_of(&mut engine, RED).is_empty());
    for x in 2..=7 {
        assert_eq!(engine.get_pixel(x, 5).unwrap(), BLUE);
    }
}

#[test]
fn circle_fill_paints_over_triangle_fill_regardless_of_enqueue_order() {
    let mut engine = cpu_engine(12, 12);
    engine.enqueue_circle_fill(5, 5, 2, GREEN);
    // Covers (5, 5) with the winding that fills.
    assert!(engine.enqueue_triangle_fill(0, 0, 0, 11, 11, 11, RED));
    engine.flush().unwrap();

    assert_eq!(engine.get_pixel(5, 5).unwrap(), GREEN);
    assert_eq!(engine.get_pixel(1, 8).unwrap(), RED);
}

#[test]
fn flat_triangle_is_dropped() {
    let mut engine = cpu_engine(6, 6);
    assert!(!engine.enqueue_triangle_stroke(0, 2, 3, 2, 5, 2, RED));
    assert_eq!(engine.pending(PrimitiveKind::TriangleStroke), 0);
    engine.flush().unwrap();
    assert!(pixels_of(&mut engine, RED).is_empty());
}

#[test]
fn reversed_line_endpoints_draw_the_same_pixels() {
    let mut a = cpu_engine(9, 9);
    let mut b = cpu_engine(9, 9);
    a.enqueue_line(1, 7, 8, 2, RED);
    b.enqueue_line(8, 2, 1, 7, RED);
    a.flush().unwrap();
    b.flush().unwrap();
    assert_eq!(pixels_of(&mut a, RED), pixels_of(&mut b, RED));
    assert!(!pixels_of(&mut a, RED).is_empty());
}

#[test]
fn vertical_line_is_one_pixel_wide() {
    let mut engine = cpu_engine(5, 5);
    engine.enqueue_line(2, 4, 2, 1, WHITE);
    engine.flush().unwrap();
    assert_eq!(pixels_of(&mut engine, WHITE), vec![(2, 1), (2, 2), (2, 3), (2, 4)]);
}

#[test]
fn queued_calls_are_invisible_until_flush() {
    let mut engine = cpu_engine(4, 4);
    engine.enqueue_rectangle_fill(0, 0, 3, 3, RED);
    assert_eq!(engine.get_pixel(1, 1).unwrap(), 0);
    engine.flush().unwrap();
    assert_eq!(engine.get_pixel(1, 1).unwrap(), RED);
}

#[test]
fn host_write_survives_a_later_flush_under_both_policies() {
    for policy in [HostWritePolicy::Coherent, HostWritePolicy::Legacy] {
        let mut engine = cpu_engine_with(4, 4, policy);
        engine.set_pixel(0, 0, GREEN).unwrap();
        engine.enqueue_line(3, 3, 3, 3, RED);
        engine.flush().unwrap();

        assert_eq!(engine.get_pixel(0, 0).unwrap(), GREEN, "{policy:?}");
        assert_eq!(engine.get_pixel(3, 3).unwrap(), RED, "{policy:?}");
    }
}

#[test]
fn coherent_host_write_after_flush_keeps_kernel_output() {
    let mut engine = cpu_engine_with(4, 4, HostWritePolicy::Coherent);
    engine.enqueue_line(3, 3, 3, 3, RED);
    engine.flush().unwrap();

    engine.set_pixel(0, 0, GREEN).unwrap();
    engine.enqueue_line(3, 0, 3, 0, BLUE);
    engine.flush().unwrap();

    assert_eq!(engine.get_pixel(0, 0).unwrap(), GREEN);
    assert_eq!(engine.get_pixel(3, 3).unwrap(), RED);
    assert_eq!(engine.get_pixel(3, 0).unwrap(), BLUE);
}

#[test]
fn legacy_host_write_after_flush_erases_kernel_output() {
    let mut engine = cpu_engine_with(4, 4, HostWritePolicy::Legacy);
    engine.enqueue_line(3, 3, 3, 3, RED);
    engine.flush().unwrap();

    // No readback in between: the host array still predates the line.
    engine.set_pixel(0, 0, GREEN).unwrap();
    engine.enqueue_line(3, 0, 3, 0, BLUE);
    engine.flush().unwrap();

    assert_eq!(engine.get_pixel(0, 0).unwrap(), GREEN);
    assert_eq!(engine.get_pixel(3, 3).unwrap(), 0);
    assert_eq!(engine.get_pixel(3, 0).unwrap(), BLUE);
}

#[test]
fn legacy_host_write_after_readback_is_safe() {
    let mut engine = cpu_engine_with(4, 4, HostWritePolicy::Legacy);
    engine.enqueue_line(3, 3, 3, 3, RED);
    engine.flush().unwrap();
    assert_eq!(engine.get_pixel(3, 3).unwrap(), RED);

    engine.set_pixel(0, 0, GREEN).unwrap();
    engine.enqueue_line(3, 0, 3, 0, BLUE);
    engine.flush().unwrap();

    assert_eq!(engine.get_pixel(3, 3).unwrap(), RED);
}

#[test]
fn dispose_is_idempotent() {
    let mut engine = cpu_engine(2, 2);
    engine.enqueue_line(0, 0, 1, 1, RED);
    engine.dispose();
    engine.dispose();
    assert_eq!(engine.state(), EngineState::Disposed);
    assert_eq!(engine.pending_total(), 0);
}

#[test]
#[should_panic(expected = "used after dispose")]
fn flush_after_dispose_panics() {
    let mut engine = cpu_engine(2, 2);
    engine.dispose();
    let _ = engine.flush();
}

#[test]
#[should_panic(expected = "used after dispose")]
fn readback_after_dispose_panics() {
    let mut engine = cpu_engine(2, 2);
    engine.dispose();
    let _ = engine.get_row_major_array();
}

#[test]
#[ignore = "needs a wgpu adapter (a software one is enough)"]
fn gpu_end_to_end() {
    let engine = [true, false].into_iter().find_map(|software| {
        let config = EngineConfig {
            accelerator: AcceleratorInit {
                force_fallback_adapter: software,
                ..AcceleratorInit::gpu_only()
            },
            ..EngineConfig::new(4, 4)
        };
        Engine::with_config(config).ok()
    });
    let mut engine = engine.expect("needs a wgpu adapter");
    assert_eq!(engine.device_kind(), DeviceKind::Gpu);

    engine.fill(BLACK).unwrap();
    engine.enqueue_rectangle_stroke(0, 0, 3, 3, WHITE);
    engine.enqueue_circle_fill(1, 1, 0, RED);
    engine.flush().unwrap();
    engine.draw_triangle_fill_now(2, 1, 2, 2, 3, 2, GREEN).unwrap();

    let pixels = engine.get_row_major_array().unwrap().to_vec();
    assert_eq!(pixels[5], RED);
    assert_eq!(pixels[6], GREEN);
    assert_eq!(pixels[10], GREEN);
    assert_eq!(pixels[9], BLACK);
    assert_eq!(pixels[0], WHITE);
    assert_eq!(pixels[15], WHITE);
}
