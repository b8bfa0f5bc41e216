use super::*;

#[path = "support.rs"]
mod support;

use serde_json::json;
use support::{BlankSurface, RecordingGpu};

const VIEWPORT: Viewport = Viewport {
    width: 1280,
    height: 720,
};

fn entity(overrides: serde_json::Value) -> GlyphEntity {
    GlyphEntity::new(
        EntityData {
            character: "A".to_owned(),
            position: Point::new(640.0, 360.0),
        },
        &overrides,
    )
    .unwrap()
}

fn initialized(
    gpu: &mut RecordingGpu,
    surface: &mut BlankSurface,
    overrides: serde_json::Value,
) -> (GlyphEntity, ProgramId) {
    let program = gpu
        .compile_program(&crate::render::shaders::dot_to_text_source())
        .unwrap();
    let mut e = entity(overrides);
    e.initialize(gpu, surface, VIEWPORT).unwrap();
    (e, program)
}

#[test]
fn animation_duration_sums_collapse_and_expand() {
    assert_eq!(entity(json!({})).animation_duration(), 250.0);

    let custom = entity(json!({"duration": {"dot_collapse": 100.0, "text_expand": 40.0}}));
    assert_eq!(custom.animation_duration(), 140.0);
}

#[test]
fn render_before_initialize_is_fatal() {
    let mut gpu = RecordingGpu::default();
    let mut e = entity(json!({}));
    let err = e.render(&mut gpu, ProgramId(1), 0.0).unwrap_err();
    assert!(matches!(err, DotmorphError::Uninitialized(_)));
    assert!(gpu.draws.is_empty());
}

#[test]
fn initialize_twice_is_rejected() {
    let mut gpu = RecordingGpu::default();
    let mut surface = BlankSurface::default();
    let (mut e, _) = initialized(&mut gpu, &mut surface, json!({}));
    let err = e.initialize(&mut gpu, &mut surface, VIEWPORT).unwrap_err();
    assert!(matches!(err, DotmorphError::Validation(_)));
}

#[test]
fn initialize_uploads_texture_and_geometry() {
    let mut gpu = RecordingGpu::default();
    let mut surface = BlankSurface::default();
    let _ = initialized(&mut gpu, &mut surface, json!({}));
    assert_eq!(gpu.textures.len(), 1);
    assert_eq!(gpu.meshes.len(), 1);
    assert_eq!(gpu.texture_writes.len(), 1);
    assert_eq!(gpu.mesh_writes.len(), 1);
    assert_eq!(surface.characters, vec!["A".to_owned()]);
}

#[test]
fn resource_failure_aborts_initialize() {
    let mut gpu = RecordingGpu {
        fail_texture_creation: true,
        ..Default::default()
    };
    let mut surface = BlankSurface::default();
    let mut e = entity(json!({}));
    let err = e.initialize(&mut gpu, &mut surface, VIEWPORT).unwrap_err();
    assert!(matches!(err, DotmorphError::Resource(_)));
}

#[test]
fn completion_boundary_is_exclusive() {
    let mut gpu = RecordingGpu::default();
    let mut surface = BlankSurface::default();
    let (mut e, program) = initialized(&mut gpu, &mut surface, json!({}));
    let duration = e.animation_duration();

    assert!(!e.render(&mut gpu, program, duration).unwrap());
    assert!(e.render(&mut gpu, program, duration + 0.001).unwrap());
    assert!(!e.render(&mut gpu, program, -1.0).unwrap());
    // Every call drew, finished or not.
    assert_eq!(gpu.draws.len(), 3);
}

#[test]
fn out_of_window_ticks_draw_the_clamped_state() {
    let mut gpu = RecordingGpu::default();
    let mut surface = BlankSurface::default();
    let (mut e, program) = initialized(&mut gpu, &mut surface, json!({}));

    // Before the window: the collapse timeline sits at its first coefficient.
    e.render(&mut gpu, program, -500.0).unwrap();
    assert_eq!(gpu.draws[0].dot_scale_x, 0.8);
    assert_eq!(gpu.draws[0].mix_transition, 0.0);

    // Past the window: the expand timeline has settled at its last coefficient.
    e.render(&mut gpu, program, 10_000.0).unwrap();
    assert_eq!(gpu.draws[1].text_scale_x, 1.0);
    assert_eq!(gpu.draws[1].text_scale_y, 1.0);
    assert_eq!(gpu.draws[1].mix_transition, 1.0);
}

#[test]
fn mix_transition_is_clamped_to_unit_range() {
    let mut gpu = RecordingGpu::default();
    let mut surface = BlankSurface::default();
    let (mut e, program) = initialized(&mut gpu, &mut surface, json!({}));

    // The stock curve overshoots at the window midpoint; the uniform must not.
    e.render(&mut gpu, program, 125.0).unwrap();
    assert_eq!(gpu.draws[0].mix_transition, 1.0);
}

#[test]
fn uniforms_are_normalized_by_glyph_size() {
    let mut gpu = RecordingGpu::default();
    let mut surface = BlankSurface::default();
    let (mut e, program) = initialized(&mut gpu, &mut surface, json!({}));

    e.render(&mut gpu, program, 0.0).unwrap();
    let draw = gpu.draws[0];
    assert!((draw.dot_size - 32.0 / 144.0).abs() < 1e-6);
    assert!((draw.smoothing - 1.0 / 144.0).abs() < 1e-6);
    assert!((draw.mix_threshold - 0.1).abs() < 1e-6);
}

#[test]
fn update_character_before_initialize_is_a_noop() {
    let mut gpu = RecordingGpu::default();
    let mut surface = BlankSurface::default();
    let mut e = entity(json!({}));
    e.update_character(&mut gpu, &mut surface).unwrap();
    assert!(gpu.texture_writes.is_empty());
    assert!(surface.characters.is_empty());
}

#[test]
fn update_character_regenerates_texture_only() {
    let mut gpu = RecordingGpu::default();
    let mut surface = BlankSurface::default();
    let (mut e, _) = initialized(&mut gpu, &mut surface, json!({}));

    e.data.character = "B".to_owned();
    e.update_character(&mut gpu, &mut surface).unwrap();
    assert_eq!(gpu.texture_writes.len(), 2);
    assert_eq!(gpu.mesh_writes.len(), 1);
    assert_eq!(surface.characters.last().map(String::as_str), Some("B"));
}

#[test]
fn update_size_regenerates_geometry_only() {
    let mut gpu = RecordingGpu::default();
    let mut surface = BlankSurface::default();
    let (mut e, _) = initialized(&mut gpu, &mut surface, json!({}));

    e.data.position = Point::new(100.0, 100.0);
    e.update_size(&mut gpu, VIEWPORT).unwrap();
    assert_eq!(gpu.mesh_writes.len(), 2);
    assert_eq!(gpu.texture_writes.len(), 1);
    assert_ne!(gpu.mesh_writes[0].1, gpu.mesh_writes[1].1);
}

#[test]
fn free_is_idempotent_and_disables_render() {
    let mut gpu = RecordingGpu::default();
    let mut surface = BlankSurface::default();
    let (mut e, program) = initialized(&mut gpu, &mut surface, json!({}));

    e.free(&mut gpu);
    e.free(&mut gpu);
    assert_eq!(gpu.deleted_textures.len(), 1);
    assert_eq!(gpu.deleted_meshes.len(), 1);

    let err = e.render(&mut gpu, program, 0.0).unwrap_err();
    assert!(matches!(err, DotmorphError::Uninitialized(_)));
}

#[test]
fn set_config_rebuilds_timelines() {
    let mut e = entity(json!({}));
    e.set_config(&json!({"duration": {"text_expand": 75.0}})).unwrap();
    assert_eq!(e.animation_duration(), 200.0);
    assert_eq!(e.config().duration.dot_collapse, 125.0);
}
