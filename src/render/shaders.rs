use crate::render::context::ProgramSource;

/// Default dot-to-text vertex stage: forwards the interleaved clip-space plane
/// coordinate and texture coordinate untouched.
pub const DOT_TO_TEXT_VERTEX: &str = r#"
struct VsIn {
  @location(0) plane: vec2<f32>,
  @location(1) tex: vec2<f32>,
};

struct VsOut {
  @builtin(position) pos: vec4<f32>,
  @location(0) tex: vec2<f32>,
};

@vertex
fn vs_main(in: VsIn) -> VsOut {
  var out: VsOut;
  out.pos = vec4<f32>(in.plane, 0.0, 1.0);
  out.tex = in.tex;
  return out;
}
"#;

/// Default dot-to-text fragment stage: blends a horizontally collapsing dot with the
/// expanding glyph texture, soft-edged by the smoothing width.
pub const DOT_TO_TEXT_FRAGMENT: &str = r#"
struct Params {
  color: vec3<f32>,
  dot_size: f32,
  dot_scale_x: f32,
  text_scale_x: f32,
  text_scale_y: f32,
  mix_threshold: f32,
  mix_transition: f32,
  smoothing: f32,
};

@group(0) @binding(0) var t_glyph: texture_2d<f32>;
@group(0) @binding(1) var s_glyph: sampler;
@group(0) @binding(2) var<uniform> params: Params;

@fragment
fn fs_main(@location(0) tex: vec2<f32>) -> @location(0) vec4<f32> {
  // The dot: an ellipse whose horizontal radius follows the collapse timeline.
  let radius = vec2<f32>(
    max(params.dot_size * params.dot_scale_x, 1e-4),
    max(params.dot_size, 1e-4),
  );
  let dot_dist = length(tex / radius);
  let dot_alpha = 1.0 - smoothstep(1.0 - params.smoothing, 1.0 + params.smoothing, dot_dist);

  // The text: the glyph texture expanding out of the center.
  let scale = vec2<f32>(
    max(params.text_scale_x, 1e-4),
    max(params.text_scale_y, 1e-4),
  );
  let uv = (tex / scale) * 0.5 + vec2<f32>(0.5, 0.5);
  let inside = step(abs(tex.x), scale.x) * step(abs(tex.y), scale.y);
  let sampled = textureSample(t_glyph, s_glyph, clamp(uv, vec2<f32>(0.0), vec2<f32>(1.0)));
  let text_alpha = sampled.a * inside;

  let m = smoothstep(params.mix_threshold, 1.0 - params.mix_threshold, params.mix_transition);
  let alpha = mix(dot_alpha, text_alpha, m);
  return vec4<f32>(params.color * alpha, alpha);
}
"#;

/// The crate's built-in dot-to-text program source.
///
/// Callers composing their own shaders pass any [`ProgramSource`] instead.
pub fn dot_to_text_source() -> ProgramSource<'static> {
    ProgramSource {
        vertex: DOT_TO_TEXT_VERTEX,
        fragment: DOT_TO_TEXT_FRAGMENT,
    }
}
