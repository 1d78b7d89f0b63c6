//! Audio-to-visual parameter mapping.
//!
//! Holds the per-frame audio state, the uniform set handed to each draw call,
//! and the CPU reference implementation of the two procedural algorithms
//! (vertex distortion, kaleidoscopic coloring). shader.wgsl mirrors these
//! functions; keep both sides in lockstep.

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Radial symmetry order of the kaleidoscope fold
pub const KALEIDO_SEGMENTS: f32 = 6.0;

/// Displacement wave amplitude along the normal (unit-sphere space)
pub const DISTORT_AMPLITUDE: f32 = 0.06;

/// Twist angle per unit height at full treble and phase
pub const TWIST_STRENGTH: f32 = 1.5;

/// Per-frame audio measurements, normalized by the analyzer adapter.
///
/// Band energies are in [0,1]; the rectified-mean amplitude is non-negative
/// and usually well below 1. Recomputed every tick, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameAudioState {
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
    pub avg_amplitude: f32,
}

impl FrameAudioState {
    /// State used while nothing is playing
    pub fn silence() -> Self {
        Self::default()
    }
}

/// Uniform parameters for one draw call.
///
/// Built per drawn object per frame, consumed by the render call, then
/// discarded. The render backend adds matrices on top; these fields are the
/// mapper's whole contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderUniformSet {
    /// Seconds since app start
    pub time: f32,
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
    pub avg_amplitude: f32,
    /// Viewport size in pixels (width, height)
    pub resolution: [f32; 2],
    /// Per-object variation seed in [0,1); 0 for the main shape
    pub seed: f32,
    /// World-space offset of the object's center
    pub offset: [f32; 3],
}

/// Build the uniform set for one object. Pure assembly; the procedural
/// character lives in the shader functions below.
pub fn map_uniforms(
    audio: &FrameAudioState,
    elapsed_seconds: f32,
    viewport: (f32, f32),
    object_seed: f32,
    object_offset: Vec3,
) -> ShaderUniformSet {
    ShaderUniformSet {
        time: elapsed_seconds,
        bass: audio.bass,
        mid: audio.mid,
        treble: audio.treble,
        avg_amplitude: audio.avg_amplitude,
        resolution: [viewport.0, viewport.1],
        seed: object_seed,
        offset: object_offset.to_array(),
    }
}

// --- Vertex distortion reference ---

/// Slow phase oscillator shared by distortion and twist
pub fn phase(t: f32) -> f32 {
    0.5 + 0.5 * (0.2 * t).sin()
}

/// Amplitude of the breathing term; 0 when bass and amplitude are silent
pub fn breathe_amplitude(audio: &FrameAudioState) -> f32 {
    0.3 * audio.bass + 0.5 * audio.avg_amplitude
}

/// Whole-surface breathing scale around 1.0
pub fn breathing_scale(audio: &FrameAudioState, t: f32) -> f32 {
    1.0 + breathe_amplitude(audio) * (2.5 * t).sin() * 0.5
}

/// Spatial frequency of the displacement waves
pub fn complexity(mid: f32, phase: f32, seed: f32) -> f32 {
    3.0 + 20.0 * mid + 20.0 * phase + 10.0 * seed
}

/// Displace one unit-sphere vertex: three superimposed waves along the
/// normal, breathing scale, then a height-proportional twist about the
/// vertical axis.
pub fn displace_vertex(
    position: Vec3,
    normal: Vec3,
    audio: &FrameAudioState,
    t: f32,
    seed: f32,
) -> Vec3 {
    let ph = phase(t);
    let k = complexity(audio.mid, ph, seed);

    let wave = (position.x * k + 3.0 * t).sin()
        + (position.y * k * 0.7 + 2.3 * t).sin()
        + (position.z * k * 1.3 + 1.9 * t).sin();

    let scaled = (position + normal * (wave * DISTORT_AMPLITUDE)) * breathing_scale(audio, t);

    let twist = TWIST_STRENGTH * audio.treble * ph * scaled.y;
    let (sin_t, cos_t) = twist.sin_cos();
    Vec3::new(
        cos_t * scaled.x + sin_t * scaled.z,
        scaled.y,
        cos_t * scaled.z - sin_t * scaled.x,
    )
}

// --- Fragment coloring reference ---

/// GPU fract: x - floor(x), non-negative for any finite input
fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Fold screen coordinates into one mirrored slice of N-fold radial symmetry
pub fn kaleido_fold(st: Vec2, segments: f32) -> Vec2 {
    let r = st.length();
    let slice = TAU / segments;
    let angle = st.y.atan2(st.x).rem_euclid(slice);
    let angle = (angle - slice * 0.5).abs();
    Vec2::new(angle.cos(), angle.sin()) * r
}

/// Hue cycling rate, accelerated by bass
pub fn hue_speed(bass: f32) -> f32 {
    0.2 + bass * 0.5
}

/// Base hue for a fragment at distance `v_len` from the object center
pub fn base_hue(t: f32, bass: f32, mid: f32, v_len: f32) -> f32 {
    fract(t * hue_speed(bass) + v_len * 0.3 + mid * 0.3)
}

/// Base lightness oscillation; bounded to [0.3, 0.5]
pub fn lightness(t: f32, mid: f32) -> f32 {
    0.4 + 0.1 * (t + mid * 3.0).sin()
}

/// HSL to RGB, hue in [0,1). Output components stay in [0,1] for in-domain
/// inputs.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h * 6.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let rgb = if h < 1.0 / 6.0 {
        Vec3::new(c, x, 0.0)
    } else if h < 2.0 / 6.0 {
        Vec3::new(x, c, 0.0)
    } else if h < 3.0 / 6.0 {
        Vec3::new(0.0, c, x)
    } else if h < 4.0 / 6.0 {
        Vec3::new(0.0, x, c)
    } else if h < 5.0 / 6.0 {
        Vec3::new(x, 0.0, c)
    } else {
        Vec3::new(c, 0.0, x)
    };

    rgb + Vec3::splat(m)
}

/// Full fragment color pipeline: kaleido fold, hue cycling, swirl layer,
/// moiré overlay, amplitude brightness. RGB may exceed 1.0; the surface
/// format clamps on store.
pub fn fragment_color(
    frag_coord: Vec2,
    resolution: Vec2,
    v_pos: Vec3,
    audio: &FrameAudioState,
    t: f32,
) -> Vec3 {
    let uv = frag_coord / resolution;
    let mut st = uv * 2.0 - Vec2::ONE;
    st.x *= resolution.x / resolution.y;

    let st = kaleido_fold(st, KALEIDO_SEGMENTS);

    let hue = base_hue(t, audio.bass, audio.mid, v_pos.length());
    let base = hsl_to_rgb(hue, 0.9, lightness(t, audio.mid));

    // Swirl layer from the folded coordinates, faded in toward the rim
    let radius = st.length();
    let swirl_angle = st.y.atan2(st.x) + t * (0.5 + audio.treble);
    let swirl = (swirl_angle * 20.0 + radius * 20.0).sin() * audio.treble;
    let swirl_color = hsl_to_rgb(
        fract(hue + 0.3 + audio.treble * 0.2),
        1.0,
        0.4 + 0.3 * swirl,
    ) * (smoothstep(0.5, 1.0, radius) * audio.treble);

    let mut color = base.lerp(swirl_color, swirl * 0.5);

    // Thin moiré overlay
    let sp = ((st.x + st.y) * 100.0 + t * 30.0).sin();
    let sp = smoothstep(0.7, 0.95, sp + audio.treble * 0.8) * audio.treble * 0.7;
    color += sp * Vec3::new(1.0, 0.9, 1.0);

    color * (1.0 + audio.avg_amplitude * 0.3)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn rotate(st: Vec2, angle: f32) -> Vec2 {
        let (s, c) = angle.sin_cos();
        Vec2::new(c * st.x - s * st.y, s * st.x + c * st.y)
    }

    #[test]
    fn test_map_uniforms_carries_audio_and_identity() {
        let audio = FrameAudioState {
            bass: 0.4,
            mid: 0.5,
            treble: 0.6,
            avg_amplitude: 0.2,
        };
        let uniforms = map_uniforms(&audio, 12.5, (1280.0, 720.0), 0.25, Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(uniforms.time, 12.5);
        assert_eq!(uniforms.bass, 0.4);
        assert_eq!(uniforms.resolution, [1280.0, 720.0]);
        assert_eq!(uniforms.seed, 0.25);
        assert_eq!(uniforms.offset, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_phase_bounded_and_periodic() {
        for i in 0..200 {
            let t = i as f32 * 0.37;
            let p = phase(t);
            assert!((0.0..=1.0).contains(&p));
            assert!((phase(t + TAU / 0.2) - p).abs() < 1e-3);
        }
    }

    #[test]
    fn test_breathe_zero_without_bass_and_amplitude() {
        let audio = FrameAudioState {
            bass: 0.0,
            mid: 0.7,
            treble: 0.0,
            avg_amplitude: 0.0,
        };

        assert_eq!(breathe_amplitude(&audio), 0.0);

        // With no breathing and no treble twist, the displacement reduces to
        // the residual trigonometric waves alone
        let t = 3.7;
        let pos = Vec3::new(0.3, -0.5, 0.81).normalize();
        let normal = pos;

        let ph = phase(t);
        let k = complexity(audio.mid, ph, 0.0);
        let wave = (pos.x * k + 3.0 * t).sin()
            + (pos.y * k * 0.7 + 2.3 * t).sin()
            + (pos.z * k * 1.3 + 1.9 * t).sin();
        let expected = pos + normal * (wave * DISTORT_AMPLITUDE);

        let displaced = displace_vertex(pos, normal, &audio, t, 0.0);
        assert!((displaced - expected).length() < EPS);
    }

    #[test]
    fn test_breathing_scale_bounds() {
        let audio = FrameAudioState {
            bass: 1.0,
            mid: 0.0,
            treble: 0.0,
            avg_amplitude: 1.0,
        };

        // Amplitude 0.8, so the scale stays within 1 ± 0.4
        for i in 0..100 {
            let s = breathing_scale(&audio, i as f32 * 0.21);
            assert!((0.6 - EPS..=1.4 + EPS).contains(&s));
        }
    }

    #[test]
    fn test_complexity_grows_with_inputs() {
        let base = complexity(0.0, 0.0, 0.0);
        assert_eq!(base, 3.0);
        assert_eq!(complexity(1.0, 1.0, 1.0), 53.0);
        assert!(complexity(0.5, 0.0, 0.0) > base);
    }

    #[test]
    fn test_kaleido_fold_invariant_under_symmetry_rotations() {
        let slice = TAU / KALEIDO_SEGMENTS;
        let points = [
            Vec2::new(0.3, 0.4),
            Vec2::new(-0.7, 0.1),
            Vec2::new(0.05, -0.9),
            Vec2::new(-0.4, -0.33),
        ];

        for st in points {
            let folded = kaleido_fold(st, KALEIDO_SEGMENTS);
            for k in 1..KALEIDO_SEGMENTS as i32 {
                let rotated = rotate(st, slice * k as f32);
                let refolded = kaleido_fold(rotated, KALEIDO_SEGMENTS);
                assert!(
                    (refolded - folded).length() < 1e-4,
                    "fold not invariant for {:?} rotated by {} slices",
                    st,
                    k
                );
            }
        }
    }

    #[test]
    fn test_kaleido_fold_preserves_radius() {
        let st = Vec2::new(-0.6, 0.25);
        let folded = kaleido_fold(st, KALEIDO_SEGMENTS);
        assert!((folded.length() - st.length()).abs() < EPS);
        // The folded angle lands inside the half slice
        let angle = folded.y.atan2(folded.x);
        assert!((0.0..=TAU / KALEIDO_SEGMENTS / 2.0 + EPS).contains(&angle));
    }

    #[test]
    fn test_hue_periodic_in_time() {
        let bass = 0.35;
        let period = 1.0 / hue_speed(bass);

        for i in 0..10 {
            let t = i as f32 * 0.73;
            let a = base_hue(t, bass, 0.2, 1.0);
            let b = base_hue(t + period, bass, 0.2, 1.0);
            let wrapped = (a - b).abs().min(1.0 - (a - b).abs());
            assert!(wrapped < 1e-3, "hue not periodic at t={}: {} vs {}", t, a, b);
        }
    }

    #[test]
    fn test_hue_speed_accelerates_with_bass() {
        assert_eq!(hue_speed(0.0), 0.2);
        assert!(hue_speed(1.0) > hue_speed(0.0));
    }

    #[test]
    fn test_hsl_to_rgb_reference_colors() {
        // Pure red
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red - Vec3::new(1.0, 0.0, 0.0)).length() < EPS);

        // Pure green at a third of the wheel
        let green = hsl_to_rgb(1.0 / 3.0, 1.0, 0.5);
        assert!((green - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-4);

        // Zero saturation collapses to gray at the lightness level
        let gray = hsl_to_rgb(0.77, 0.0, 0.42);
        assert!((gray - Vec3::splat(0.42)).length() < EPS);
    }

    #[test]
    fn test_hsl_to_rgb_stays_in_unit_range() {
        for h in 0..20 {
            for l in 1..10 {
                let rgb = hsl_to_rgb(h as f32 / 20.0, 0.9, l as f32 / 10.0);
                for c in rgb.to_array() {
                    assert!((-EPS..=1.0 + EPS).contains(&c));
                }
            }
        }
    }

    #[test]
    fn test_lightness_bounded() {
        for i in 0..100 {
            let l = lightness(i as f32 * 0.37, 0.8);
            assert!((0.3 - EPS..=0.5 + EPS).contains(&l));
        }
    }

    #[test]
    fn test_fragment_color_brightness_may_exceed_unit() {
        // Loud frame: the amplitude boost is allowed to push RGB past 1.0
        let audio = FrameAudioState {
            bass: 1.0,
            mid: 0.0,
            treble: 1.0,
            avg_amplitude: 1.0,
        };
        let resolution = Vec2::new(640.0, 480.0);

        let mut max_channel = 0.0f32;
        for i in 0..32 {
            for j in 0..32 {
                let frag = Vec2::new(i as f32 * 20.0, j as f32 * 15.0);
                let color = fragment_color(frag, resolution, Vec3::ONE, &audio, 1.0);
                for c in color.to_array() {
                    assert!(c.is_finite());
                    max_channel = max_channel.max(c);
                }
            }
        }
        assert!(max_channel > 1.0, "expected overflow, max was {}", max_channel);
    }

    #[test]
    fn test_fragment_color_sixfold_symmetric() {
        let audio = FrameAudioState {
            bass: 0.3,
            mid: 0.4,
            treble: 0.5,
            avg_amplitude: 0.1,
        };
        let resolution = Vec2::new(1000.0, 1000.0);
        let center = resolution * 0.5;
        let slice = TAU / KALEIDO_SEGMENTS;

        // Fragments related by a whole slice rotation around the screen
        // center shade identically
        let offset = Vec2::new(180.0, 60.0);
        let a = fragment_color(center + offset, resolution, Vec3::ONE, &audio, 2.0);
        let b = fragment_color(center + rotate(offset, slice), resolution, Vec3::ONE, &audio, 2.0);
        assert!((a - b).length() < 1e-3);
    }
}
