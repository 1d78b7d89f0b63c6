//! Transient decorative objects spawned from band-energy spikes.
//!
//! Both classes run the same lifecycle: spawn on a threshold crossing (rate
//! limited by a tick modulus), advance angle and scale every tick, and drop
//! out of the live set once their lifespan has elapsed.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::mapper::FrameAudioState;
use crate::params::ObjectClassParams;

/// Transient object class tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    PulseShape,
    SparkOrb,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 2] = [ObjectKind::PulseShape, ObjectKind::SparkOrb];

    /// Canonical parameter record for this class
    pub fn params(&self) -> ObjectClassParams {
        match self {
            ObjectKind::PulseShape => ObjectClassParams::pulse_shape(),
            ObjectKind::SparkOrb => ObjectClassParams::spark_orb(),
        }
    }
}

/// One live decorative object
#[derive(Debug, Clone, Copy)]
pub struct TransientObject {
    pub kind: ObjectKind,

    /// Per-object variation seed in [0,1)
    pub seed: f32,

    /// Spawn timestamp (milliseconds since app start)
    pub spawn_time_ms: f64,

    /// Total lifetime (milliseconds)
    pub lifespan_ms: f32,

    /// Current orbit angle (radians)
    pub angle: f32,

    /// Orbit radius (world units)
    pub orbit_radius: f32,

    /// Rise-fall envelope value for the current tick; derived from age,
    /// never negative
    pub scale: f32,
}

impl TransientObject {
    fn spawn(kind: ObjectKind, now_ms: f64, rng: &mut impl Rng) -> Self {
        let params = kind.params();
        Self {
            kind,
            seed: rng.gen_range(0.0..1.0),
            spawn_time_ms: now_ms,
            lifespan_ms: rng.gen_range(params.lifespan_ms.0..params.lifespan_ms.1),
            angle: rng.gen_range(0.0..TAU),
            orbit_radius: rng.gen_range(params.orbit_radius.0..params.orbit_radius.1),
            scale: 0.0,
        }
    }

    /// Age as a fraction of lifespan; 0 at spawn, 1 at expiry
    pub fn life_fraction(&self, now_ms: f64) -> f32 {
        ((now_ms - self.spawn_time_ms) as f32) / self.lifespan_ms
    }

    /// Advance one tick: orbit angle steps by the class constant, scale is
    /// recomputed from age
    fn advance(&mut self, now_ms: f64) {
        let params = self.kind.params();
        self.angle += params.angular_velocity_rad;
        self.scale = scale_envelope(self.life_fraction(now_ms), params.scale_amplitude);
    }

    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.spawn_time_ms >= self.lifespan_ms as f64
    }

    /// World-space offset: planar orbit, plus vertical bobbing at double the
    /// orbit frequency for classes with a vertical amplitude
    pub fn offset(&self) -> Vec3 {
        let params = self.kind.params();
        Vec3::new(
            self.angle.cos() * self.orbit_radius * self.scale,
            (2.0 * self.angle).sin() * params.vertical_amplitude * self.scale,
            self.angle.sin() * self.orbit_radius * self.scale,
        )
    }

    /// Sphere radius for this tick's draw call
    pub fn draw_radius(&self) -> f32 {
        self.kind.params().base_radius * self.scale
    }
}

/// Rise-to-peak-at-midlife-then-fall envelope; 0 at both ends of life and
/// clamped non-negative past expiry
pub fn scale_envelope(life_fraction: f32, amplitude: f32) -> f32 {
    (life_fraction * PI).sin().max(0.0) * amplitude
}

/// Live transient-object collection plus the spawn gate state
pub struct TransientField {
    objects: Vec<TransientObject>,
    tick_count: u64,
    rng: StdRng,
}

impl TransientField {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            tick_count: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic field for tests
    pub fn with_rng_seed(seed: u64) -> Self {
        Self {
            objects: Vec::new(),
            tick_count: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Run one tick: evaluate spawn gates, advance every live object, then
    /// lazily drop the expired ones.
    pub fn tick(&mut self, audio: &FrameAudioState, now_ms: f64) {
        for kind in ObjectKind::ALL {
            let params = kind.params();
            let gate_open = self.tick_count % params.spawn_interval_ticks == 0;
            if gate_open && params.trigger.level(audio) > params.spawn_threshold {
                self.objects
                    .push(TransientObject::spawn(kind, now_ms, &mut self.rng));
            }
        }

        for object in &mut self.objects {
            object.advance(now_ms);
        }
        self.objects.retain(|object| !object.expired(now_ms));

        self.tick_count += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransientObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl Default for TransientField {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loud_bass() -> FrameAudioState {
        FrameAudioState {
            bass: 0.9,
            mid: 0.0,
            treble: 0.0,
            avg_amplitude: 0.0,
        }
    }

    fn loud_treble() -> FrameAudioState {
        FrameAudioState {
            bass: 0.0,
            mid: 0.0,
            treble: 0.9,
            avg_amplitude: 0.0,
        }
    }

    #[test]
    fn test_scale_envelope_rise_fall() {
        for amplitude in [1.0, 0.5] {
            assert!(scale_envelope(0.0, amplitude).abs() < 1e-6);
            assert!((scale_envelope(1.0, amplitude)).abs() < 1e-6);
            assert!((scale_envelope(0.5, amplitude) - amplitude).abs() < 1e-6);

            // Non-negative across the whole life and beyond
            for i in 0..=40 {
                let t = i as f32 / 20.0; // runs past expiry to 2.0
                assert!(scale_envelope(t, amplitude) >= 0.0);
            }

            // Peak sits at midlife
            for i in 1..20 {
                let t = i as f32 / 20.0;
                assert!(scale_envelope(t, amplitude) <= scale_envelope(0.5, amplitude) + 1e-6);
            }
        }
    }

    #[test]
    fn test_spawn_draws_stay_in_class_ranges() {
        let mut field = TransientField::with_rng_seed(7);

        // Force a handful of pulse spawns across gate ticks
        for tick in 0..150 {
            field.tick(&loud_bass(), tick as f64 * 16.0);
        }

        assert!(field.len() >= 2);
        for object in field.iter() {
            assert_eq!(object.kind, ObjectKind::PulseShape);
            assert!((0.0..1.0).contains(&object.seed));
            assert!((5000.0..10000.0).contains(&object.lifespan_ms));
            assert!((50.0..200.0).contains(&object.orbit_radius));
        }
    }

    #[test]
    fn test_exactly_one_pulse_after_fifteen_loud_ticks() {
        let mut field = TransientField::with_rng_seed(11);

        for tick in 0..15 {
            field.tick(&loud_bass(), tick as f64 * 16.0);
        }

        assert_eq!(field.len(), 1);
        let object = field.iter().next().unwrap();
        assert_eq!(object.kind, ObjectKind::PulseShape);
        assert!((5000.0..=10000.0).contains(&object.lifespan_ms));
    }

    #[test]
    fn test_spawn_rate_limited_by_tick_modulus() {
        let mut field = TransientField::with_rng_seed(3);

        // Sustained loud bass and treble; record the population after each
        // tick to find the spawn ticks
        let mut pulse_spawn_ticks = Vec::new();
        let mut orb_spawn_ticks = Vec::new();
        let mut prev_pulses = 0;
        let mut prev_orbs = 0;
        let audio = FrameAudioState {
            bass: 0.9,
            mid: 0.0,
            treble: 0.9,
            avg_amplitude: 0.0,
        };

        for tick in 0..120u64 {
            field.tick(&audio, tick as f64 * 16.0);
            let pulses = field.iter().filter(|o| o.kind == ObjectKind::PulseShape).count();
            let orbs = field.iter().filter(|o| o.kind == ObjectKind::SparkOrb).count();
            if pulses > prev_pulses {
                pulse_spawn_ticks.push(tick);
            }
            if orbs > prev_orbs {
                orb_spawn_ticks.push(tick);
            }
            prev_pulses = pulses;
            prev_orbs = orbs;
        }

        // Nothing expires inside 120 ticks of 16ms, so every spawn is visible
        assert!(!pulse_spawn_ticks.is_empty());
        assert!(!orb_spawn_ticks.is_empty());
        for pair in pulse_spawn_ticks.windows(2) {
            assert!(pair[1] - pair[0] >= 15);
        }
        for pair in orb_spawn_ticks.windows(2) {
            assert!(pair[1] - pair[0] >= 20);
        }
    }

    #[test]
    fn test_quiet_audio_never_spawns() {
        let mut field = TransientField::with_rng_seed(5);
        let quiet = FrameAudioState {
            bass: 0.8, // at the threshold, not over it
            mid: 1.0,
            treble: 0.7,
            avg_amplitude: 1.0,
        };

        for tick in 0..100 {
            field.tick(&quiet, tick as f64 * 16.0);
        }
        assert!(field.is_empty());
    }

    #[test]
    fn test_expired_objects_removed_lazily() {
        let mut field = TransientField::with_rng_seed(2);

        field.tick(&loud_treble(), 0.0);
        assert_eq!(field.len(), 1);
        let lifespan = field.iter().next().unwrap().lifespan_ms;
        assert!((3000.0..6000.0).contains(&lifespan));

        // Just before expiry the object is still live
        field.tick(&FrameAudioState::silence(), (lifespan - 1.0) as f64);
        assert_eq!(field.len(), 1);

        // At expiry it is gone
        field.tick(&FrameAudioState::silence(), lifespan as f64);
        assert!(field.is_empty());
    }

    #[test]
    fn test_angle_advances_by_class_velocity() {
        let mut field = TransientField::with_rng_seed(13);
        field.tick(&loud_bass(), 0.0);
        let start_angle = field.iter().next().unwrap().angle;

        for tick in 1..=10 {
            field.tick(&FrameAudioState::silence(), tick as f64 * 16.0);
        }

        let angle = field.iter().next().unwrap().angle;
        let velocity = ObjectClassParams::pulse_shape().angular_velocity_rad;
        assert!((angle - (start_angle + 10.0 * velocity)).abs() < 1e-5);
    }

    #[test]
    fn test_offset_matches_orbit_formulas() {
        let mut field = TransientField::with_rng_seed(17);
        field.tick(&loud_treble(), 0.0);
        field.tick(&FrameAudioState::silence(), 1500.0);

        let object = *field.iter().next().unwrap();
        assert_eq!(object.kind, ObjectKind::SparkOrb);
        assert!(object.scale > 0.0);

        let offset = object.offset();
        let expected_x = object.angle.cos() * object.orbit_radius * object.scale;
        let expected_y = (2.0 * object.angle).sin() * 50.0 * object.scale;
        let expected_z = object.angle.sin() * object.orbit_radius * object.scale;
        assert!((offset.x - expected_x).abs() < 1e-5);
        assert!((offset.y - expected_y).abs() < 1e-5);
        assert!((offset.z - expected_z).abs() < 1e-5);
    }

    #[test]
    fn test_pulse_offset_is_planar() {
        let mut field = TransientField::with_rng_seed(19);
        field.tick(&loud_bass(), 0.0);
        field.tick(&FrameAudioState::silence(), 2500.0);

        let object = field.iter().next().unwrap();
        assert_eq!(object.kind, ObjectKind::PulseShape);
        assert_eq!(object.offset().y, 0.0);
    }

    #[test]
    fn test_draw_radius_follows_envelope() {
        let mut field = TransientField::with_rng_seed(23);
        field.tick(&loud_bass(), 0.0);

        // At spawn the envelope is 0
        let object = field.iter().next().unwrap();
        assert!(object.draw_radius() < 1e-3);

        // Near midlife it approaches the class base radius
        let lifespan = object.lifespan_ms;
        field.tick(&FrameAudioState::silence(), (lifespan * 0.5) as f64);
        let object = field.iter().next().unwrap();
        let base = ObjectClassParams::pulse_shape().base_radius;
        assert!((object.draw_radius() - base).abs() < base * 0.01);
    }
}
