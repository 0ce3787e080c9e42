// Fixed-size particle field: particles drift, bounce off the viewport edges,
// fade out as their life runs down and respawn somewhere else at full life.
//
// The field never owns the frame loop. The host calls `step` once per display
// refresh and stops re-requesting frames when it gets `Tick::Stop` back.

use crate::color::Color;
use crate::particle::Particle;
use crate::viewport::Viewport;
use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub count: usize,
    pub life_decay: f64,
    pub max_life: f64,
    // Each velocity component is drawn from [-max_speed, max_speed)
    pub max_speed: f64,
    pub min_size: f64,
    pub max_size: f64,
    pub min_alpha: f64,
    pub max_alpha: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            count: 5,
            life_decay: 0.1,
            max_life: 100.0,
            max_speed: 1.0,
            min_size: 2.0,
            max_size: 6.0,
            min_alpha: 0.2,
            max_alpha: 0.7,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Stop,
}

// What the visual handle of one particle should show after a step
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    pub pos: [f64; 2],
    pub opacity: f64,
}

pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    frames: Vec<Frame>,
    running: bool,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(config: FieldConfig, viewport: Viewport, rng: &mut R) -> Self {
        let mut particles = Vec::with_capacity(config.count);
        for _ in 0..config.count {
            let pos = viewport.random_point(rng);
            let vel = [
                uniform(rng, -config.max_speed, config.max_speed),
                uniform(rng, -config.max_speed, config.max_speed),
            ];
            let life = rng.gen::<f64>() * config.max_life;
            let size = uniform(rng, config.min_size, config.max_size);
            let alpha = uniform(rng, config.min_alpha, config.max_alpha);
            particles.push(Particle::new(
                pos,
                vel,
                life,
                size,
                Color::SAND,
                alpha,
            ));
        }
        Self::from_particles(config, particles)
    }

    // Field with caller-built particles; the count is taken from the vector
    pub fn from_particles(mut config: FieldConfig, particles: Vec<Particle>) -> Self {
        config.count = particles.len();
        let frames = particles
            .iter()
            .map(|p| Frame {
                pos: p.pos,
                opacity: p.opacity(config.max_life),
            })
            .collect();
        ParticleField {
            config,
            particles,
            frames,
            running: true,
        }
    }

    pub fn step<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) -> Tick {
        if !self.running {
            return Tick::Stop;
        }
        let max_life = self.config.max_life;
        for (particle, frame) in self.particles.iter_mut().zip(self.frames.iter_mut()) {
            particle.advance(self.config.life_decay);
            particle.bounce(viewport);

            // Drawn before the respawn, so a spent particle shows up faded out
            // at its old spot for one frame
            frame.pos = particle.pos;
            frame.opacity = particle.opacity(max_life);

            if particle.is_spent() {
                particle.respawn(viewport.random_point(rng), max_life);
            }
        }
        Tick::Continue
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

// Uniform in [low, high); degenerate ranges collapse to `low`
fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + rng.gen::<f64>() * (high - low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPSILON: f64 = 1e-9;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn single(pos: [f64; 2], vel: [f64; 2], life: f64) -> ParticleField {
        let p = Particle::new(pos, vel, life, 3.0, Color::SAND, 0.5);
        ParticleField::from_particles(FieldConfig::default(), vec![p])
    }

    #[test]
    fn default_field_has_five_particles_inside_viewport() {
        let mut rng = StdRng::seed_from_u64(42);
        let field = ParticleField::new(FieldConfig::default(), viewport(), &mut rng);
        assert_eq!(field.len(), 5);
        for p in field.particles() {
            assert!(viewport().contains(p.pos));
            assert!(p.vel[0] >= -1.0 && p.vel[0] < 1.0);
            assert!(p.vel[1] >= -1.0 && p.vel[1] < 1.0);
            assert!(p.life >= 0.0 && p.life < 100.0);
            assert!(p.size >= 2.0 && p.size < 6.0);
            assert!(p.alpha >= 0.2 && p.alpha < 0.7);
        }
    }

    #[test]
    fn same_seed_same_field() {
        let mut a = ParticleField::new(
            FieldConfig::default(),
            viewport(),
            &mut StdRng::seed_from_u64(9),
        );
        let mut b = ParticleField::new(
            FieldConfig::default(),
            viewport(),
            &mut StdRng::seed_from_u64(9),
        );
        let mut rng_a = StdRng::seed_from_u64(10);
        let mut rng_b = StdRng::seed_from_u64(10);
        for _ in 0..2000 {
            a.step(viewport(), &mut rng_a);
            b.step(viewport(), &mut rng_b);
        }
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.frames(), b.frames());
    }

    #[test]
    fn bounce_at_left_edge() {
        let mut field = single([0.0, 50.0], [-0.3, 0.2], 50.0);
        let mut rng = StdRng::seed_from_u64(0);
        field.step(viewport(), &mut rng);
        let p = field.particles()[0];
        assert_eq!(p.vel, [0.3, 0.2]);
        assert!((p.pos[0] + 0.3).abs() < EPSILON);
        assert!((p.pos[1] - 50.2).abs() < EPSILON);
    }

    #[test]
    fn spent_particle_respawns_with_same_velocity() {
        let mut field = single([400.0, 300.0], [0.25, -0.75], 0.05);
        let mut rng = StdRng::seed_from_u64(3);
        field.step(viewport(), &mut rng);

        let p = field.particles()[0];
        assert_eq!(p.life, 100.0);
        assert_eq!(p.vel[0].to_bits(), 0.25f64.to_bits());
        assert_eq!(p.vel[1].to_bits(), (-0.75f64).to_bits());
        assert!(viewport().contains(p.pos));

        // The frame still shows the old spot, fully faded
        let frame = field.frames()[0];
        assert_eq!(frame.pos, [400.25, 299.25]);
        assert_eq!(frame.opacity, 0.0);
    }

    #[test]
    fn invariants_hold_over_many_frames() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut field = ParticleField::new(FieldConfig::default(), viewport(), &mut rng);
        let vp = viewport();

        for _ in 0..5000 {
            let before: Vec<Particle> = field.particles().to_vec();
            assert_eq!(field.step(vp, &mut rng), Tick::Continue);
            assert_eq!(field.len(), 5);

            for ((old, new), frame) in before
                .iter()
                .zip(field.particles())
                .zip(field.frames())
            {
                let decayed = old.life - 0.1;
                if decayed <= 0.0 {
                    assert_eq!(new.life, 100.0);
                } else {
                    assert_eq!(new.life, decayed);
                }

                assert!(frame.opacity >= 0.0 && frame.opacity <= 1.0);
                assert!((frame.opacity - (decayed / 100.0).max(0.0)).abs() < EPSILON);

                for axis in 0..2 {
                    let moved = old.pos[axis] + old.vel[axis];
                    let hit = moved <= 0.0 || moved >= vp.extent(axis);
                    if hit {
                        assert_eq!(new.vel[axis], -old.vel[axis]);
                    } else {
                        assert_eq!(new.vel[axis], old.vel[axis]);
                    }
                }
            }
        }
    }

    #[test]
    fn stopped_field_is_frozen() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = ParticleField::new(FieldConfig::default(), viewport(), &mut rng);
        field.step(viewport(), &mut rng);
        field.stop();
        let snapshot = field.particles().to_vec();
        assert_eq!(field.step(viewport(), &mut rng), Tick::Stop);
        assert_eq!(field.particles(), &snapshot[..]);
        assert!(!field.is_running());
    }

    #[test]
    fn config_overrides_are_respected() {
        let config = FieldConfig {
            count: 12,
            max_speed: 0.25,
            ..FieldConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(77);
        let field = ParticleField::new(config, viewport(), &mut rng);
        assert_eq!(field.len(), 12);
        assert!(field
            .particles()
            .iter()
            .all(|p| p.vel[0].abs() <= 0.25 && p.vel[1].abs() <= 0.25));
    }
}
