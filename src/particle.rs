// Simple particle struct to keep track of individual position, velocity, remaining life
// and the cosmetic size/color picked once at creation

use crate::color::Color;
use crate::viewport::Viewport;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: [f64; 2],
    pub vel: [f64; 2],
    pub life: f64,
    pub size: f64,
    pub color: Color,
    // Glow alpha, kept as the exact fraction drawn at creation
    pub alpha: f64,
}

impl Particle {
    pub fn new(
        pos: [f64; 2],
        vel: [f64; 2],
        life: f64,
        size: f64,
        color: Color,
        alpha: f64,
    ) -> Particle {
        Particle {
            pos,
            vel,
            life,
            size,
            color,
            alpha,
        }
    }

    // Velocity is already a per-frame delta
    pub fn advance(&mut self, life_decay: f64) {
        self.pos = vecmath::vec2_add(self.pos, self.vel);
        self.life -= life_decay;
    }

    // Lossless reflection: only the sign changes, position is never clamped
    pub fn bounce(&mut self, viewport: Viewport) {
        for axis in 0..2 {
            if self.pos[axis] <= 0.0 || self.pos[axis] >= viewport.extent(axis) {
                self.vel[axis] = -self.vel[axis];
            }
        }
    }

    pub fn opacity(&self, max_life: f64) -> f64 {
        (self.life / max_life).max(0.0).min(1.0)
    }

    pub fn is_spent(&self) -> bool {
        self.life <= 0.0
    }

    pub fn respawn(&mut self, pos: [f64; 2], max_life: f64) {
        self.pos = pos;
        self.life = max_life;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(pos: [f64; 2], vel: [f64; 2]) -> Particle {
        Particle::new(pos, vel, 50.0, 3.0, Color::SAND, 0.5)
    }

    #[test]
    fn advance_moves_by_velocity_and_decays() {
        let mut p = particle([10.0, 20.0], [0.5, -0.25]);
        p.advance(0.1);
        assert_eq!(p.pos, [10.5, 19.75]);
        assert!((p.life - 49.9).abs() < 1e-12);
    }

    #[test]
    fn bounce_flips_each_axis_independently() {
        let viewport = Viewport::new(800.0, 600.0);

        let mut p = particle([0.0, 300.0], [-0.3, 0.2]);
        p.bounce(viewport);
        assert_eq!(p.vel, [0.3, 0.2]);

        let mut p = particle([400.0, 600.0], [0.3, 0.2]);
        p.bounce(viewport);
        assert_eq!(p.vel, [0.3, -0.2]);

        let mut p = particle([801.0, -1.0], [0.7, -0.9]);
        p.bounce(viewport);
        assert_eq!(p.vel, [-0.7, 0.9]);
        assert_eq!(p.pos, [801.0, -1.0]);
    }

    #[test]
    fn opacity_stays_in_unit_range() {
        let mut p = particle([1.0, 1.0], [0.0, 0.0]);
        p.life = -0.05;
        assert_eq!(p.opacity(100.0), 0.0);
        p.life = 150.0;
        assert_eq!(p.opacity(100.0), 1.0);
        p.life = 25.0;
        assert_eq!(p.opacity(100.0), 0.25);
    }
}
