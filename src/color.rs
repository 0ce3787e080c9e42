// Simple color struct, created from an unsigned 32 representing RRGGBBAA
// Rendered to CSS as rgba() strings for inline styles

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    // Sand tone used for the decorative particles
    pub const SAND: Color = Color { r: 196, g: 181, b: 138, a: 0xff };
    pub const GOLD: Color = Color { r: 255, g: 215, b: 0, a: 0xff };

    pub fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = num as u8;

        Color { r, g, b, a }
    }

    pub fn alpha_fraction(&self) -> f64 {
        self.a as f64 / 255.0
    }

    pub fn to_css(&self) -> String {
        self.rgba(self.alpha_fraction())
    }

    // Same color with an exact fractional alpha, clamped to [0, 1]
    pub fn rgba(&self, alpha: f64) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            alpha.max(0.0).min(1.0)
        )
    }

    // Soft dot: solid in the middle, fading out at 70% of the radius
    pub fn radial_glow(&self, alpha: f64) -> String {
        format!("radial-gradient(circle, {} 0%, transparent 70%)", self.rgba(alpha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpacks_rrggbbaa() {
        let c = Color::from_u32(0xffd700cc);
        assert_eq!(c, Color { r: 255, g: 215, b: 0, a: 204 });
        assert_eq!(c.to_css(), "rgba(255, 215, 0, 0.8)");
    }

    #[test]
    fn alpha_is_kept_exact() {
        assert_eq!(Color::GOLD.rgba(0.8), "rgba(255, 215, 0, 0.8)");
        assert_eq!(Color::SAND.rgba(0.4375), "rgba(196, 181, 138, 0.4375)");
        assert_eq!(Color::SAND.to_css(), "rgba(196, 181, 138, 1)");
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(Color::SAND.rgba(3.0), "rgba(196, 181, 138, 1)");
        assert_eq!(Color::SAND.rgba(-1.0), "rgba(196, 181, 138, 0)");
    }

    #[test]
    fn glow_wraps_color() {
        assert_eq!(
            Color::GOLD.radial_glow(0.8),
            "radial-gradient(circle, rgba(255, 215, 0, 0.8) 0%, transparent 70%)"
        );
    }
}
