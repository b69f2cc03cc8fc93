use serde::{Deserialize, Serialize};

use crate::bands::BandAverages;

/// Glow shown during silence. The warm tint keeps the visualization from
/// reading as broken when every band sits at zero.
pub const BASE_COLOR: GlowColor = GlowColor { r: 60, g: 40, b: 0 };

/// RGB color derived from the band energies, recomputed every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlowColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl GlowColor {
    /// Fixed linear map from band averages to channels. Bass drives red,
    /// mids drive green, highs drive blue; each channel clamps to 0-255
    /// and grows monotonically with its band.
    pub fn from_bands(bands: &BandAverages) -> Self {
        Self {
            r: clamp_channel(200.0 * bands.bass + 60.0),
            g: clamp_channel(140.0 * bands.mid + 40.0),
            b: clamp_channel(80.0 * bands.high),
        }
    }

    /// Linear blend toward `next`. Used when `VizConfig::blend_color` is
    /// enabled to soften frame-to-frame color jumps.
    pub fn blend(self, next: GlowColor, t: f32) -> GlowColor {
        let t = t.clamp(0.0, 1.0);
        GlowColor {
            r: lerp_channel(self.r, next.r, t),
            g: lerp_channel(self.g, next.g, t),
            b: lerp_channel(self.b, next.b, t),
        }
    }
}

impl Default for GlowColor {
    fn default() -> Self {
        BASE_COLOR
    }
}

fn clamp_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn lerp_channel(from: u8, to: u8, t: f32) -> u8 {
    clamp_channel(f32::from(from) + (f32::from(to) - f32::from(from)) * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_maps_to_the_base_color() {
        assert_eq!(GlowColor::from_bands(&BandAverages::silence()), BASE_COLOR);
    }

    #[test]
    fn channels_clamp_under_full_drive() {
        let color = GlowColor::from_bands(&BandAverages {
            bass: 1.0,
            mid: 1.0,
            high: 1.0,
        });
        // 200 * 1 + 60 would overflow red without the clamp.
        assert_eq!(color, GlowColor { r: 255, g: 180, b: 80 });
    }

    #[test]
    fn each_channel_grows_with_its_band() {
        let quiet = GlowColor::from_bands(&BandAverages {
            bass: 0.2,
            mid: 0.2,
            high: 0.2,
        });
        let loud = GlowColor::from_bands(&BandAverages {
            bass: 0.6,
            mid: 0.6,
            high: 0.6,
        });
        assert!(loud.r > quiet.r);
        assert!(loud.g > quiet.g);
        assert!(loud.b > quiet.b);
    }

    #[test]
    fn blend_interpolates_between_colors() {
        let from = GlowColor { r: 0, g: 100, b: 200 };
        let to = GlowColor { r: 100, g: 0, b: 200 };
        let half = from.blend(to, 0.5);
        assert_eq!(half, GlowColor { r: 50, g: 50, b: 200 });

        assert_eq!(from.blend(to, 0.0), from);
        assert_eq!(from.blend(to, 1.0), to);
        // Out-of-range factors are clamped rather than extrapolated.
        assert_eq!(from.blend(to, 2.0), to);
    }
}
