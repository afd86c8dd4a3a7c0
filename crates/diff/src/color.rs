use cloudiff_core::Rgba;

/// Color of a cell present only in the first cloud.
pub const A_ONLY_COLOR: Rgba = Rgba::opaque(127, 127, 127);
/// Color of a cell present only in the second cloud.
pub const B_ONLY_COLOR: Rgba = Rgba::opaque(127, 127, 255);

/// How a planar cell relates to the two clouds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    Matched { z_a: f64, z_b: f64 },
    OnlyA,
    OnlyB,
}

impl Classification {
    pub fn color(&self, amplitude: f64) -> Rgba {
        match *self {
            Classification::Matched { z_a, z_b } => delta_color(z_a, z_b, amplitude),
            Classification::OnlyA => A_ONLY_COLOR,
            Classification::OnlyB => B_ONLY_COLOR,
        }
    }
}

/// `|z_b - z_a| / amplitude` clamped to `[0, 1]`. Zero when the amplitude
/// is zero or not a usable divisor.
pub fn delta_ratio(z_a: f64, z_b: f64, amplitude: f64) -> f64 {
    if !(amplitude.is_finite() && amplitude > 0.0) {
        return 0.0;
    }
    let ratio = ((z_b - z_a).abs() / amplitude).clamp(0.0, 1.0);
    if ratio.is_nan() {
        0.0
    } else {
        ratio
    }
}

/// Green for no change, red for a change spanning the whole amplitude.
pub fn delta_color(z_a: f64, z_b: f64, amplitude: f64) -> Rgba {
    let channel = (delta_ratio(z_a, z_b, amplitude) * 255.0).round() as u8;
    Rgba::opaque(channel, 255 - channel, 0)
}
