//! Unit conversion utilities.
//!
//! The fitting logic works in points; slide XML stores positions and sizes
//! in EMUs and font sizes in centipoints.

pub const EMUS_PER_PT: i64 = 12_700;

#[inline]
pub fn pt_to_emu(pt: f32) -> i64 {
    (pt as f64 * EMUS_PER_PT as f64).round() as i64
}

#[inline]
pub fn emu_to_pt(emu: i64) -> f32 {
    (emu as f64 / EMUS_PER_PT as f64) as f32
}

/// Font sizes serialize into the `sz` attribute as centipoints.
#[inline]
pub fn pt_to_centipoints(pt: f32) -> u32 {
    (pt as f64 * 100.0).round() as u32
}

#[inline]
pub fn centipoints_to_pt(centi: u32) -> f32 {
    centi as f32 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pt_emu_roundtrip() {
        assert_eq!(pt_to_emu(73.0), 927_100);
        assert_eq!(pt_to_emu(35.0), 444_500);
        assert_eq!(emu_to_pt(927_100), 73.0);
    }

    #[test]
    fn test_centipoints() {
        assert_eq!(pt_to_centipoints(12.0), 1200);
        assert_eq!(pt_to_centipoints(9.6), 960);
        // Cast truncation would yield 759 here
        assert_eq!(pt_to_centipoints(7.6), 760);
        assert_eq!(centipoints_to_pt(960), 9.6);
    }
}
