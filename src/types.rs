//! Framework-side value types.

/// Optional capabilities a vendor color service may implement.
///
/// The values match the bit positions reported by
/// [`ColorHal::get_supported_features`](crate::ColorHal::get_supported_features).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Feature {
    /// Named display modes (sRGB, DCI-P3, ...).
    DisplayModes = 0x1,
    /// Color temperature adjustment.
    ColorBalance = 0x2,
    /// High-brightness sunlight mode.
    OutdoorMode = 0x4,
    /// Content-adaptive backlight control.
    AdaptiveBacklight = 0x8,
    /// Hue/saturation/intensity/contrast picture adjustment.
    PictureAdjustment = 0x10,
}

impl Feature {
    /// The bit this feature occupies in the supported-features mask.
    pub fn bit(self) -> u32 {
        self as u32
    }
}

/// An inclusive numeric range, as advertised by the vendor service.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Range<T> {
    /// Smallest accepted value.
    pub min: T,
    /// Largest accepted value.
    pub max: T,
}

impl<T: PartialOrd> Range<T> {
    /// Create a new range.
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies within the range (inclusive).
    pub fn contains(&self, value: &T) -> bool {
        *value >= self.min && *value <= self.max
    }
}

/// A named display mode (color calibration preset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMode {
    /// Vendor-assigned mode identifier. Always non-negative; the wire
    /// sentinel `-1` ("no mode") is translated to `None` before a mode
    /// reaches callers.
    pub id: i32,
    /// Human-readable mode label.
    pub name: String,
}

impl DisplayMode {
    /// Create a new display mode descriptor.
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A picture adjustment: hue, saturation, intensity, contrast, and the
/// saturation threshold below which saturation boost is not applied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsic {
    /// Hue rotation.
    pub hue: f32,
    /// Saturation scale.
    pub saturation: f32,
    /// Intensity scale.
    pub intensity: f32,
    /// Contrast scale.
    pub contrast: f32,
    /// Saturation threshold.
    pub saturation_threshold: f32,
}

impl Hsic {
    /// Create a picture adjustment with a default saturation threshold.
    pub fn new(hue: f32, saturation: f32, intensity: f32, contrast: f32) -> Self {
        Self {
            hue,
            saturation,
            intensity,
            contrast,
            saturation_threshold: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_bits_are_distinct() {
        let bits = [
            Feature::DisplayModes,
            Feature::ColorBalance,
            Feature::OutdoorMode,
            Feature::AdaptiveBacklight,
            Feature::PictureAdjustment,
        ];
        let mask = bits.iter().fold(0u32, |acc, f| {
            assert_eq!(acc & f.bit(), 0);
            acc | f.bit()
        });
        assert_eq!(mask, 0x1f);
    }

    #[test]
    fn range_contains_is_inclusive() {
        let r = Range::new(-100, 100);
        assert!(r.contains(&-100));
        assert!(r.contains(&0));
        assert!(r.contains(&100));
        assert!(!r.contains(&101));
    }
}
