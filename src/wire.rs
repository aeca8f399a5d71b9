//! Wire representations used by the vendor interface.
//!
//! The vendor service speaks slightly different types than the framework:
//! mode identifier `-1` is a "no mode" sentinel, hue travels as an integer,
//! and the hue range is an integer range. Conversions live here so the rest
//! of the crate only ever sees framework types.

use crate::types::{DisplayMode, Hsic, Range};

/// Wire sentinel meaning "no display mode".
pub const NO_MODE: i32 = -1;

/// A display mode as returned by the vendor service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mode {
    /// Mode identifier; [`NO_MODE`] means absent.
    pub id: i32,
    /// Mode label.
    pub name: String,
}

impl Mode {
    /// Translate a wire mode into a framework mode, mapping the
    /// [`NO_MODE`] sentinel to `None` instead of a fake mode object.
    pub fn into_display_mode(self) -> Option<DisplayMode> {
        if self.id == NO_MODE {
            None
        } else {
            Some(DisplayMode::new(self.id, self.name))
        }
    }
}

impl From<&DisplayMode> for Mode {
    fn from(mode: &DisplayMode) -> Self {
        Self {
            id: mode.id,
            name: mode.name.clone(),
        }
    }
}

/// An inclusive integer range on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntRange {
    /// Smallest accepted value.
    pub min: i32,
    /// Largest accepted value.
    pub max: i32,
}

impl From<IntRange> for Range<i32> {
    fn from(r: IntRange) -> Self {
        Range::new(r.min, r.max)
    }
}

// Hue is an integer range on the wire but a float range to the framework.
impl From<IntRange> for Range<f32> {
    fn from(r: IntRange) -> Self {
        Range::new(r.min as f32, r.max as f32)
    }
}

/// An inclusive float range on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FloatRange {
    /// Smallest accepted value.
    pub min: f32,
    /// Largest accepted value.
    pub max: f32,
}

impl From<FloatRange> for Range<f32> {
    fn from(r: FloatRange) -> Self {
        Range::new(r.min, r.max)
    }
}

/// A picture adjustment on the wire. Hue is integral.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WireHsic {
    /// Hue rotation, integer degrees.
    pub hue: i32,
    /// Saturation scale.
    pub saturation: f32,
    /// Intensity scale.
    pub intensity: f32,
    /// Contrast scale.
    pub contrast: f32,
    /// Saturation threshold.
    pub saturation_threshold: f32,
}

impl From<WireHsic> for Hsic {
    fn from(w: WireHsic) -> Self {
        Self {
            hue: w.hue as f32,
            saturation: w.saturation,
            intensity: w.intensity,
            contrast: w.contrast,
            saturation_threshold: w.saturation_threshold,
        }
    }
}

impl From<&Hsic> for WireHsic {
    fn from(h: &Hsic) -> Self {
        Self {
            hue: h.hue.round() as i32,
            saturation: h.saturation,
            intensity: h.intensity,
            contrast: h.contrast,
            saturation_threshold: h.saturation_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_mode_translates_to_none() {
        let absent = Mode {
            id: NO_MODE,
            name: String::new(),
        };
        assert_eq!(absent.into_display_mode(), None);

        let srgb = Mode {
            id: 0,
            name: "sRGB".into(),
        };
        let mode = srgb.into_display_mode().unwrap();
        assert_eq!(mode.id, 0);
        assert_eq!(mode.name, "sRGB");
    }

    #[test]
    fn hue_rounds_on_the_way_out() {
        let hsic = Hsic::new(179.6, 1.0, 1.0, 1.0);
        let wire = WireHsic::from(&hsic);
        assert_eq!(wire.hue, 180);
    }
}
