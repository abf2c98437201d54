//! Margins: a physical length plus its pixel form at the current density.

use num_traits::Float;

use crate::units::{LengthValue, Unit};

/// Named margin sizes offered alongside a custom value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MarginPreset {
    None,
    Small,
    #[default]
    Medium,
    Large,
}

impl MarginPreset {
    /// All presets, smallest first.
    pub const ALL: [Self; 4] = [Self::None, Self::Small, Self::Medium, Self::Large];

    /// The preset's length in `unit`. Each unit has its own round values
    /// rather than a converted one.
    pub const fn length(self, unit: Unit) -> LengthValue {
        let value = match (self, unit) {
            (Self::None, _) => 0.0,
            (Self::Small, Unit::Metric) => 1.0,
            (Self::Small, Unit::Imperial) => 0.5,
            (Self::Medium, Unit::Metric) => 2.0,
            (Self::Medium, Unit::Imperial) => 1.0,
            (Self::Large, Unit::Metric) => 3.0,
            (Self::Large, Unit::Imperial) => 1.5,
        };
        LengthValue::new(value, unit)
    }

    /// The preset whose value in the length's own unit equals `length`,
    /// or `None` when the length is a custom value.
    pub fn matching(length: LengthValue) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.length(length.unit) == length)
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }
}

impl core::fmt::Display for MarginPreset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Margin in pixels, per axis.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MarginPixels {
    pub w: f64,
    pub h: f64,
}

/// A margin in both representations.
///
/// `pixels` is derived from `physical` and the density it was resolved at.
/// Fields are private so the two can never drift apart; change either input
/// through [`set_physical`](Self::set_physical) or
/// [`set_density`](Self::set_density).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Margin {
    physical: LengthValue,
    ppi: f64,
    pixels: MarginPixels,
}

impl Margin {
    /// Resolve `physical` at `ppi`.
    pub fn new(physical: LengthValue, ppi: f64) -> Self {
        Self {
            physical,
            ppi,
            pixels: margin_pixels(physical, ppi),
        }
    }

    /// A preset expressed in `unit`, resolved at `ppi`.
    pub fn preset(preset: MarginPreset, unit: Unit, ppi: f64) -> Self {
        Self::new(preset.length(unit), ppi)
    }

    pub fn physical(&self) -> LengthValue {
        self.physical
    }

    pub fn pixels(&self) -> MarginPixels {
        self.pixels
    }

    pub fn ppi(&self) -> f64 {
        self.ppi
    }

    /// Replace the physical length and re-derive pixels.
    pub fn set_physical(&mut self, physical: LengthValue) {
        *self = Self::new(physical, self.ppi);
    }

    /// Re-derive pixels at a new density.
    pub fn set_density(&mut self, ppi: f64) {
        *self = Self::new(self.physical, ppi);
    }
}

/// Pixel form of a margin length: `round(inches · ppi)` on both axes.
pub fn margin_pixels(physical: LengthValue, ppi: f64) -> MarginPixels {
    let px = Float::round(physical.to_pixels(ppi));
    MarginPixels { w: px, h: px }
}
