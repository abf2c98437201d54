//! Physical print sizes and their resolution to pixel canvases.
//!
//! # Example
//!
//! ```
//! use posterframe::{LengthValue, PhysicalSize, PixelSize};
//!
//! let print = PhysicalSize::new(LengthValue::cm(50.0), LengthValue::cm(70.0));
//! assert_eq!(print.to_pixels(300.0).unwrap(), PixelSize::new(5906, 8268));
//! ```

use num_traits::Float;

use crate::error::{LayoutError, Parameter};
use crate::orientation::Orientation;
use crate::units::{LengthValue, Unit};

/// Catalogued print sizes as `(side, side, unit)`. Side order is irrelevant;
/// [`size_options`] arranges them per orientation.
pub const PRINT_SIZES: [(f64, f64, Unit); 7] = [
    (50.0, 70.0, Unit::Metric),
    (30.0, 40.0, Unit::Metric),
    (70.0, 100.0, Unit::Metric),
    (11.0, 17.0, Unit::Imperial),
    (12.0, 18.0, Unit::Imperial),
    (18.0, 24.0, Unit::Imperial),
    (24.0, 36.0, Unit::Imperial),
];

/// Integer raster dimensions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelSize {
    pub w: u32,
    pub h: u32,
}

impl PixelSize {
    /// Create a new size.
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// The larger of the two sides.
    pub fn major(self) -> u32 {
        self.w.max(self.h)
    }

    /// Whether either side is zero.
    pub fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Uncompressed RGBA size in mebibytes. A rough upper bound for the
    /// exported file, shown before export.
    pub fn estimated_megabytes(self) -> f64 {
        self.w as f64 * self.h as f64 * 4.0 / (1024.0 * 1024.0)
    }
}

/// Width and height of a print, each carrying its own unit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhysicalSize {
    pub width: LengthValue,
    pub height: LengthValue,
}

impl PhysicalSize {
    /// Create a physical size.
    pub const fn new(width: LengthValue, height: LengthValue) -> Self {
        Self { width, height }
    }

    /// Both sides in the same unit.
    pub const fn uniform(width: f64, height: f64, unit: Unit) -> Self {
        Self {
            width: LengthValue::new(width, unit),
            height: LengthValue::new(height, unit),
        }
    }

    /// Orientation implied by the sides.
    pub fn orientation(&self) -> Orientation {
        Orientation::of(self.width.in_inches(), self.height.in_inches())
    }

    /// Resolve to a pixel canvas at `ppi`. See [`resolve_pixel_size`].
    pub fn to_pixels(&self, ppi: f64) -> Result<PixelSize, LayoutError> {
        resolve_pixel_size(self, ppi)
    }
}

impl core::fmt::Display for PhysicalSize {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.width.unit == self.height.unit {
            write!(
                f,
                "{} × {} {}",
                self.width.value, self.height.value, self.width.unit
            )
        } else {
            write!(f, "{} × {}", self.width, self.height)
        }
    }
}

/// Convert a physical size and pixel density into an integer canvas size.
///
/// Both axes are derived from a single diagonal magnitude and angle rather
/// than scaled and rounded independently:
///
/// ```text
///   d = √(w² + h²)        θ = asin(h / d)        D = d · ppi
///   pixels = (round(D·cos θ), round(D·sin θ))
/// ```
///
/// Sides are normalized to inches first, so mixed-unit sizes are fine.
/// A canvas side that does not fit in a `u32` is rejected as a density
/// error.
pub fn resolve_pixel_size(size: &PhysicalSize, ppi: f64) -> Result<PixelSize, LayoutError> {
    if !(ppi > 0.0) || !ppi.is_finite() {
        return Err(LayoutError::InvalidParameter(Parameter::Density));
    }
    let w = size.width.in_inches();
    let h = size.height.in_inches();
    if !(w >= 0.0 && h >= 0.0) || !w.is_finite() || !h.is_finite() || (w == 0.0 && h == 0.0) {
        return Err(LayoutError::InvalidParameter(Parameter::PrintSize));
    }

    let diagonal = Float::sqrt(w * w + h * h);
    let angle = Float::asin(h / diagonal);
    let diagonal_px = diagonal * ppi;
    let w_px = Float::round(diagonal_px * Float::cos(angle));
    let h_px = Float::round(diagonal_px * Float::sin(angle));
    if !(w_px <= u32::MAX as f64 && h_px <= u32::MAX as f64) {
        return Err(LayoutError::InvalidParameter(Parameter::Density));
    }

    Ok(PixelSize {
        w: w_px as u32,
        h: h_px as u32,
    })
}

/// Catalogued print sizes in `unit`, arranged for `orientation`.
pub fn size_options(orientation: Orientation, unit: Unit) -> impl Iterator<Item = PhysicalSize> {
    PRINT_SIZES
        .into_iter()
        .filter(move |&(_, _, u)| u == unit)
        .map(move |(a, b, u)| {
            let (w, h) = orientation.arrange(a, b);
            PhysicalSize::uniform(w, h, u)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_example() {
        let size = PhysicalSize::uniform(50.0, 70.0, Unit::Metric);
        assert_eq!(resolve_pixel_size(&size, 300.0), Ok(PixelSize::new(5906, 8268)));
    }

    #[test]
    fn imperial_example() {
        let size = PhysicalSize::uniform(20.0, 30.0, Unit::Imperial);
        assert_eq!(resolve_pixel_size(&size, 300.0), Ok(PixelSize::new(6000, 9000)));
    }

    #[test]
    fn mixed_units_normalize() {
        // 2.54 cm == 1 in
        let size = PhysicalSize::new(LengthValue::cm(25.4), LengthValue::inches(20.0));
        assert_eq!(resolve_pixel_size(&size, 100.0), Ok(PixelSize::new(1000, 2000)));
    }

    #[test]
    fn zero_width_is_allowed() {
        let size = PhysicalSize::uniform(0.0, 10.0, Unit::Imperial);
        assert_eq!(resolve_pixel_size(&size, 10.0), Ok(PixelSize::new(0, 100)));
    }

    #[test]
    fn invalid_density() {
        let size = PhysicalSize::uniform(20.0, 30.0, Unit::Imperial);
        for ppi in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                resolve_pixel_size(&size, ppi),
                Err(LayoutError::InvalidParameter(Parameter::Density)),
                "ppi={ppi}"
            );
        }
    }

    #[test]
    fn canvas_beyond_u32_is_rejected() {
        let size = PhysicalSize::uniform(50.0, 70.0, Unit::Metric);
        assert_eq!(
            resolve_pixel_size(&size, 1e10),
            Err(LayoutError::InvalidParameter(Parameter::Density))
        );
        // One side overflows while the other still fits.
        let strip = PhysicalSize::uniform(1.0, 1e9, Unit::Imperial);
        assert_eq!(
            resolve_pixel_size(&strip, 10.0),
            Err(LayoutError::InvalidParameter(Parameter::Density))
        );
    }

    #[test]
    fn zero_area() {
        let size = PhysicalSize::uniform(0.0, 0.0, Unit::Metric);
        assert_eq!(
            resolve_pixel_size(&size, 300.0),
            Err(LayoutError::InvalidParameter(Parameter::PrintSize))
        );
        let negative = PhysicalSize::uniform(-5.0, 10.0, Unit::Metric);
        assert!(resolve_pixel_size(&negative, 300.0).is_err());
    }

    #[test]
    fn aspect_matches_physical() {
        for ppi in [72.0, 96.0, 150.0, 240.0, 300.0, 600.0] {
            for (a, b, unit) in PRINT_SIZES {
                let size = PhysicalSize::uniform(a, b, unit);
                let px = resolve_pixel_size(&size, ppi).unwrap();
                let exact_w = size.width.to_pixels(ppi);
                let exact_h = size.height.to_pixels(ppi);
                assert!((px.w as f64 - exact_w).abs() <= 1.0, "{size} @ {ppi}");
                assert!((px.h as f64 - exact_h).abs() <= 1.0, "{size} @ {ppi}");
            }
        }
    }

    #[test]
    fn size_options_by_orientation() {
        let portrait: Vec<_> = size_options(Orientation::Portrait, Unit::Metric).collect();
        assert_eq!(portrait.len(), 3);
        assert!(portrait.iter().all(|s| s.width.value <= s.height.value));

        let landscape: Vec<_> = size_options(Orientation::Landscape, Unit::Imperial).collect();
        assert_eq!(landscape.len(), 4);
        assert_eq!(landscape[0], PhysicalSize::uniform(17.0, 11.0, Unit::Imperial));
        assert!(landscape.iter().all(|s| s.orientation() == Orientation::Landscape));
    }

    #[test]
    fn label() {
        let size = PhysicalSize::uniform(50.0, 70.0, Unit::Metric);
        assert_eq!(size.to_string(), "50 × 70 cm");
        let mixed = PhysicalSize::new(LengthValue::cm(50.0), LengthValue::inches(20.0));
        assert_eq!(mixed.to_string(), "50 cm × 20 in");
    }

    #[test]
    fn estimated_megabytes() {
        assert!((PixelSize::new(1024, 256).estimated_megabytes() - 1.0).abs() < 1e-12);
    }
}
