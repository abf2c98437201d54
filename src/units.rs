//! Unit-tagged lengths and conversion between centimeters and inches.
//!
//! Inches are the canonical unit: pixel density is defined per inch, so
//! every length is normalized to inches before it meets a PPI value.

use crate::error::{LayoutError, Parameter};

/// Inches per centimeter.
pub const INCHES_PER_CM: f64 = 0.3937007874;

/// A linear unit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Centimeters.
    #[default]
    Metric,
    /// Inches. The canonical unit.
    Imperial,
}

impl Unit {
    /// Short suffix used in labels (`cm` / `in`).
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Metric => "cm",
            Self::Imperial => "in",
        }
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Convert centimeters to inches.
pub fn cm_to_inches(cm: f64) -> f64 {
    cm * INCHES_PER_CM
}

/// Convert inches to centimeters.
pub fn inches_to_cm(inches: f64) -> f64 {
    inches / INCHES_PER_CM
}

/// A non-negative length tagged with its unit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LengthValue {
    pub value: f64,
    pub unit: Unit,
}

impl LengthValue {
    /// Create a length. No validation; see [`try_new`](Self::try_new).
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Create a length, rejecting negative or non-finite values.
    pub fn try_new(value: f64, unit: Unit) -> Result<Self, LayoutError> {
        if !value.is_finite() || value < 0.0 {
            return Err(LayoutError::InvalidParameter(Parameter::Length));
        }
        Ok(Self { value, unit })
    }

    /// Centimeters.
    pub const fn cm(value: f64) -> Self {
        Self::new(value, Unit::Metric)
    }

    /// Inches.
    pub const fn inches(value: f64) -> Self {
        Self::new(value, Unit::Imperial)
    }

    /// Normalize to the canonical unit (inches).
    pub fn to_canonical(self) -> Self {
        self.to_unit(Unit::Imperial)
    }

    /// Express the same length in `unit`.
    pub fn to_unit(self, unit: Unit) -> Self {
        let value = match (self.unit, unit) {
            (Unit::Metric, Unit::Imperial) => cm_to_inches(self.value),
            (Unit::Imperial, Unit::Metric) => inches_to_cm(self.value),
            _ => self.value,
        };
        Self { value, unit }
    }

    /// Length in inches.
    pub fn in_inches(self) -> f64 {
        self.to_canonical().value
    }

    /// Length in pixels at `ppi`, unrounded.
    pub fn to_pixels(self, ppi: f64) -> f64 {
        self.in_inches() * ppi
    }
}

impl core::fmt::Display for LengthValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_err(a: f64, b: f64) -> f64 {
        if a == b {
            return 0.0;
        }
        (a - b).abs() / a.abs().max(b.abs())
    }

    #[test]
    fn cm_to_inches_constant() {
        assert!((cm_to_inches(2.54) - 1.0).abs() < 1e-9);
        assert!((cm_to_inches(50.0) - 19.68503937).abs() < 1e-9);
    }

    #[test]
    fn round_trip_within_tolerance() {
        let mut x = 1e-6;
        while x < 1e7 {
            assert!(rel_err(inches_to_cm(cm_to_inches(x)), x) < 1e-9, "x={x}");
            assert!(rel_err(cm_to_inches(inches_to_cm(x)), x) < 1e-9, "x={x}");
            x *= 3.7;
        }
        assert_eq!(inches_to_cm(cm_to_inches(0.0)), 0.0);
    }

    #[test]
    fn canonical_is_inches() {
        let v = LengthValue::cm(10.0).to_canonical();
        assert_eq!(v.unit, Unit::Imperial);
        assert!((v.value - 3.937007874).abs() < 1e-9);
        // Already canonical: unchanged.
        assert_eq!(LengthValue::inches(4.0).to_canonical(), LengthValue::inches(4.0));
    }

    #[test]
    fn to_unit_round_trip() {
        let v = LengthValue::inches(12.5);
        let back = v.to_unit(Unit::Metric).to_unit(Unit::Imperial);
        assert!(rel_err(back.value, 12.5) < 1e-9);
    }

    #[test]
    fn to_pixels_uses_inches() {
        assert!((LengthValue::inches(2.0).to_pixels(300.0) - 600.0).abs() < 1e-9);
        assert!((LengthValue::cm(2.54).to_pixels(100.0) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn try_new_rejects_negative() {
        assert_eq!(
            LengthValue::try_new(-1.0, Unit::Metric),
            Err(LayoutError::InvalidParameter(Parameter::Length))
        );
        assert!(LengthValue::try_new(f64::NAN, Unit::Metric).is_err());
        assert!(LengthValue::try_new(0.0, Unit::Imperial).is_ok());
    }
}
